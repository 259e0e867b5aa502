// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;

use super::{CallMetadata, DetectPoint, EntityIdCache, Layer, Scope, Source};
use crate::identity::IdentityDeriver;
use crate::tags::CallTags;

/// Traffic and latency sample of the service that received a call.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub(crate) name: String,
    pub(crate) service_instance_name: String,
    pub(crate) endpoint_name: String,
    pub(crate) layer: Layer,
    pub(crate) is_normal: bool,
    pub(crate) latency: i32,
    #[serde(flatten)]
    pub(crate) metadata: CallMetadata,
    pub(crate) time_bucket: i64,
    pub(crate) tags: Arc<CallTags>,
    #[serde(skip)]
    pub(crate) entity_id: EntityIdCache,
}

impl Service {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn service_instance_name(&self) -> &str {
        &self.service_instance_name
    }

    #[must_use]
    pub fn endpoint_name(&self) -> &str {
        &self.endpoint_name
    }

    #[must_use]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.is_normal
    }

    #[must_use]
    pub fn latency(&self) -> i32 {
        self.latency
    }

    #[must_use]
    pub fn metadata(&self) -> &CallMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn tags(&self) -> &CallTags {
        &self.tags
    }
}

impl Source for Service {
    fn scope(&self) -> Scope {
        Scope::Service
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        self.entity_id
            .get_or_derive(ids, |ids| ids.service_id(&self.name, self.is_normal))
    }
}

/// Catalog registration of a service. Carries no metrics, so registering a service never
/// implies it served traffic.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceMeta {
    pub(crate) name: String,
    pub(crate) layer: Layer,
    pub(crate) is_normal: bool,
    pub(crate) time_bucket: i64,
    #[serde(skip)]
    pub(crate) entity_id: EntityIdCache,
}

impl ServiceMeta {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.is_normal
    }
}

impl Source for ServiceMeta {
    fn scope(&self) -> Scope {
        Scope::ServiceMeta
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        self.entity_id
            .get_or_derive(ids, |ids| ids.service_id(&self.name, self.is_normal))
    }
}

/// One observed call between two services.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRelation {
    pub(crate) source_service_name: String,
    pub(crate) is_source_normal: bool,
    pub(crate) source_service_instance_name: String,
    pub(crate) dest_service_name: String,
    pub(crate) is_dest_normal: bool,
    pub(crate) dest_service_instance_name: String,
    pub(crate) endpoint: String,
    pub(crate) component_id: i32,
    pub(crate) latency: i32,
    #[serde(flatten)]
    pub(crate) metadata: CallMetadata,
    pub(crate) detect_point: DetectPoint,
    pub(crate) time_bucket: i64,
    #[serde(skip)]
    pub(crate) entity_id: EntityIdCache,
}

impl ServiceRelation {
    #[must_use]
    pub fn source_service_name(&self) -> &str {
        &self.source_service_name
    }

    #[must_use]
    pub fn is_source_normal(&self) -> bool {
        self.is_source_normal
    }

    #[must_use]
    pub fn source_service_instance_name(&self) -> &str {
        &self.source_service_instance_name
    }

    #[must_use]
    pub fn dest_service_name(&self) -> &str {
        &self.dest_service_name
    }

    #[must_use]
    pub fn is_dest_normal(&self) -> bool {
        self.is_dest_normal
    }

    #[must_use]
    pub fn dest_service_instance_name(&self) -> &str {
        &self.dest_service_instance_name
    }

    /// The dest endpoint the call hit.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn component_id(&self) -> i32 {
        self.component_id
    }

    #[must_use]
    pub fn latency(&self) -> i32 {
        self.latency
    }

    #[must_use]
    pub fn metadata(&self) -> &CallMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn detect_point(&self) -> DetectPoint {
        self.detect_point
    }

    pub fn source_service_id(&self, ids: &dyn IdentityDeriver) -> String {
        ids.service_id(&self.source_service_name, self.is_source_normal)
    }

    pub fn dest_service_id(&self, ids: &dyn IdentityDeriver) -> String {
        ids.service_id(&self.dest_service_name, self.is_dest_normal)
    }
}

impl Source for ServiceRelation {
    fn scope(&self) -> Scope {
        Scope::ServiceRelation
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        self.entity_id.get_or_derive(ids, |ids| {
            ids.relation_id(&self.source_service_id(ids), &self.dest_service_id(ids))
        })
    }
}
