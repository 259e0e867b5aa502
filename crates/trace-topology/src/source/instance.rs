// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;

use super::{CallMetadata, DetectPoint, EntityIdCache, Layer, Scope, Source};
use crate::identity::IdentityDeriver;
use crate::tags::CallTags;

/// Traffic and latency sample of the instance that received a call.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInstance {
    pub(crate) name: String,
    pub(crate) service_name: String,
    pub(crate) is_service_normal: bool,
    pub(crate) layer: Layer,
    pub(crate) endpoint_name: String,
    pub(crate) latency: i32,
    #[serde(flatten)]
    pub(crate) metadata: CallMetadata,
    pub(crate) time_bucket: i64,
    pub(crate) tags: Arc<CallTags>,
    #[serde(skip)]
    pub(crate) entity_id: EntityIdCache,
}

impl ServiceInstance {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    #[must_use]
    pub fn is_service_normal(&self) -> bool {
        self.is_service_normal
    }

    #[must_use]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    #[must_use]
    pub fn endpoint_name(&self) -> &str {
        &self.endpoint_name
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

impl Source for ServiceInstance {
    fn scope(&self) -> Scope {
        Scope::ServiceInstance
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        self.entity_id.get_or_derive(ids, |ids| {
            let service_id = ids.service_id(&self.service_name, self.is_service_normal);
            ids.instance_id(&service_id, &self.name)
        })
    }
}

/// One observed call between two instances. Only built when both instance names are known.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInstanceRelation {
    pub(crate) source_service_name: String,
    pub(crate) is_source_service_normal: bool,
    pub(crate) source_service_instance_name: String,
    pub(crate) dest_service_name: String,
    pub(crate) is_dest_service_normal: bool,
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

impl ServiceInstanceRelation {
    #[must_use]
    pub fn source_service_name(&self) -> &str {
        &self.source_service_name
    }

    #[must_use]
    pub fn is_source_service_normal(&self) -> bool {
        self.is_source_service_normal
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
    pub fn is_dest_service_normal(&self) -> bool {
        self.is_dest_service_normal
    }

    #[must_use]
    pub fn dest_service_instance_name(&self) -> &str {
        &self.dest_service_instance_name
    }

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

    pub fn source_instance_id(&self, ids: &dyn IdentityDeriver) -> String {
        let service_id = ids.service_id(&self.source_service_name, self.is_source_service_normal);
        ids.instance_id(&service_id, &self.source_service_instance_name)
    }

    pub fn dest_instance_id(&self, ids: &dyn IdentityDeriver) -> String {
        let service_id = ids.service_id(&self.dest_service_name, self.is_dest_service_normal);
        ids.instance_id(&service_id, &self.dest_service_instance_name)
    }
}

impl Source for ServiceInstanceRelation {
    fn scope(&self) -> Scope {
        Scope::ServiceInstanceRelation
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        self.entity_id.get_or_derive(ids, |ids| {
            ids.relation_id(&self.source_instance_id(ids), &self.dest_instance_id(ids))
        })
    }
}
