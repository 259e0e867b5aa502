// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;

use super::{CallMetadata, DetectPoint, EntityIdCache, Scope, Source};
use crate::identity::IdentityDeriver;
use crate::tags::CallTags;

/// Traffic and latency sample of the endpoint that received a call.
#[derive(Debug, Clone, Serialize)]
pub struct Endpoint {
    pub(crate) name: String,
    pub(crate) service_name: String,
    pub(crate) is_service_normal: bool,
    pub(crate) service_instance_name: String,
    pub(crate) latency: i32,
    #[serde(flatten)]
    pub(crate) metadata: CallMetadata,
    pub(crate) time_bucket: i64,
    pub(crate) tags: Arc<CallTags>,
    #[serde(skip)]
    pub(crate) entity_id: EntityIdCache,
}

impl Endpoint {
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
    pub fn service_instance_name(&self) -> &str {
        &self.service_instance_name
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

impl Source for Endpoint {
    fn scope(&self) -> Scope {
        Scope::Endpoint
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        self.entity_id.get_or_derive(ids, |ids| {
            let service_id = ids.service_id(&self.service_name, self.is_service_normal);
            ids.endpoint_id(&service_id, &self.name)
        })
    }
}

/// One observed parent -> child endpoint call.
///
/// The parent side is owned by the service that issued the call, which for MQ and
/// un-instrumented proxy hops can differ from the source service of the call itself.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointRelation {
    pub(crate) endpoint: String,
    pub(crate) service_name: String,
    pub(crate) is_service_normal: bool,
    pub(crate) service_instance_name: String,
    pub(crate) child_endpoint: String,
    pub(crate) child_service_name: String,
    pub(crate) is_child_service_normal: bool,
    pub(crate) child_service_instance_name: String,
    pub(crate) component_id: i32,
    pub(crate) rpc_latency: i32,
    #[serde(flatten)]
    pub(crate) metadata: CallMetadata,
    pub(crate) detect_point: DetectPoint,
    pub(crate) time_bucket: i64,
    #[serde(skip)]
    pub(crate) entity_id: EntityIdCache,
}

impl EndpointRelation {
    /// Parent endpoint name.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Service owning the parent endpoint.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    #[must_use]
    pub fn is_service_normal(&self) -> bool {
        self.is_service_normal
    }

    #[must_use]
    pub fn service_instance_name(&self) -> &str {
        &self.service_instance_name
    }

    #[must_use]
    pub fn child_endpoint(&self) -> &str {
        &self.child_endpoint
    }

    #[must_use]
    pub fn child_service_name(&self) -> &str {
        &self.child_service_name
    }

    #[must_use]
    pub fn is_child_service_normal(&self) -> bool {
        self.is_child_service_normal
    }

    #[must_use]
    pub fn child_service_instance_name(&self) -> &str {
        &self.child_service_instance_name
    }

    #[must_use]
    pub fn component_id(&self) -> i32 {
        self.component_id
    }

    #[must_use]
    pub fn rpc_latency(&self) -> i32 {
        self.rpc_latency
    }

    #[must_use]
    pub fn metadata(&self) -> &CallMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn detect_point(&self) -> DetectPoint {
        self.detect_point
    }

    pub fn source_endpoint_id(&self, ids: &dyn IdentityDeriver) -> String {
        let service_id = ids.service_id(&self.service_name, self.is_service_normal);
        ids.endpoint_id(&service_id, &self.endpoint)
    }

    pub fn child_endpoint_id(&self, ids: &dyn IdentityDeriver) -> String {
        let service_id = ids.service_id(&self.child_service_name, self.is_child_service_normal);
        ids.endpoint_id(&service_id, &self.child_endpoint)
    }
}

impl Source for EndpointRelation {
    fn scope(&self) -> Scope {
        Scope::EndpointRelation
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        self.entity_id.get_or_derive(ids, |ids| {
            ids.relation_id(&self.source_endpoint_id(ids), &self.child_endpoint_id(ids))
        })
    }
}
