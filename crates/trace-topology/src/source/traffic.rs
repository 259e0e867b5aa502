// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;

use super::{CallMetadata, Scope, Source};
use crate::identity::IdentityDeriver;
use crate::tags::CallTags;

/// System-wide traffic and latency sample. Aggregated on the time bucket alone.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalTraffic {
    pub(crate) name: String,
    pub(crate) service_instance_name: String,
    pub(crate) endpoint_name: String,
    pub(crate) latency: i32,
    #[serde(flatten)]
    pub(crate) metadata: CallMetadata,
    pub(crate) time_bucket: i64,
    pub(crate) tags: Arc<CallTags>,
}

impl GlobalTraffic {
    /// Name of the service that received the call.
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

impl Source for GlobalTraffic {
    fn scope(&self) -> Scope {
        Scope::All
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, _ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

/// Database traffic sample, tracked per database service only.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseAccess {
    /// Component id of the client library, standing in for the database type.
    pub(crate) database_type_id: i32,
    pub(crate) name: String,
    pub(crate) latency: i32,
    pub(crate) status: bool,
    pub(crate) time_bucket: i64,
}

impl DatabaseAccess {
    #[must_use]
    pub fn database_type_id(&self) -> i32 {
        self.database_type_id
    }

    /// Name of the database service.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn latency(&self) -> i32 {
        self.latency
    }

    #[must_use]
    pub fn status(&self) -> bool {
        self.status
    }
}

impl Source for DatabaseAccess {
    fn scope(&self) -> Scope {
        Scope::DatabaseAccess
    }

    fn time_bucket(&self) -> i64 {
        self.time_bucket
    }

    fn entity_id(&self, _ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}
