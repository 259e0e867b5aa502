// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Canonical topology sources.
//!
//! Each observed call is projected into a family of records, one per [`Scope`]. Records are
//! immutable once built and carry no back-references. The ones keyed on an entity compute their
//! identity on first request through [`Source::entity_id`] and cache it.
//!
//! | Scope | Record | Identity |
//! |---|---|---|
//! | `All` | [`GlobalTraffic`] | none |
//! | `Service` | [`Service`] | service |
//! | `ServiceInstance` | [`ServiceInstance`] | instance |
//! | `Endpoint` | [`Endpoint`] | endpoint |
//! | `ServiceRelation` | [`ServiceRelation`] | relation of two services |
//! | `ServiceInstanceRelation` | [`ServiceInstanceRelation`] | relation of two instances |
//! | `EndpointRelation` | [`EndpointRelation`] | relation of two endpoints |
//! | `ServiceMeta` | [`ServiceMeta`] | service |
//! | `DatabaseAccess` | [`DatabaseAccess`] | none |

mod endpoint;
mod instance;
mod service;
mod traffic;

pub use endpoint::{Endpoint, EndpointRelation};
pub use instance::{ServiceInstance, ServiceInstanceRelation};
pub use service::{Service, ServiceMeta, ServiceRelation};
pub use traffic::{DatabaseAccess, GlobalTraffic};

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

use crate::identity::IdentityDeriver;

/// Classification attached to a service at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    #[default]
    Undefined,
    General,
    Mesh,
    MeshCp,
    MeshDp,
    OsLinux,
    K8s,
    Faas,
    Database,
    Cache,
    Browser,
    Mq,
    VirtualDatabase,
    VirtualMq,
    VirtualGateway,
}

/// Kind of request a call carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Database,
    Http,
    #[default]
    Rpc,
    Grpc,
    Logic,
    Tcp,
    Mq,
    Cache,
}

/// Where the call was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectPoint {
    #[default]
    Server,
    Client,
    Proxy,
}

/// The downstream channel a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    All,
    Service,
    ServiceInstance,
    Endpoint,
    ServiceRelation,
    ServiceInstanceRelation,
    EndpointRelation,
    ServiceMeta,
    DatabaseAccess,
}

impl Scope {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::All => "All",
            Scope::Service => "Service",
            Scope::ServiceInstance => "ServiceInstance",
            Scope::Endpoint => "Endpoint",
            Scope::ServiceRelation => "ServiceRelation",
            Scope::ServiceInstanceRelation => "ServiceInstanceRelation",
            Scope::EndpointRelation => "EndpointRelation",
            Scope::ServiceMeta => "ServiceMeta",
            Scope::DatabaseAccess => "DatabaseAccess",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request kind and outcome of a call, shared by every metrics-bearing record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CallMetadata {
    pub request_type: RequestType,
    pub status: bool,
    /// Deprecated status code, kept only for producers that predate
    /// `http_response_status_code`. Never merged into it.
    pub response_code: i32,
    pub http_response_status_code: i32,
    pub rpc_status_code: String,
}

impl CallMetadata {
    /// The HTTP status to report: `http_response_status_code` when set, otherwise the legacy
    /// `response_code`.
    #[must_use]
    pub fn effective_http_status(&self) -> i32 {
        if self.http_response_status_code != 0 {
            self.http_response_status_code
        } else {
            self.response_code
        }
    }
}

/// Common surface of every topology record.
pub trait Source {
    fn scope(&self) -> Scope;

    fn time_bucket(&self) -> i64;

    /// Identity the aggregation engine merges on. Computed with `ids` on the first call and
    /// cached for that deriver's [`IdentityDeriver::scheme`]; a deriver of another scheme gets
    /// a freshly derived id. Scopes without an identity return `""`.
    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str>;
}

/// Lazily derived entity id, remembered along with the scheme of the deriver that produced it.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntityIdCache(OnceLock<(&'static str, String)>);

impl EntityIdCache {
    pub(crate) fn get_or_derive<F>(&self, ids: &dyn IdentityDeriver, derive: F) -> Cow<'_, str>
    where
        F: Fn(&dyn IdentityDeriver) -> String,
    {
        let (scheme, id) = self.0.get_or_init(|| (ids.scheme(), derive(ids)));
        if *scheme == ids.scheme() {
            Cow::Borrowed(id.as_str())
        } else {
            Cow::Owned(derive(ids))
        }
    }
}

/// Any record produced by a projection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "scope")]
pub enum TopologySource {
    All(GlobalTraffic),
    Service(Service),
    ServiceInstance(ServiceInstance),
    Endpoint(Endpoint),
    ServiceRelation(ServiceRelation),
    ServiceInstanceRelation(ServiceInstanceRelation),
    EndpointRelation(EndpointRelation),
    ServiceMeta(ServiceMeta),
    DatabaseAccess(DatabaseAccess),
}

impl TopologySource {
    fn as_source(&self) -> &dyn Source {
        match self {
            TopologySource::All(s) => s,
            TopologySource::Service(s) => s,
            TopologySource::ServiceInstance(s) => s,
            TopologySource::Endpoint(s) => s,
            TopologySource::ServiceRelation(s) => s,
            TopologySource::ServiceInstanceRelation(s) => s,
            TopologySource::EndpointRelation(s) => s,
            TopologySource::ServiceMeta(s) => s,
            TopologySource::DatabaseAccess(s) => s,
        }
    }
}

impl Source for TopologySource {
    fn scope(&self) -> Scope {
        self.as_source().scope()
    }

    fn time_bucket(&self) -> i64 {
        self.as_source().time_bucket()
    }

    fn entity_id(&self, ids: &dyn IdentityDeriver) -> Cow<'_, str> {
        self.as_source().entity_id(ids)
    }
}

macro_rules! impl_from_record {
    ($($variant:ident => $record:ty),* $(,)?) => {
        $(
            impl From<$record> for TopologySource {
                fn from(record: $record) -> Self {
                    TopologySource::$variant(record)
                }
            }
        )*
    };
}

impl_from_record! {
    All => GlobalTraffic,
    Service => Service,
    ServiceInstance => ServiceInstance,
    Endpoint => Endpoint,
    ServiceRelation => ServiceRelation,
    ServiceInstanceRelation => ServiceInstanceRelation,
    EndpointRelation => EndpointRelation,
    ServiceMeta => ServiceMeta,
    DatabaseAccess => DatabaseAccess,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_http_status_prefers_new_field() {
        let metadata = CallMetadata {
            response_code: 500,
            http_response_status_code: 404,
            ..Default::default()
        };
        assert_eq!(metadata.effective_http_status(), 404);
        // the legacy field is never overwritten
        assert_eq!(metadata.response_code, 500);
    }

    #[test]
    fn test_effective_http_status_falls_back_to_legacy_field() {
        let metadata = CallMetadata {
            response_code: 503,
            ..Default::default()
        };
        assert_eq!(metadata.effective_http_status(), 503);
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::All.to_string(), "All");
        assert_eq!(
            Scope::ServiceInstanceRelation.to_string(),
            "ServiceInstanceRelation"
        );
    }

    #[test]
    fn test_enums_serialize_screaming_case() {
        assert_eq!(
            serde_json::to_string(&Layer::VirtualDatabase).unwrap(),
            "\"VIRTUAL_DATABASE\""
        );
        assert_eq!(
            serde_json::to_string(&RequestType::Database).unwrap(),
            "\"DATABASE\""
        );
        assert_eq!(
            serde_json::to_string(&DetectPoint::Proxy).unwrap(),
            "\"PROXY\""
        );
    }
}
