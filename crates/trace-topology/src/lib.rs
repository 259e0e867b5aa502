// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Trace-to-topology projection.
//!
//! Turns one observed cross-process call into the canonical, deduplicatable sources the metrics
//! aggregation engine consumes: global traffic, services, instances, endpoints, their relations,
//! service catalog entries and database access samples.
//!
//! # Example
//!
//! ```
//! use trace_topology::{
//!     Base64IdentityDeriver, CallContext, NamingControl, RequestType, Source, TopologySource,
//! };
//!
//! let mut call = CallContext {
//!     source_service_name: "frontend".to_string(),
//!     source_endpoint_name: "/checkout".to_string(),
//!     dest_service_name: "orders".to_string(),
//!     dest_service_instance_name: "i-1".to_string(),
//!     dest_endpoint_name: "/createOrder".to_string(),
//!     request_type: RequestType::Rpc,
//!     latency: 42,
//!     status: true,
//!     time_bucket: 20240101120000,
//!     ..Default::default()
//! };
//! call.record_tag("http.method", "POST");
//!
//! let call = call.prepare(&NamingControl::default())?;
//! let relation = call.to_service_relation();
//! assert_eq!(relation.entity_id(&Base64IdentityDeriver), "ZnJvbnRlbmQ=.1-b3JkZXJz.1");
//! // the source instance was never reported
//! assert!(call.to_service_instance_relation().is_none());
//!
//! let mut sources: Vec<TopologySource> = Vec::new();
//! call.dispatch(&mut sources)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_extern_crates)]
#![deny(unused_assignments)]

pub mod call;
pub mod config;
pub mod error;
pub mod identity;
pub mod naming;
pub mod receiver;
pub mod source;
pub mod tags;

pub use call::{CallContext, PreparedCall};
pub use config::NamingConfig;
pub use error::{ConfigError, DispatchError, NamingError};
pub use identity::{Base64IdentityDeriver, IdentityDeriver};
pub use naming::{NameKind, NamingControl, NamingNormalizer};
pub use receiver::SourceReceiver;
pub use source::{
    CallMetadata, DatabaseAccess, DetectPoint, Endpoint, EndpointRelation, GlobalTraffic, Layer,
    RequestType, Scope, Service, ServiceInstance, ServiceInstanceRelation, ServiceMeta,
    ServiceRelation, Source, TopologySource,
};
pub use tags::CallTags;
