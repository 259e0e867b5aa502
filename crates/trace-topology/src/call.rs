// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-call projection into topology sources.
//!
//! # Lifecycle
//!
//! ```text
//! CallContext (raw names) --prepare(naming)--> PreparedCall --to_*()--> records
//! ```
//!
//! A [`CallContext`] is filled by the span analyzer, one per observed call. [`CallContext::prepare`]
//! consumes it, normalizes every name and returns a [`PreparedCall`]. Projections only exist on
//! `PreparedCall`, so no record can be built from raw names. Each projection is a pure read and
//! they may run in any order.
//!
//! # Suppression
//!
//! Relation and conditional projections return `None` when the call does not carry enough data
//! for that record kind. That is a normal outcome, not a failure:
//! - service instance relation: either instance name is empty
//! - endpoint relation: either endpoint name is empty
//! - database access: the request is not a database call

use std::sync::Arc;

use crate::error::NamingError;
use crate::naming::NamingNormalizer;
use crate::source::{
    CallMetadata, DatabaseAccess, DetectPoint, Endpoint, EndpointRelation, EntityIdCache,
    GlobalTraffic, Layer, RequestType, Service, ServiceInstance, ServiceInstanceRelation,
    ServiceMeta, ServiceRelation,
};
use crate::tags::CallTags;

/// Attributes of one observed call, as reported by agents.
///
/// Fill it with struct update syntax and [`CallContext::record_tag`], then call
/// [`CallContext::prepare`]. Both normal flags default to `true`; set them to `false` only when
/// a side is known to be inferred rather than instrumented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub source_service_name: String,
    pub source_layer: Layer,
    pub is_source_normal: bool,
    pub source_service_instance_name: String,
    /// Service owning the source endpoint when it is not `source_service_name`, as in MQ or
    /// un-instrumented proxy hops. It always comes from a span ref, so it is always a normal
    /// service.
    pub source_endpoint_owner_service_name: Option<String>,
    pub source_endpoint_name: String,
    pub dest_service_name: String,
    pub dest_layer: Layer,
    pub is_dest_normal: bool,
    pub dest_service_instance_name: String,
    pub dest_endpoint_name: String,
    pub component_id: i32,
    pub latency: i32,
    pub status: bool,
    /// Deprecated, see [`CallMetadata::response_code`].
    pub response_code: i32,
    pub http_response_status_code: i32,
    pub rpc_status_code: String,
    pub request_type: RequestType,
    pub detect_point: DetectPoint,
    pub time_bucket: i64,
    /// Span tags. Add them through [`CallContext::record_tag`] so both shapes stay in step.
    pub tags: CallTags,
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            source_service_name: String::new(),
            source_layer: Layer::default(),
            is_source_normal: true,
            source_service_instance_name: String::new(),
            source_endpoint_owner_service_name: None,
            source_endpoint_name: String::new(),
            dest_service_name: String::new(),
            dest_layer: Layer::default(),
            is_dest_normal: true,
            dest_service_instance_name: String::new(),
            dest_endpoint_name: String::new(),
            component_id: 0,
            latency: 0,
            status: false,
            response_code: 0,
            http_response_status_code: 0,
            rpc_status_code: String::new(),
            request_type: RequestType::default(),
            detect_point: DetectPoint::default(),
            time_bucket: 0,
            tags: CallTags::default(),
        }
    }
}

impl CallContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a span tag. See [`CallTags`] for how the two shapes differ.
    pub fn record_tag(&mut self, key: &str, value: &str) {
        self.tags.record(key, value);
    }

    #[must_use]
    pub fn tags(&self) -> &CallTags {
        &self.tags
    }

    /// Normalizes every name of the call and unlocks the projections.
    ///
    /// The source endpoint is formatted against the already-normalized source service name, and
    /// the dest endpoint against the normalized dest service name. Any naming failure is
    /// returned as is and the call should not be projected at all.
    pub fn prepare<N>(mut self, naming: &N) -> Result<PreparedCall, NamingError>
    where
        N: NamingNormalizer + ?Sized,
    {
        self.source_service_name = naming.format_service_name(&self.source_service_name)?;
        self.source_endpoint_owner_service_name = self
            .source_endpoint_owner_service_name
            .as_deref()
            .map(|owner| naming.format_service_name(owner))
            .transpose()?;
        self.source_service_instance_name =
            naming.format_instance_name(&self.source_service_instance_name)?;
        self.source_endpoint_name =
            naming.format_endpoint_name(&self.source_service_name, &self.source_endpoint_name)?;
        self.dest_service_name = naming.format_service_name(&self.dest_service_name)?;
        self.dest_service_instance_name =
            naming.format_instance_name(&self.dest_service_instance_name)?;
        self.dest_endpoint_name =
            naming.format_endpoint_name(&self.dest_service_name, &self.dest_endpoint_name)?;

        let tags = Arc::new(self.tags.clone());
        Ok(PreparedCall { call: self, tags })
    }
}

/// A call whose names have been normalized. Read-only; every projection borrows it.
#[derive(Debug, Clone)]
pub struct PreparedCall {
    call: CallContext,
    tags: Arc<CallTags>,
}

impl PreparedCall {
    /// Normalized view of the call, tags included.
    #[must_use]
    pub fn context(&self) -> &CallContext {
        &self.call
    }

    #[must_use]
    pub fn tags(&self) -> &CallTags {
        &self.tags
    }

    /// Gives back the normalized context, tags included.
    #[must_use]
    pub fn into_context(self) -> CallContext {
        self.call
    }

    fn metadata(&self) -> CallMetadata {
        CallMetadata {
            request_type: self.call.request_type,
            status: self.call.status,
            response_code: self.call.response_code,
            http_response_status_code: self.call.http_response_status_code,
            rpc_status_code: self.call.rpc_status_code.clone(),
        }
    }

    /// Global traffic sample, attributed to the dest side.
    #[must_use]
    pub fn to_global_traffic(&self) -> GlobalTraffic {
        let call = &self.call;
        GlobalTraffic {
            name: call.dest_service_name.clone(),
            service_instance_name: call.dest_service_instance_name.clone(),
            endpoint_name: call.dest_endpoint_name.clone(),
            latency: call.latency,
            metadata: self.metadata(),
            time_bucket: call.time_bucket,
            tags: Arc::clone(&self.tags),
        }
    }

    /// Metrics sample of the dest service. See [`PreparedCall::to_service_meta`] for the
    /// catalog-only record.
    #[must_use]
    pub fn to_service(&self) -> Service {
        let call = &self.call;
        Service {
            name: call.dest_service_name.clone(),
            service_instance_name: call.dest_service_instance_name.clone(),
            endpoint_name: call.dest_endpoint_name.clone(),
            layer: call.dest_layer,
            is_normal: call.is_dest_normal,
            latency: call.latency,
            metadata: self.metadata(),
            time_bucket: call.time_bucket,
            tags: Arc::clone(&self.tags),
            entity_id: EntityIdCache::default(),
        }
    }

    #[must_use]
    pub fn to_service_relation(&self) -> ServiceRelation {
        let call = &self.call;
        ServiceRelation {
            source_service_name: call.source_service_name.clone(),
            is_source_normal: call.is_source_normal,
            source_service_instance_name: call.source_service_instance_name.clone(),
            dest_service_name: call.dest_service_name.clone(),
            is_dest_normal: call.is_dest_normal,
            dest_service_instance_name: call.dest_service_instance_name.clone(),
            endpoint: call.dest_endpoint_name.clone(),
            component_id: call.component_id,
            latency: call.latency,
            metadata: self.metadata(),
            detect_point: call.detect_point,
            time_bucket: call.time_bucket,
            entity_id: EntityIdCache::default(),
        }
    }

    #[must_use]
    pub fn to_service_instance(&self) -> ServiceInstance {
        let call = &self.call;
        ServiceInstance {
            name: call.dest_service_instance_name.clone(),
            service_name: call.dest_service_name.clone(),
            is_service_normal: call.is_dest_normal,
            layer: call.dest_layer,
            endpoint_name: call.dest_endpoint_name.clone(),
            latency: call.latency,
            metadata: self.metadata(),
            time_bucket: call.time_bucket,
            tags: Arc::clone(&self.tags),
            entity_id: EntityIdCache::default(),
        }
    }

    /// `None` when either side never reported its instance, e.g. a client calling an
    /// un-instrumented endpoint.
    #[must_use]
    pub fn to_service_instance_relation(&self) -> Option<ServiceInstanceRelation> {
        let call = &self.call;
        if call.source_service_instance_name.is_empty()
            || call.dest_service_instance_name.is_empty()
        {
            return None;
        }
        Some(ServiceInstanceRelation {
            source_service_name: call.source_service_name.clone(),
            is_source_service_normal: call.is_source_normal,
            source_service_instance_name: call.source_service_instance_name.clone(),
            dest_service_name: call.dest_service_name.clone(),
            is_dest_service_normal: call.is_dest_normal,
            dest_service_instance_name: call.dest_service_instance_name.clone(),
            endpoint: call.dest_endpoint_name.clone(),
            component_id: call.component_id,
            latency: call.latency,
            metadata: self.metadata(),
            detect_point: call.detect_point,
            time_bucket: call.time_bucket,
            entity_id: EntityIdCache::default(),
        })
    }

    #[must_use]
    pub fn to_endpoint(&self) -> Endpoint {
        let call = &self.call;
        Endpoint {
            name: call.dest_endpoint_name.clone(),
            service_name: call.dest_service_name.clone(),
            is_service_normal: call.is_dest_normal,
            service_instance_name: call.dest_service_instance_name.clone(),
            latency: call.latency,
            metadata: self.metadata(),
            time_bucket: call.time_bucket,
            tags: Arc::clone(&self.tags),
            entity_id: EntityIdCache::default(),
        }
    }

    /// `None` when either endpoint name is empty.
    ///
    /// The parent endpoint belongs to `source_endpoint_owner_service_name` when set, and that
    /// owner is always reported as normal. Otherwise it belongs to the source service with the
    /// source's own normal flag.
    #[must_use]
    pub fn to_endpoint_relation(&self) -> Option<EndpointRelation> {
        let call = &self.call;
        if call.source_endpoint_name.is_empty() || call.dest_endpoint_name.is_empty() {
            return None;
        }
        let (service_name, is_service_normal) = match &call.source_endpoint_owner_service_name {
            Some(owner) => (owner.clone(), true),
            None => (call.source_service_name.clone(), call.is_source_normal),
        };
        Some(EndpointRelation {
            endpoint: call.source_endpoint_name.clone(),
            service_name,
            is_service_normal,
            service_instance_name: call.source_service_instance_name.clone(),
            child_endpoint: call.dest_endpoint_name.clone(),
            child_service_name: call.dest_service_name.clone(),
            is_child_service_normal: call.is_dest_normal,
            child_service_instance_name: call.dest_service_instance_name.clone(),
            component_id: call.component_id,
            rpc_latency: call.latency,
            metadata: self.metadata(),
            detect_point: call.detect_point,
            time_bucket: call.time_bucket,
            entity_id: EntityIdCache::default(),
        })
    }

    /// Catalog registration of the dest service. No latency, status or tags.
    #[must_use]
    pub fn to_service_meta(&self) -> ServiceMeta {
        let call = &self.call;
        ServiceMeta {
            name: call.dest_service_name.clone(),
            layer: call.dest_layer,
            is_normal: call.is_dest_normal,
            time_bucket: call.time_bucket,
            entity_id: EntityIdCache::default(),
        }
    }

    /// `None` unless the call is a database request.
    #[must_use]
    pub fn to_database_access(&self) -> Option<DatabaseAccess> {
        let call = &self.call;
        if call.request_type != RequestType::Database {
            return None;
        }
        Some(DatabaseAccess {
            database_type_id: call.component_id,
            name: call.dest_service_name.clone(),
            latency: call.latency,
            status: call.status,
            time_bucket: call.time_bucket,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Base64IdentityDeriver, IdentityDeriver};
    use crate::naming::{NameKind, NamingControl};
    use crate::source::{Scope, Source};
    use proptest::prelude::*;
    use std::borrow::Cow;

    fn checkout_call() -> CallContext {
        CallContext {
            source_service_name: "frontend".to_string(),
            source_layer: Layer::General,
            source_service_instance_name: String::new(),
            source_endpoint_name: "/checkout".to_string(),
            dest_service_name: "orders".to_string(),
            dest_layer: Layer::General,
            dest_service_instance_name: "i-1".to_string(),
            dest_endpoint_name: "/createOrder".to_string(),
            component_id: 49,
            latency: 42,
            status: true,
            http_response_status_code: 200,
            request_type: RequestType::Rpc,
            detect_point: DetectPoint::Server,
            time_bucket: 20240101120000,
            ..Default::default()
        }
    }

    fn prepared(call: CallContext) -> PreparedCall {
        call.prepare(&NamingControl::default()).unwrap()
    }

    #[test]
    fn test_default_sides_are_normal() {
        let call = CallContext::new();
        assert!(call.is_source_normal);
        assert!(call.is_dest_normal);
        assert_eq!(call.source_endpoint_owner_service_name, None);
    }

    #[test]
    fn test_checkout_call_projections() {
        let call = prepared(checkout_call());

        let relation = call.to_service_relation();
        assert_eq!(relation.source_service_name(), "frontend");
        assert_eq!(relation.dest_service_name(), "orders");
        assert_eq!(relation.endpoint(), "/createOrder");
        assert_eq!(relation.latency(), 42);

        let endpoint_relation = call.to_endpoint_relation().unwrap();
        assert_eq!(endpoint_relation.endpoint(), "/checkout");
        assert_eq!(endpoint_relation.child_endpoint(), "/createOrder");
        assert_eq!(endpoint_relation.rpc_latency(), 42);

        assert!(call.to_service_instance_relation().is_none());
        assert!(call.to_database_access().is_none());
    }

    #[test]
    fn test_service_and_global_traffic_agree_on_metrics() {
        let call = prepared(checkout_call());
        let all = call.to_global_traffic();
        let service = call.to_service();

        assert_eq!(all.latency(), service.latency());
        assert_eq!(all.metadata().status, service.metadata().status);
        assert_eq!(all.time_bucket(), service.time_bucket());
        assert_eq!(all.name(), service.name());
        assert_eq!(service.layer(), Layer::General);
        assert!(service.is_normal());
    }

    #[test]
    fn test_service_meta_is_keyed_like_service() {
        let call = prepared(CallContext {
            is_dest_normal: false,
            dest_layer: Layer::VirtualDatabase,
            ..checkout_call()
        });
        let ids = Base64IdentityDeriver;

        let meta = call.to_service_meta();
        let service = call.to_service();
        assert_eq!(meta.name(), "orders");
        assert_eq!(meta.layer(), Layer::VirtualDatabase);
        assert!(!meta.is_normal());
        assert_eq!(meta.entity_id(&ids), service.entity_id(&ids));
        assert_ne!(meta.scope(), service.scope());
    }

    #[test]
    fn test_instance_and_endpoint_take_dest_side() {
        let call = prepared(CallContext {
            source_service_instance_name: "fe-0".to_string(),
            ..checkout_call()
        });

        let instance = call.to_service_instance();
        assert_eq!(instance.name(), "i-1");
        assert_eq!(instance.service_name(), "orders");
        assert_eq!(instance.endpoint_name(), "/createOrder");

        let endpoint = call.to_endpoint();
        assert_eq!(endpoint.name(), "/createOrder");
        assert_eq!(endpoint.service_name(), "orders");
        assert_eq!(endpoint.service_instance_name(), "i-1");
    }

    #[test]
    fn test_instance_relation_ids() {
        let call = prepared(CallContext {
            source_service_instance_name: "fe-0".to_string(),
            is_source_normal: false,
            ..checkout_call()
        });
        let ids = Base64IdentityDeriver;

        let relation = call.to_service_instance_relation().unwrap();
        let source_id = ids.instance_id(&ids.service_id("frontend", false), "fe-0");
        let dest_id = ids.instance_id(&ids.service_id("orders", true), "i-1");
        assert_eq!(relation.source_instance_id(&ids), source_id);
        assert_eq!(relation.dest_instance_id(&ids), dest_id);
        assert_eq!(
            relation.entity_id(&ids),
            ids.relation_id(&source_id, &dest_id)
        );
    }

    #[test]
    fn test_endpoint_relation_owner_override_is_always_normal() {
        let call = prepared(CallContext {
            source_service_name: "orderSvc".to_string(),
            is_source_normal: false,
            source_endpoint_owner_service_name: Some("gateway".to_string()),
            ..checkout_call()
        });

        let relation = call.to_endpoint_relation().unwrap();
        assert_eq!(relation.service_name(), "gateway");
        assert!(relation.is_service_normal());
    }

    #[test]
    fn test_endpoint_relation_owner_falls_back_to_source() {
        let call = prepared(CallContext {
            is_source_normal: false,
            ..checkout_call()
        });

        let relation = call.to_endpoint_relation().unwrap();
        assert_eq!(relation.service_name(), "frontend");
        assert!(!relation.is_service_normal());
    }

    #[test]
    fn test_database_access() {
        let call = prepared(CallContext {
            dest_service_name: "mysql:3306".to_string(),
            request_type: RequestType::Database,
            component_id: 33,
            latency: 7,
            ..checkout_call()
        });

        let access = call.to_database_access().unwrap();
        assert_eq!(access.database_type_id(), 33);
        assert_eq!(access.name(), "mysql:3306");
        assert_eq!(access.latency(), 7);
        assert!(access.status());
        assert_eq!(access.time_bucket(), 20240101120000);
        assert_eq!(access.scope(), Scope::DatabaseAccess);
    }

    #[test]
    fn test_prepare_groups_dest_endpoint() {
        let mut naming = NamingControl::default();
        naming
            .add_grouping_rule("orders", r"/orders/\d+", "/orders/{id}")
            .unwrap();

        let call = CallContext {
            dest_endpoint_name: "/orders/17".to_string(),
            source_endpoint_owner_service_name: Some("gateway".to_string()),
            ..checkout_call()
        }
        .prepare(&naming)
        .unwrap();

        assert_eq!(call.context().dest_endpoint_name, "/orders/{id}");
        assert_eq!(
            call.context().source_endpoint_owner_service_name.as_deref(),
            Some("gateway")
        );
    }

    #[test]
    fn test_prepare_groups_with_truncated_service_name() {
        let mut naming = NamingControl::new(crate::config::NamingConfig {
            service_name_max_length: 6,
            ..Default::default()
        });
        // the rule is keyed on the name the service ends up with
        naming
            .add_grouping_rule("orders", r"/orders/\d+", "/orders/{id}")
            .unwrap();

        let call = CallContext {
            dest_service_name: "orders-eu-west".to_string(),
            dest_endpoint_name: "/orders/17".to_string(),
            ..checkout_call()
        }
        .prepare(&naming)
        .unwrap();

        assert_eq!(call.context().dest_service_name, "orders");
        assert_eq!(call.context().dest_endpoint_name, "/orders/{id}");
    }

    #[test]
    fn test_prepare_propagates_naming_failure() {
        let err = CallContext {
            dest_service_instance_name: "i-\u{1b}1".to_string(),
            ..checkout_call()
        }
        .prepare(&NamingControl::default())
        .unwrap_err();

        match err {
            NamingError::InvalidName { kind, .. } => assert_eq!(kind, NameKind::Instance),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_tags_are_shared_by_metric_records() {
        let mut call = checkout_call();
        call.record_tag("http.method", "GET");
        call.record_tag("http.method", "POST");
        let call = prepared(call);

        for tags in [
            call.to_global_traffic().tags().clone(),
            call.to_service().tags().clone(),
            call.to_service_instance().tags().clone(),
            call.to_endpoint().tags().clone(),
        ] {
            assert_eq!(tags.tags(), ["http.method:GET", "http.method:POST"]);
            assert_eq!(tags.original_tags()["http.method"], "POST");
        }
    }

    #[test]
    fn test_into_context_keeps_tags() {
        let mut call = checkout_call();
        call.record_tag("db.statement", "select 1");
        let prepared_call = prepared(call);
        let _record = prepared_call.to_service();

        let context = prepared_call.into_context();
        assert_eq!(context.tags().tags(), ["db.statement:select 1"]);
    }

    #[test]
    fn test_prepared_context_keeps_tags() {
        let mut call = checkout_call();
        call.record_tag("http.method", " GET ");
        let prepared_call = prepared(call);

        assert_eq!(prepared_call.context().tags(), prepared_call.tags());
        assert_eq!(prepared_call.context().tags().tags(), ["http.method:GET"]);
        assert_eq!(
            prepared_call.context().tags().original_tags()["http.method"],
            " GET "
        );
    }

    #[test]
    fn test_entity_id_is_cached_per_scheme() {
        struct Upper;
        impl IdentityDeriver for Upper {
            fn service_id(&self, service_name: &str, _is_normal: bool) -> String {
                service_name.to_uppercase()
            }
            fn instance_id(&self, service_id: &str, instance_name: &str) -> String {
                format!("{service_id}/{instance_name}")
            }
            fn endpoint_id(&self, service_id: &str, endpoint_name: &str) -> String {
                format!("{service_id}/{endpoint_name}")
            }
            fn relation_id(&self, source_id: &str, dest_id: &str) -> String {
                format!("{source_id}->{dest_id}")
            }
        }

        let relation = prepared(checkout_call()).to_service_relation();
        assert_eq!(relation.entity_id(&Upper), "FRONTEND->ORDERS");
        assert!(matches!(relation.entity_id(&Upper), Cow::Borrowed(_)));
        // another scheme never sees the cached id
        assert_eq!(
            relation.entity_id(&Base64IdentityDeriver),
            "ZnJvbnRlbmQ=.1-b3JkZXJz.1"
        );
        assert_eq!(relation.entity_id(&Upper), "FRONTEND->ORDERS");

        let endpoint = prepared(checkout_call()).to_endpoint();
        assert_eq!(
            endpoint.entity_id(&Base64IdentityDeriver),
            "b3JkZXJz.1_L2NyZWF0ZU9yZGVy"
        );
        assert_eq!(endpoint.entity_id(&Upper), "ORDERS//createOrder");
    }

    fn any_request_type() -> impl Strategy<Value = RequestType> {
        prop_oneof![
            Just(RequestType::Database),
            Just(RequestType::Http),
            Just(RequestType::Rpc),
            Just(RequestType::Grpc),
            Just(RequestType::Logic),
            Just(RequestType::Tcp),
            Just(RequestType::Mq),
            Just(RequestType::Cache),
        ]
    }

    prop_compose! {
        fn any_call()(
            source_instance in "([a-z0-9-]{1,12})?",
            dest_instance in "([a-z0-9-]{1,12})?",
            source_endpoint in "(/[a-zA-Z/]{1,20})?",
            dest_endpoint in "(/orders/[a-z0-9]{1,12}|/[a-zA-Z/]{1,20})?",
            owner in proptest::option::of("[a-z]{1,10}"),
            is_source_normal in any::<bool>(),
            is_dest_normal in any::<bool>(),
            request_type in any_request_type(),
            latency in 0i32..10_000,
        ) -> CallContext {
            CallContext {
                source_service_name: "frontend".to_string(),
                is_source_normal,
                source_service_instance_name: source_instance,
                source_endpoint_owner_service_name: owner,
                source_endpoint_name: source_endpoint,
                dest_service_name: "orders".to_string(),
                is_dest_normal,
                dest_service_instance_name: dest_instance,
                dest_endpoint_name: dest_endpoint,
                request_type,
                latency,
                ..Default::default()
            }
        }
    }

    proptest! {
        #[test]
        fn test_instance_relation_suppression(call in any_call()) {
            let missing = call.source_service_instance_name.is_empty()
                || call.dest_service_instance_name.is_empty();
            let prepared_call = prepared(call);
            prop_assert_eq!(prepared_call.to_service_instance_relation().is_none(), missing);
        }

        #[test]
        fn test_endpoint_relation_suppression(call in any_call()) {
            let missing = call.source_endpoint_name.is_empty()
                || call.dest_endpoint_name.is_empty();
            let prepared_call = prepared(call);
            prop_assert_eq!(prepared_call.to_endpoint_relation().is_none(), missing);
        }

        #[test]
        fn test_database_access_only_for_database_calls(call in any_call()) {
            let is_database = call.request_type == RequestType::Database;
            let prepared_call = prepared(call);
            prop_assert_eq!(prepared_call.to_database_access().is_some(), is_database);
        }

        #[test]
        fn test_prepare_twice_is_a_no_op(call in any_call()) {
            let naming = NamingControl::default();
            let once = call.prepare(&naming).unwrap().into_context();
            let twice = once.clone().prepare(&naming).unwrap().into_context();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_prepare_twice_with_grouping_is_a_no_op(call in any_call()) {
            let mut naming = NamingControl::new(crate::config::NamingConfig {
                endpoint_name_max_length: 12,
                ..Default::default()
            });
            naming
                .add_grouping_rule("orders", r"/orders/\d+", "/orders/{id}")
                .unwrap();
            naming
                .add_grouping_rule("orders", r"/orders/[a-z]+", "/orders/by-name/{name}")
                .unwrap();

            let once = call.prepare(&naming).unwrap();
            let endpoint_id = once.to_endpoint().entity_id(&Base64IdentityDeriver).to_string();
            let once = once.into_context();
            let twice = once.clone().prepare(&naming).unwrap();
            prop_assert_eq!(
                twice.to_endpoint().entity_id(&Base64IdentityDeriver).to_string(),
                endpoint_id
            );
            prop_assert_eq!(once, twice.into_context());
        }
    }
}
