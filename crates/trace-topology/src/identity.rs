// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Entity and relation identities.
//!
//! The same logical service is observed by many agents through many spans. Downstream
//! aggregation merges those observations by comparing ids byte for byte, so every id here is a
//! pure function of its inputs and stable across process restarts.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const NORMAL_FLAG: &str = "1";
const INFERRED_FLAG: &str = "0";
const SERVICE_FLAG_SEPARATOR: char = '.';
const CHILD_SEPARATOR: char = '_';
const RELATION_SEPARATOR: char = '-';

/// Derives stable identities for topology entities.
pub trait IdentityDeriver {
    /// Identity of a service. `is_normal` tells an instrumented service apart from one only
    /// inferred from a peer's span, so both may share a name without colliding.
    fn service_id(&self, service_name: &str, is_normal: bool) -> String;

    /// Identity of an instance of the service identified by `service_id`.
    fn instance_id(&self, service_id: &str, instance_name: &str) -> String;

    /// Identity of an endpoint of the service identified by `service_id`.
    fn endpoint_id(&self, service_id: &str, endpoint_name: &str) -> String;

    /// Identity of the directed relation `source_id -> dest_id`.
    fn relation_id(&self, source_id: &str, dest_id: &str) -> String;

    /// Names the id scheme. Records cache one id per scheme, so two derivers reporting the
    /// same scheme must derive the same ids. Defaults to the implementing type's name.
    fn scheme(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Default id scheme.
///
/// | Entity | Id |
/// |---|---|
/// | service | `base64(name) "." ("1" \| "0")` |
/// | instance | `service_id "_" base64(instance)` |
/// | endpoint | `service_id "_" base64(endpoint)` |
/// | relation | `source_id "-" dest_id` |
///
/// Standard base64 never emits `.`, `_` or `-`, so every composed id splits back unambiguously.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64IdentityDeriver;

impl Base64IdentityDeriver {
    /// Recovers `(service_name, is_normal)` from a service id. Returns `None` for anything this
    /// deriver did not produce.
    #[must_use]
    pub fn parse_service_id(service_id: &str) -> Option<(String, bool)> {
        let (encoded, flag) = service_id.rsplit_once(SERVICE_FLAG_SEPARATOR)?;
        let is_normal = match flag {
            NORMAL_FLAG => true,
            INFERRED_FLAG => false,
            _ => return None,
        };
        let decoded = STANDARD.decode(encoded).ok()?;
        let name = String::from_utf8(decoded).ok()?;
        Some((name, is_normal))
    }

    /// Splits a relation id into its source and dest ids.
    #[must_use]
    pub fn parse_relation_id(relation_id: &str) -> Option<(&str, &str)> {
        relation_id.split_once(RELATION_SEPARATOR)
    }
}

impl IdentityDeriver for Base64IdentityDeriver {
    fn service_id(&self, service_name: &str, is_normal: bool) -> String {
        let flag = if is_normal { NORMAL_FLAG } else { INFERRED_FLAG };
        format!(
            "{}{SERVICE_FLAG_SEPARATOR}{flag}",
            STANDARD.encode(service_name)
        )
    }

    fn instance_id(&self, service_id: &str, instance_name: &str) -> String {
        format!(
            "{service_id}{CHILD_SEPARATOR}{}",
            STANDARD.encode(instance_name)
        )
    }

    fn endpoint_id(&self, service_id: &str, endpoint_name: &str) -> String {
        format!(
            "{service_id}{CHILD_SEPARATOR}{}",
            STANDARD.encode(endpoint_name)
        )
    }

    fn relation_id(&self, source_id: &str, dest_id: &str) -> String {
        format!("{source_id}{RELATION_SEPARATOR}{dest_id}")
    }
}
