// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Name normalization for services, instances and endpoints.
//!
//! Agents report names in whatever shape their framework hands them. Before any identity is
//! derived, every name of a call goes through a [`NamingNormalizer`] so that the same logical
//! service, instance or endpoint always ends up with the same display name.
//!
//! [`NamingControl`] is the stock policy:
//! - empty names pass through untouched, since emptiness drives relation suppression
//! - names carrying control characters are rejected with [`NamingError::InvalidName`]
//! - names longer than the configured limit are truncated on a char boundary
//! - endpoint names are then rewritten by the owning service's grouping rules, if any match
//!
//! Every operation is idempotent: formatting an already formatted name returns it unchanged.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use tracing::{trace, warn};

use crate::config::NamingConfig;
use crate::error::NamingError;

/// Maps raw agent-reported names to canonical display names.
///
/// Implementations must be deterministic. Failures propagate unchanged out of
/// [`crate::call::CallContext::prepare`].
pub trait NamingNormalizer {
    fn format_service_name(&self, service_name: &str) -> Result<String, NamingError>;

    fn format_instance_name(&self, instance_name: &str) -> Result<String, NamingError>;

    /// `service_name` is the already-normalized name of the service owning the endpoint.
    fn format_endpoint_name(
        &self,
        service_name: &str,
        endpoint_name: &str,
    ) -> Result<String, NamingError>;
}

/// Which kind of name failed normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Service,
    Instance,
    Endpoint,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Service => write!(f, "service"),
            NameKind::Instance => write!(f, "instance"),
            NameKind::Endpoint => write!(f, "endpoint"),
        }
    }
}

#[derive(Debug)]
struct GroupingRule {
    pattern: Regex,
    group_name: String,
}

/// Default [`NamingNormalizer`], driven by [`NamingConfig`] limits and per-service endpoint
/// grouping rules.
#[derive(Debug, Default)]
pub struct NamingControl {
    config: NamingConfig,
    grouping: HashMap<String, Vec<GroupingRule>>,
}

impl NamingControl {
    #[must_use]
    pub fn new(config: NamingConfig) -> Self {
        Self {
            config,
            grouping: HashMap::new(),
        }
    }

    /// Registers an endpoint grouping rule for `service_name`.
    ///
    /// `pattern` must match the whole endpoint name, after truncation to the endpoint limit.
    /// Rules are tried in registration order and the first match wins. `service_name` is compared against normalized service names, so a
    /// rule for a name longer than the service limit never fires.
    pub fn add_grouping_rule(
        &mut self,
        service_name: &str,
        pattern: &str,
        group_name: &str,
    ) -> Result<(), NamingError> {
        let anchored = format!("^(?:{pattern})$");
        let pattern_regex =
            Regex::new(&anchored).map_err(|source| NamingError::InvalidGroupingRule {
                pattern: pattern.to_string(),
                source,
            })?;

        self.grouping
            .entry(service_name.to_string())
            .or_default()
            .push(GroupingRule {
                pattern: pattern_regex,
                group_name: group_name.to_string(),
            });
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    /// Rewrites an already truncated endpoint name with the first matching rule of
    /// `service_name`. A name that already is one of the service's group names is final, so a
    /// grouped name is never grouped again.
    fn group_endpoint(&self, service_name: &str, endpoint_name: &str) -> String {
        let Some(rules) = self.grouping.get(service_name) else {
            return endpoint_name.to_string();
        };
        let max_length = self.config.endpoint_name_max_length;
        if rules
            .iter()
            .any(|rule| truncate_chars(&rule.group_name, max_length) == endpoint_name)
        {
            return endpoint_name.to_string();
        }
        match rules.iter().find(|rule| rule.pattern.is_match(endpoint_name)) {
            Some(rule) => {
                trace!(
                    service = service_name,
                    endpoint = endpoint_name,
                    group = rule.group_name.as_str(),
                    "Grouped endpoint name"
                );
                truncate_chars(&rule.group_name, max_length).to_string()
            }
            None => endpoint_name.to_string(),
        }
    }
}

impl NamingNormalizer for NamingControl {
    fn format_service_name(&self, service_name: &str) -> Result<String, NamingError> {
        format_name(
            NameKind::Service,
            service_name,
            self.config.service_name_max_length,
        )
    }

    fn format_instance_name(&self, instance_name: &str) -> Result<String, NamingError> {
        format_name(
            NameKind::Instance,
            instance_name,
            self.config.instance_name_max_length,
        )
    }

    fn format_endpoint_name(
        &self,
        service_name: &str,
        endpoint_name: &str,
    ) -> Result<String, NamingError> {
        let truncated = format_name(
            NameKind::Endpoint,
            endpoint_name,
            self.config.endpoint_name_max_length,
        )?;
        Ok(self.group_endpoint(service_name, &truncated))
    }
}

fn format_name(kind: NameKind, name: &str, max_length: usize) -> Result<String, NamingError> {
    check_charset(kind, name)?;
    let truncated = truncate_chars(name, max_length);
    if truncated.len() < name.len() {
        warn!(
            "{kind} name '{name}' is longer than {max_length} chars, truncated to '{truncated}'"
        );
    }
    Ok(truncated.to_string())
}

fn check_charset(kind: NameKind, name: &str) -> Result<(), NamingError> {
    match name.chars().find(|c| c.is_control()) {
        Some(c) => Err(NamingError::InvalidName {
            kind,
            name: name.to_string(),
            reason: format!("contains control character {:?}", c),
        }),
        None => Ok(()),
    }
}

/// Cuts `name` down to at most `max_chars` chars without splitting one.
fn truncate_chars(name: &str, max_chars: usize) -> &str {
    match name.char_indices().nth(max_chars) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}
