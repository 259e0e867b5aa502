// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::naming::NameKind;
use crate::source::Scope;

/// Errors raised while normalizing the names of a call.
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: NameKind,
        name: String,
        reason: String,
    },

    #[error("Invalid endpoint grouping rule '{pattern}': {source}")]
    InvalidGroupingRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while handing sources to a downstream receiver.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Receiver for {0} sources is closed")]
    ReceiverClosed(Scope),
}
