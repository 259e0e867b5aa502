// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConfigError;
use std::env;

pub const DEFAULT_SERVICE_NAME_MAX_LENGTH: usize = 70;
pub const DEFAULT_INSTANCE_NAME_MAX_LENGTH: usize = 70;
pub const DEFAULT_ENDPOINT_NAME_MAX_LENGTH: usize = 150;

const SERVICE_NAME_MAX_LENGTH_ENV: &str = "TOPOLOGY_SERVICE_NAME_MAX_LENGTH";
const INSTANCE_NAME_MAX_LENGTH_ENV: &str = "TOPOLOGY_INSTANCE_NAME_MAX_LENGTH";
const ENDPOINT_NAME_MAX_LENGTH_ENV: &str = "TOPOLOGY_ENDPOINT_NAME_MAX_LENGTH";

/// Limits applied by [`crate::naming::NamingControl`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConfig {
    /// Longest service name kept, in chars
    pub service_name_max_length: usize,
    /// Longest instance name kept, in chars
    pub instance_name_max_length: usize,
    /// Longest endpoint name kept, in chars
    pub endpoint_name_max_length: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            service_name_max_length: DEFAULT_SERVICE_NAME_MAX_LENGTH,
            instance_name_max_length: DEFAULT_INSTANCE_NAME_MAX_LENGTH,
            endpoint_name_max_length: DEFAULT_ENDPOINT_NAME_MAX_LENGTH,
        }
    }
}

impl NamingConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup. Values that don't parse fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read_limit = |key: &str, default: usize| {
            lookup(key)
                .and_then(|val| val.trim().parse::<usize>().ok())
                .unwrap_or(default)
        };

        let config = Self {
            service_name_max_length: read_limit(
                SERVICE_NAME_MAX_LENGTH_ENV,
                DEFAULT_SERVICE_NAME_MAX_LENGTH,
            ),
            instance_name_max_length: read_limit(
                INSTANCE_NAME_MAX_LENGTH_ENV,
                DEFAULT_INSTANCE_NAME_MAX_LENGTH,
            ),
            endpoint_name_max_length: read_limit(
                ENDPOINT_NAME_MAX_LENGTH_ENV,
                DEFAULT_ENDPOINT_NAME_MAX_LENGTH,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            (SERVICE_NAME_MAX_LENGTH_ENV, self.service_name_max_length),
            (INSTANCE_NAME_MAX_LENGTH_ENV, self.instance_name_max_length),
            (ENDPOINT_NAME_MAX_LENGTH_ENV, self.endpoint_name_max_length),
        ];
        for (key, limit) in limits {
            if limit == 0 {
                return Err(ConfigError::InvalidConfig(format!(
                    "{key} must be greater than 0"
                )));
            }
        }
        Ok(())
    }
}
