// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::collections::HashMap;

/// Tags of one call, kept in two shapes fed by the same writes.
///
/// - `tags`: rendered `"key:value"` strings, trimmed, in insertion order, duplicates kept
/// - `original_tags`: untrimmed `key -> value`, the last write for a key wins
///
/// Downstream consumers read either shape, so the trimming asymmetry is preserved as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallTags {
    tags: Vec<String>,
    original_tags: HashMap<String, String>,
}

impl CallTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: &str, value: &str) {
        self.tags.push(format!("{}:{}", key.trim(), value.trim()));
        self.original_tags
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn original_tags(&self) -> &HashMap<String, String> {
        &self.original_tags
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
