// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

/// Human readable source names of a data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNames {
    pub source_long: String,
    pub source_short: String,
}

/// Mediates between the output modules and the rest of the pipeline.
///
/// Carries the context the field formatter needs that is not part of the
/// record itself.
#[derive(Debug, Clone, Default)]
pub struct OutputMediator {
    pub hostname: Option<String>,
    pub username: Option<String>,
    source_names: HashMap<String, SourceNames>,
}

impl OutputMediator {
    pub fn new(hostname: Option<String>, username: Option<String>) -> Self {
        OutputMediator {
            hostname,
            username,
            source_names: HashMap::new(),
        }
    }

    /// Registers the source names reported for events of `data_type`.
    pub fn add_source_names(&mut self, data_type: &str, source_long: &str, source_short: &str) {
        self.source_names.insert(
            data_type.to_string(),
            SourceNames {
                source_long: source_long.to_string(),
                source_short: source_short.to_string(),
            },
        );
    }

    /// Looks up the source names of a data type.
    ///
    /// Data types are namespaced with `:`; when the full name is unknown the
    /// lookup falls back to ever shorter prefixes, so `fs:stat:ntfs` resolves
    /// through `fs:stat` and then `fs`.
    pub fn source_names(&self, data_type: &str) -> Option<&SourceNames> {
        let mut candidate = data_type;
        loop {
            if let Some(names) = self.source_names.get(candidate) {
                return Some(names);
            }
            let (prefix, _) = candidate.rsplit_once(':')?;
            candidate = prefix;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_names_exact_and_prefix() {
        let mut mediator = OutputMediator::default();
        mediator.add_source_names("fs:stat", "File stat", "FILE");

        assert_eq!(
            mediator.source_names("fs:stat").map(|n| n.source_short.as_str()),
            Some("FILE")
        );
        assert_eq!(
            mediator
                .source_names("fs:stat:ntfs")
                .map(|n| n.source_long.as_str()),
            Some("File stat")
        );
        assert!(mediator.source_names("windows:evtx:record").is_none());
        assert!(mediator.source_names("").is_none());
    }
}
