// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Variant-specific metadata stamped on each document before buffering.

use crate::constants::{TIMELINE_ID_ARGUMENT, TIMELINE_ID_KEY};
use crate::fields::FieldDocument;
use serde_json::Value;

/// Strategy that adds routing metadata to documents and reports the
/// arguments it needs before writing can start.
pub trait DocumentEnricher: Send + Sync + 'static {
    fn enrich(&self, document: &mut FieldDocument);

    fn missing_arguments(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Plain Fluent Bit output: no extra metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl DocumentEnricher for NoEnrichment {
    fn enrich(&self, _document: &mut FieldDocument) {}
}

/// Stamps the Timesketch timeline identifier, which routes documents of a
/// shared index to their timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineEnricher {
    timeline_identifier: Option<u64>,
}

impl TimelineEnricher {
    pub fn timeline_identifier(&self) -> Option<u64> {
        self.timeline_identifier
    }

    pub fn set_timeline_identifier(&mut self, timeline_identifier: u64) {
        self.timeline_identifier = Some(timeline_identifier);
    }
}

impl DocumentEnricher for TimelineEnricher {
    fn enrich(&self, document: &mut FieldDocument) {
        document.insert(
            TIMELINE_ID_KEY.to_string(),
            self.timeline_identifier.map_or(Value::Null, Value::from),
        );
    }

    fn missing_arguments(&self) -> Vec<String> {
        match self.timeline_identifier {
            Some(identifier) if identifier != 0 => Vec::new(),
            _ => vec![TIMELINE_ID_ARGUMENT.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_enrichment_leaves_document_untouched() {
        let mut document = FieldDocument::new();
        document.insert("message".into(), json!("x"));

        NoEnrichment.enrich(&mut document);

        assert_eq!(document.len(), 1);
        assert!(NoEnrichment.missing_arguments().is_empty());
    }

    #[test]
    fn test_timeline_identifier_stamped() {
        let mut enricher = TimelineEnricher::default();
        enricher.set_timeline_identifier(42);
        let mut document = FieldDocument::new();

        enricher.enrich(&mut document);

        assert_eq!(document[TIMELINE_ID_KEY], json!(42));
        assert!(enricher.missing_arguments().is_empty());
    }

    #[test]
    fn test_missing_timeline_identifier() {
        let enricher = TimelineEnricher::default();
        let mut document = FieldDocument::new();

        enricher.enrich(&mut document);

        assert_eq!(document[TIMELINE_ID_KEY], Value::Null);
        assert_eq!(
            enricher.missing_arguments(),
            vec!["timeline_id".to_string()]
        );
    }

    #[test]
    fn test_zero_timeline_identifier_counts_as_missing() {
        let mut enricher = TimelineEnricher::default();
        enricher.set_timeline_identifier(0);
        assert_eq!(
            enricher.missing_arguments(),
            vec!["timeline_id".to_string()]
        );
    }
}
