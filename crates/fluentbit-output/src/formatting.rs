// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-field formatting of record values.

use crate::constants::{PARSER_ALIAS, PARSER_CHAIN_ATTRIBUTE, PATH_SPEC_ATTRIBUTE};
use crate::mediator::OutputMediator;
use crate::record::{AttributeValue, RecordView};
use chrono::{DateTime, SecondsFormat};

/// Resolves one named output field of a record.
///
/// Returns `None` when the record has no value for the field; the resolver
/// then falls back to custom field values and the sentinel.
pub trait FieldFormatter: Send + Sync {
    fn format_field(
        &self,
        mediator: &OutputMediator,
        field_name: &str,
        record: RecordView<'_>,
    ) -> Option<AttributeValue>;
}

/// Formatter for the default field schema.
///
/// Fields outside the default schema resolve to the like-named attribute of
/// the event data stream or the event data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFieldFormatter;

impl FieldFormatter for DefaultFieldFormatter {
    fn format_field(
        &self,
        mediator: &OutputMediator,
        field_name: &str,
        record: RecordView<'_>,
    ) -> Option<AttributeValue> {
        match field_name {
            "datetime" => format_datetime(record.event.timestamp).map(AttributeValue::Text),
            "display_name" => format_display_name(record).map(AttributeValue::Text),
            "source_long" => text_attribute(record, field_name).or_else(|| {
                mediator
                    .source_names(record.event_data.data_type())
                    .map(|names| AttributeValue::Text(names.source_long.clone()))
            }),
            "source_short" => text_attribute(record, field_name).or_else(|| {
                mediator
                    .source_names(record.event_data.data_type())
                    .map(|names| AttributeValue::Text(names.source_short.clone()))
            }),
            "tag" => record
                .event_tag
                .filter(|tag| !tag.labels.is_empty())
                .map(|tag| AttributeValue::Text(tag.labels.join(" "))),
            "timestamp" => Some(AttributeValue::Integer(record.event.timestamp)),
            "timestamp_desc" => Some(record.event.timestamp_desc.as_str())
                .filter(|description| !description.is_empty())
                .map(AttributeValue::from),
            "hostname" => mediator
                .hostname
                .as_deref()
                .map(AttributeValue::from)
                .or_else(|| attribute(record, field_name)),
            "username" => mediator
                .username
                .as_deref()
                .map(AttributeValue::from)
                .or_else(|| attribute(record, field_name)),
            PARSER_ALIAS => attribute(record, PARSER_ALIAS)
                .or_else(|| attribute(record, PARSER_CHAIN_ATTRIBUTE)),
            _ => attribute(record, field_name),
        }
    }
}

/// Formats a POSIX timestamp in microseconds as ISO 8601 in UTC.
pub fn format_datetime(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp_micros(timestamp)
        .map(|datetime| datetime.to_rfc3339_opts(SecondsFormat::Micros, false))
}

fn format_display_name(record: RecordView<'_>) -> Option<String> {
    if let Some(AttributeValue::PathSpec(path_spec)) = record.attribute(PATH_SPEC_ATTRIBUTE) {
        if let Some(location) = &path_spec.location {
            return Some(format!(
                "{}:{}",
                path_spec.type_indicator.to_uppercase(),
                location
            ));
        }
    }
    ["display_name", "filename"]
        .into_iter()
        .find_map(|name| record.attribute(name).and_then(AttributeValue::as_text))
        .map(str::to_string)
}

fn attribute(record: RecordView<'_>, name: &str) -> Option<AttributeValue> {
    record
        .attribute(name)
        .filter(|value| !matches!(value, AttributeValue::Null))
        .cloned()
}

fn text_attribute(record: RecordView<'_>, name: &str) -> Option<AttributeValue> {
    record
        .attribute(name)
        .and_then(AttributeValue::as_text)
        .map(AttributeValue::from)
}
