// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::record::AttributeValue;
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Converts a resolved field value into JSON suitable for transport.
///
/// Some parsers write raw bytes to storage. Those are decoded as UTF-8 with
/// invalid sequences replaced, and a warning names the attribute and data
/// type. Everything else maps onto the matching JSON value. Never fails.
pub fn sanitize_field(data_type: &str, attribute_name: &str, value: AttributeValue) -> Value {
    match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(value) => Value::Bool(value),
        AttributeValue::Integer(value) => Value::from(value),
        AttributeValue::Float(value) => match Number::from_f64(value) {
            Some(number) => Value::Number(number),
            None => Value::String(value.to_string()),
        },
        AttributeValue::Text(text) | AttributeValue::Identifier(text) => Value::String(text),
        AttributeValue::Bytes(bytes) => {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            warn!(
                "Found bytes value for attribute: {} of data type: {}. Value was converted to UTF-8: \"{}\"",
                attribute_name, data_type, text
            );
            Value::String(text)
        }
        AttributeValue::DateTime(timestamp) => Value::from(timestamp),
        AttributeValue::List(values) => Value::Array(
            values
                .into_iter()
                .map(|value| sanitize_field(data_type, attribute_name, value))
                .collect(),
        ),
        AttributeValue::Object(object) => Value::Object(object),
        AttributeValue::PathSpec(path_spec) => {
            serde_json::to_value(path_spec).unwrap_or_else(|_| Value::Object(Map::new()))
        }
    }
}
