// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::record::PathSpec;
use serde_json::Value;

/// Serializes path specifications into the text stored in a document.
pub trait PathSpecSerializer: Send + Sync {
    fn write_serialized(&self, path_spec: &PathSpec) -> Result<String, serde_json::Error>;
}

/// Writes a path specification as JSON, tagging every level of the parent
/// chain with `"__type__": "PathSpec"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathSpecSerializer;

impl JsonPathSpecSerializer {
    fn to_json_value(path_spec: &PathSpec) -> Result<Value, serde_json::Error> {
        let mut object = path_spec.properties.clone();
        object.insert("__type__".to_string(), Value::from("PathSpec"));
        object.insert(
            "type_indicator".to_string(),
            Value::from(path_spec.type_indicator.as_str()),
        );
        if let Some(location) = &path_spec.location {
            object.insert("location".to_string(), Value::from(location.as_str()));
        }
        if let Some(parent) = &path_spec.parent {
            object.insert("parent".to_string(), Self::to_json_value(parent)?);
        }
        Ok(Value::Object(object))
    }
}

impl PathSpecSerializer for JsonPathSpecSerializer {
    fn write_serialized(&self, path_spec: &PathSpec) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Self::to_json_value(path_spec)?)
    }
}
