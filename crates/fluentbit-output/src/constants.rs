// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Number of documents to buffer before doing a bulk insert.
pub const DEFAULT_FLUSH_INTERVAL: usize = 1000;

/// Time to wait before a request to Fluent Bit is timed out.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub const DEFAULT_SERVER: &str = "localhost";

/// Port of the Fluent Bit `http` input plugin.
pub const DEFAULT_PORT: u16 = 9880;

/// Fields every document carries, in output order.
pub const DEFAULT_FIELD_NAMES: [&str; 8] = [
    "datetime",
    "display_name",
    "message",
    "source_long",
    "source_short",
    "tag",
    "timestamp",
    "timestamp_desc",
];

/// Placeholder for a configured field without a resolvable value.
pub const SENTINEL_VALUE: &str = "-";

/// Reserved key carrying the destination index name.
pub const SEARCH_INDEX_KEY: &str = "__ts_searchindex";

/// Reserved key carrying the Timesketch timeline identifier.
pub const TIMELINE_ID_KEY: &str = "__ts_timeline_id";

/// Internal attribute published under [`PARSER_ALIAS`].
pub const PARSER_CHAIN_ATTRIBUTE: &str = "_parser_chain";
pub const PARSER_ALIAS: &str = "parser";

pub const PATH_SPEC_ATTRIBUTE: &str = "path_spec";

/// Argument name reported when the timeline identifier is missing.
pub const TIMELINE_ID_ARGUMENT: &str = "timeline_id";

pub const FLUENTBIT_OUTPUT_NAME: &str = "fluentbit";
pub const FLUENTBIT_OUTPUT_DESCRIPTION: &str = "Saves the events into a Fluent Bit server.";

pub const FLUENTBIT_TIMESKETCH_OUTPUT_NAME: &str = "fluentbit_ts";
pub const FLUENTBIT_TIMESKETCH_OUTPUT_DESCRIPTION: &str =
    "Saves the events into a Fluent Bit server for use with Timesketch.";
