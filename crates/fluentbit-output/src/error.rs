// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while configuring an output module, before any write.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0}")]
    BadConfigObject(String),

    #[error("Invalid configuration option: {0}")]
    BadConfigOption(String),

    #[error("Missing arguments: {}", .0.join(", "))]
    MissingArguments(Vec<String>),

    #[error("Output module configuration cannot change after writing started")]
    WritingStarted,
}
