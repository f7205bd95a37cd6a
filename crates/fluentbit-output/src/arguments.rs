// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration surface of the Fluent Bit output modules.

use crate::constants::{DEFAULT_FLUSH_INTERVAL, DEFAULT_PORT, DEFAULT_SERVER};
use crate::enrich::DocumentEnricher;
use crate::error::ConfigError;
use crate::output::OutputModule;
use crate::sink::{FluentBitOutput, FluentBitSink, FluentBitTimesketchOutput};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Options shared by the Fluent Bit output modules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Name of the index to save events into
    pub index_name: Option<String>,
    /// Number of events to buffer before a bulk insert
    pub flush_interval: usize,
    /// Hostname or IP address of the Fluent Bit server
    pub server: String,
    /// Port of the Fluent Bit HTTP input
    pub port: u16,
    /// Path appended to the server URL
    pub url_prefix: Option<String>,
    /// Timesketch timeline identifier
    pub timeline_id: Option<u64>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            index_name: None,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            url_prefix: None,
            timeline_id: None,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|val| !val.trim().is_empty())
}

impl OutputOptions {
    /// Create options from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let options = Self {
            index_name: non_empty_env("FLUENTBIT_INDEX_NAME"),
            flush_interval: parse_env("FLUENTBIT_FLUSH_INTERVAL")
                .unwrap_or(DEFAULT_FLUSH_INTERVAL),
            server: env::var("FLUENTBIT_SERVER")
                .unwrap_or_else(|_| DEFAULT_SERVER.to_string()),
            port: parse_env("FLUENTBIT_PORT").unwrap_or(DEFAULT_PORT),
            url_prefix: non_empty_env("FLUENTBIT_URL_PREFIX"),
            timeline_id: parse_env("FLUENTBIT_TIMELINE_ID"),
        };

        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flush_interval == 0 {
            return Err(ConfigError::BadConfigOption(
                "flush interval must be greater than 0".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::BadConfigOption(
                "port must be greater than 0".to_string(),
            ));
        }

        if self.server.trim().is_empty() {
            return Err(ConfigError::BadConfigOption(
                "server cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Applies the shared options to either Fluent Bit output module.
pub struct FluentBitArgumentsHelper;

impl FluentBitArgumentsHelper {
    pub fn parse_options(
        options: &OutputOptions,
        output_module: &mut dyn OutputModule,
    ) -> Result<(), ConfigError> {
        options.validate()?;

        let output_module = output_module.as_any_mut();
        if let Some(output) = output_module.downcast_mut::<FluentBitOutput>() {
            return apply_shared_options(options, output);
        }
        if let Some(output) = output_module.downcast_mut::<FluentBitTimesketchOutput>() {
            return apply_shared_options(options, output);
        }
        Err(ConfigError::BadConfigObject(
            "Output module is not an instance of SharedFluentBitOutputModule".to_string(),
        ))
    }
}

fn apply_shared_options<E: DocumentEnricher>(
    options: &OutputOptions,
    output: &mut FluentBitSink<E>,
) -> Result<(), ConfigError> {
    output.set_server_information(&options.server, options.port)?;
    output.set_flush_interval(options.flush_interval)?;
    output.set_url_prefix(options.url_prefix.as_deref())?;
    if let Some(index_name) = &options.index_name {
        output.set_index_name(index_name)?;
    }
    Ok(())
}

/// Applies the options of the Timesketch output module.
pub struct FluentBitTimesketchArgumentsHelper;

impl FluentBitTimesketchArgumentsHelper {
    pub fn parse_options(
        options: &OutputOptions,
        output_module: &mut dyn OutputModule,
    ) -> Result<(), ConfigError> {
        if !output_module.as_any_mut().is::<FluentBitTimesketchOutput>() {
            return Err(ConfigError::BadConfigObject(
                "Output module is not an instance of FluentBitTimesketchOutputModule".to_string(),
            ));
        }

        FluentBitArgumentsHelper::parse_options(options, output_module)?;

        if let Some(timeline_id) = options.timeline_id.filter(|id| *id != 0) {
            if let Some(output) = output_module
                .as_any_mut()
                .downcast_mut::<FluentBitTimesketchOutput>()
            {
                output.set_timeline_identifier(timeline_id)?;
            }
        }
        Ok(())
    }
}
