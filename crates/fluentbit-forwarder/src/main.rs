// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{env, process};
use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use fluentbit_output::{
    arguments::{FluentBitArgumentsHelper, FluentBitTimesketchArgumentsHelper, OutputOptions},
    constants::{FLUENTBIT_OUTPUT_NAME, FLUENTBIT_TIMESKETCH_OUTPUT_NAME},
    error::ConfigError,
    flusher::FlushOutcome,
    mediator::OutputMediator,
    output::{create_output, output_names, OutputModule},
    record::EventRecord,
};

#[tokio::main]
pub async fn main() {
    let log_level = env::var("FLUENTBIT_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let output_name =
        env::var("FLUENTBIT_OUTPUT").unwrap_or_else(|_| FLUENTBIT_OUTPUT_NAME.to_string());
    let Some(mut output) = create_output(&output_name) else {
        let names: Vec<&str> = output_names().into_iter().map(|(name, _)| name).collect();
        error!(
            "Unsupported output module: {}. Supported modules: {}",
            output_name,
            names.join(", ")
        );
        process::exit(1);
    };

    if let Err(e) = configure(&output_name, output.as_mut()) {
        error!("Unable to configure output module {}: {}", output_name, e);
        process::exit(1);
    }

    if let Err(e) = check_missing_arguments(output.as_ref()) {
        error!("{}", e);
        process::exit(1);
    }

    info!(
        "Forwarding events with output module: {}",
        output.description()
    );
    let mediator = OutputMediator::new(
        env::var("FLUENTBIT_HOSTNAME").ok(),
        env::var("FLUENTBIT_USERNAME").ok(),
    );

    let summary = forward_events(output.as_mut(), &mediator, BufReader::new(stdin())).await;
    info!(
        "Accepted {} events, delivered {} events",
        summary.accepted, summary.delivered
    );
}

fn configure(output_name: &str, output: &mut dyn OutputModule) -> Result<(), ConfigError> {
    let options = OutputOptions::from_env()?;
    if output_name == FLUENTBIT_TIMESKETCH_OUTPUT_NAME {
        FluentBitTimesketchArgumentsHelper::parse_options(&options, output)
    } else {
        FluentBitArgumentsHelper::parse_options(&options, output)
    }
}

fn check_missing_arguments(output: &dyn OutputModule) -> Result<(), ConfigError> {
    let missing_arguments = output.get_missing_arguments();
    if missing_arguments.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingArguments(missing_arguments))
    }
}

/// Counts of one forwarding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ForwardSummary {
    /// Records parsed and handed to the output module.
    accepted: usize,
    /// Documents Fluent Bit acknowledged.
    delivered: usize,
}

impl ForwardSummary {
    fn add_outcome(&mut self, outcome: Option<FlushOutcome>) {
        if let Some(FlushOutcome::Sent { count }) = outcome {
            self.delivered += count;
        }
    }
}

/// Reads one JSON event record per line until end of input or Ctrl-C, then
/// closes the output so buffered events are flushed.
async fn forward_events<R: AsyncBufRead + Unpin>(
    output: &mut dyn OutputModule,
    mediator: &OutputMediator,
    reader: R,
) -> ForwardSummary {
    let mut lines = reader.lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    output.write_header().await;

    let mut summary = ForwardSummary::default();
    let mut line_number = 0;
    loop {
        let line = tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted, flushing buffered events");
                break;
            }
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Unable to read input: {}", e);
                break;
            }
        };
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<EventRecord>(&line) {
            Ok(record) => {
                let outcome = output.write_event(mediator, record.view()).await;
                summary.accepted += 1;
                summary.add_outcome(outcome);
            }
            Err(e) => warn!(
                "Skipping line {}: unable to parse event record: {}",
                line_number, e
            ),
        }
    }

    let outcome = output.close().await;
    debug!("Final flush: {:?}", outcome);
    summary.add_outcome(Some(outcome));
    summary
}
