// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP client construction for the flusher.

use std::error::Error;
use std::time::Duration;
use tracing::error;

/// Creates the client used to post documents to Fluent Bit.
///
/// If the configured client cannot be built, logs the error and falls back
/// to a default client so writing can go on.
#[must_use]
pub fn get_client(timeout: Duration) -> reqwest::Client {
    match build_client(timeout) {
        Ok(client) => client,
        Err(e) => {
            error!(
                "Unable to configure HTTP client, using default client: {:?}",
                e
            );
            reqwest::Client::new()
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(60))
        .build()?;
    Ok(client)
}
