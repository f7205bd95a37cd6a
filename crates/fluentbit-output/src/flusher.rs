// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bulk delivery of buffered documents to the Fluent Bit HTTP input.
//!
//! One flush is one `POST` whose body is a JSON array of documents. Delivery
//! is at most once: there is no retry, and a failed batch is reported and
//! dropped by the caller.

use crate::fields::FieldDocument;
use crate::http::get_client;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of one flush attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was buffered; no request was made.
    Empty,
    Sent { count: usize },
    /// Fluent Bit answered with a status other than 200 or 201.
    Rejected { status: u16, body: String },
    /// The request could not be completed.
    Failed { message: String },
}

impl FlushOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FlushOutcome::Empty | FlushOutcome::Sent { .. })
    }
}

/// Builds `http://{host}:{port}` with an optional `/{url_prefix}`.
pub fn endpoint_url(host: &str, port: u16, url_prefix: Option<&str>) -> String {
    let url = format!("http://{host}:{port}");
    match url_prefix {
        Some(url_prefix) if !url_prefix.is_empty() => format!("{url}/{url_prefix}"),
        _ => url,
    }
}

#[derive(Debug, Clone)]
pub struct Flusher {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl Flusher {
    #[must_use]
    pub fn new(url: String, timeout: Duration) -> Self {
        Flusher {
            client: get_client(timeout),
            url,
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts the documents as one JSON array.
    ///
    /// Never fails: a rejected or failed request is logged as a warning and
    /// reported through the returned outcome.
    pub async fn flush(&self, documents: &[FieldDocument]) -> FlushOutcome {
        if documents.is_empty() {
            return FlushOutcome::Empty;
        }
        let count = documents.len();

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(documents)
            .send()
            .await;

        match response {
            Ok(response) => match response.status() {
                StatusCode::OK | StatusCode::CREATED => {
                    debug!("Inserted {} events into Fluent Bit", count);
                    FlushOutcome::Sent { count }
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    warn!(
                        "Unable to send events to Fluent Bit. Status code: {}, Response: {}",
                        status.as_u16(),
                        body
                    );
                    FlushOutcome::Rejected {
                        status: status.as_u16(),
                        body,
                    }
                }
            },
            Err(e) => {
                warn!("Unable to send events with error: {}", e);
                FlushOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
