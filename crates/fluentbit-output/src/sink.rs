// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Buffering Fluent Bit sink shared by both output modules.
//!
//! ```text
//!   record ──> FieldResolver ──> index name + DocumentEnricher ──> EventBuffer
//!                                                                     │
//!                                              len > flush_interval   │   close()
//!                                                                     v
//!                                                              Flusher (POST)
//! ```
//!
//! The sink has a single writer: each write awaits a triggered flush before
//! returning, so no two flushes are ever in flight. The buffer is emptied by
//! every flush, whether or not Fluent Bit accepted the batch.

use crate::buffer::EventBuffer;
use crate::constants::{
    DEFAULT_FLUSH_INTERVAL, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER,
    SEARCH_INDEX_KEY,
};
use crate::enrich::{DocumentEnricher, NoEnrichment, TimelineEnricher};
use crate::error::ConfigError;
use crate::fields::{FieldDocument, FieldResolver, FieldSchema};
use crate::flusher::{endpoint_url, FlushOutcome, Flusher};
use crate::formatting::FieldFormatter;
use crate::mediator::OutputMediator;
use crate::record::RecordView;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Connection and batching settings of a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub host: String,
    pub port: u16,
    pub url_prefix: Option<String>,
    /// Destination index, stamped on every document when set.
    pub index_name: Option<String>,
    pub flush_interval: usize,
    pub request_timeout: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            host: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            url_prefix: None,
            index_name: None,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SinkConfig {
    pub fn url(&self) -> String {
        endpoint_url(&self.host, self.port, self.url_prefix.as_deref())
    }
}

/// Sink parameterized by the enrichment applied to each document.
pub struct FluentBitSink<E> {
    config: SinkConfig,
    resolver: FieldResolver,
    buffer: EventBuffer,
    flusher: OnceCell<Flusher>,
    enricher: E,
    writing_started: bool,
}

/// Output module that saves events into a Fluent Bit server.
pub type FluentBitOutput = FluentBitSink<NoEnrichment>;

/// Output module that saves events into a Fluent Bit server for Timesketch.
pub type FluentBitTimesketchOutput = FluentBitSink<TimelineEnricher>;

impl<E: DocumentEnricher + Default> Default for FluentBitSink<E> {
    fn default() -> Self {
        FluentBitSink::with_enricher(E::default())
    }
}

impl<E: DocumentEnricher + Default> FluentBitSink<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: DocumentEnricher> FluentBitSink<E> {
    pub fn with_enricher(enricher: E) -> Self {
        let config = SinkConfig::default();
        FluentBitSink {
            buffer: EventBuffer::new(config.flush_interval),
            config,
            resolver: FieldResolver::default(),
            flusher: OnceCell::new(),
            enricher,
            writing_started: false,
        }
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    pub fn enricher(&self) -> &E {
        &self.enricher
    }

    pub fn field_schema(&self) -> &FieldSchema {
        self.resolver.schema()
    }

    /// Number of documents waiting for the next flush.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn ensure_configurable(&self) -> Result<(), ConfigError> {
        if self.writing_started {
            return Err(ConfigError::WritingStarted);
        }
        Ok(())
    }

    pub fn set_server_information(&mut self, server: &str, port: u16) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.config.host = server.to_string();
        self.config.port = port;
        debug!("Fluent Bit server: {} port: {}", server, port);
        Ok(())
    }

    /// Sets the number of documents to buffer before doing a bulk insert.
    pub fn set_flush_interval(&mut self, flush_interval: usize) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.config.flush_interval = flush_interval;
        self.buffer.set_flush_interval(flush_interval);
        debug!("Fluent Bit flush interval: {}", flush_interval);
        Ok(())
    }

    pub fn set_url_prefix(&mut self, url_prefix: Option<&str>) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.config.url_prefix = url_prefix.map(str::to_string);
        debug!("Fluent Bit URL prefix: {:?}", url_prefix);
        Ok(())
    }

    pub fn set_index_name(&mut self, index_name: &str) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.config.index_name = Some(index_name.to_string());
        debug!("Fluent Bit index name: {}", index_name);
        Ok(())
    }

    pub fn set_request_timeout(&mut self, request_timeout: Duration) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.config.request_timeout = request_timeout;
        Ok(())
    }

    /// Adds names of additional fields to output. Earlier names are kept.
    pub fn set_additional_fields(&mut self, field_names: &[String]) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        let schema = self.resolver.schema().with_additional_fields(field_names);
        self.resolver.set_schema(schema);
        Ok(())
    }

    /// Sets the names and values of custom fields to output.
    pub fn set_custom_fields(
        &mut self,
        field_names_and_values: &[(String, String)],
    ) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        let schema = self
            .resolver
            .schema()
            .with_custom_fields(field_names_and_values);
        self.resolver.set_schema(schema);
        Ok(())
    }

    pub fn set_field_formatter(
        &mut self,
        formatter: Arc<dyn FieldFormatter>,
    ) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.resolver.set_formatter(formatter);
        Ok(())
    }

    pub fn set_emit_event_attributes(&mut self, emit: bool) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.resolver.set_emit_event_attributes(emit);
        Ok(())
    }

    /// Names of the arguments that are required and have not been set.
    pub fn get_missing_arguments(&self) -> Vec<String> {
        self.enricher.missing_arguments()
    }

    async fn flusher(&self) -> &Flusher {
        self.flusher
            .get_or_init(|| async {
                Flusher::new(self.config.url(), self.config.request_timeout)
            })
            .await
    }

    /// Logs the configured endpoint. There is no handshake: every flush is a
    /// stateless POST.
    pub async fn write_header(&mut self) {
        self.writing_started = true;
        let flusher = self.flusher().await;
        debug!(
            "Configured Fluent Bit server: {} port: {} url: {}",
            self.config.host,
            self.config.port,
            flusher.url()
        );
    }

    pub fn get_field_values(
        &self,
        mediator: &OutputMediator,
        record: RecordView<'_>,
    ) -> FieldDocument {
        self.resolver.get_field_values(mediator, record)
    }

    /// Stamps routing metadata on a document and buffers it, flushing when
    /// the buffer exceeds the flush interval.
    ///
    /// Returns the outcome of the flush when one was triggered.
    pub async fn write_field_values(
        &mut self,
        mut document: FieldDocument,
    ) -> Option<FlushOutcome> {
        self.writing_started = true;

        if let Some(index_name) = &self.config.index_name {
            document.insert(
                SEARCH_INDEX_KEY.to_string(),
                Value::from(index_name.as_str()),
            );
        }
        self.enricher.enrich(&mut document);

        if self.buffer.push(document) {
            return Some(self.flush_events().await);
        }
        None
    }

    pub async fn write_event(
        &mut self,
        mediator: &OutputMediator,
        record: RecordView<'_>,
    ) -> Option<FlushOutcome> {
        let document = self.get_field_values(mediator, record);
        self.write_field_values(document).await
    }

    /// Sends every buffered document. The buffer is cleared regardless of
    /// the outcome.
    pub async fn flush_events(&mut self) -> FlushOutcome {
        let documents = self.buffer.take();
        if documents.is_empty() {
            return FlushOutcome::Empty;
        }
        self.flusher().await.flush(&documents).await
    }

    /// Inserts any remaining buffered documents.
    pub async fn close(&mut self) -> FlushOutcome {
        self.flush_events().await
    }
}

impl FluentBitTimesketchOutput {
    pub fn set_timeline_identifier(&mut self, timeline_identifier: u64) -> Result<(), ConfigError> {
        self.ensure_configurable()?;
        self.enricher.set_timeline_identifier(timeline_identifier);
        info!("Timeline identifier: {}", timeline_identifier);
        Ok(())
    }
}
