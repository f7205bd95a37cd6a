// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Insertion-ordered buffer of field documents.
//!
//! Documents accumulate until the count exceeds the flush interval. The check
//! runs right after each append, so the buffer holds at most
//! `flush_interval + 1` documents at the moment a flush is requested. A flush
//! always takes the whole buffer.

use crate::constants::DEFAULT_FLUSH_INTERVAL;
use crate::fields::FieldDocument;

#[derive(Debug, Clone)]
pub struct EventBuffer {
    documents: Vec<FieldDocument>,
    flush_interval: usize,
}

impl Default for EventBuffer {
    fn default() -> Self {
        EventBuffer::new(DEFAULT_FLUSH_INTERVAL)
    }
}

impl EventBuffer {
    pub fn new(flush_interval: usize) -> Self {
        EventBuffer {
            documents: Vec::new(),
            flush_interval,
        }
    }

    pub fn flush_interval(&self) -> usize {
        self.flush_interval
    }

    pub fn set_flush_interval(&mut self, flush_interval: usize) {
        self.flush_interval = flush_interval;
    }

    /// Appends a document and reports whether a flush is now due.
    pub fn push(&mut self, document: FieldDocument) -> bool {
        self.documents.push(document);
        self.documents.len() > self.flush_interval
    }

    /// Removes and returns every buffered document, oldest first.
    pub fn take(&mut self) -> Vec<FieldDocument> {
        std::mem::take(&mut self.documents)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
