// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Output modules that ship forensic event records to a Fluent Bit HTTP input.
//!
//! Each record is resolved into a flat field document, buffered, and posted as
//! one JSON array per flush. The Timesketch variant additionally stamps every
//! document with the timeline identifier used for shared-index routing.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod arguments;
pub mod buffer;
pub mod constants;
pub mod enrich;
pub mod error;
pub mod fields;
pub mod flusher;
pub mod formatting;
pub mod http;
pub mod mediator;
pub mod output;
pub mod path_spec;
pub mod record;
pub mod sanitize;
pub mod sink;
