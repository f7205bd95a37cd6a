// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Output modules addressable by name.

use crate::constants::{
    FLUENTBIT_OUTPUT_DESCRIPTION, FLUENTBIT_OUTPUT_NAME, FLUENTBIT_TIMESKETCH_OUTPUT_DESCRIPTION,
    FLUENTBIT_TIMESKETCH_OUTPUT_NAME,
};
use crate::flusher::FlushOutcome;
use crate::mediator::OutputMediator;
use crate::record::RecordView;
use crate::sink::{FluentBitOutput, FluentBitTimesketchOutput};
use async_trait::async_trait;
use std::any::Any;

#[async_trait]
pub trait OutputModule: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn get_missing_arguments(&self) -> Vec<String>;

    async fn write_header(&mut self);

    async fn write_event(
        &mut self,
        mediator: &OutputMediator,
        record: RecordView<'_>,
    ) -> Option<FlushOutcome>;

    async fn close(&mut self) -> FlushOutcome;

    /// Gives configuration helpers access to the concrete module.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[async_trait]
impl OutputModule for FluentBitOutput {
    fn name(&self) -> &'static str {
        FLUENTBIT_OUTPUT_NAME
    }

    fn description(&self) -> &'static str {
        FLUENTBIT_OUTPUT_DESCRIPTION
    }

    fn get_missing_arguments(&self) -> Vec<String> {
        FluentBitOutput::get_missing_arguments(self)
    }

    async fn write_header(&mut self) {
        FluentBitOutput::write_header(self).await;
    }

    async fn write_event(
        &mut self,
        mediator: &OutputMediator,
        record: RecordView<'_>,
    ) -> Option<FlushOutcome> {
        FluentBitOutput::write_event(self, mediator, record).await
    }

    async fn close(&mut self) -> FlushOutcome {
        FluentBitOutput::close(self).await
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[async_trait]
impl OutputModule for FluentBitTimesketchOutput {
    fn name(&self) -> &'static str {
        FLUENTBIT_TIMESKETCH_OUTPUT_NAME
    }

    fn description(&self) -> &'static str {
        FLUENTBIT_TIMESKETCH_OUTPUT_DESCRIPTION
    }

    fn get_missing_arguments(&self) -> Vec<String> {
        FluentBitTimesketchOutput::get_missing_arguments(self)
    }

    async fn write_header(&mut self) {
        FluentBitTimesketchOutput::write_header(self).await;
    }

    async fn write_event(
        &mut self,
        mediator: &OutputMediator,
        record: RecordView<'_>,
    ) -> Option<FlushOutcome> {
        FluentBitTimesketchOutput::write_event(self, mediator, record).await
    }

    async fn close(&mut self) -> FlushOutcome {
        FluentBitTimesketchOutput::close(self).await
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Names and descriptions of the registered output modules.
pub fn output_names() -> Vec<(&'static str, &'static str)> {
    vec![
        (FLUENTBIT_OUTPUT_NAME, FLUENTBIT_OUTPUT_DESCRIPTION),
        (
            FLUENTBIT_TIMESKETCH_OUTPUT_NAME,
            FLUENTBIT_TIMESKETCH_OUTPUT_DESCRIPTION,
        ),
    ]
}

/// Creates the output module registered under `name`.
pub fn create_output(name: &str) -> Option<Box<dyn OutputModule>> {
    match name {
        FLUENTBIT_OUTPUT_NAME => Some(Box::new(FluentBitOutput::new())),
        FLUENTBIT_TIMESKETCH_OUTPUT_NAME => Some(Box::new(FluentBitTimesketchOutput::new())),
        _ => None,
    }
}
