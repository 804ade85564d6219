//! Scripted backend shared by evaluator and pipeline tests.

use crate::dataset::Language;
use crate::execution::{
    ExecutionBackend, ExecutionFailure, ExecutionOutcome, ExecutionRequest, Variant,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the backend was asked to run
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub code: String,
    pub tests: String,
    pub language: Language,
    pub module: String,
    pub variant: Variant,
}

/// Returns queued outcomes in order and records every request
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<ExecutionOutcome>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    pub fn new(outcomes: Vec<ExecutionOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExecutionBackend for ScriptedBackend {
    async fn execute(&self, request: &ExecutionRequest<'_>) -> ExecutionOutcome {
        self.calls.lock().unwrap().push(RecordedCall {
            code: request.code.to_string(),
            tests: request.test_source().into_owned(),
            language: request.language,
            module: request.module_name(),
            variant: request.variant,
        });

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ExecutionFailure::Parse("no scripted outcome left".to_string())))
    }
}
