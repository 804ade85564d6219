//! @ai:module:intent Renders a task into the prompt sent to the model
//! @ai:module:layer application
//! @ai:module:public_api PromptBuilder
//! @ai:module:stateless true

use crate::dataset::{Language, Task, TaskKind};
use crate::evaluator::SEPARATOR;
use crate::execution::IsolationKey;

/// @ai:intent Builds unit, integrational and functional prompts
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Render the prompt for `task`; generated tests must import from `key`
    /// @ai:effects pure
    pub fn build(&self, task: &Task, key: &IsolationKey) -> String {
        let language = task.language;
        let test_lib = language.test_library();
        let import_hint = import_hint(language, key);

        match &task.kind {
            TaskKind::Unit {
                code,
                function_name,
                ..
            } => format!(
                "Write comprehensive unit tests for the following {language} code. \
                 The tests should be written using {test_lib} library.\n\
                 Focus specifically on testing the function '{function_name}'. {import_hint}\n\
                 The tests should output detailed error messages when assertions fail. \
                 Do not write more than 30 tests.\n\
                 Provide only the test code without any additional explanations.\n\n\
                 Code to test:\n{code}\n"
            ),
            TaskKind::Integrational { code } => format!(
                "Write unit tests for the following {language} code. \
                 The tests should be written using {test_lib} library.\n\
                 Provide two sets of tests separated by '{SEPARATOR}':\n\
                 1. Tests that should pass (correct scenarios)\n\
                 2. Tests that should fail (incorrect scenarios)\n\
                 {import_hint}\n\
                 Provide only the test code without any additional explanations.\n\n\
                 Code to test:\n{code}\n"
            ),
            TaskKind::Functional { description, .. } => format!(
                "Write functional tests based on the following requirements. \
                 The tests should be written using {test_lib} library.\n\
                 {import_hint}\n\
                 The tests should:\n\
                 1. Verify all functional requirements\n\
                 2. Include edge cases\n\
                 3. Output detailed error messages when assertions fail\n\
                 Provide only the test code without any additional explanations.\n\n\
                 Requirements:\n{description}\n"
            ),
        }
    }
}

/// @ai:intent Where the code under test lives, phrased for the target language
/// @ai:effects pure
fn import_hint(language: Language, key: &IsolationKey) -> String {
    match language {
        Language::Python => format!("Import the code under test only from module {key}."),
        Language::Go => format!(
            "The code under test is in file {key}.go of the same package main; \
             do not redeclare its functions."
        ),
    }
}
