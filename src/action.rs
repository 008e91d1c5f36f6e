//! Semantic action evaluation.
//!
//! The automaton core never interprets rule actions: each rule carries an
//! opaque [`ActionPayload`] and the token-stream driver hands matched
//! lexemes to an [`ActionEvaluator`] chosen by the surrounding toolchain.
//! [`HandlerTable`] is the built-in evaluator: a compiled table mapping
//! handler indices to statically registered closures. Embedding a script
//! engine for `Source` payloads is left to callers.

use std::fmt;

/// Opaque semantic action attached to a lexer rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPayload {
    /// No action: the token is reported with empty output.
    None,
    /// Uninterpreted action source text, for evaluators that embed an
    /// expression or script engine.
    Source(String),
    /// Index of a statically registered handler (see [`HandlerTable`]).
    Registered(usize),
}

/// Failure while evaluating a matched rule's action.
///
/// Caught at the token-stream driver boundary: the token still advances
/// the scan and contributes an empty output.
#[derive(Debug, Clone)]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        ActionError { message: message.into() }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action error: {}", self.message)
    }
}

impl std::error::Error for ActionError {}

/// Capability seam between the scanner and action execution.
///
/// `lookahead` is the character one past the matched lexeme, if any. The
/// automaton never consults it for transitions; it is forwarded here
/// untouched for context-sensitive evaluators.
pub trait ActionEvaluator {
    /// Evaluate the action of a matched rule. `Ok(None)` means the action
    /// produced no output, which the driver treats as an empty output.
    fn evaluate(
        &mut self,
        lexeme: &str,
        lookahead: Option<char>,
        action: &ActionPayload,
    ) -> Result<Option<String>, ActionError>;
}

/// Handler signature for [`HandlerTable`] entries.
pub type Handler = Box<dyn FnMut(&str, Option<char>) -> Result<Option<String>, ActionError>>;

/// Compiled-table action evaluator: dispatches `Registered(i)` payloads to
/// statically registered handlers. `Source` payloads fail (this evaluator
/// embeds no script engine); `None` payloads yield no output.
#[derive(Default)]
pub struct HandlerTable {
    handlers: Vec<Handler>,
}

impl HandlerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        HandlerTable { handlers: Vec::new() }
    }

    /// Register a handler and return the index to reference from an
    /// [`ActionPayload::Registered`] payload.
    pub fn register(
        &mut self,
        handler: impl FnMut(&str, Option<char>) -> Result<Option<String>, ActionError> + 'static,
    ) -> usize {
        self.handlers.push(Box::new(handler));
        self.handlers.len() - 1
    }
}

impl ActionEvaluator for HandlerTable {
    fn evaluate(
        &mut self,
        lexeme: &str,
        lookahead: Option<char>,
        action: &ActionPayload,
    ) -> Result<Option<String>, ActionError> {
        match action {
            ActionPayload::None => Ok(None),
            ActionPayload::Source(_) => Err(ActionError::new(
                "source-text actions require a script-engine evaluator",
            )),
            ActionPayload::Registered(index) => match self.handlers.get_mut(*index) {
                Some(handler) => handler(lexeme, lookahead),
                None => Err(ActionError::new(format!("no handler registered at index {index}"))),
            },
        }
    }
}
