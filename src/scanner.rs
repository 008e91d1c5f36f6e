//! Streaming recognition: stepwise DFA simulation, longest-match
//! segmentation, and the token-stream driver.
//!
//! The driver repeatedly cuts the longest acceptable prefix from the
//! current offset ("maximal munch"): later accepts overwrite earlier ones
//! until the automaton dies or input runs out. A failed segment reports a
//! lexical error and resumes one character past the offending position;
//! a failed action is recorded and the token keeps an empty output. No
//! single bad character or failing action aborts the scan.

use std::fmt;

use itertools::Itertools;

use crate::action::{ActionError, ActionEvaluator};
use crate::automata::{Accept, Alphabet, Dfa, StateId, DEAD_STATE};
use crate::{RuleId, RuleSet};

/// Classification of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor landed on an accepting state.
    Accept(Accept),
    /// The cursor landed on a live, non-accepting state.
    Continue,
    /// No valid transition: the cursor is dead until the next reset.
    Dead,
}

/// Transient single-state cursor over a finished automaton.
///
/// Not part of the automaton: each scan owns its own cursor and resets it
/// before simulating. The automaton itself stays read-only and can back
/// any number of concurrent cursors.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    dfa: &'a Dfa,
    alphabet: &'a Alphabet,
    state: StateId,
}

impl<'a> Simulation<'a> {
    /// Create a cursor positioned at the start state.
    pub fn new(dfa: &'a Dfa, alphabet: &'a Alphabet) -> Self {
        Simulation { dfa, alphabet, state: dfa.start }
    }

    /// Return the cursor to the start state.
    pub fn reset(&mut self) {
        self.state = self.dfa.start;
    }

    /// Consume one character and classify the result.
    ///
    /// `_lookahead` is an inert hook: it is forwarded to action evaluation
    /// by the segmentation layer but never influences transitions here.
    /// Characters outside the alphabet are dead transitions.
    pub fn step(&mut self, symbol: char, _lookahead: Option<char>) -> Step {
        if self.state == DEAD_STATE {
            return Step::Dead;
        }
        self.state = match self.alphabet.index_of(symbol) {
            Some(idx) => self.dfa.transition(self.state, idx),
            None => DEAD_STATE,
        };
        if self.state == DEAD_STATE {
            return Step::Dead;
        }
        match self.dfa.accept_of(self.state) {
            Some(accept) => Step::Accept(accept),
            None => Step::Continue,
        }
    }
}

/// A successful longest-match segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Offset of the first matched character.
    pub start: usize,
    /// Offset one past the last matched character.
    pub end: usize,
    /// The matched text.
    pub text: String,
    /// Rule whose action applies (ties already resolved by the automaton).
    pub rule: RuleId,
    /// Character at `end`, if any; forwarded to action evaluation.
    pub lookahead: Option<char>,
}

/// Find the longest acceptable segment starting at `start`.
///
/// Scans forward, recording the most recent accept; later (longer)
/// accepts overwrite earlier ones. On a dead transition the best match so
/// far wins; with no match recorded the error is the dead offset. Running
/// out of input acts as a virtual dead transition one position past the
/// last character, so acceptance on the final character is still seen and
/// an unmatched tail fails at `input.len()`.
pub fn next_segment(
    dfa: &Dfa,
    alphabet: &Alphabet,
    input: &[char],
    start: usize,
) -> Result<Match, usize> {
    let mut simulation = Simulation::new(dfa, alphabet);
    let mut best: Option<Match> = None;

    let mut i = start;
    while i < input.len() {
        let lookahead = input.get(i + 1).copied();
        match simulation.step(input[i], lookahead) {
            Step::Accept(accept) => {
                let end = i + 1;
                best = Some(Match {
                    start,
                    end,
                    text: input[start..end].iter().collect(),
                    rule: accept.rule,
                    lookahead,
                });
            }
            Step::Continue => {}
            Step::Dead => return best.ok_or(i),
        }
        i += 1;
    }
    best.ok_or(input.len())
}

/// One recognized token with its evaluated action output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub rule: RuleId,
    /// Rule name copied from the rule table, for diagnostics.
    pub rule_name: String,
    /// Action output; empty/absent evaluator results and evaluator
    /// failures both leave this `None`.
    pub output: Option<String>,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} {} {:?}", self.start, self.end, self.rule_name, self.text)?;
        if let Some(output) = &self.output {
            write!(f, " => {output}")?;
        }
        Ok(())
    }
}

/// A lexical error: no accepting state reachable from the segment start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    /// Offset of the character on which the automaton died.
    pub offset: usize,
    /// The offending character.
    pub character: char,
    /// Input from the failing segment's start through the offending
    /// character.
    pub slice: String,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lexical error at offset {}: unexpected {:?} after {:?}",
            self.offset, self.character, self.slice
        )
    }
}

/// An action-evaluation failure, isolated to its token.
#[derive(Debug, Clone)]
pub struct ActionFailure {
    /// Start offset of the token whose action failed.
    pub offset: usize,
    pub rule: RuleId,
    pub error: ActionError,
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action failed for rule {} at offset {}: {}", self.rule, self.offset, self.error)
    }
}

/// Everything a scan produced: tokens, lexical errors, action failures.
///
/// `Display` renders the line-oriented diagnostic stream in input order.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexicalError>,
    pub action_failures: Vec<ActionFailure>,
}

impl ScanReport {
    /// Whether the scan finished without lexical errors or action
    /// failures.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.action_failures.is_empty()
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = self.tokens.iter().map(|t| (t.start, t.to_string()));
        let errors = self.errors.iter().map(|e| (e.offset, e.to_string()));
        let failures = self.action_failures.iter().map(|a| (a.offset, a.to_string()));
        for (_, line) in tokens.chain(errors).chain(failures).sorted() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Tokenize `input` against a finished automaton, evaluating each matched
/// rule's action through `evaluator`.
///
/// A single cursor offset starts at 0. Each iteration takes the longest
/// match from the current offset; on success the action is evaluated (a
/// failure is recorded and the token keeps an empty output) and the
/// offset jumps to the match end. On failure before the end of input, a
/// lexical error is recorded and scanning resumes one character past the
/// dead offset. Failure at or past the end of input ends the scan
/// cleanly. Offsets are character offsets.
pub fn scan(
    dfa: &Dfa,
    alphabet: &Alphabet,
    rules: &RuleSet,
    input: &str,
    evaluator: &mut dyn ActionEvaluator,
) -> ScanReport {
    let chars: Vec<char> = input.chars().collect();
    let mut report = ScanReport::default();
    let mut offset = 0;

    while offset < chars.len() {
        match next_segment(dfa, alphabet, &chars, offset) {
            Ok(matched) => {
                let (rule_name, action) = match rules.get(matched.rule) {
                    Some(rule) => (rule.name.clone(), Some(&rule.action)),
                    None => (format!("rule-{}", matched.rule), None),
                };
                let output = match action {
                    Some(action) => {
                        match evaluator.evaluate(&matched.text, matched.lookahead, action) {
                            Ok(output) => output,
                            Err(error) => {
                                report.action_failures.push(ActionFailure {
                                    offset: matched.start,
                                    rule: matched.rule,
                                    error,
                                });
                                None
                            }
                        }
                    }
                    None => None,
                };
                report.tokens.push(Token {
                    start: matched.start,
                    end: matched.end,
                    text: matched.text,
                    rule: matched.rule,
                    rule_name,
                    output,
                });
                offset = matched.end;
            }
            Err(dead_offset) if dead_offset < chars.len() => {
                report.errors.push(LexicalError {
                    offset: dead_offset,
                    character: chars[dead_offset],
                    slice: chars[offset..=dead_offset].iter().collect(),
                });
                offset = dead_offset + 1;
            }
            Err(_) => break, // dead at or past end of input: clean finish
        }
    }

    report
}
