//! # maxmunch — finite-automata lexical scanning
//!
//! Builds, minimizes, and executes deterministic finite automata derived
//! from regular expressions, for use as a lexical scanner:
//!
//! ```text
//! position tables ──▶ direct construction ──┐
//!                                           ├──▶ raw DFA ──▶ minimize ──▶ minimal DFA
//! NFA contract ──────▶ subset construction ─┘                                 │
//!                                                                            ▼
//!                                input text ──▶ longest-match scan ──▶ token/action stream
//! ```
//!
//! The expression-tree builder (positions, followpos, firstpos) and the
//! Thompson NFA builder are external collaborators: this crate consumes
//! their tables through [`automata::direct::PositionTables`] and
//! [`automata::nfa::Nfa`] and never parses regex syntax itself.
//!
//! Both constructors key states by a set-valued identity (position sets for
//! the direct method, NFA-state sets for subset construction), deduplicated
//! through a canonical sorted key. Minimization refines partitions down to
//! the smallest automaton that preserves both the accepted language and the
//! per-rule action identity. The scanner performs maximal-munch
//! segmentation with skip-one error recovery and delegates per-token
//! semantic actions to a pluggable [`action::ActionEvaluator`].

pub mod action;
pub mod automata;
pub mod scanner;

#[cfg(test)]
mod tests;

use action::ActionPayload;

/// Identifier for a lexer rule: index into a [`RuleSet`].
pub type RuleId = u32;

/// One lexer rule: a display name plus the opaque action payload attached
/// to every token the rule produces. The automaton core never interprets
/// the payload; it is handed to the action evaluator verbatim.
#[derive(Debug, Clone)]
pub struct LexRule {
    /// Display name used in diagnostics (e.g. `"IDENT"`, `"NUMBER"`).
    pub name: String,
    /// Opaque semantic action for this rule.
    pub action: ActionPayload,
}

/// The rule table for one scanner: an explicit configuration object passed
/// by reference wherever rule actions are needed (never a process-wide
/// global). Rule ids are declaration-order indices, which is what makes
/// the earliest-declared rule win acceptance ties.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<LexRule>,
}

impl RuleSet {
    /// Create an empty rule table.
    pub fn new() -> Self {
        RuleSet { rules: Vec::new() }
    }

    /// Append a rule and return its id (declaration order).
    pub fn push(&mut self, name: impl Into<String>, action: ActionPayload) -> RuleId {
        let id = self.rules.len() as RuleId;
        self.rules.push(LexRule { name: name.into(), action });
        id
    }

    /// Look up a rule by id.
    pub fn get(&self, id: RuleId) -> Option<&LexRule> {
        self.rules.get(id as usize)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Statistics from a construction + minimization run (for diagnostics).
#[derive(Debug, Clone, Copy)]
pub struct ConstructionStats {
    pub num_raw_states: usize,
    pub num_minimized_states: usize,
    pub num_symbols: usize,
}

/// Build a minimal scanner automaton from position tables: direct
/// construction followed by minimization.
pub fn compile_tables(
    alphabet: &automata::Alphabet,
    tables: &automata::direct::PositionTables,
) -> (automata::Dfa, ConstructionStats) {
    let raw = automata::direct::direct_construction(alphabet, tables);
    let minimal = automata::minimize::minimize(&raw);
    let stats = ConstructionStats {
        num_raw_states: raw.states.len(),
        num_minimized_states: minimal.states.len(),
        num_symbols: alphabet.len(),
    };
    (minimal, stats)
}

/// Build a minimal scanner automaton from an NFA: subset construction
/// followed by minimization.
pub fn compile_nfa(
    alphabet: &automata::Alphabet,
    nfa: &automata::nfa::Nfa,
    rule: RuleId,
) -> (automata::Dfa, ConstructionStats) {
    let raw = automata::subset::subset_construction(alphabet, nfa, rule);
    let minimal = automata::minimize::minimize(&raw);
    let stats = ConstructionStats {
        num_raw_states: raw.states.len(),
        num_minimized_states: minimal.states.len(),
        num_symbols: alphabet.len(),
    };
    (minimal, stats)
}
