//! Automata infrastructure for lexical scanning.
//!
//! Provides the DFA data model shared by both construction methods plus
//! the construction/minimization pipeline:
//! `Position tables | NFA -> raw DFA -> Minimize -> minimal DFA`

pub mod direct;
pub mod minimize;
pub mod nfa;
pub mod subset;

use std::collections::HashMap;

use crate::RuleId;

/// Identifier for an automaton state (arena index).
pub type StateId = u32;

/// Identifier for one leaf occurrence in the expression tree, assigned by
/// the external tree builder.
pub type PositionId = u32;

/// A sentinel value representing a non-existent / dead state.
pub const DEAD_STATE: StateId = u32::MAX;

/// Reserved rule-terminator marker appended to each rule's expression by
/// the external tree builder. Its position set identifies accepting
/// states. Not usable as an ordinary alphabet symbol; there is exactly one
/// terminator convention crate-wide.
pub const TERMINATOR: char = '\u{25A0}';

/// The set-valued identity of a deterministic state: sorted, deduplicated.
///
/// Holds positions for the direct method, NFA state ids for subset
/// construction, and member original-state ids for minimized states. Two
/// states are the same state iff their keys are equal.
pub type StateKey = Vec<u32>;

/// Ordered input alphabet with stable (sorted) iteration order, so that
/// construction and minimization signatures are reproducible across runs.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Build an alphabet from arbitrary symbols: sorted, deduplicated,
    /// with the reserved terminator marker excluded.
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Self {
        let mut symbols: Vec<char> = symbols.into_iter().filter(|&c| c != TERMINATOR).collect();
        symbols.sort_unstable();
        symbols.dedup();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, index }
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in iteration order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Dense index of a symbol, or `None` for characters outside the
    /// alphabet (implicit dead transitions).
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }
}

/// Why a state accepts: which rule-terminator position marked it, and the
/// rule whose action it carries.
///
/// When several terminator positions occur in one state identity, the
/// smallest position is recorded. Terminator positions are assigned in
/// rule-declaration order by the tree builder, so the earliest-declared
/// rule's action wins the tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accept {
    /// The terminator position that made this state accepting.
    pub position: PositionId,
    /// The rule whose action applies.
    pub rule: RuleId,
}

/// DFA state: set-valued identity, dense transition row, optional accept.
///
/// `transitions[symbol_index]` is the successor, or `DEAD_STATE` when the
/// partial transition map has no entry for that symbol.
#[derive(Debug, Clone)]
pub struct DfaState {
    /// Set identity of this state (see [`StateKey`]).
    pub key: StateKey,
    /// Dense transition row, length = alphabet size.
    pub transitions: Vec<StateId>,
    /// Accept marker, if any.
    pub accept: Option<Accept>,
}

impl DfaState {
    /// Create a non-accepting state with all-dead transitions.
    pub fn new(key: StateKey, num_symbols: usize) -> Self {
        DfaState { key, transitions: vec![DEAD_STATE; num_symbols], accept: None }
    }
}

/// A deterministic automaton: an arena of states with a designated start.
///
/// States are created only during construction or minimization; scanning
/// treats a finished automaton as read-only.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub start: StateId,
    /// Alphabet size the transition rows were built against.
    pub num_symbols: usize,
}

impl Dfa {
    /// Create an empty automaton (no states yet; constructors seed the
    /// start state themselves).
    pub fn new(num_symbols: usize) -> Self {
        Dfa { states: Vec::new(), start: 0, num_symbols }
    }

    /// Add a state and return its id.
    pub fn add_state(&mut self, state: DfaState) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(state);
        id
    }

    /// O(1) transition lookup: successor state or `DEAD_STATE`.
    #[inline]
    pub fn transition(&self, state: StateId, symbol_index: usize) -> StateId {
        self.states[state as usize].transitions[symbol_index]
    }

    /// Set a transition: `state --symbol--> target`.
    #[inline]
    pub fn set_transition(&mut self, state: StateId, symbol_index: usize, target: StateId) {
        self.states[state as usize].transitions[symbol_index] = target;
    }

    /// Accept marker of a state, if any.
    #[inline]
    pub fn accept_of(&self, state: StateId) -> Option<Accept> {
        self.states[state as usize].accept
    }

    /// Ids of all accepting states.
    pub fn accepting_states(&self) -> Vec<StateId> {
        (0..self.states.len() as StateId)
            .filter(|&s| self.states[s as usize].accept.is_some())
            .collect()
    }

    /// Whole-string membership test: does the automaton accept `input`?
    ///
    /// Characters outside the alphabet reject immediately.
    pub fn accepts(&self, alphabet: &Alphabet, input: &str) -> bool {
        let mut state = self.start;
        for c in input.chars() {
            let Some(idx) = alphabet.index_of(c) else {
                return false;
            };
            state = self.transition(state, idx);
            if state == DEAD_STATE {
                return false;
            }
        }
        self.states[state as usize].accept.is_some()
    }
}

/// Dedup map from canonical state identity to arena id, shared by both
/// construction methods. Amortized constant-time identity lookup instead
/// of a linear scan over all existing states.
#[derive(Debug, Default)]
pub(crate) struct KeyInterner {
    map: HashMap<StateKey, StateId>,
}

impl KeyInterner {
    pub(crate) fn new() -> Self {
        KeyInterner { map: HashMap::new() }
    }

    /// Existing state for this identity, if any.
    pub(crate) fn get(&self, key: &[u32]) -> Option<StateId> {
        self.map.get(key).copied()
    }

    /// Record a freshly allocated state's identity.
    pub(crate) fn insert(&mut self, key: StateKey, id: StateId) {
        self.map.insert(key, id);
    }
}
