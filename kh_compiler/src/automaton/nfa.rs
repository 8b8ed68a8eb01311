//! Trie-shaped token automaton
//!
//! One node per distinct prefix of the token spellings, named by the path
//! from the start node (`q0`, `q0_w`, `q0_w_h`, ...). Nodes live in an arena
//! and are referred to by index.

use super::summary::{AutomatonSummary, TransitionRow};
use super::AutomatonError;
use crate::config::compile_time::automaton::MAX_STATES;
use std::collections::{BTreeMap, BTreeSet};

pub type StateId = usize;

pub const START_STATE: StateId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfaState {
    pub label: String,
    pub transitions: BTreeMap<char, BTreeSet<StateId>>,
    pub accepting: bool,
}

impl NfaState {
    fn new(label: String) -> Self {
        Self {
            label,
            transitions: BTreeMap::new(),
            accepting: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNfa {
    states: Vec<NfaState>,
}

impl TokenNfa {
    /// Build from token spellings; each spelling's final node accepts
    pub fn build<'a, I>(texts: I) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut nfa = Self {
            states: vec![NfaState::new("q0".to_string())],
        };
        for text in texts {
            nfa.add_spelling(text)?;
        }
        Ok(nfa)
    }

    fn add_spelling(&mut self, text: &str) -> Result<(), AutomatonError> {
        let mut current = START_STATE;
        for c in text.chars() {
            current = match self.successor(current, c) {
                Some(next) => next,
                None => self.add_state(current, c)?,
            };
        }
        self.states[current].accepting = true;
        Ok(())
    }

    fn add_state(&mut self, from: StateId, c: char) -> Result<StateId, AutomatonError> {
        if self.states.len() >= MAX_STATES {
            return Err(AutomatonError::StateLimitExceeded {
                states: self.states.len() + 1,
            });
        }
        let id = self.states.len();
        let label = format!("{}_{}", self.states[from].label, c);
        self.states.push(NfaState::new(label));
        self.states[from]
            .transitions
            .entry(c)
            .or_default()
            .insert(id);
        Ok(id)
    }

    fn successor(&self, from: StateId, c: char) -> Option<StateId> {
        self.states[from]
            .transitions
            .get(&c)
            .and_then(|targets| targets.iter().next().copied())
    }

    pub fn start(&self) -> StateId {
        START_STATE
    }

    pub fn state(&self, id: StateId) -> Option<&NfaState> {
        self.states.get(id)
    }

    pub fn states(&self) -> &[NfaState] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn accepting_count(&self) -> usize {
        self.states.iter().filter(|s| s.accepting).count()
    }

    /// Walk the trie directly
    pub fn matches(&self, text: &str) -> bool {
        let mut current = START_STATE;
        for c in text.chars() {
            match self.successor(current, c) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.states[current].accepting
    }

    pub fn summary(&self) -> AutomatonSummary {
        let transitions = self
            .states
            .iter()
            .flat_map(|state| {
                state.transitions.iter().map(move |(input, targets)| TransitionRow {
                    from: state.label.clone(),
                    from_accepting: state.accepting,
                    input: *input,
                    to: targets
                        .iter()
                        .map(|t| self.states[*t].label.clone())
                        .collect(),
                })
            })
            .collect();

        AutomatonSummary {
            name: "NFA".to_string(),
            state_count: self.state_count(),
            accepting_count: self.accepting_count(),
            transitions,
        }
    }
}
