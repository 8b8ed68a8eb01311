//! Subset construction over the token trie
//!
//! Each determinized state is identified by its set of trie states. Sets are
//! `BTreeSet`s and transitions are `BTreeMap`s so the state numbering and the
//! transition table come out the same on every run.

use super::nfa::{StateId, TokenNfa};
use super::summary::{AutomatonSummary, TransitionRow};
use super::AutomatonError;
use crate::config::compile_time::automaton::MAX_STATES;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

pub type DfaStateId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub members: BTreeSet<StateId>,
    pub transitions: BTreeMap<char, DfaStateId>,
    pub accepting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDfa {
    states: Vec<DfaState>,
    labels: Vec<String>,
}

impl TokenDfa {
    pub fn from_nfa(nfa: &TokenNfa) -> Result<Self, AutomatonError> {
        let mut dfa = Self {
            states: Vec::new(),
            labels: Vec::new(),
        };
        let mut index: BTreeMap<BTreeSet<StateId>, DfaStateId> = BTreeMap::new();
        let mut queue = VecDeque::new();

        let start = dfa.register(nfa, BTreeSet::from([nfa.start()]), &mut index)?;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let mut successors: BTreeMap<char, BTreeSet<StateId>> = BTreeMap::new();
            for member in &dfa.states[current].members {
                let Some(state) = nfa.state(*member) else {
                    continue;
                };
                for (input, targets) in &state.transitions {
                    successors.entry(*input).or_default().extend(targets);
                }
            }

            for (input, set) in successors {
                let target = match index.get(&set) {
                    Some(existing) => *existing,
                    None => {
                        let id = dfa.register(nfa, set, &mut index)?;
                        queue.push_back(id);
                        id
                    }
                };
                dfa.states[current].transitions.insert(input, target);
            }
        }

        Ok(dfa)
    }

    fn register(
        &mut self,
        nfa: &TokenNfa,
        members: BTreeSet<StateId>,
        index: &mut BTreeMap<BTreeSet<StateId>, DfaStateId>,
    ) -> Result<DfaStateId, AutomatonError> {
        if self.states.len() >= MAX_STATES {
            return Err(AutomatonError::StateLimitExceeded {
                states: self.states.len() + 1,
            });
        }

        let names: Vec<&str> = members
            .iter()
            .filter_map(|m| nfa.state(*m))
            .map(|s| s.label.as_str())
            .collect();
        let accepting = members
            .iter()
            .filter_map(|m| nfa.state(*m))
            .any(|s| s.accepting);

        let id = self.states.len();
        self.labels.push(format!("{{{}}}", names.join(", ")));
        index.insert(members.clone(), id);
        self.states.push(DfaState {
            members,
            transitions: BTreeMap::new(),
            accepting,
        });
        Ok(id)
    }

    pub fn start(&self) -> DfaStateId {
        0
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn accepting_count(&self) -> usize {
        self.states.iter().filter(|s| s.accepting).count()
    }

    /// `{q0_a, q0_b}` style name of a state
    pub fn label(&self, id: DfaStateId) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Walk from the start set; a missing transition rejects
    pub fn matches(&self, text: &str) -> bool {
        let mut current = self.start();
        for c in text.chars() {
            match self.states[current].transitions.get(&c) {
                Some(next) => current = *next,
                None => return false,
            }
        }
        self.states[current].accepting
    }

    pub fn summary(&self) -> AutomatonSummary {
        let transitions = self
            .states
            .iter()
            .enumerate()
            .flat_map(|(id, state)| {
                state.transitions.iter().map(move |(input, target)| TransitionRow {
                    from: self.labels[id].clone(),
                    from_accepting: state.accepting,
                    input: *input,
                    to: vec![self.labels[*target].clone()],
                })
            })
            .collect();

        AutomatonSummary {
            name: "DFA".to_string(),
            state_count: self.state_count(),
            accepting_count: self.accepting_count(),
            transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dfa(texts: &[&str]) -> TokenDfa {
        let nfa = TokenNfa::build(texts.iter().copied()).unwrap();
        TokenDfa::from_nfa(&nfa).unwrap()
    }

    #[test]
    fn test_accepts_exactly_the_token_set() {
        let dfa = dfa(&["x", "->", "10"]);
        assert!(dfa.matches("x"));
        assert!(dfa.matches("->"));
        assert!(dfa.matches("10"));
        assert!(!dfa.matches("y"));
        assert!(!dfa.matches("1"));
        assert!(!dfa.matches("-"));
    }

    #[test]
    fn test_singleton_sets_mirror_trie() {
        let texts = ["whole", "while", "if"];
        let nfa = TokenNfa::build(texts).unwrap();
        let dfa = TokenDfa::from_nfa(&nfa).unwrap();
        assert_eq!(dfa.state_count(), nfa.state_count());
        assert_eq!(dfa.accepting_count(), 3);
        assert!(dfa.states().iter().all(|s| s.members.len() == 1));
        assert_eq!(dfa.label(dfa.start()), Some("{q0}"));
    }

    #[test]
    fn test_breadth_first_numbering() {
        let dfa = dfa(&["ab", "c"]);
        assert_eq!(dfa.label(1), Some("{q0_a}"));
        assert_eq!(dfa.label(2), Some("{q0_c}"));
        assert_eq!(dfa.label(3), Some("{q0_a_b}"));
    }

    #[test]
    fn test_summary_is_deterministic() {
        let first = dfa(&["say", "x", ";", "say"]).summary();
        let second = dfa(&["say", "x", ";", "say"]).summary();
        assert_eq!(first, second);
        assert_eq!(first.transitions[0].from, "{q0}");
        assert_eq!(first.transitions[0].input, ';');
    }
}
