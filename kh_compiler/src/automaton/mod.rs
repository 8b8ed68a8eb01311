//! Token automaton
//!
//! A trie is built from the spellings the lexer emitted, determinized by
//! subset construction, and then used to re-check every token character by
//! character. Because the trie is deterministic already, every determinized
//! state is a singleton set; the construction is kept general anyway.
//!
//! Compile-time limit: `MAX_STATES`, applied to both forms.

pub mod dfa;
pub mod nfa;
pub mod summary;

use crate::config::compile_time::automaton::MAX_STATES;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_success, log_warning};
use serde::Serialize;

pub use dfa::{DfaState, DfaStateId, TokenDfa};
pub use nfa::{NfaState, StateId, TokenNfa};
pub use summary::{AutomatonSummary, TransitionRow};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    #[error("Automaton state limit exceeded: {states} states (max {MAX_STATES})")]
    StateLimitExceeded { states: usize },
}

impl AutomatonError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            AutomatonError::StateLimitExceeded { .. } => codes::automaton::STATE_LIMIT_EXCEEDED,
        }
    }
}

/// Both automata built from one token stream
#[derive(Debug, Clone)]
pub struct TokenAutomata {
    pub nfa: TokenNfa,
    pub dfa: TokenDfa,
}

impl TokenAutomata {
    pub fn build(stream: &TokenStream) -> Result<Self, AutomatonError> {
        let nfa = TokenNfa::build(stream.texts())?;
        log_success!(codes::success::AUTOMATON_CONSTRUCTION_COMPLETE, "Token automaton constructed",
            "states" => nfa.state_count(),
            "accepting" => nfa.accepting_count()
        );

        let dfa = TokenDfa::from_nfa(&nfa)?;
        log_success!(codes::success::DETERMINIZATION_COMPLETE, "Determinization completed",
            "states" => dfa.state_count(),
            "accepting" => dfa.accepting_count()
        );

        Ok(Self { nfa, dfa })
    }

    pub fn validate(&self, stream: &TokenStream) -> TokenValidation {
        validate_tokens(&self.dfa, stream)
    }
}

/// Outcome of re-checking one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenVerdict {
    pub token: String,
    pub accepted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenValidation {
    pub verdicts: Vec<TokenVerdict>,
    pub accepted: usize,
    pub rejected: usize,
}

impl TokenValidation {
    pub fn all_accepted(&self) -> bool {
        self.rejected == 0
    }
}

/// Run every token through the automaton, in stream order
pub fn validate_tokens(dfa: &TokenDfa, stream: &TokenStream) -> TokenValidation {
    let mut validation = TokenValidation::default();

    for token in stream {
        let accepted = dfa.matches(&token.text);
        if accepted {
            validation.accepted += 1;
        } else {
            validation.rejected += 1;
            log_warning!(codes::automaton::TOKEN_REJECTED, "Token rejected by automaton",
                span = Some(token.span),
                "token" => token.text.as_str()
            );
        }
        validation.verdicts.push(TokenVerdict {
            token: token.text.clone(),
            accepted,
        });
    }

    log_success!(codes::success::TOKEN_VALIDATION_COMPLETE, "Token validation completed",
        "accepted" => validation.accepted,
        "rejected" => validation.rejected
    );

    validation
}

pub fn validate_automaton_codes() -> Result<(), String> {
    let automaton_codes = [
        codes::automaton::STATE_LIMIT_EXCEEDED,
        codes::automaton::TOKEN_REJECTED,
        codes::success::AUTOMATON_CONSTRUCTION_COMPLETE,
        codes::success::DETERMINIZATION_COMPLETE,
        codes::success::TOKEN_VALIDATION_COMPLETE,
    ];

    match automaton_codes.iter().find(|code| !codes::is_registered(**code)) {
        Some(code) => Err(format!(
            "Automaton code {} not found in metadata registry",
            code.as_str()
        )),
        None => Ok(()),
    }
}
