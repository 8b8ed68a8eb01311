use serde::Serialize;
use std::fmt;

/// One `state --input--> targets` row of a transition table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRow {
    pub from: String,
    pub from_accepting: bool,
    pub input: char,
    pub to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomatonSummary {
    pub name: String,
    pub state_count: usize,
    pub accepting_count: usize,
    pub transitions: Vec<TransitionRow>,
}

impl fmt::Display for AutomatonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total {} states: {}", self.name, self.state_count)?;
        writeln!(f, "Accepting states: {}", self.accepting_count)?;
        writeln!(f)?;
        writeln!(f, "{:<30} {:<8} {}", "State", "Input", "Next State(s)")?;
        writeln!(f, "{}", "-".repeat(64))?;
        for row in &self.transitions {
            let from = if row.from_accepting {
                format!("{} (FINAL)", row.from)
            } else {
                row.from.clone()
            };
            writeln!(f, "{:<30} {:<8} {}", from, row.input, row.to.join(", "))?;
        }
        Ok(())
    }
}
