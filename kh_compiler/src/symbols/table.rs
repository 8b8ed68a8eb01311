use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the outermost scope
pub const GLOBAL_SCOPE: &str = "global";

/// Resolved initializer of a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolValue {
    Resolved(String),
    Error,
}

impl SymbolValue {
    pub fn is_error(&self) -> bool {
        matches!(self, SymbolValue::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            SymbolValue::Resolved(text) => text,
            SymbolValue::Error => "ERROR",
        }
    }
}

impl fmt::Display for SymbolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SymbolValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    pub name: String,
    pub declared_type: String,
    pub scope: String,
    pub value: SymbolValue,
    pub memory_label: String,
    pub declaration_line: u32,
}

impl fmt::Display for SymbolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<15} {:<10} {:<12} {:<15} {:<8} {}",
            self.name,
            self.declared_type,
            self.scope,
            self.value,
            self.memory_label,
            self.declaration_line
        )
    }
}

/// Declarations keyed by name, listed in first-declaration order.
///
/// Re-declaring a name replaces its entry in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    index: BTreeMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: SymbolEntry) {
        match self.index.get(&entry.name) {
            Some(position) => self.entries[*position] = entry,
            None => {
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.index.get(name).map(|position| &self.entries[*position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymbolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose value could not be resolved
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_error()).count()
    }
}

impl Serialize for SymbolTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<15} {:<10} {:<12} {:<15} {:<8} {}",
            "Identifier", "Type", "Scope", "Value", "Memory", "Line"
        )?;
        writeln!(f, "{}", "-".repeat(68))?;
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, value: SymbolValue, label: &str) -> SymbolEntry {
        SymbolEntry {
            name: name.to_string(),
            declared_type: "whole".to_string(),
            scope: GLOBAL_SCOPE.to_string(),
            value,
            memory_label: label.to_string(),
            declaration_line: 1,
        }
    }

    #[test]
    fn test_redeclaration_replaces_in_place() {
        let mut table = SymbolTable::new();
        table.insert(entry("a", SymbolValue::Resolved("1".into()), "M1000"));
        table.insert(entry("b", SymbolValue::Resolved("2".into()), "M1001"));
        table.insert(entry("a", SymbolValue::Error, "M1002"));

        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].name, "a");
        assert_eq!(table.get("a").map(|e| e.memory_label.as_str()), Some("M1002"));
        assert_eq!(table.error_count(), 1);
    }

    #[test]
    fn test_serializes_value_as_text() {
        let mut table = SymbolTable::new();
        table.insert(entry("x", SymbolValue::Error, "M1000"));
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json[0]["value"], "ERROR");
        assert_eq!(json[0]["scope"], "global");
    }

    #[test]
    fn test_display_has_header_and_rows() {
        let mut table = SymbolTable::new();
        table.insert(entry("x", SymbolValue::Resolved("10".into()), "M1000"));
        let text = table.to_string();
        assert!(text.starts_with("Identifier"));
        assert!(text.lines().nth(2).is_some_and(|row| row.starts_with("x ")));
        assert!(text.contains("M1000"));
    }
}
