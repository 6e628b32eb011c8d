//! Statement classification and execution outcomes.

use serde_json::Value;

/// How a statement's result is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `SELECT`, `VALUES`, `TABLE`, or a read-only `WITH`: returns rows.
    Rows,
    /// Anything else, including `WITH` that modifies data: reports an
    /// affected-row count.
    Command,
}

const DATA_MODIFYING_KEYWORDS: [&str; 4] = ["INSERT", "UPDATE", "DELETE", "MERGE"];

impl StatementKind {
    /// Classifies a statement by its leading keyword.
    ///
    /// A `WITH` statement naming a data-modifying keyword anywhere is a
    /// command, since such statements cannot run inside a subquery.
    #[must_use]
    pub fn classify(statement: &str) -> Self {
        let mut words = statement
            .split(|character: char| !character.is_ascii_alphabetic())
            .filter(|word| !word.is_empty())
            .map(str::to_ascii_uppercase);
        let keyword = words.next().unwrap_or_default();
        match keyword.as_str() {
            "SELECT" | "VALUES" | "TABLE" => Self::Rows,
            "WITH" if words.any(|word| DATA_MODIFYING_KEYWORDS.contains(&word.as_str())) => {
                Self::Command
            }
            "WITH" => Self::Rows,
            _ => Self::Command,
        }
    }
}

/// Removes surrounding whitespace and trailing semicolons.
#[must_use]
pub fn normalize_statement(statement: &str) -> &str {
    statement
        .trim()
        .trim_end_matches(|character: char| character == ';' || character.is_whitespace())
}

/// Result of executing one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlOutcome {
    /// Rows rendered as JSON objects keyed by column name.
    Rows(Vec<Value>),
    /// Number of rows changed by a command.
    Affected(usize),
}
