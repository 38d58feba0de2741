//! 制約変換レポート

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConstraintOutcome {
    /// `C ⊑ E` was added
    Emitted,
    /// No axiom was added
    Skipped { reason: String },
}

/// What happened to one constraint annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub class: String,
    pub name: String,
    pub source: String,
    /// Printed fixpoint, when normalization succeeded
    pub normalized: Option<String>,
    pub rounds: Option<usize>,
    /// Resolved expression in DL notation
    pub expression: Option<String>,
    pub outcome: ConstraintOutcome,
}

impl ConstraintReport {
    pub fn is_emitted(&self) -> bool {
        self.outcome == ConstraintOutcome::Emitted
    }
}

impl fmt::Display for ConstraintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ConstraintOutcome::Emitted => write!(
                f,
                "{}::{} emitted: {}",
                self.class,
                self.name,
                self.expression.as_deref().unwrap_or_default()
            ),
            ConstraintOutcome::Skipped { reason } => {
                write!(f, "{}::{} skipped: {}", self.class, self.name, reason)
            }
        }
    }
}
