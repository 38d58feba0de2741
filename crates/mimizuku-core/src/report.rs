//! 整合性検査レポート

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Info,
}

/// Kind of model element a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Class,
    Attribute,
    Operation,
    Association,
    Parameter,
    Enumeration,
}

impl ElementKind {
    /// Prefix of generated names
    pub fn generated_prefix(&self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Attribute => "attribute",
            ElementKind::Operation => "method",
            ElementKind::Association => "association",
            ElementKind::Parameter => "parameter",
            ElementKind::Enumeration => "enumeration",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ElementKind::Class => "Class",
            ElementKind::Attribute => "Attribute",
            ElementKind::Operation => "Method",
            ElementKind::Association => "Association",
            ElementKind::Parameter => "Parameter",
            ElementKind::Enumeration => "Enumeration",
        };
        f.write_str(label)
    }
}

/// A recoverable defect that was repaired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A blank name was replaced by a generated one
    NamelessElement {
        kind: ElementKind,
        assigned: String,
    },
    /// Embedded spaces were removed from a name
    NameTrimmed {
        kind: ElementKind,
        original: String,
        trimmed: String,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::NamelessElement { .. } => Severity::Warning,
            Diagnostic::NameTrimmed { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NamelessElement { kind, assigned } => write!(
                f,
                "There was a nameless {}, the name {} was assigned to this execution",
                kind, assigned
            ),
            Diagnostic::NameTrimmed { kind, original, trimmed } => {
                write!(f, "{} name '{}' was trimmed to '{}'", kind, original, trimmed)
            }
        }
    }
}

/// Result of a successful well-formedness check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellFormednessReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl WellFormednessReport {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 警告の数を取得
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity() == Severity::Warning).count()
    }

    /// 情報メッセージの数を取得
    pub fn info_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity() == Severity::Info).count()
    }

    /// 人間可読形式で出力
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}
