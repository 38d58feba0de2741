//! # Mimizuku OCL
//!
//! 制約言語 (OCL サブセット) の解析・正規化・DL 変換
//!
//! ## Pipeline
//!
//! 1. `lexer` / `parser`: text → [`Expr`]
//! 2. `rewrite`: one bottom-up pass of [`RewriteRule`]s
//! 3. `normalizer`: rewrite → print → reparse until the text is stable
//! 4. `scope`: typed frames against a [`Vocabulary`]
//! 5. `resolve`: frames → [`mimizuku_dl::ClassExpression`]

pub mod ast;
pub mod lexer;
pub mod normalizer;
pub mod parser;
pub mod printer;
pub mod resolve;
pub mod rewrite;
pub mod scope;

pub use ast::{Arithmetic, CallStyle, CollectionKind, Comparison, Expr, IteratorKind, Literal, Operation};
pub use normalizer::{
    ConstraintNormalizer, NormalizedConstraint, ResolvedConstraint, DEFAULT_MAX_FIXPOINT_ITERATIONS,
    DEFAULT_MAX_RESOLUTION_DEPTH,
};
pub use parser::{parse, ConstraintParser, DefaultConstraintParser, DEFAULT_MAX_NESTING_DEPTH};
pub use printer::print;
pub use resolve::resolve;
pub use rewrite::{ConstraintRewriter, DefaultConstraintRewriter, RewriteRule};
pub use scope::{Frame, FrameOp, Navigation, Scope, ScopeBuilder, Vocabulary};

/// 制約処理エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintError {
    #[error("Parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("No fixpoint after {iterations} rewrite rounds, last form: {text}")]
    FixpointNotReached { iterations: usize, text: String },

    #[error("Rewriting cycled back to an earlier form: {text}")]
    NormalizationCycle { text: String },

    #[error("Class {class} has no property '{property}'")]
    UnknownProperty { class: String, property: String },

    #[error("Cannot navigate '{property}' from a datatype or enumeration value")]
    NavigationFromValue { property: String },

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Unsupported construct: {0}")]
    Unsupported(String),

    #[error("Resolution deeper than {0} frames")]
    ResolutionDepthExceeded(usize),

    #[error("Expression nested deeper than {limit} levels at {position}")]
    NestingTooDeep { limit: usize, position: usize },
}

impl ConstraintError {
    /// Constructs outside the translatable fragment, as opposed to broken input
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ConstraintError::Unsupported(_))
    }
}
