//! 不動点正規化
//!
//! Each round rewrites the tree once, prints it and parses the printed text
//! again. The loop stops when a round leaves the printed text unchanged.

use crate::ast::Expr;
use crate::parser::{ConstraintParser, DefaultConstraintParser};
use crate::printer::print;
use crate::resolve::resolve;
use crate::rewrite::{ConstraintRewriter, DefaultConstraintRewriter};
use crate::scope::{Scope, ScopeBuilder, Vocabulary};
use crate::ConstraintError;
use mimizuku_dl::ClassExpression;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

pub const DEFAULT_MAX_FIXPOINT_ITERATIONS: usize = 16;
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 256;

/// Outcome of the rewrite loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedConstraint {
    /// Text as written
    pub source: String,
    /// Printed fixpoint
    pub text: String,
    /// Rounds that changed the printed text
    pub rounds: usize,
    pub expr: Expr,
}

/// A constraint resolved to a class expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConstraint {
    pub normalized: NormalizedConstraint,
    pub scope: Scope,
    pub expression: ClassExpression,
}

/// 制約正規化器
#[derive(Debug, Clone)]
pub struct ConstraintNormalizer<R = DefaultConstraintRewriter> {
    parser: DefaultConstraintParser,
    rewriter: R,
    max_iterations: usize,
    max_depth: usize,
}

impl Default for ConstraintNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FIXPOINT_ITERATIONS, DEFAULT_MAX_RESOLUTION_DEPTH)
    }
}

impl ConstraintNormalizer {
    pub fn new(max_iterations: usize, max_depth: usize) -> Self {
        Self {
            parser: DefaultConstraintParser::default(),
            rewriter: DefaultConstraintRewriter::default(),
            max_iterations,
            max_depth,
        }
    }
}

impl<R: ConstraintRewriter> ConstraintNormalizer<R> {
    pub fn with_rewriter<S: ConstraintRewriter>(self, rewriter: S) -> ConstraintNormalizer<S> {
        ConstraintNormalizer {
            parser: self.parser,
            rewriter,
            max_iterations: self.max_iterations,
            max_depth: self.max_depth,
        }
    }

    /// Bounds the nesting accepted when parsing constraint text
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.parser = DefaultConstraintParser::new(max_nesting);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Rewrites `text` until its printed form stops changing
    pub fn normalize(&self, text: &str) -> Result<NormalizedConstraint, ConstraintError> {
        let mut expr = self.parser.parse(text)?;
        let mut current = print(&expr);
        let mut seen = HashSet::from([current.clone()]);

        for round in 0..self.max_iterations {
            let rewritten = self.rewriter.rewrite(expr);
            let printed = print(&rewritten);
            if printed == current {
                debug!(rounds = round, text = %printed, "constraint normalized");
                return Ok(NormalizedConstraint {
                    source: text.to_string(),
                    text: printed,
                    rounds: round,
                    expr: rewritten,
                });
            }
            if !seen.insert(printed.clone()) {
                return Err(ConstraintError::NormalizationCycle { text: printed });
            }
            trace!(round, text = %printed, "constraint rewritten");
            expr = self.parser.parse(&printed)?;
            current = printed;
        }

        Err(ConstraintError::FixpointNotReached {
            iterations: self.max_iterations,
            text: current,
        })
    }

    /// Normalizes `text` and resolves it on instances of `context`
    pub fn translate<V: Vocabulary + ?Sized>(
        &self,
        text: &str,
        context: &str,
        vocabulary: &V,
    ) -> Result<ResolvedConstraint, ConstraintError> {
        let normalized = self.normalize(text)?;
        self.resolve_normalized(normalized, context, vocabulary)
    }

    /// Resolves an already normalized constraint on instances of `context`
    pub fn resolve_normalized<V: Vocabulary + ?Sized>(
        &self,
        normalized: NormalizedConstraint,
        context: &str,
        vocabulary: &V,
    ) -> Result<ResolvedConstraint, ConstraintError> {
        let scope = ScopeBuilder::new(vocabulary).build(&normalized.expr, context)?;
        let expression = resolve(&scope, self.max_depth)?;
        Ok(ResolvedConstraint {
            normalized,
            scope,
            expression,
        })
    }
}
