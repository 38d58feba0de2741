//! 制約式の書き換え規則
//!
//! One call to [`ConstraintRewriter::rewrite`] is one bottom-up pass: the
//! children of a node are rewritten first, then every rule is tried on the
//! node in order. The normalizer repeats passes until nothing changes.

use crate::ast::{CallStyle, CollectionKind, Comparison, Expr, IteratorKind, Operation};

/// 書き換えルール
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteRule {
    /// `s->exists(x | c)` ⇒ `s->select(x | c)->notEmpty()`
    ExistsToSelect,

    /// `s->forAll(x | c)` ⇒ `s->select(x | not c)->isEmpty()`
    ForAllToSelect,

    /// `s->select(x | a)->select(y | b)` ⇒ `s->select(x | a and b[y := x])`
    MergeSelects,

    /// `s->size() > n` ⇒ `s->notEmpty()`, any other use of size ⇒ `s->isEmpty()`
    SizeToEmptiness,

    /// `not s->isEmpty()` ⇒ `s->notEmpty()` and the converse
    NegatedEmptiness,

    /// `Set{e}->op(..)` ⇒ `e->op(..)`
    UnwrapSingleton,
}

impl RewriteRule {
    pub const ALL: [RewriteRule; 6] = [
        RewriteRule::UnwrapSingleton,
        RewriteRule::ExistsToSelect,
        RewriteRule::ForAllToSelect,
        RewriteRule::MergeSelects,
        RewriteRule::SizeToEmptiness,
        RewriteRule::NegatedEmptiness,
    ];
}

/// 書き換え器トレイト
pub trait ConstraintRewriter {
    fn rewrite(&self, expr: Expr) -> Expr;
}

/// デフォルト書き換え器
#[derive(Debug, Clone)]
pub struct DefaultConstraintRewriter {
    rules: Vec<RewriteRule>,
}

impl Default for DefaultConstraintRewriter {
    fn default() -> Self {
        Self {
            rules: RewriteRule::ALL.to_vec(),
        }
    }
}

/// Where a node sits relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Anywhere,
    /// Direct operand of a comparison
    Compared,
}

impl ConstraintRewriter for DefaultConstraintRewriter {
    fn rewrite(&self, expr: Expr) -> Expr {
        self.rewrite_node(expr, Position::Anywhere)
    }
}

impl DefaultConstraintRewriter {
    pub fn with_rules(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    fn rewrite_node(&self, expr: Expr, position: Position) -> Expr {
        let expr = self.rewrite_children(expr);
        self.rules
            .iter()
            .fold(expr, |expr, rule| self.apply_rule(expr, *rule, position))
    }

    fn rewrite_children(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Variable(_) | Expr::Literal(_) => expr,
            Expr::Collection { kind, items } => Expr::Collection {
                kind,
                items: items.into_iter().map(|e| self.rewrite(e)).collect(),
            },
            Expr::Property { source, name } => Expr::property(self.rewrite(*source), name),
            Expr::Call { source, op, args } => {
                let position = if matches!(op, Operation::Compare(_)) {
                    Position::Compared
                } else {
                    Position::Anywhere
                };
                Expr::call(
                    self.rewrite_node(*source, position),
                    op,
                    args.into_iter().map(|e| self.rewrite_node(e, position)).collect(),
                )
            }
            Expr::Iterate {
                source,
                kind,
                variable,
                body,
            } => Expr::iterate(self.rewrite(*source), kind, variable, self.rewrite(*body)),
        }
    }

    fn apply_rule(&self, expr: Expr, rule: RewriteRule, position: Position) -> Expr {
        match rule {
            RewriteRule::ExistsToSelect => self.exists_to_select(expr),
            RewriteRule::ForAllToSelect => self.for_all_to_select(expr),
            RewriteRule::MergeSelects => self.merge_selects(expr),
            RewriteRule::SizeToEmptiness => self.size_to_emptiness(expr, position),
            RewriteRule::NegatedEmptiness => self.negated_emptiness(expr),
            RewriteRule::UnwrapSingleton => self.unwrap_singleton(expr),
        }
    }

    fn exists_to_select(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Iterate {
                source,
                kind: IteratorKind::Exists,
                variable,
                body,
            } => Expr::unary(
                Operation::NotEmpty,
                Expr::iterate(*source, IteratorKind::Select, variable, *body),
            ),
            _ => expr,
        }
    }

    fn for_all_to_select(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Iterate {
                source,
                kind: IteratorKind::ForAll,
                variable,
                body,
            } => Expr::unary(
                Operation::IsEmpty,
                Expr::iterate(
                    *source,
                    IteratorKind::Select,
                    variable,
                    Expr::unary(Operation::Not, *body),
                ),
            ),
            _ => expr,
        }
    }

    fn merge_selects(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Iterate {
                source,
                kind: IteratorKind::Select,
                variable,
                body,
            } => match *source {
                Expr::Iterate {
                    source: inner_source,
                    kind: IteratorKind::Select,
                    variable: inner_variable,
                    body: inner_body,
                } if variable == inner_variable || !body.uses_name(&inner_variable) => {
                    let renamed = (*body).rename_variable(&variable, &inner_variable);
                    Expr::iterate(
                        *inner_source,
                        IteratorKind::Select,
                        inner_variable,
                        Expr::binary(Operation::And, *inner_body, renamed),
                    )
                }
                source => Expr::iterate(source, IteratorKind::Select, variable, *body),
            },
            _ => expr,
        }
    }

    fn size_to_emptiness(&self, expr: Expr, position: Position) -> Expr {
        match expr {
            Expr::Call {
                source,
                op: Operation::Compare(comparison),
                mut args,
            } => {
                let size_on_left = is_size(&source);
                let size_on_right = args.first().map_or(false, is_size);
                if size_on_left {
                    let nonempty = comparison == Comparison::Gt;
                    emptiness(size_operand(*source), nonempty)
                } else if size_on_right && args.len() == 1 {
                    let nonempty = comparison == Comparison::Lt;
                    emptiness(size_operand(args.remove(0)), nonempty)
                } else {
                    Expr::call(*source, Operation::Compare(comparison), args)
                }
            }
            Expr::Call {
                source,
                op: Operation::Size,
                args,
            } if position == Position::Anywhere && args.is_empty() => {
                Expr::unary(Operation::IsEmpty, *source)
            }
            _ => expr,
        }
    }

    fn negated_emptiness(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Call {
                source,
                op: Operation::Not,
                args,
            } if args.is_empty() => match *source {
                Expr::Call {
                    source: inner,
                    op: Operation::IsEmpty,
                    args,
                } if args.is_empty() => Expr::unary(Operation::NotEmpty, *inner),
                Expr::Call {
                    source: inner,
                    op: Operation::NotEmpty,
                    args,
                } if args.is_empty() => Expr::unary(Operation::IsEmpty, *inner),
                operand => Expr::unary(Operation::Not, operand),
            },
            _ => expr,
        }
    }

    fn unwrap_singleton(&self, expr: Expr) -> Expr {
        match expr {
            Expr::Call { source, op, args } if op.style() == CallStyle::Arrow => {
                Expr::call(unwrap_collection(*source), op, args)
            }
            Expr::Iterate {
                source,
                kind,
                variable,
                body,
            } => Expr::iterate(unwrap_collection(*source), kind, variable, *body),
            _ => expr,
        }
    }
}

fn unwrap_collection(expr: Expr) -> Expr {
    match expr {
        Expr::Collection {
            kind: CollectionKind::Set,
            mut items,
        } if items.len() == 1 => items.remove(0),
        _ => expr,
    }
}

fn is_size(expr: &Expr) -> bool {
    matches!(expr, Expr::Call { op: Operation::Size, args, .. } if args.is_empty())
}

fn size_operand(expr: Expr) -> Expr {
    match expr {
        Expr::Call { source, .. } => *source,
        other => other,
    }
}

fn emptiness(operand: Expr, nonempty: bool) -> Expr {
    let op = if nonempty { Operation::NotEmpty } else { Operation::IsEmpty };
    Expr::unary(op, operand)
}
