//! スコープとフレームの構築
//!
//! Turns a normalized expression into a tree of scopes. Each scope is the
//! ordered frame list of one navigation chain: frames are pushed in the order
//! the chain is evaluated and popped from the end during resolution. An
//! iterator body, and the second operand of `and`/`or`/`implies`, get their
//! own nested scope.

use crate::ast::{Expr, IteratorKind, Literal, Operation};
use crate::ConstraintError;
use mimizuku_dl::{ClassExpression, PropertyExpression};
use serde::{Deserialize, Serialize};

/// Result of navigating one property from a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub role: PropertyExpression,
    /// Class reached, `None` for datatype and enumeration values
    pub target: Option<String>,
}

/// Names the constraint language can see
pub trait Vocabulary {
    /// Role and target of `property` as seen from `class`, inherited features included
    fn navigate(&self, class: &str, property: &str) -> Option<Navigation>;

    /// Concept of a class named in `oclIsTypeOf`/`oclAsType`
    fn concept(&self, class: &str) -> Option<ClassExpression>;
}

/// Operation frame kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameOp {
    Not,
    NotEmpty,
    IsEmpty,
    And(Scope),
    Or(Scope),
    Implies(Scope),
    IsTypeOf(ClassExpression),
    AsType(ClassExpression),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame {
    Property {
        name: String,
        role: PropertyExpression,
    },
    Operation(FrameOp),
    Iterator {
        variable: String,
        nested: Scope,
    },
}

/// Ordered frames of one chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub frames: Vec<Frame>,
}

impl Scope {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames including those of nested scopes
    pub fn size(&self) -> usize {
        self.frames
            .iter()
            .map(|frame| match frame {
                Frame::Iterator { nested, .. }
                | Frame::Operation(FrameOp::And(nested))
                | Frame::Operation(FrameOp::Or(nested))
                | Frame::Operation(FrameOp::Implies(nested)) => 1 + nested.size(),
                _ => 1,
            })
            .sum()
    }
}

/// The variable a chain starts from and its class
struct Subject<'e> {
    variable: &'e str,
    class: Option<String>,
}

/// Builds scopes against a vocabulary
pub struct ScopeBuilder<'v, V: Vocabulary + ?Sized> {
    vocabulary: &'v V,
}

impl<'v, V: Vocabulary + ?Sized> ScopeBuilder<'v, V> {
    pub fn new(vocabulary: &'v V) -> Self {
        Self { vocabulary }
    }

    /// Builds the root scope of `expr` evaluated on instances of `context`
    pub fn build(&self, expr: &Expr, context: &str) -> Result<Scope, ConstraintError> {
        let subject = Subject {
            variable: "self",
            class: Some(context.to_string()),
        };
        self.nested(expr, &subject)
    }

    fn nested(&self, expr: &Expr, subject: &Subject<'_>) -> Result<Scope, ConstraintError> {
        let mut scope = Scope::default();
        self.chain(expr, subject, &mut scope)?;
        Ok(scope)
    }

    /// Pushes the frames of `expr` and returns the class it evaluates to
    fn chain(&self, expr: &Expr, subject: &Subject<'_>, scope: &mut Scope) -> Result<Option<String>, ConstraintError> {
        match expr {
            Expr::Variable(name) if name == subject.variable => Ok(subject.class.clone()),
            Expr::Variable(name) => Err(ConstraintError::Unsupported(format!(
                "reference to '{}' inside the body of '{}'",
                name, subject.variable
            ))),
            Expr::Literal(_) => Err(ConstraintError::Unsupported("literal value".to_string())),
            Expr::Collection { kind, .. } => Err(ConstraintError::Unsupported(format!(
                "{} literal",
                kind.name()
            ))),
            Expr::Property { source, name } => {
                let class = self.chain(source, subject, scope)?.ok_or_else(|| {
                    ConstraintError::NavigationFromValue {
                        property: name.clone(),
                    }
                })?;
                let navigation =
                    self.vocabulary
                        .navigate(&class, name)
                        .ok_or_else(|| ConstraintError::UnknownProperty {
                            class: class.clone(),
                            property: name.clone(),
                        })?;
                scope.frames.push(Frame::Property {
                    name: name.clone(),
                    role: navigation.role,
                });
                Ok(navigation.target)
            }
            Expr::Iterate {
                source,
                kind: IteratorKind::Select,
                variable,
                body,
            } => {
                let class = self.chain(source, subject, scope)?;
                let inner = Subject {
                    variable,
                    class: class.clone(),
                };
                let nested = self.nested(body, &inner)?;
                scope.frames.push(Frame::Iterator {
                    variable: variable.clone(),
                    nested,
                });
                Ok(class)
            }
            Expr::Iterate { kind, .. } => Err(ConstraintError::Unsupported(format!("{} iterator", kind.name()))),
            Expr::Call { source, op, args } => self.call(source, op, args, subject, scope),
        }
    }

    fn call(
        &self,
        source: &Expr,
        op: &Operation,
        args: &[Expr],
        subject: &Subject<'_>,
        scope: &mut Scope,
    ) -> Result<Option<String>, ConstraintError> {
        let frame = match op {
            Operation::Not => FrameOp::Not,
            Operation::NotEmpty => FrameOp::NotEmpty,
            Operation::IsEmpty => FrameOp::IsEmpty,
            Operation::And | Operation::Or | Operation::Implies => {
                let right = args
                    .first()
                    .ok_or_else(|| ConstraintError::Unsupported(format!("'{}' without operand", op.name())))?;
                let nested = self.nested(right, subject)?;
                match op {
                    Operation::And => FrameOp::And(nested),
                    Operation::Or => FrameOp::Or(nested),
                    _ => FrameOp::Implies(nested),
                }
            }
            Operation::OclIsTypeOf | Operation::OclIsKindOf => FrameOp::IsTypeOf(self.type_argument(op, args)?),
            Operation::OclAsType => {
                let target = self.type_name(op, args)?;
                let concept = self.type_argument(op, args)?;
                self.chain(source, subject, scope)?;
                scope.frames.push(Frame::Operation(FrameOp::AsType(concept)));
                return Ok(Some(target.to_string()));
            }
            other => return Err(ConstraintError::Unsupported(format!("operation '{}'", other.name()))),
        };

        self.chain(source, subject, scope)?;
        scope.frames.push(Frame::Operation(frame));
        Ok(None)
    }

    fn type_name<'e>(&self, op: &Operation, args: &'e [Expr]) -> Result<&'e str, ConstraintError> {
        match args {
            [Expr::Literal(literal @ Literal::Path(_))] => literal
                .path_name()
                .ok_or_else(|| ConstraintError::Unsupported(format!("empty type name in '{}'", op.name()))),
            _ => Err(ConstraintError::Unsupported(format!(
                "'{}' expects a single type name",
                op.name()
            ))),
        }
    }

    fn type_argument(&self, op: &Operation, args: &[Expr]) -> Result<ClassExpression, ConstraintError> {
        let name = self.type_name(op, args)?;
        self.vocabulary
            .concept(name)
            .ok_or_else(|| ConstraintError::UnknownType(name.to_string()))
    }
}
