//! 制約式の抽象構文木

use serde::{Deserialize, Serialize};

/// Binary comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arithmetic {
    Add,
    Sub,
    Mul,
    Div,
}

impl Arithmetic {
    pub fn symbol(&self) -> &'static str {
        match self {
            Arithmetic::Add => "+",
            Arithmetic::Sub => "-",
            Arithmetic::Mul => "*",
            Arithmetic::Div => "/",
        }
    }
}

/// How an operation is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// `not x`
    Prefix,
    /// `a and b`
    Infix,
    /// `x.name(args)`
    Dot,
    /// `x->name(args)`
    Arrow,
}

/// Operation applied to a source expression.
///
/// Unary and binary operators use the same shape as named calls: the first
/// operand is the source, the remaining operands are the arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Not,
    And,
    Or,
    Xor,
    Implies,
    Compare(Comparison),
    Arithmetic(Arithmetic),
    IsEmpty,
    NotEmpty,
    Size,
    OclIsTypeOf,
    OclIsKindOf,
    OclAsType,
    /// Any other named operation, kept verbatim
    Named { name: String, arrow: bool },
}

impl Operation {
    /// Looks up a named operation written with `.` or `->`
    pub fn from_name(name: &str, arrow: bool) -> Operation {
        match name {
            "isEmpty" => Operation::IsEmpty,
            "notEmpty" => Operation::NotEmpty,
            "size" => Operation::Size,
            "oclIsTypeOf" => Operation::OclIsTypeOf,
            "oclIsKindOf" => Operation::OclIsKindOf,
            "oclAsType" => Operation::OclAsType,
            _ => Operation::Named {
                name: name.to_string(),
                arrow,
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Operation::Not => "not",
            Operation::And => "and",
            Operation::Or => "or",
            Operation::Xor => "xor",
            Operation::Implies => "implies",
            Operation::Compare(c) => c.symbol(),
            Operation::Arithmetic(a) => a.symbol(),
            Operation::IsEmpty => "isEmpty",
            Operation::NotEmpty => "notEmpty",
            Operation::Size => "size",
            Operation::OclIsTypeOf => "oclIsTypeOf",
            Operation::OclIsKindOf => "oclIsKindOf",
            Operation::OclAsType => "oclAsType",
            Operation::Named { name, .. } => name,
        }
    }

    pub fn style(&self) -> CallStyle {
        match self {
            Operation::Not => CallStyle::Prefix,
            Operation::And
            | Operation::Or
            | Operation::Xor
            | Operation::Implies
            | Operation::Compare(_)
            | Operation::Arithmetic(_) => CallStyle::Infix,
            Operation::IsEmpty | Operation::NotEmpty | Operation::Size => CallStyle::Arrow,
            Operation::OclIsTypeOf | Operation::OclIsKindOf | Operation::OclAsType => CallStyle::Dot,
            Operation::Named { arrow: true, .. } => CallStyle::Arrow,
            Operation::Named { arrow: false, .. } => CallStyle::Dot,
        }
    }

    /// Operations whose argument is a type name rather than an expression
    pub fn takes_type_argument(&self) -> bool {
        matches!(
            self,
            Operation::OclIsTypeOf | Operation::OclIsKindOf | Operation::OclAsType
        )
    }
}

/// Collection iterator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IteratorKind {
    Select,
    Reject,
    Exists,
    ForAll,
    Collect,
    Any,
    One,
    IsUnique,
    Closure,
    SortedBy,
}

impl IteratorKind {
    pub fn from_name(name: &str) -> Option<IteratorKind> {
        let kind = match name {
            "select" => IteratorKind::Select,
            "reject" => IteratorKind::Reject,
            "exists" => IteratorKind::Exists,
            "forAll" => IteratorKind::ForAll,
            "collect" => IteratorKind::Collect,
            "any" => IteratorKind::Any,
            "one" => IteratorKind::One,
            "isUnique" => IteratorKind::IsUnique,
            "closure" => IteratorKind::Closure,
            "sortedBy" => IteratorKind::SortedBy,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            IteratorKind::Select => "select",
            IteratorKind::Reject => "reject",
            IteratorKind::Exists => "exists",
            IteratorKind::ForAll => "forAll",
            IteratorKind::Collect => "collect",
            IteratorKind::Any => "any",
            IteratorKind::One => "one",
            IteratorKind::IsUnique => "isUnique",
            IteratorKind::Closure => "closure",
            IteratorKind::SortedBy => "sortedBy",
        }
    }
}

/// Collection literal kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Set,
    OrderedSet,
    Bag,
    Sequence,
}

impl CollectionKind {
    pub fn from_name(name: &str) -> Option<CollectionKind> {
        match name {
            "Set" => Some(CollectionKind::Set),
            "OrderedSet" => Some(CollectionKind::OrderedSet),
            "Bag" => Some(CollectionKind::Bag),
            "Sequence" => Some(CollectionKind::Sequence),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::Set => "Set",
            CollectionKind::OrderedSet => "OrderedSet",
            CollectionKind::Bag => "Bag",
            CollectionKind::Sequence => "Sequence",
        }
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    Integer(u64),
    Boolean(bool),
    /// String contents between the quotes, escapes untouched
    String(String),
    /// Qualified name such as a type or `Color::red`
    Path(Vec<String>),
}

impl Literal {
    /// Last segment of a path literal
    pub fn path_name(&self) -> Option<&str> {
        match self {
            Literal::Path(segments) => segments.last().map(String::as_str),
            _ => None,
        }
    }
}

/// Constraint expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// `self` or an iterator variable
    Variable(String),
    Literal(Literal),
    Collection {
        kind: CollectionKind,
        items: Vec<Expr>,
    },
    /// `source.name`
    Property { source: Box<Expr>, name: String },
    Call {
        source: Box<Expr>,
        op: Operation,
        args: Vec<Expr>,
    },
    /// `source->kind(variable | body)`
    Iterate {
        source: Box<Expr>,
        kind: IteratorKind,
        variable: String,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn self_ref() -> Expr {
        Expr::Variable("self".to_string())
    }

    pub fn variable(name: impl Into<String>) -> Expr {
        Expr::Variable(name.into())
    }

    pub fn property(source: Expr, name: impl Into<String>) -> Expr {
        Expr::Property {
            source: Box::new(source),
            name: name.into(),
        }
    }

    pub fn call(source: Expr, op: Operation, args: Vec<Expr>) -> Expr {
        Expr::Call {
            source: Box::new(source),
            op,
            args,
        }
    }

    pub fn unary(op: Operation, operand: Expr) -> Expr {
        Expr::call(operand, op, vec![])
    }

    pub fn binary(op: Operation, left: Expr, right: Expr) -> Expr {
        Expr::call(left, op, vec![right])
    }

    pub fn iterate(source: Expr, kind: IteratorKind, variable: impl Into<String>, body: Expr) -> Expr {
        Expr::Iterate {
            source: Box::new(source),
            kind,
            variable: variable.into(),
            body: Box::new(body),
        }
    }

    /// Replaces free occurrences of variable `from` with variable `to`
    pub fn rename_variable(self, from: &str, to: &str) -> Expr {
        match self {
            Expr::Variable(name) if name == from => Expr::Variable(to.to_string()),
            Expr::Variable(_) | Expr::Literal(_) => self,
            Expr::Collection { kind, items } => Expr::Collection {
                kind,
                items: items.into_iter().map(|e| e.rename_variable(from, to)).collect(),
            },
            Expr::Property { source, name } => Expr::property((*source).rename_variable(from, to), name),
            Expr::Call { source, op, args } => Expr::call(
                (*source).rename_variable(from, to),
                op,
                args.into_iter().map(|e| e.rename_variable(from, to)).collect(),
            ),
            Expr::Iterate {
                source,
                kind,
                variable,
                body,
            } => {
                let source = (*source).rename_variable(from, to);
                let body = if variable == from { *body } else { (*body).rename_variable(from, to) };
                Expr::iterate(source, kind, variable, body)
            }
        }
    }

    /// Whether `name` occurs anywhere inside, as a variable or a binder
    pub fn uses_name(&self, name: &str) -> bool {
        match self {
            Expr::Variable(v) => v == name,
            Expr::Literal(_) => false,
            Expr::Collection { items, .. } => items.iter().any(|e| e.uses_name(name)),
            Expr::Property { source, .. } => source.uses_name(name),
            Expr::Call { source, args, .. } => source.uses_name(name) || args.iter().any(|e| e.uses_name(name)),
            Expr::Iterate {
                source,
                variable,
                body,
                ..
            } => variable == name || source.uses_name(name) || body.uses_name(name),
        }
    }
}
