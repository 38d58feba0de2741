//! 制約式の正規テキスト出力
//!
//! The printed form is what the normalizer compares between rounds, so it
//! must be deterministic and reparse to the same tree.

use crate::ast::{Arithmetic, CallStyle, Expr, Literal, Operation};
use itertools::Itertools;

const IMPLIES: u8 = 1;
const OR: u8 = 2;
const AND: u8 = 3;
const COMPARISON: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const UNARY: u8 = 7;
const POSTFIX: u8 = 8;
const ATOM: u8 = 9;

/// Prints `expr` in canonical form
pub fn print(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(expr, 0, &mut out);
    out
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Variable(_) | Expr::Literal(_) | Expr::Collection { .. } => ATOM,
        Expr::Property { .. } | Expr::Iterate { .. } => POSTFIX,
        Expr::Call { op, .. } => operation_precedence(op),
    }
}

fn operation_precedence(op: &Operation) -> u8 {
    match op {
        Operation::Implies => IMPLIES,
        Operation::Or | Operation::Xor => OR,
        Operation::And => AND,
        Operation::Compare(_) => COMPARISON,
        Operation::Arithmetic(Arithmetic::Add | Arithmetic::Sub) => ADDITIVE,
        Operation::Arithmetic(Arithmetic::Mul | Arithmetic::Div) => MULTIPLICATIVE,
        Operation::Not => UNARY,
        _ => POSTFIX,
    }
}

fn write_expr(expr: &Expr, min: u8, out: &mut String) {
    let parenthesize = precedence(expr) < min;
    if parenthesize {
        out.push('(');
    }

    match expr {
        Expr::Variable(name) => out.push_str(name),
        Expr::Literal(literal) => write_literal(literal, out),
        Expr::Collection { kind, items } => {
            out.push_str(kind.name());
            out.push('{');
            write_list(items, out);
            out.push('}');
        }
        Expr::Property { source, name } => {
            write_expr(source, POSTFIX, out);
            out.push('.');
            out.push_str(name);
        }
        Expr::Iterate {
            source,
            kind,
            variable,
            body,
        } => {
            write_expr(source, POSTFIX, out);
            out.push_str("->");
            out.push_str(kind.name());
            out.push('(');
            out.push_str(variable);
            out.push_str(" | ");
            write_expr(body, 0, out);
            out.push(')');
        }
        Expr::Call { source, op, args } => write_call(source, op, args, out),
    }

    if parenthesize {
        out.push(')');
    }
}

fn write_call(source: &Expr, op: &Operation, args: &[Expr], out: &mut String) {
    match op.style() {
        CallStyle::Prefix => {
            out.push_str(op.name());
            out.push(' ');
            write_expr(source, UNARY, out);
        }
        CallStyle::Infix => {
            let level = operation_precedence(op);
            // comparisons do not chain, the others associate to the left
            let left = if matches!(op, Operation::Compare(_)) { level + 1 } else { level };
            write_expr(source, left, out);
            for arg in args {
                out.push(' ');
                out.push_str(op.name());
                out.push(' ');
                write_expr(arg, level + 1, out);
            }
        }
        CallStyle::Dot | CallStyle::Arrow => {
            write_expr(source, POSTFIX, out);
            out.push_str(if op.style() == CallStyle::Arrow { "->" } else { "." });
            out.push_str(op.name());
            out.push('(');
            write_list(args, out);
            out.push(')');
        }
    }
}

fn write_list(items: &[Expr], out: &mut String) {
    let printed = items.iter().map(print).join(", ");
    out.push_str(&printed);
}

fn write_literal(literal: &Literal, out: &mut String) {
    match literal {
        Literal::Integer(n) => out.push_str(&n.to_string()),
        Literal::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Literal::String(s) => {
            out.push('\'');
            out.push_str(s);
            out.push('\'');
        }
        Literal::Path(segments) => out.push_str(&segments.join("::")),
    }
}
