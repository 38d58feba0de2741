//! フレームから DL クラス式への解決

use crate::scope::{Frame, FrameOp, Scope};
use crate::ConstraintError;
use mimizuku_dl::ClassExpression;

/// Resolves `scope` into a class expression, descending at most `max_depth` frames
pub fn resolve(scope: &Scope, max_depth: usize) -> Result<ClassExpression, ConstraintError> {
    Resolver { max_depth }.frames(&scope.frames, None, 0)
}

struct Resolver {
    max_depth: usize,
}

impl Resolver {
    /// Pops the top frame of `frames`; `acc` is the filler built so far
    fn frames(
        &self,
        frames: &[Frame],
        acc: Option<ClassExpression>,
        depth: usize,
    ) -> Result<ClassExpression, ConstraintError> {
        if depth > self.max_depth {
            return Err(ConstraintError::ResolutionDepthExceeded(self.max_depth));
        }
        let Some((top, rest)) = frames.split_last() else {
            return Ok(acc.unwrap_or(ClassExpression::Thing));
        };
        let depth = depth + 1;

        match top {
            Frame::Property { role, .. } => {
                let restriction = ClassExpression::exists(role.clone(), acc);
                self.frames(rest, Some(restriction), depth)
            }
            Frame::Iterator { nested, .. } => {
                let condition = self.frames(&nested.frames, None, depth)?;
                let filler = match acc {
                    Some(acc) => ClassExpression::intersection_of([condition, acc]),
                    None => condition,
                };
                self.frames(rest, Some(filler), depth)
            }
            Frame::Operation(op) => match op {
                FrameOp::Not | FrameOp::IsEmpty => {
                    Ok(ClassExpression::complement_of(self.frames(rest, acc, depth)?))
                }
                FrameOp::NotEmpty => self.frames(rest, acc, depth),
                FrameOp::And(nested) => Ok(ClassExpression::intersection_of([
                    self.frames(rest, acc, depth)?,
                    self.frames(&nested.frames, None, depth)?,
                ])),
                FrameOp::Or(nested) => Ok(ClassExpression::union_of([
                    self.frames(rest, acc, depth)?,
                    self.frames(&nested.frames, None, depth)?,
                ])),
                FrameOp::Implies(nested) => Ok(ClassExpression::union_of([
                    ClassExpression::complement_of(self.frames(rest, acc, depth)?),
                    self.frames(&nested.frames, None, depth)?,
                ])),
                FrameOp::IsTypeOf(concept) => self.frames(rest, Some(concept.clone()), depth),
                FrameOp::AsType(concept) => {
                    let filler = match acc {
                        Some(acc) => ClassExpression::intersection_of([concept.clone(), acc]),
                        None => concept.clone(),
                    };
                    self.frames(rest, Some(filler), depth)
                }
            },
        }
    }
}
