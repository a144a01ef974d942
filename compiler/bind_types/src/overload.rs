//! Overload selection.
//!
//! Rules, applied in order; the first that yields a unique candidate wins:
//!
//! 1. Parameter count must equal argument count.
//! 2. A candidate whose parameters are exactly the argument types.
//! 3. A candidate every argument is assignable to. Several such candidates
//!    are ambiguous: there is no most-specific tie-break.
//!
//! When the count filter leaves one candidate that does not accept the
//! arguments, the first offending argument is reported.

use bind_ir::{BuiltinMethod, Type};

use crate::assign::is_assignable;
use crate::builtins;
use crate::registry::{ClassRegistry, MethodDef};

/// Anything with a parameter list.
pub trait Signature {
    fn params(&self) -> &[Type];
}

impl Signature for &MethodDef {
    fn params(&self) -> &[Type] {
        &self.params
    }
}

impl Signature for BuiltinMethod {
    fn params(&self) -> &[Type] {
        builtins::params(*self)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OverloadError {
    /// No candidate takes this many arguments.
    NoCandidate,
    /// The only candidate of matching arity rejects argument `index`.
    Mismatch { candidate: usize, index: usize },
    /// Candidates (by index) that remain equally applicable.
    Ambiguous(Vec<usize>),
    /// Several candidates of matching arity, none applicable.
    NoApplicable,
}

/// Pick the candidate matching `args`; returns its index.
pub fn select<S: Signature>(
    candidates: &[S],
    args: &[Type],
    registry: &ClassRegistry,
) -> Result<usize, OverloadError> {
    let by_arity: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.params().len() == args.len())
        .map(|(i, _)| i)
        .collect();

    match by_arity.as_slice() {
        [] => return Err(OverloadError::NoCandidate),
        &[only] => {
            let params = candidates[only].params();
            return match args
                .iter()
                .zip(params)
                .position(|(arg, param)| !is_assignable(arg, param, registry))
            {
                Some(index) => Err(OverloadError::Mismatch {
                    candidate: only,
                    index,
                }),
                None => Ok(only),
            };
        }
        _ => {}
    }

    let exact: Vec<usize> = by_arity
        .iter()
        .copied()
        .filter(|&i| candidates[i].params() == args)
        .collect();
    if let &[winner] = exact.as_slice() {
        return Ok(winner);
    }

    let applicable: Vec<usize> = by_arity
        .into_iter()
        .filter(|&i| {
            args.iter()
                .zip(candidates[i].params())
                .all(|(arg, param)| is_assignable(arg, param, registry))
        })
        .collect();
    match applicable.as_slice() {
        [] => Err(OverloadError::NoApplicable),
        &[winner] => Ok(winner),
        _ => Err(OverloadError::Ambiguous(applicable)),
    }
}
