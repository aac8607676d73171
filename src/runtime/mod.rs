//! The evaluator core.
//!
//! Values are [`value::Cell`]s. Objects and frames live in a
//! [`arena::ContextArena`] and are reached through generation-checked
//! [`arena::ContextRef`] handles, so cells never own their contexts and
//! reference cycles between contexts cannot leak. Actions are shared
//! through `Rc` and never point back at the cells holding them.

pub mod action;
pub mod arena;
pub mod binding;
pub(crate) mod combinators;
pub mod compare;
pub mod context;
pub mod debugger;
pub mod error;
pub mod feed;
pub mod frame;
pub(crate) mod generics;
pub mod interpreter;
pub mod kind;
pub mod mold;
pub(crate) mod natives;
pub mod paramlist;
pub mod port;
pub mod value;

#[cfg(test)]
mod context_test;
