//! Action generators and derivations: each module builds one kind of
//! action and implements the dispatcher that runs it.

pub(crate) mod adapt;
pub(crate) mod augment;
pub(crate) mod chain;
pub(crate) mod does;
pub(crate) mod enclose;
pub(crate) mod func;
pub(crate) mod generic;
pub(crate) mod lambda;
pub(crate) mod macros;
pub(crate) mod oneshot;
pub(crate) mod reorder;
pub(crate) mod specialize;
