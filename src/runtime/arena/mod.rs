pub mod arena_entry;
pub mod context_arena;
pub mod context_ref;

pub use context_arena::ContextArena;
pub use context_ref::ContextRef;
