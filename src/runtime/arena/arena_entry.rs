use crate::runtime::context::Varlist;

pub(crate) enum Slot {
    Free,
    Live(Varlist),
    /// Storage moved elsewhere by a steal; the handle stays reserved so
    /// late users get `frame-consumed` rather than someone else's data.
    Inert,
}

pub(crate) struct ArenaEntry {
    pub(crate) generation: u32,
    pub(crate) slot: Slot,
    pub(crate) marked: bool,
}
