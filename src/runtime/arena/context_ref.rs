/// Handle to a context in the [`super::ContextArena`].
///
/// The generation guards against using a handle after its slot was recycled
/// and reused; such a handle reports `stale-context` instead of aliasing the
/// new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextRef {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ContextRef {
    /// Returns the raw arena slot index backing this handle.
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}
