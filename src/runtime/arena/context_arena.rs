use std::collections::HashSet;
use std::rc::Rc;

use tracing::debug;

use crate::runtime::{
    action::Action,
    arena::{
        arena_entry::{ArenaEntry, Slot},
        context_ref::ContextRef,
    },
    binding::{Binding, Specifier},
    context::Varlist,
    error::RenError,
    value::{Cell, Payload},
};

const DEFAULT_RECYCLE_THRESHOLD: usize = 10_000;
const MIN_RECYCLE_THRESHOLD: usize = 64;

enum WorkItem {
    Cell(Cell),
    Context(ContextRef),
    Specifier(Specifier),
}

/// Generation-checked storage for every object and frame context.
///
/// Contexts are reclaimed by a stop-the-world mark-and-sweep [`Self::recycle`]
/// that the interpreter only runs between top-level evaluations.
pub struct ContextArena {
    entries: Vec<ArenaEntry>,
    free_list: Vec<u32>,
    allocation_count: usize,
    recycle_threshold: usize,
    enabled: bool,
    total_recycles: usize,
    total_allocations: usize,
}

impl Default for ContextArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextArena {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            allocation_count: 0,
            recycle_threshold: DEFAULT_RECYCLE_THRESHOLD,
            enabled: true,
            total_recycles: 0,
            total_allocations: 0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled
    }

    /// Sets the allocation count that makes [`Self::should_recycle`] true.
    ///
    /// Values below `MIN_RECYCLE_THRESHOLD` are clamped upward.
    pub fn set_threshold(&mut self, threshold: usize) {
        self.recycle_threshold = threshold.max(MIN_RECYCLE_THRESHOLD)
    }

    pub fn should_recycle(&self) -> bool {
        self.enabled && self.allocation_count >= self.recycle_threshold
    }

    /// Stores a varlist and returns a handle to it, reusing freed slots first.
    pub fn alloc(&mut self, varlist: Varlist) -> ContextRef {
        self.allocation_count += 1;
        self.total_allocations += 1;

        if let Some(index) = self.free_list.pop() {
            let entry = &mut self.entries[index as usize];
            entry.slot = Slot::Live(varlist);
            entry.marked = false;
            ContextRef {
                index,
                generation: entry.generation,
            }
        } else {
            let index = self.entries.len() as u32;
            self.entries.push(ArenaEntry {
                generation: 0,
                slot: Slot::Live(varlist),
                marked: false,
            });
            ContextRef {
                index,
                generation: 0,
            }
        }
    }

    fn entry(&self, ctx: ContextRef) -> Result<&ArenaEntry, RenError> {
        match self.entries.get(ctx.index as usize) {
            Some(entry) if entry.generation == ctx.generation => Ok(entry),
            _ => Err(RenError::StaleContext),
        }
    }

    pub fn get(&self, ctx: ContextRef) -> Result<&Varlist, RenError> {
        match &self.entry(ctx)?.slot {
            Slot::Live(varlist) => Ok(varlist),
            Slot::Inert => Err(RenError::FrameConsumed),
            Slot::Free => Err(RenError::StaleContext),
        }
    }

    pub fn get_mut(&mut self, ctx: ContextRef) -> Result<&mut Varlist, RenError> {
        self.entry(ctx)?;
        match &mut self.entries[ctx.index as usize].slot {
            Slot::Live(varlist) => Ok(varlist),
            Slot::Inert => Err(RenError::FrameConsumed),
            Slot::Free => Err(RenError::StaleContext),
        }
    }

    pub fn is_inert(&self, ctx: ContextRef) -> bool {
        matches!(self.entry(ctx).map(|e| &e.slot), Ok(Slot::Inert))
    }

    /// Moves a context's storage under a fresh handle, leaving the old one
    /// permanently inert.
    pub fn steal(&mut self, ctx: ContextRef) -> Result<ContextRef, RenError> {
        self.entry(ctx)?;
        let slot = std::mem::replace(&mut self.entries[ctx.index as usize].slot, Slot::Inert);
        match slot {
            Slot::Live(varlist) => {
                let stolen = self.alloc(varlist);
                debug!(from = ctx.index, to = stolen.index, "stole context storage");
                Ok(stolen)
            }
            Slot::Inert => Err(RenError::FrameConsumed),
            Slot::Free => {
                self.entries[ctx.index as usize].slot = Slot::Free;
                Err(RenError::StaleContext)
            }
        }
    }

    /// Duplicates a context's storage under a new handle.
    pub fn duplicate(&mut self, ctx: ContextRef) -> Result<ContextRef, RenError> {
        let copy = self.get(ctx)?.clone();
        Ok(self.alloc(copy))
    }

    pub fn live_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.slot, Slot::Live(_)))
            .count()
    }

    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    pub fn total_recycles(&self) -> usize {
        self.total_recycles
    }

    /// Frees every context not reachable from `roots`; returns how many
    /// entries were reclaimed.
    pub fn recycle(&mut self, roots: &[Cell]) -> usize {
        let mut worklist: Vec<WorkItem> = roots.iter().cloned().map(WorkItem::Cell).collect();
        let mut seen_arrays = HashSet::new();
        let mut seen_actions = HashSet::new();

        while let Some(item) = worklist.pop() {
            match item {
                WorkItem::Context(ctx) => self.mark_context(ctx, &mut worklist),
                WorkItem::Specifier(specifier) => match specifier {
                    Specifier::Specified => {}
                    Specifier::Frame(ctx) => worklist.push(WorkItem::Context(ctx)),
                    Specifier::Patch(patch) => {
                        worklist.push(WorkItem::Context(patch.overlay));
                        worklist.push(WorkItem::Specifier(patch.next.clone()));
                    }
                },
                WorkItem::Cell(cell) => match cell.payload {
                    Payload::Word(_, word) => {
                        if let Binding::Specific { ctx, .. } = word.binding {
                            worklist.push(WorkItem::Context(ctx));
                        }
                    }
                    Payload::Array(_, array) => {
                        worklist.push(WorkItem::Specifier(array.specifier.clone()));
                        if seen_arrays.insert(Rc::as_ptr(&array.data)) {
                            for element in array.data.borrow().iter() {
                                worklist.push(WorkItem::Cell(element.clone()));
                            }
                        }
                    }
                    Payload::Action {
                        action, binding, ..
                    } => {
                        if let Some(ctx) = binding {
                            worklist.push(WorkItem::Context(ctx));
                        }
                        Self::push_action(&action, &mut seen_actions, &mut worklist);
                    }
                    Payload::Frame {
                        ctx,
                        phase,
                        binding,
                    } => {
                        worklist.push(WorkItem::Context(ctx));
                        if let Some(ctx) = binding {
                            worklist.push(WorkItem::Context(ctx));
                        }
                        Self::push_action(&phase, &mut seen_actions, &mut worklist);
                    }
                    Payload::Object(ctx) => worklist.push(WorkItem::Context(ctx)),
                    _ => {}
                },
            }
        }

        let live_before = self.live_count();
        let reclaimed = self.sweep();
        self.total_recycles += 1;
        self.allocation_count = 0;
        self.adapt_threshold(reclaimed, live_before);
        debug!(reclaimed, live = self.live_count(), "recycled contexts");
        reclaimed
    }

    fn push_action(
        action: &Rc<Action>,
        seen: &mut HashSet<*const Action>,
        worklist: &mut Vec<WorkItem>,
    ) {
        if seen.insert(Rc::as_ptr(action)) {
            for cell in action.referenced_cells() {
                worklist.push(WorkItem::Cell(cell));
            }
        }
    }

    fn mark_context(&mut self, ctx: ContextRef, worklist: &mut Vec<WorkItem>) {
        let Some(entry) = self.entries.get_mut(ctx.index as usize) else {
            return;
        };
        if entry.generation != ctx.generation || entry.marked {
            return;
        }
        entry.marked = true;
        if let Slot::Live(varlist) = &entry.slot {
            for cell in &varlist.slots {
                worklist.push(WorkItem::Cell(cell.clone()));
            }
        }
    }

    fn sweep(&mut self) -> usize {
        let mut reclaimed = 0;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if matches!(entry.slot, Slot::Free) {
                continue;
            }
            if entry.marked {
                entry.marked = false;
            } else {
                entry.slot = Slot::Free;
                entry.generation = entry.generation.wrapping_add(1);
                self.free_list.push(index as u32);
                reclaimed += 1;
            }
        }
        reclaimed
    }

    fn adapt_threshold(&mut self, reclaimed: usize, total_before: usize) {
        if total_before == 0 {
            return;
        }
        let ratio = reclaimed as f64 / total_before as f64;
        if ratio < 0.25 {
            self.recycle_threshold = (self.recycle_threshold * 2).min(1_000_000);
        } else if ratio > 0.75 {
            self.recycle_threshold = (self.recycle_threshold / 2).max(MIN_RECYCLE_THRESHOLD);
        }
    }
}
