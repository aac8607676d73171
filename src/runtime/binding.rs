use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::runtime::{
    arena::{ContextArena, ContextRef},
    context::{Keylist, descends_from},
    error::RenError,
    value::Word,
};

/// Where a word looks up its value.
#[derive(Debug, Clone, Default)]
pub enum Binding {
    #[default]
    Unbound,
    /// Directly into a context slot.
    Specific { ctx: ContextRef, index: usize },
    /// Into whichever frame of the given shape the evaluation supplies.
    Relative { keylist: Rc<Keylist>, index: usize },
}

/// Resolution environment for relative words and virtual binding.
#[derive(Debug, Clone, Default)]
pub enum Specifier {
    #[default]
    Specified,
    Frame(ContextRef),
    Patch(Rc<Patch>),
}

/// One virtual-binding override: lookups try `overlay` by canon before
/// continuing with `next`.
#[derive(Debug)]
pub struct Patch {
    pub overlay: ContextRef,
    pub next: Specifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SpecifierKey {
    Specified,
    Frame(ContextRef),
    Patch(*const Patch),
}

impl Specifier {
    fn key(&self) -> SpecifierKey {
        match self {
            Specifier::Specified => SpecifierKey::Specified,
            Specifier::Frame(ctx) => SpecifierKey::Frame(*ctx),
            Specifier::Patch(patch) => SpecifierKey::Patch(Rc::as_ptr(patch)),
        }
    }

    pub fn is_specified(&self) -> bool {
        matches!(self, Specifier::Specified)
    }

    /// The frame at the end of the patch chain, if any.
    pub fn terminal_frame(&self) -> Option<ContextRef> {
        let mut current = self;
        loop {
            match current {
                Specifier::Specified => return None,
                Specifier::Frame(ctx) => return Some(*ctx),
                Specifier::Patch(patch) => current = &patch.next,
            }
        }
    }
}

/// Content-addressed store of patches.
///
/// Asking twice for the same `(overlay, next)` combination returns the same
/// `Rc<Patch>` while the first one is still alive, so chains never grow
/// duplicate links.
#[derive(Debug, Default)]
pub struct PatchCache {
    patches: HashMap<(ContextRef, SpecifierKey), Weak<Patch>>,
    created: usize,
}

impl PatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patch(&mut self, overlay: ContextRef, next: &Specifier) -> Specifier {
        let key = (overlay, next.key());
        if let Some(existing) = self.patches.get(&key).and_then(Weak::upgrade) {
            return Specifier::Patch(existing);
        }
        let patch = Rc::new(Patch {
            overlay,
            next: next.clone(),
        });
        self.patches.insert(key, Rc::downgrade(&patch));
        self.created += 1;
        if self.created % 256 == 0 {
            self.patches.retain(|_, weak| weak.strong_count() > 0);
        }
        Specifier::Patch(patch)
    }

    /// Number of patch nodes ever created (not served from cache).
    pub fn created(&self) -> usize {
        self.created
    }
}

/// Finds the context slot a word refers to under `specifier`.
///
/// Patches override any binding by canon. Relative words then need a frame
/// whose keylist is, or descends from, the keylist they were bound to.
pub fn resolve(
    arena: &ContextArena,
    word: &Word,
    specifier: &Specifier,
    name: impl FnOnce() -> String,
) -> Result<(ContextRef, usize), RenError> {
    let mut current = specifier;
    while let Specifier::Patch(patch) = current {
        if let Some(index) = arena.get(patch.overlay)?.find(word.canon) {
            return Ok((patch.overlay, index));
        }
        current = &patch.next;
    }

    match &word.binding {
        Binding::Unbound => Err(RenError::NotBound { word: name() }),
        Binding::Specific { ctx, index } => Ok((*ctx, *index)),
        Binding::Relative { keylist, index } => match current {
            Specifier::Frame(ctx) => {
                let varlist = arena.get(*ctx)?;
                if descends_from(&varlist.keylist, keylist) {
                    Ok((*ctx, *index))
                } else {
                    Err(RenError::NotBound { word: name() })
                }
            }
            _ => Err(RenError::NotBound { word: name() }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{
        context::{ContextKind, Key, Varlist},
        value::Cell,
    };
    use crate::syntax::interner::Interner;

    fn key(interner: &mut Interner, name: &str) -> Key {
        let spelling = interner.intern(name);
        Key {
            spelling,
            canon: interner.canon(spelling),
        }
    }

    fn context(arena: &mut ContextArena, keylist: &Rc<Keylist>, values: Vec<Cell>) -> ContextRef {
        arena.alloc(Varlist::new(
            ContextKind::Frame,
            Rc::clone(keylist),
            Cell::blank(),
            values,
        ))
    }

    #[test]
    fn unbound_words_fail_not_bound() {
        let mut interner = Interner::new();
        let arena = ContextArena::new();
        let x = key(&mut interner, "x");
        let word = Word::unbound(x.spelling, x.canon);
        let err = resolve(&arena, &word, &Specifier::Specified, || "x".into()).unwrap_err();
        assert_eq!(err.id(), "not-bound");
    }

    #[test]
    fn relative_words_need_a_matching_frame() {
        let mut interner = Interner::new();
        let mut arena = ContextArena::new();
        let x = key(&mut interner, "x");
        let keylist = Rc::new(Keylist::new(vec![x]));
        let other = Rc::new(Keylist::new(vec![x]));
        let frame = context(&mut arena, &keylist, vec![Cell::integer(1)]);
        let foreign = context(&mut arena, &other, vec![Cell::integer(2)]);

        let word = Word {
            spelling: x.spelling,
            canon: x.canon,
            binding: Binding::Relative {
                keylist: Rc::clone(&keylist),
                index: 1,
            },
        };
        assert_eq!(
            resolve(&arena, &word, &Specifier::Frame(frame), || "x".into()).unwrap(),
            (frame, 1)
        );
        assert!(resolve(&arena, &word, &Specifier::Frame(foreign), || "x".into()).is_err());
        assert!(resolve(&arena, &word, &Specifier::Specified, || "x".into()).is_err());
    }

    #[test]
    fn relative_words_resolve_in_frames_of_derived_shape() {
        let mut interner = Interner::new();
        let mut arena = ContextArena::new();
        let a = key(&mut interner, "a");
        let b = key(&mut interner, "b");
        let base = Rc::new(Keylist::new(vec![a]));
        let augmented = Rc::new(Keylist::derived(&base, [b]));
        let frame = context(&mut arena, &augmented, vec![Cell::integer(1), Cell::integer(2)]);

        let word = Word {
            spelling: a.spelling,
            canon: a.canon,
            binding: Binding::Relative {
                keylist: base,
                index: 1,
            },
        };
        assert_eq!(
            resolve(&arena, &word, &Specifier::Frame(frame), || "a".into()).unwrap(),
            (frame, 1)
        );
    }

    #[test]
    fn patches_override_by_canon() {
        let mut interner = Interner::new();
        let mut arena = ContextArena::new();
        let mut cache = PatchCache::new();
        let x = key(&mut interner, "x");
        let upper = key(&mut interner, "X");
        let global = context(&mut arena, &Rc::new(Keylist::new(vec![x])), vec![Cell::integer(1)]);
        let local = context(&mut arena, &Rc::new(Keylist::new(vec![x])), vec![Cell::integer(2)]);

        let word = Word {
            spelling: upper.spelling,
            canon: upper.canon,
            binding: Binding::Specific {
                ctx: global,
                index: 1,
            },
        };
        let patched = cache.patch(local, &Specifier::Specified);
        assert_eq!(resolve(&arena, &word, &patched, || "X".into()).unwrap(), (local, 1));
        assert_eq!(
            resolve(&arena, &word, &Specifier::Specified, || "X".into()).unwrap(),
            (global, 1)
        );
    }

    #[test]
    fn patch_cache_reuses_live_patches() {
        let mut interner = Interner::new();
        let mut arena = ContextArena::new();
        let mut cache = PatchCache::new();
        let x = key(&mut interner, "x");
        let keylist = Rc::new(Keylist::new(vec![x]));
        let a = context(&mut arena, &keylist, vec![Cell::integer(1)]);
        let b = context(&mut arena, &keylist, vec![Cell::integer(2)]);

        let first = cache.patch(a, &Specifier::Frame(b));
        let second = cache.patch(a, &Specifier::Frame(b));
        match (&first, &second) {
            (Specifier::Patch(p), Specifier::Patch(q)) => assert!(Rc::ptr_eq(p, q)),
            _ => panic!("expected patches"),
        }
        assert_eq!(cache.created(), 1);

        let different = cache.patch(b, &Specifier::Frame(a));
        assert!(matches!(different, Specifier::Patch(_)));
        assert_eq!(cache.created(), 2);

        drop(first);
        drop(second);
        cache.patch(a, &Specifier::Frame(b));
        assert_eq!(cache.created(), 3, "dead patches are rebuilt");
    }
}
