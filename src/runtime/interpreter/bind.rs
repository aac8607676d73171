//! Binding of freshly loaded code to the user and lib contexts.

use crate::runtime::{
    arena::{ContextArena, ContextRef},
    binding::Binding,
    context::Key,
    error::RenError,
    value::{ArrayClass, Cell, Payload, WordClass},
};

/// Binds loaded cells in place.
///
/// Every set-word (at any depth) gets a key in `target`. Other words bind
/// to `target` when it has their key, else to `fallback`, else to a new
/// unset key in `target`. Only the head of a path is bound.
pub(crate) fn bind_deep(
    arena: &mut ContextArena,
    cells: &mut [Cell],
    target: ContextRef,
    fallback: Option<ContextRef>,
) -> Result<(), RenError> {
    collect_set_words(arena, cells, target)?;
    bind_cells(arena, cells, target, fallback)
}

fn collect_set_words(arena: &mut ContextArena, cells: &[Cell], target: ContextRef) -> Result<(), RenError> {
    for cell in cells {
        match cell.payload() {
            Payload::Word(WordClass::Set, word) => {
                let varlist = arena.get_mut(target)?;
                if varlist.find(word.canon).is_none() {
                    varlist.add_key(
                        Key {
                            spelling: word.spelling,
                            canon: word.canon,
                        },
                        Cell::unset(),
                    );
                }
            }
            Payload::Array(ArrayClass::Block | ArrayClass::Group, array) => {
                collect_set_words(arena, &array.to_vec(), target)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn bind_cells(
    arena: &mut ContextArena,
    cells: &mut [Cell],
    target: ContextRef,
    fallback: Option<ContextRef>,
) -> Result<(), RenError> {
    for cell in cells.iter_mut() {
        match &mut cell.payload {
            Payload::Word(WordClass::Refinement, _) => {}
            Payload::Word(_, word) => {
                if !matches!(word.binding, Binding::Unbound) {
                    continue;
                }
                let found = match arena.get(target)?.find(word.canon) {
                    Some(index) => Some((target, index)),
                    None => match fallback {
                        Some(lib) => arena.get(lib)?.find(word.canon).map(|index| (lib, index)),
                        None => None,
                    },
                };
                let (ctx, index) = match found {
                    Some(found) => found,
                    None => {
                        let index = arena.get_mut(target)?.add_key(
                            Key {
                                spelling: word.spelling,
                                canon: word.canon,
                            },
                            Cell::unset(),
                        );
                        (target, index)
                    }
                };
                word.binding = Binding::Specific { ctx, index };
            }
            Payload::Array(class, array) => {
                let mut data = array.data.borrow_mut();
                let start = array.index.min(data.len());
                match class {
                    ArrayClass::Path | ArrayClass::SetPath | ArrayClass::GetPath => {
                        if let Some(head) = data.get_mut(start) {
                            bind_cells(arena, std::slice::from_mut(head), target, fallback)?;
                        }
                    }
                    ArrayClass::Block | ArrayClass::Group => {
                        bind_cells(arena, &mut data[start..], target, fallback)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
