//! Turns spec blocks like `[a [integer!] 'b /only <local> tmp]` into
//! [`Paramlist`]s. Shared by natives, FUNC, LAMBDA, MACRO, AUGMENT and
//! GENERIC.

use std::rc::Rc;

use crate::runtime::{
    action::{Param, ParamClass, Paramlist},
    context::{Key, Keylist},
    error::RenError,
    kind::{Kind, TypeSet},
    value::{Cell, Payload, WordClass},
};
use crate::syntax::interner::Interner;
use crate::syntax::symbol::sym;

/// Whether the builder appends a definitional RETURN slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnMode {
    None,
    Definitional,
}

/// Parses a spec into parameters, without a keylist.
pub fn parse_params(
    spec: &[Cell],
    interner: &Interner,
    mode: ReturnMode,
) -> Result<Vec<Param>, RenError> {
    let mut params: Vec<Param> = Vec::new();
    let mut locals = false;
    let mut typed_last = false;

    for cell in spec {
        match (&cell.payload, cell.quotes) {
            // doc strings
            (Payload::Text(_), 0) => {}
            (Payload::Tag(tag), 0) => match tag.as_ref() {
                "local" => locals = true,
                other => {
                    return Err(RenError::BadParameter(format!(
                        "unknown spec tag <{other}>"
                    )));
                }
            },
            (Payload::Array(_, types), 0) if cell.as_block().is_some() => {
                let Some(last) = params.last_mut() else {
                    return Err(RenError::BadParameter(
                        "type block with no parameter".to_string(),
                    ));
                };
                if typed_last || matches!(last.class, ParamClass::Local | ParamClass::Return) {
                    return Err(RenError::BadParameter(format!(
                        "unexpected type block after {}",
                        interner.resolve(last.spelling)
                    )));
                }
                apply_types(last, &types.to_vec(), interner)?;
                if last.class == ParamClass::Flag {
                    last.class = ParamClass::Refinement;
                }
                typed_last = true;
            }
            (Payload::Word(class, word), quotes) => {
                let name = interner.resolve(word.spelling);
                let param_class = match (class, quotes) {
                    (WordClass::Word, 0) if locals => ParamClass::Local,
                    (WordClass::Word, 0) => ParamClass::Normal,
                    (WordClass::Word, 1) if !locals => ParamClass::Quoted,
                    (WordClass::Refinement, 0) => {
                        locals = false;
                        ParamClass::Flag
                    }
                    (WordClass::Set, 0) if word.canon == sym::RETURN => {
                        // `return: [types]` documents the result; nothing to store.
                        typed_last = true;
                        continue;
                    }
                    _ => {
                        return Err(RenError::BadParameter(format!(
                            "unsupported spec item {name}"
                        )));
                    }
                };
                if params.iter().any(|p| p.canon == word.canon) {
                    return Err(RenError::BadParameter(format!("duplicate parameter {name}")));
                }
                if mode == ReturnMode::Definitional && word.canon == sym::RETURN {
                    return Err(RenError::BadParameter(
                        "RETURN is reserved for the definitional return".to_string(),
                    ));
                }
                params.push(default_param(word.spelling, word.canon, param_class));
                typed_last = false;
            }
            _ => {
                return Err(RenError::BadParameter(format!(
                    "unsupported spec item of type {}",
                    cell.kind()
                )));
            }
        }
    }

    if mode == ReturnMode::Definitional {
        params.push(default_param(sym::RETURN, sym::RETURN, ParamClass::Return));
    }
    Ok(params)
}

/// Parses a spec into a complete paramlist with a fresh keylist.
pub fn make_paramlist(
    spec: &[Cell],
    interner: &Interner,
    mode: ReturnMode,
) -> Result<Paramlist, RenError> {
    let params = parse_params(spec, interner, mode)?;
    Ok(paramlist_from(params))
}

pub fn paramlist_from(params: Vec<Param>) -> Paramlist {
    let keys = params
        .iter()
        .map(|param| Key {
            spelling: param.spelling,
            canon: param.canon,
        })
        .collect();
    Paramlist {
        keylist: Rc::new(Keylist::new(keys)),
        params,
    }
}

fn default_param(
    spelling: crate::syntax::symbol::Symbol,
    canon: crate::syntax::symbol::Symbol,
    class: ParamClass,
) -> Param {
    let types = match class {
        ParamClass::Flag => TypeSet::of(&[Kind::Logic]),
        _ => TypeSet::any_value(),
    };
    Param {
        spelling,
        canon,
        class,
        types,
        optional: matches!(class, ParamClass::Normal | ParamClass::Quoted),
        endable: false,
        isotopes: false,
    }
}

fn apply_types(param: &mut Param, types: &[Cell], interner: &Interner) -> Result<(), RenError> {
    param.types = TypeSet::EMPTY;
    param.optional = false;
    for cell in types {
        match &cell.payload {
            Payload::Tag(tag) => match tag.as_ref() {
                "opt" => param.optional = true,
                "end" => param.endable = true,
                "isotope" => param.isotopes = true,
                other => {
                    return Err(RenError::BadParameter(format!(
                        "unknown type tag <{other}>"
                    )));
                }
            },
            Payload::Word(WordClass::Word, word) => {
                let name = interner.resolve(word.spelling);
                if let Some(kind) = Kind::from_name(name) {
                    param.types = param.types.with(kind);
                } else if let Some(set) = TypeSet::from_name(name) {
                    param.types = param.types.union(set);
                } else {
                    return Err(RenError::BadParameter(format!("unknown type {name}")));
                }
            }
            _ => {
                return Err(RenError::BadParameter(format!(
                    "unsupported type spec item of type {}",
                    cell.kind()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::loader::load;

    fn params(source: &str, mode: ReturnMode) -> Result<Vec<Param>, RenError> {
        let mut interner = Interner::new();
        let cells = load(source, &mut interner).unwrap();
        parse_params(&cells, &interner, mode)
    }

    #[test]
    fn classifies_parameters() {
        let list = params(
            "a [integer!] 'b /only /part [integer!] <local> tmp",
            ReturnMode::Definitional,
        )
        .unwrap();
        let classes: Vec<ParamClass> = list.iter().map(|p| p.class).collect();
        assert_eq!(
            classes,
            vec![
                ParamClass::Normal,
                ParamClass::Quoted,
                ParamClass::Flag,
                ParamClass::Refinement,
                ParamClass::Local,
                ParamClass::Return,
            ]
        );
        assert!(list[0].accepts(&Cell::integer(1)));
        assert!(!list[0].accepts(&Cell::text("no")));
        assert!(!list[0].accepts(&Cell::null()));
    }

    #[test]
    fn untyped_parameters_accept_null_but_not_isotopes() {
        let list = params("x", ReturnMode::None).unwrap();
        assert!(list[0].accepts(&Cell::null()));
        assert!(list[0].accepts(&Cell::text("t")));
        assert!(!list[0].accepts(&Cell::void()));
    }

    #[test]
    fn type_tags_set_flags() {
        let list = params("x [<opt> <end> <isotope> integer!]", ReturnMode::None).unwrap();
        let x = &list[0];
        assert!(x.optional && x.endable && x.isotopes);
        assert!(x.accepts(&Cell::void()));
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = params("a b A", ReturnMode::None).unwrap_err();
        assert_eq!(err.id(), "bad-parameter");
    }

    #[test]
    fn return_is_reserved_for_definitional_return() {
        assert!(params("return", ReturnMode::Definitional).is_err());
        assert!(params("return", ReturnMode::None).is_ok());
        assert!(params("return: [integer!] x", ReturnMode::Definitional).is_ok());
    }

    #[test]
    fn unknown_types_fail() {
        assert!(params("x [nonsense!]", ReturnMode::None).is_err());
        assert!(params("[integer!]", ReturnMode::None).is_err());
    }
}
