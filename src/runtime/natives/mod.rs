//! The natives and generic verbs installed into the lib context at boot.

use std::rc::Rc;

use tracing::debug;

use crate::runtime::{
    action::{Action, Dispatcher, NativeFn},
    arena::{ContextArena, ContextRef},
    context::Key,
    error::RenError,
    kind::{ALL_KINDS, Kind, TypeSet},
    paramlist::{ReturnMode, make_paramlist},
    value::Cell,
};
use crate::syntax::{interner::Interner, loader::load};

mod compare_ops;
mod context_ops;
mod control_ops;
mod debug_ops;
mod function_ops;
mod helpers;

#[cfg(test)]
mod context_ops_test;
#[cfg(test)]
mod helpers_test;

use compare_ops::{
    native_equal_q, native_greater_or_equal_q, native_greater_q, native_lesser_or_equal_q,
    native_lesser_q, native_not_equal_q, native_strict_equal_q,
};
use context_ops::{
    native_action_q, native_const, native_get, native_make, native_mutable, native_null_q,
    native_set, native_type_of,
};
use control_ops::{
    native_all, native_any, native_catch, native_comment, native_do, native_either, native_elide,
    native_else, native_fail, native_if, native_meta, native_not, native_quit, native_quote,
    native_reduce, native_repeat, native_return, native_the, native_then, native_throw,
    native_trap, native_unmeta, native_while,
};
use debug_ops::{
    native_breakpoint, native_form, native_mold, native_print, native_probe, native_resume,
};
use function_ops::{
    native_adapt, native_augment, native_chain, native_does, native_enclose, native_enfix,
    native_func, native_generic, native_lambda, native_macro, native_n_shot, native_reorder,
    native_specialize,
};

/// A native's name, spec source and implementation.
pub(crate) struct NativeSpec {
    pub name: &'static str,
    pub spec: &'static str,
    pub func: NativeFn,
    pub enfix: bool,
    pub defer: bool,
}

const fn native(name: &'static str, spec: &'static str, func: NativeFn) -> NativeSpec {
    NativeSpec {
        name,
        spec,
        func,
        enfix: false,
        defer: false,
    }
}

const fn deferred_enfix(name: &'static str, spec: &'static str, func: NativeFn) -> NativeSpec {
    NativeSpec {
        name,
        spec,
        func,
        enfix: true,
        defer: true,
    }
}

/// All natives, in installation order.
pub(crate) static NATIVES: &[NativeSpec] = &[
    // control
    native("if", "condition [<opt> any-value!] branch [block! action!]", native_if),
    native(
        "either",
        "condition [<opt> any-value!] true-branch [block! action!] false-branch [block! action!]",
        native_either,
    ),
    deferred_enfix(
        "else",
        "optional [<opt> <isotope> any-value!] branch [block! action!]",
        native_else,
    ),
    deferred_enfix(
        "then",
        "optional [<opt> <isotope> any-value!] branch [block! action!]",
        native_then,
    ),
    native("not", "value [<opt> any-value!]", native_not),
    native("all", "block [block!]", native_all),
    native("any", "block [block!]", native_any),
    native("while", "condition [block!] body [block!]", native_while),
    native("repeat", "count [integer!] body [block!]", native_repeat),
    native("do", "source [<opt> block! frame! action! text!]", native_do),
    native("reduce", "block [block!]", native_reduce),
    native("comment", "'discarded [any-value!]", native_comment),
    native("elide", "discarded [<opt> <isotope> any-value!]", native_elide),
    native("quote", "value [<opt> any-value!]", native_quote),
    native("the", "'value [any-value!]", native_the),
    native("meta", "value [<opt> <isotope> any-value!]", native_meta),
    native("unmeta", "value [<opt> any-value!]", native_unmeta),
    // throws and errors
    native(
        "throw",
        "value [<opt> <isotope> any-value!] /name [any-value!]",
        native_throw,
    ),
    native("catch", "block [block!] /name [any-value!]", native_catch),
    native("fail", "reason [text! error!]", native_fail),
    native("trap", "block [block!]", native_trap),
    native("quit", "/with [<opt> any-value!]", native_quit),
    native("return", "value [<opt> <end> <isotope> any-value!]", native_return),
    // data and contexts
    native("get", "source [word! get-word! path! get-path!] /any", native_get),
    native(
        "set",
        "target [word! set-word! path! set-path!] value [<opt> <isotope> any-value!]",
        native_set,
    ),
    native(
        "make",
        "type [datatype! object!] def [<opt> any-value!]",
        native_make,
    ),
    native("type-of", "value [<opt> any-value!]", native_type_of),
    native("null?", "value [<opt> any-value!]", native_null_q),
    native("action?", "value [<opt> any-value!]", native_action_q),
    native("const", "value [<opt> any-value!]", native_const),
    native("mutable", "value [<opt> any-value!]", native_mutable),
    // output
    native("print", "value [<opt> any-value!]", native_print),
    native("probe", "value [<opt> <isotope> any-value!]", native_probe),
    native("mold", "value [<opt> <isotope> any-value!]", native_mold),
    native("form", "value [<opt> any-value!]", native_form),
    // comparison
    native("equal?", "value1 [<opt> any-value!] value2 [<opt> any-value!]", native_equal_q),
    native(
        "strict-equal?",
        "value1 [<opt> any-value!] value2 [<opt> any-value!]",
        native_strict_equal_q,
    ),
    native(
        "not-equal?",
        "value1 [<opt> any-value!] value2 [<opt> any-value!]",
        native_not_equal_q,
    ),
    native("lesser?", "value1 [any-value!] value2 [any-value!]", native_lesser_q),
    native("greater?", "value1 [any-value!] value2 [any-value!]", native_greater_q),
    native(
        "lesser-or-equal?",
        "value1 [any-value!] value2 [any-value!]",
        native_lesser_or_equal_q,
    ),
    native(
        "greater-or-equal?",
        "value1 [any-value!] value2 [any-value!]",
        native_greater_or_equal_q,
    ),
    // generators and combinators
    native("func", "spec [block!] body [block!]", native_func),
    native("lambda", "spec [block!] body [block!]", native_lambda),
    native("does", "body [block!]", native_does),
    native("macro", "spec [block!] body [block!]", native_macro),
    native("adapt", "adaptee [action!] prelude [block!]", native_adapt),
    native("chain", "pipeline [block!]", native_chain),
    native("enclose", "inner [action!] outer [action!]", native_enclose),
    native("augment", "base [action!] spec [block!]", native_augment),
    native("reorder", "original [action!] ordering [block!]", native_reorder),
    native("specialize", "base [action!] def [block!]", native_specialize),
    native("n-shot", "n [integer!]", native_n_shot),
    native("generic", "verb [word!] spec [block!]", native_generic),
    native("enfix", "action [action!] /defer", native_enfix),
    // debugging
    native("breakpoint", "", native_breakpoint),
    native(
        "resume",
        "/with [<opt> <isotope> any-value!] /do [block!]",
        native_resume,
    ),
];

/// Generic verbs and their interfaces. Behavior comes from the type class
/// of the first argument.
pub(crate) static GENERICS: &[(&str, &str)] = &[
    ("add", "value1 [any-scalar!] value2 [any-scalar!]"),
    ("subtract", "value1 [any-scalar!] value2 [any-scalar!]"),
    ("multiply", "value1 [any-scalar!] value2 [any-scalar!]"),
    ("divide", "value1 [any-scalar!] value2 [any-scalar!]"),
    ("negate", "number [any-scalar!]"),
    (
        "append",
        "series [any-series! port!] value [<opt> <isotope> any-value!] /only",
    ),
    ("length-of", "series [any-series! any-context!]"),
    ("pick", "series [any-series! any-context!] index [integer! word!]"),
    ("copy", "value [any-series! any-context!] /deep"),
    ("sort", "series [any-array!] /reverse"),
    ("open", "port [port!]"),
    ("read", "port [port!]"),
    ("write", "port [port!] data [<opt> any-value!]"),
    ("close", "port [port!]"),
];

/// Definitions run in lib once the natives exist.
pub(crate) const BOOT_SCRIPT: &str = "
    +: enfix :add
    -: enfix :subtract
    *: enfix :multiply
    /: enfix :divide
    =: enfix :equal?
    ==: enfix :strict-equal?
    <>: enfix :not-equal?
    <: enfix :lesser?
    >: enfix :greater?
    <=: enfix :lesser-or-equal?
    >=: enfix :greater-or-equal?
    function: :func
";

fn define(
    interner: &mut Interner,
    arena: &mut ContextArena,
    lib: ContextRef,
    name: &str,
    value: Cell,
) -> Result<(), RenError> {
    let spelling = interner.intern(name);
    let canon = interner.canon(spelling);
    let varlist = arena.get_mut(lib)?;
    match varlist.find(canon) {
        Some(index) => varlist.set(index, value),
        None => {
            varlist.add_key(Key { spelling, canon }, value);
        }
    }
    Ok(())
}

fn build(interner: &mut Interner, spec: &str, dispatcher: Dispatcher) -> Result<Action, RenError> {
    let cells = load(spec, interner)?;
    let paramlist = make_paramlist(&cells, interner, ReturnMode::None)?;
    Ok(Action::new(Rc::new(paramlist), dispatcher))
}

/// Installs natives, generics, datatype words and the basic constants into
/// `lib`. Returns every native by name.
pub(crate) fn install(
    interner: &mut Interner,
    arena: &mut ContextArena,
    lib: ContextRef,
) -> Result<Vec<(&'static str, Rc<Action>)>, RenError> {
    let mut installed = Vec::with_capacity(NATIVES.len());
    for entry in NATIVES {
        let mut action = build(interner, entry.spec, Dispatcher::Native(entry.func))?;
        action.enfix = entry.enfix;
        action.defer = entry.defer;
        let action = Rc::new(action);
        let label = interner.intern(entry.name);
        define(
            interner,
            arena,
            lib,
            entry.name,
            Cell::action_bound(Rc::clone(&action), None, Some(label)),
        )?;
        installed.push((entry.name, action));
    }

    for (verb, spec) in GENERICS {
        let symbol = interner.intern(verb);
        let canon = interner.canon(symbol);
        let action = Rc::new(build(interner, spec, Dispatcher::Generic { verb: canon })?);
        define(
            interner,
            arena,
            lib,
            verb,
            Cell::action_bound(action, None, Some(symbol)),
        )?;
    }

    for kind in ALL_KINDS.iter().copied().filter(|kind| *kind != Kind::Null) {
        define(interner, arena, lib, kind.name(), Cell::datatype(kind))?;
    }
    for name in TypeSet::NAMED {
        if let Some(set) = TypeSet::from_name(name) {
            define(interner, arena, lib, name, Cell::typeset(set))?;
        }
    }
    define(interner, arena, lib, "true", Cell::logic(true))?;
    define(interner, arena, lib, "false", Cell::logic(false))?;
    define(interner, arena, lib, "blank", Cell::blank())?;
    define(interner, arena, lib, "null", Cell::null())?;

    debug!(
        natives = NATIVES.len(),
        generics = GENERICS.len(),
        "installed lib"
    );
    Ok(installed)
}
