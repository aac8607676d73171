use std::rc::Rc;

use crate::runtime::{
    error::Eval,
    generics::GenericArgs,
    interpreter::Interpreter,
    value::{Cell, Payload},
};
use crate::syntax::symbol::{Symbol, sym};

/// OBJECT! and FRAME! values. A copied frame keeps its phase and binding,
/// so it can be run independently of the original.
pub(super) fn act(ev: &mut Interpreter, verb: Symbol, args: &GenericArgs) -> Eval<Option<Cell>> {
    let target = args.get(0);
    let out = match (verb, target.payload()) {
        (sym::COPY, Payload::Object(ctx)) => Cell::object(ev.arena.duplicate(*ctx)?),
        (
            sym::COPY,
            Payload::Frame {
                ctx,
                phase,
                binding,
            },
        ) => Cell::frame(ev.arena.duplicate(*ctx)?, Rc::clone(phase), *binding),
        (sym::LENGTH_OF, Payload::Object(ctx) | Payload::Frame { ctx, .. }) => {
            Cell::integer(ev.arena.get(*ctx)?.len() as i64)
        }
        (sym::PICK, Payload::Object(ctx) | Payload::Frame { ctx, .. }) => {
            let varlist = ev.arena.get(*ctx)?;
            let index = match args.get(1).as_word() {
                Some(word) => varlist.find(word.canon),
                None => args
                    .get(1)
                    .as_integer()
                    .and_then(|n| usize::try_from(n).ok())
                    .filter(|n| *n >= 1 && *n <= varlist.len()),
            };
            index
                .map(|index| varlist.get(index).clone())
                .unwrap_or_else(Cell::null)
        }
        _ => return Ok(None),
    };
    Ok(Some(out))
}
