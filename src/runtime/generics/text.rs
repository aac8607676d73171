use crate::runtime::{
    error::{Eval, RenError},
    generics::GenericArgs,
    interpreter::Interpreter,
    value::{Cell, CellFlags, Payload},
};
use crate::syntax::symbol::{Symbol, sym};

pub(super) fn act(ev: &mut Interpreter, verb: Symbol, args: &GenericArgs) -> Eval<Option<Cell>> {
    let target = args.get(0);
    let (content, is_tag) = match target.payload() {
        Payload::Text(text) => (text.borrow().clone(), false),
        Payload::Tag(tag) => (tag.to_string(), true),
        _ => return Ok(None),
    };
    let out = match verb {
        sym::LENGTH_OF => Cell::integer(content.chars().count() as i64),
        sym::PICK => {
            let Some(n) = args.get(1).as_integer() else {
                return Err(RenError::InvalidArg(format!(
                    "cannot pick from text with {}",
                    args.get(1).type_name()
                ))
                .into());
            };
            usize::try_from(n)
                .ok()
                .filter(|n| *n >= 1)
                .and_then(|n| content.chars().nth(n - 1))
                .map(|ch| Cell::text(ch.to_string()))
                .unwrap_or_else(Cell::null)
        }
        sym::COPY if is_tag => Cell::tag(&content),
        sym::COPY => Cell::text(content),
        sym::APPEND if !is_tag => {
            if target.has_flag(CellFlags::CONST) {
                return Err(RenError::ConstSeries.into());
            }
            let value = args.get(1);
            if value.is_isotope() && !value.is_nullish() {
                return Err(RenError::IsotopeInArray.into());
            }
            if !value.is_nullish() {
                let addition = ev.form(value);
                if let Payload::Text(text) = target.payload() {
                    text.borrow_mut().push_str(&addition);
                }
            }
            target.clone()
        }
        _ => return Ok(None),
    };
    Ok(Some(out))
}
