use crate::runtime::{
    error::{Eval, RenError},
    generics::GenericArgs,
    interpreter::Interpreter,
    value::Cell,
};
use crate::syntax::symbol::{Symbol, sym};

pub(super) fn act(_ev: &mut Interpreter, verb: Symbol, args: &GenericArgs) -> Eval<Option<Cell>> {
    let Some((x, y)) = args.get(0).as_pair() else {
        return Ok(None);
    };
    if verb == sym::NEGATE {
        return Ok(Some(Cell::pair(
            x.checked_neg().ok_or(RenError::Overflow)?,
            y.checked_neg().ok_or(RenError::Overflow)?,
        )));
    }
    if !matches!(verb, sym::ADD | sym::SUBTRACT | sym::MULTIPLY | sym::DIVIDE) {
        return Ok(None);
    }
    let other = args.get(1);
    let (bx, by) = match (other.as_pair(), other.as_integer()) {
        (Some(pair), _) => pair,
        (None, Some(n)) => (n, n),
        _ => {
            return Err(RenError::ExpectArg {
                action: "pair math".to_string(),
                param: "value2".to_string(),
                got: other.type_name().to_string(),
            }
            .into());
        }
    };
    let op = |a: i64, b: i64| -> Result<i64, RenError> {
        match verb {
            sym::ADD => a.checked_add(b).ok_or(RenError::Overflow),
            sym::SUBTRACT => a.checked_sub(b).ok_or(RenError::Overflow),
            sym::MULTIPLY => a.checked_mul(b).ok_or(RenError::Overflow),
            _ if b == 0 => Err(RenError::ZeroDivide),
            _ => a.checked_div(b).ok_or(RenError::Overflow),
        }
    };
    Ok(Some(Cell::pair(op(x, bx)?, op(y, by)?)))
}
