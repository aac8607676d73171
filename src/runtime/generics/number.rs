use crate::runtime::{
    error::{Eval, RenError},
    generics::GenericArgs,
    interpreter::Interpreter,
    value::{Cell, Payload},
};
use crate::syntax::symbol::{Symbol, sym};

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Dec(f64),
}

fn num(cell: &Cell) -> Option<Num> {
    if cell.quotes() > 0 {
        return None;
    }
    match cell.payload() {
        Payload::Integer(value) => Some(Num::Int(*value)),
        Payload::Decimal(value) => Some(Num::Dec(*value)),
        _ => None,
    }
}

fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(value) => value as f64,
        Num::Dec(value) => value,
    }
}

pub(super) fn act(_ev: &mut Interpreter, verb: Symbol, args: &GenericArgs) -> Eval<Option<Cell>> {
    let Some(a) = num(args.get(0)) else {
        return Ok(None);
    };
    if verb == sym::NEGATE {
        return Ok(Some(match a {
            Num::Int(value) => Cell::integer(value.checked_neg().ok_or(RenError::Overflow)?),
            Num::Dec(value) => Cell::decimal(-value),
        }));
    }
    if !matches!(verb, sym::ADD | sym::SUBTRACT | sym::MULTIPLY | sym::DIVIDE) {
        return Ok(None);
    }
    let other = args.get(1);
    let Some(b) = num(other) else {
        return Err(RenError::ExpectArg {
            action: "math".to_string(),
            param: "value2".to_string(),
            got: other.type_name().to_string(),
        }
        .into());
    };
    Ok(Some(arithmetic(verb, a, b)?))
}

fn arithmetic(verb: Symbol, a: Num, b: Num) -> Result<Cell, RenError> {
    if let (Num::Int(x), Num::Int(y)) = (a, b) {
        let result = match verb {
            sym::ADD => x.checked_add(y),
            sym::SUBTRACT => x.checked_sub(y),
            sym::MULTIPLY => x.checked_mul(y),
            _ => {
                if y == 0 {
                    return Err(RenError::ZeroDivide);
                }
                let remainder = x.checked_rem(y).ok_or(RenError::Overflow)?;
                if remainder != 0 {
                    return Ok(Cell::decimal(x as f64 / y as f64));
                }
                x.checked_div(y)
            }
        };
        return result.map(Cell::integer).ok_or(RenError::Overflow);
    }
    let (x, y) = (as_f64(a), as_f64(b));
    let result = match verb {
        sym::ADD => x + y,
        sym::SUBTRACT => x - y,
        sym::MULTIPLY => x * y,
        _ => {
            if y == 0.0 {
                return Err(RenError::ZeroDivide);
            }
            x / y
        }
    };
    if result.is_finite() {
        Ok(Cell::decimal(result))
    } else {
        Err(RenError::Overflow)
    }
}
