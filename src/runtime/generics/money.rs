use crate::runtime::{
    error::{Eval, RenError},
    generics::GenericArgs,
    interpreter::Interpreter,
    value::Cell,
};
use crate::syntax::symbol::{Symbol, sym};

/// Money is kept in hundredths; arithmetic is exact except division,
/// which rounds half away from zero.
pub(super) fn act(_ev: &mut Interpreter, verb: Symbol, args: &GenericArgs) -> Eval<Option<Cell>> {
    let Some(a) = args.get(0).as_money() else {
        return Ok(None);
    };
    if verb == sym::NEGATE {
        return Ok(Some(Cell::money(a.checked_neg().ok_or(RenError::Overflow)?)));
    }
    if !matches!(verb, sym::ADD | sym::SUBTRACT | sym::MULTIPLY | sym::DIVIDE) {
        return Ok(None);
    }
    let other = args.get(1);
    let result = match (verb, other.as_money(), other.as_integer()) {
        (sym::ADD, Some(b), _) => a.checked_add(b),
        (sym::ADD, None, Some(n)) => n.checked_mul(100).and_then(|b| a.checked_add(b)),
        (sym::SUBTRACT, Some(b), _) => a.checked_sub(b),
        (sym::SUBTRACT, None, Some(n)) => n.checked_mul(100).and_then(|b| a.checked_sub(b)),
        (sym::MULTIPLY, None, Some(n)) => a.checked_mul(n),
        (sym::DIVIDE, _, Some(0)) => return Err(RenError::ZeroDivide.into()),
        (sym::DIVIDE, None, Some(n)) => Some(divide_rounded(a, n)?),
        (sym::DIVIDE, Some(0), _) => return Err(RenError::ZeroDivide.into()),
        (sym::DIVIDE, Some(b), _) => {
            // money / money is a plain ratio
            return Ok(Some(Cell::decimal(a as f64 / b as f64)));
        }
        _ => {
            return Err(RenError::ExpectArg {
                action: "money math".to_string(),
                param: "value2".to_string(),
                got: other.type_name().to_string(),
            }
            .into());
        }
    };
    result
        .map(|amount| Some(Cell::money(amount)))
        .ok_or_else(|| RenError::Overflow.into())
}

fn divide_rounded(a: i64, n: i64) -> Result<i64, RenError> {
    let quotient = a.checked_div(n).ok_or(RenError::Overflow)?;
    let remainder = a.checked_rem(n).ok_or(RenError::Overflow)?;
    let (r, d) = (remainder.unsigned_abs(), n.unsigned_abs());
    if r != 0 && r >= d - r {
        let step = if (a < 0) == (n < 0) { 1 } else { -1 };
        quotient.checked_add(step).ok_or(RenError::Overflow)
    } else {
        Ok(quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::divide_rounded;

    #[test]
    fn division_rounds_half_away_from_zero() {
        assert_eq!(divide_rounded(100, 3).unwrap(), 33);
        assert_eq!(divide_rounded(200, 3).unwrap(), 67);
        assert_eq!(divide_rounded(-200, 3).unwrap(), -67);
        assert_eq!(divide_rounded(5, 2).unwrap(), 3);
    }

    #[test]
    fn division_of_the_minimum_by_minus_one_overflows() {
        assert!(divide_rounded(i64::MIN, -1).is_err());
        assert_eq!(divide_rounded(i64::MIN, 1).unwrap(), i64::MIN);
    }
}
