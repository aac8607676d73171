use crate::runtime::{
    compare::compare,
    error::{Eval, RenError},
    generics::GenericArgs,
    interpreter::Interpreter,
    value::{ArrayRef, Cell, CellFlags, Payload},
};
use crate::syntax::symbol::{Symbol, sym};

pub(super) fn act(ev: &mut Interpreter, verb: Symbol, args: &GenericArgs) -> Eval<Option<Cell>> {
    let target = args.get(0);
    let Payload::Array(class, series) = target.payload() else {
        return Ok(None);
    };
    let out = match verb {
        sym::LENGTH_OF => Cell::integer(series.len() as i64),
        sym::PICK => pick(ev, series, args.get(1))?,
        sym::COPY => Cell::array(*class, copy_array(ev, series, args.used(1))),
        sym::APPEND => {
            append(ev, target, series, args.get(1), args.used(2))?;
            target.clone()
        }
        sym::SORT => {
            if target.has_flag(CellFlags::CONST) {
                return Err(RenError::ConstSeries.into());
            }
            let reverse = args.used(1);
            let mut data = series.data.borrow_mut();
            let tail = &mut data[series.index..];
            tail.sort_by(|a, b| compare(a, b, false));
            if reverse {
                tail.reverse();
            }
            drop(data);
            target.clone()
        }
        _ => return Ok(None),
    };
    Ok(Some(out))
}

fn pick(ev: &Interpreter, series: &ArrayRef, index: &Cell) -> Eval<Cell> {
    let Some(n) = index.as_integer() else {
        return Err(RenError::InvalidArg(format!(
            "cannot pick from a block with {}",
            index.type_name()
        ))
        .into());
    };
    let picked = usize::try_from(n)
        .ok()
        .filter(|n| *n >= 1)
        .and_then(|n| series.get(n - 1));
    Ok(match picked {
        Some(cell) => ev.specify(cell, &series.specifier),
        None => Cell::null(),
    })
}

/// Copies from the series position to its tail. Elements are made
/// specific so the copy no longer depends on the original's specifier.
fn copy_array(ev: &Interpreter, series: &ArrayRef, deep: bool) -> ArrayRef {
    let cells = series
        .to_vec()
        .into_iter()
        .map(|cell| {
            let mut cell = ev.specify(cell, &series.specifier);
            if deep {
                if let Payload::Array(_, inner) = &mut cell.payload {
                    *inner = copy_array(ev, inner, true);
                }
                cell.clear_flag(CellFlags::CONST);
            }
            cell
        })
        .collect();
    ArrayRef::new(cells)
}

fn append(ev: &Interpreter, target: &Cell, series: &ArrayRef, value: &Cell, only: bool) -> Eval<()> {
    if target.has_flag(CellFlags::CONST) {
        return Err(RenError::ConstSeries.into());
    }
    if value.is_nullish() {
        return Ok(());
    }
    if value.is_isotope() {
        return Err(RenError::IsotopeInArray.into());
    }
    let additions: Vec<Cell> = match value.as_block() {
        Some(block) if !only => block
            .to_vec()
            .into_iter()
            .map(|cell| ev.specify(cell, &block.specifier))
            .collect(),
        _ => vec![value.clone()],
    };
    // collected before borrowing, so appending a block to itself is fine
    series.data.borrow_mut().extend(additions);
    Ok(())
}
