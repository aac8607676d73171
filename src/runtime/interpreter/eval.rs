use std::rc::Rc;

use tracing::trace;

use crate::runtime::{
    action::Action,
    arena::ContextRef,
    binding::{Binding, Specifier, resolve},
    error::{Eval, RenError, Signal},
    feed::Feed,
    frame::Completion,
    interpreter::Interpreter,
    value::{ArrayClass, ArrayRef, Cell, CellFlags, Payload, Word, WordClass},
};
use crate::syntax::symbol::{Symbol, sym};

/// How far an evaluation step may extend to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookahead {
    /// A whole expression, including any enfix operators that follow.
    Full,
    /// An argument: deferred enfix (ELSE, THEN) is left for the caller.
    Arg,
    /// The right-hand argument of an enfix operator: no enfix at all, which
    /// makes operators evaluate left to right.
    None,
}

impl Interpreter {
    /// Evaluates every expression in `array`; the result of the last one,
    /// or `~void~` when there was none.
    pub fn eval_block(&mut self, array: &ArrayRef) -> Eval<Cell> {
        let mut feed = Feed::new(array);
        Ok(self.eval_feed(&mut feed)?.unwrap_or_else(Cell::void))
    }

    /// Like [`Self::eval_block`] but reports "nothing" as `None`.
    pub(crate) fn eval_feed(&mut self, feed: &mut Feed) -> Eval<Option<Cell>> {
        let mut out = None;
        while !feed.is_end() {
            match self.eval_step(feed, Lookahead::Full)? {
                Completion::Value(value) => out = Some(value),
                Completion::Invisible => {}
                Completion::Splice(array) => feed.splice(&array),
            }
        }
        Ok(out)
    }

    /// Evaluates one expression from the feed.
    ///
    /// Never returns [`Completion::Splice`]: spliced code is pushed onto the
    /// feed and evaluation continues from it. Invisible results are skipped
    /// when gathering arguments.
    pub(crate) fn eval_step(&mut self, feed: &mut Feed, mode: Lookahead) -> Eval<Completion> {
        loop {
            let Some((cell, specifier)) = feed.next() else {
                return Ok(Completion::Invisible);
            };
            if let Some(hook) = self.hook.clone() {
                hook.on_step(self, &cell);
            }
            if self.config.trace {
                trace!(depth = self.depth, cell = %self.mold(&cell), "step");
            }
            let value = match self.eval_cell(cell, &specifier, feed, mode)? {
                Completion::Value(value) => value,
                Completion::Splice(array) => {
                    feed.splice(&array);
                    continue;
                }
                Completion::Invisible => {
                    if mode != Lookahead::Full && !feed.is_end() {
                        continue;
                    }
                    return Ok(Completion::Invisible);
                }
            };
            return self.enfix_lookahead(value, feed, mode);
        }
    }

    fn enfix_lookahead(&mut self, mut value: Cell, feed: &mut Feed, mode: Lookahead) -> Eval<Completion> {
        if mode == Lookahead::None {
            return Ok(Completion::Value(value));
        }
        loop {
            let Some((next, specifier)) = feed.peek() else {
                break;
            };
            let Some((action, binding, label)) = self.enfix_at(&next, &specifier) else {
                break;
            };
            if action.defer && mode == Lookahead::Arg {
                break;
            }
            feed.next();
            match self.call_action(action, binding, label, feed, Some(value), &[])? {
                Completion::Value(out) => value = out,
                Completion::Invisible => value = Cell::void(),
                Completion::Splice(array) => {
                    feed.splice(&array);
                    return self.eval_step(feed, mode);
                }
            }
        }
        Ok(Completion::Value(value))
    }

    /// The enfix action a plain word refers to, if it does.
    fn enfix_at(
        &self,
        cell: &Cell,
        specifier: &Specifier,
    ) -> Option<(Rc<Action>, Option<ContextRef>, Option<Symbol>)> {
        let Payload::Word(WordClass::Word, word) = cell.payload() else {
            return None;
        };
        if cell.quotes() > 0 {
            return None;
        }
        let (ctx, index) = resolve(&self.arena, word, specifier, String::new).ok()?;
        match self.arena.get(ctx).ok()?.get(index).payload() {
            Payload::Action {
                action, binding, ..
            } if action.enfix => Some((Rc::clone(action), *binding, Some(word.spelling))),
            _ => None,
        }
    }

    fn eval_cell(
        &mut self,
        cell: Cell,
        specifier: &Specifier,
        feed: &mut Feed,
        mode: Lookahead,
    ) -> Eval<Completion> {
        if cell.quotes() > 0 {
            return Ok(Completion::Value(self.specify(cell, specifier).unquoted()));
        }
        match cell.payload() {
            Payload::Word(WordClass::Word, word) => {
                let value = self.fetch(word, specifier)?;
                if let Payload::Action {
                    action, binding, ..
                } = value.payload()
                {
                    if value.quotes() == 0 {
                        if action.enfix {
                            return Err(RenError::NoLeftArg {
                                action: self.label_text(Some(word.spelling)),
                            }
                            .into());
                        }
                        let (action, binding) = (Rc::clone(action), *binding);
                        return self.call_action(action, binding, Some(word.spelling), feed, None, &[]);
                    }
                }
                Ok(Completion::Value(self.decay(word.spelling, value)?))
            }
            Payload::Word(WordClass::Set, word) => {
                let word = word.clone();
                let value = self.assigned_value(feed, mode, word.spelling)?;
                let value = labeled(value, word.spelling);
                self.assign(&word, specifier, value.clone())?;
                Ok(Completion::Value(value))
            }
            Payload::Word(WordClass::Get, word) => {
                let value = self.fetch(word, specifier)?;
                if value.as_action().is_some() {
                    return Ok(Completion::Value(value));
                }
                Ok(Completion::Value(self.decay(word.spelling, value)?))
            }
            Payload::Word(WordClass::Refinement, _) => {
                Ok(Completion::Value(cell.with_flag(CellFlags::UNEVALUATED)))
            }
            Payload::Array(ArrayClass::Block, _) => Ok(Completion::Value(
                self.specify(cell, specifier).with_flag(CellFlags::UNEVALUATED),
            )),
            Payload::Array(ArrayClass::Group, array) => {
                let array = derelativize(array, specifier);
                let mut inner = Feed::new(&array);
                Ok(match self.eval_feed(&mut inner)? {
                    Some(value) => Completion::Value(value),
                    None => Completion::Invisible,
                })
            }
            Payload::Array(ArrayClass::Path, array) => {
                let array = derelativize(array, specifier);
                self.eval_path(&array, feed)
            }
            Payload::Array(ArrayClass::SetPath, array) => {
                let array = derelativize(array, specifier);
                let value = self.assigned_value(feed, mode, sym::NONE)?;
                self.set_path(&array, value.clone())?;
                Ok(Completion::Value(value))
            }
            Payload::Array(ArrayClass::GetPath, array) => {
                let array = derelativize(array, specifier);
                Ok(Completion::Value(self.get_path(&array)?))
            }
            Payload::BadWord(label) if !cell.is_isotope() => {
                Ok(Completion::Value(Cell::isotope(*label)))
            }
            Payload::Action {
                action,
                binding,
                label,
            } => {
                let (action, binding, label) = (Rc::clone(action), *binding, *label);
                self.call_action(action, binding, label, feed, None, &[])
            }
            _ => Ok(Completion::Value(cell.with_flag(CellFlags::UNEVALUATED))),
        }
    }

    /// Right-hand side of a SET-WORD! or SET-PATH!.
    fn assigned_value(&mut self, feed: &mut Feed, mode: Lookahead, target: Symbol) -> Eval<Cell> {
        if feed.is_end() {
            return Err(self.missing_value(target));
        }
        let step_mode = if mode == Lookahead::None {
            Lookahead::None
        } else {
            Lookahead::Full
        };
        match self.eval_step(feed, step_mode)? {
            Completion::Value(value) => Ok(value),
            _ => Err(self.missing_value(target)),
        }
    }

    fn missing_value(&self, target: Symbol) -> Signal {
        RenError::NeedNonEnd {
            action: "assignment".to_string(),
            param: self.interner.resolve(target).to_string(),
        }
        .into()
    }

    /// Stored value of a variable, isotopes included.
    pub(crate) fn fetch(&self, word: &Word, specifier: &Specifier) -> Eval<Cell> {
        let (ctx, index) = resolve(&self.arena, word, specifier, || {
            self.interner.resolve(word.spelling).to_string()
        })?;
        Ok(self.arena.get(ctx)?.get(index).clone())
    }

    /// Applies the rules of an ordinary variable fetch: `~null~` decays to
    /// NULL, `~unset~` and other isotopes are errors.
    pub(crate) fn decay(&self, name: Symbol, value: Cell) -> Eval<Cell> {
        match value.isotope_label() {
            None => Ok(value),
            Some(sym::NULL) => Ok(Cell::null()),
            Some(sym::UNSET) => Err(RenError::NoValue {
                word: self.interner.resolve(name).to_string(),
            }
            .into()),
            Some(label) => Err(RenError::BadIsotope {
                word: self.interner.resolve(name).to_string(),
                label: self.interner.resolve(label).to_string(),
            }
            .into()),
        }
    }

    pub(crate) fn assign(&mut self, word: &Word, specifier: &Specifier, value: Cell) -> Eval<()> {
        let (ctx, index) = resolve(&self.arena, word, specifier, || {
            self.interner.resolve(word.spelling).to_string()
        })?;
        self.arena.get_mut(ctx)?.set(index, value);
        Ok(())
    }

    /// Makes a cell independent of `specifier`: relative words become
    /// specific, arrays pick up the specifier if they have none.
    pub(crate) fn specify(&self, mut cell: Cell, specifier: &Specifier) -> Cell {
        if specifier.is_specified() {
            return cell;
        }
        match &mut cell.payload {
            Payload::Word(_, word) => {
                if let Ok((ctx, index)) = resolve(&self.arena, word, specifier, String::new) {
                    word.binding = Binding::Specific { ctx, index };
                }
            }
            Payload::Array(_, array) => *array = derelativize(array, specifier),
            _ => {}
        }
        cell
    }

    fn bad_path(&self, class: ArrayClass, array: &ArrayRef) -> Signal {
        RenError::BadPath {
            path: self.mold(&Cell::array(class, array.clone())),
        }
        .into()
    }

    fn eval_path(&mut self, array: &ArrayRef, feed: &mut Feed) -> Eval<Completion> {
        let parts = array.to_vec();
        let Some((head, mut rest)) = parts.split_first() else {
            return Err(self.bad_path(ArrayClass::Path, array));
        };
        let Payload::Word(WordClass::Word, word) = head.payload() else {
            return Err(self.bad_path(ArrayClass::Path, array));
        };
        let mut value = self.fetch(word, &array.specifier)?;
        loop {
            if let Payload::Action {
                action, binding, ..
            } = value.payload()
            {
                let mut refinements = Vec::with_capacity(rest.len());
                for part in rest {
                    match part.as_word() {
                        Some(refinement) => refinements.push(refinement.canon),
                        None => return Err(self.bad_path(ArrayClass::Path, array)),
                    }
                }
                let (action, binding) = (Rc::clone(action), *binding);
                return self.call_action(action, binding, Some(word.spelling), feed, None, &refinements);
            }
            let Some((part, tail)) = rest.split_first() else {
                break;
            };
            value = match self.pick_field(&value, part)? {
                Some(field) => field,
                None => return Err(self.bad_path(ArrayClass::Path, array)),
            };
            rest = tail;
        }
        Ok(Completion::Value(self.decay(word.spelling, value)?))
    }

    pub(crate) fn get_path(&self, array: &ArrayRef) -> Eval<Cell> {
        let parts = array.to_vec();
        let Some((head, rest)) = parts.split_first() else {
            return Err(self.bad_path(ArrayClass::GetPath, array));
        };
        let Some(word) = head.as_word() else {
            return Err(self.bad_path(ArrayClass::GetPath, array));
        };
        let mut value = self.fetch(word, &array.specifier)?;
        for part in rest {
            value = match self.pick_field(&value, part)? {
                Some(field) => field,
                None => return Err(self.bad_path(ArrayClass::GetPath, array)),
            };
        }
        Ok(value)
    }

    pub(crate) fn set_path(&mut self, array: &ArrayRef, new_value: Cell) -> Eval<()> {
        let parts = array.to_vec();
        let (Some(word), true) = (parts.first().and_then(Cell::as_word), parts.len() >= 2) else {
            return Err(self.bad_path(ArrayClass::SetPath, array));
        };
        let mut container = self.fetch(word, &array.specifier)?;
        for part in &parts[1..parts.len() - 1] {
            container = match self.pick_field(&container, part)? {
                Some(field) => field,
                None => return Err(self.bad_path(ArrayClass::SetPath, array)),
            };
        }
        let last = &parts[parts.len() - 1];

        if let Some(ctx) = container.as_context() {
            let slot = match last.as_word() {
                Some(field) => self.arena.get(ctx)?.find(field.canon),
                None => None,
            };
            let Some(index) = slot else {
                return Err(self.bad_path(ArrayClass::SetPath, array));
            };
            self.arena.get_mut(ctx)?.set(index, new_value);
            return Ok(());
        }
        if let (Some(series), Some(n)) = (container.as_array(), last.as_integer()) {
            if container.has_flag(CellFlags::CONST) {
                return Err(RenError::ConstSeries.into());
            }
            if new_value.is_isotope() {
                return Err(RenError::IsotopeInArray.into());
            }
            let Some(position) = usize::try_from(n).ok().filter(|n| *n >= 1 && *n <= series.len())
            else {
                return Err(self.bad_path(ArrayClass::SetPath, array));
            };
            series.data.borrow_mut()[series.index + position - 1] = new_value;
            return Ok(());
        }
        Err(self.bad_path(ArrayClass::SetPath, array))
    }

    /// One step of path navigation: a field of a context or a 1-based
    /// element of an array (NULL past the tail). `None` if the container
    /// cannot be navigated with `part`.
    fn pick_field(&self, container: &Cell, part: &Cell) -> Eval<Option<Cell>> {
        if let Some(ctx) = container.as_context() {
            let varlist = self.arena.get(ctx)?;
            return Ok(part
                .as_word()
                .and_then(|word| varlist.find(word.canon))
                .map(|index| varlist.get(index).clone()));
        }
        if let (Some(series), Some(n)) = (container.as_array(), part.as_integer()) {
            let picked = usize::try_from(n)
                .ok()
                .filter(|n| *n >= 1)
                .and_then(|n| series.get(n - 1));
            return Ok(Some(picked.unwrap_or_else(Cell::null)));
        }
        Ok(None)
    }
}

/// Gives an array the specifier of the code it was found in, unless it
/// already carries its own.
pub(crate) fn derelativize(array: &ArrayRef, specifier: &Specifier) -> ArrayRef {
    if array.specifier.is_specified() && !specifier.is_specified() {
        array.with_specifier(specifier.clone())
    } else {
        array.clone()
    }
}

/// Action values assigned to a word take that word as their label.
fn labeled(value: Cell, spelling: Symbol) -> Cell {
    match value.payload() {
        Payload::Action {
            action,
            binding,
            label: None,
        } if value.quotes() == 0 => Cell::action_bound(Rc::clone(action), *binding, Some(spelling)),
        _ => value,
    }
}
