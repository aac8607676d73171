use std::rc::Rc;

use tracing::debug;

use crate::runtime::{
    action::{Action, Dispatcher, Param, ParamClass},
    arena::ContextRef,
    combinators,
    context::{ContextKind, Varlist},
    error::{Eval, RenError, Signal},
    feed::Feed,
    frame::{Bounce, Completion, Frame, FrameState},
    generics,
    interpreter::{Interpreter, Lookahead},
    value::Cell,
};
use crate::syntax::symbol::Symbol;

impl Interpreter {
    /// Invokes `action` with arguments gathered from `feed`.
    ///
    /// `left` is the already-evaluated left argument of an enfix call;
    /// `refinements` are the canons named in a path, in path order.
    pub(crate) fn call_action(
        &mut self,
        action: Rc<Action>,
        binding: Option<ContextRef>,
        label: Option<Symbol>,
        feed: &mut Feed,
        left: Option<Cell>,
        refinements: &[Symbol],
    ) -> Eval<Completion> {
        self.enter()?;
        let result = self.fulfill_and_run(action, binding, label, feed, left, refinements);
        self.leave();
        result
    }

    fn fulfill_and_run(
        &mut self,
        action: Rc<Action>,
        binding: Option<ContextRef>,
        label: Option<Symbol>,
        feed: &mut Feed,
        left: Option<Cell>,
        refinements: &[Symbol],
    ) -> Eval<Completion> {
        let paramlist = Rc::clone(&action.paramlist);
        let mut values = action.initial_values();
        let mut order = action.caller_order().into_iter();

        if let Some(left) = left {
            let Some(slot) = order.next() else {
                return Err(RenError::NoLeftArg {
                    action: self.label_text(label),
                }
                .into());
            };
            values[slot - 1] = left;
        }

        let mode = if action.enfix {
            Lookahead::None
        } else {
            Lookahead::Arg
        };
        for slot in order {
            values[slot - 1] = self.gather_arg(feed, paramlist.param(slot), mode, label)?;
        }

        for canon in refinements {
            let slot = paramlist
                .find(*canon)
                .filter(|slot| !action.is_specialized(*slot))
                .ok_or_else(|| self.bad_refine(label, *canon))?;
            let param = paramlist.param(slot);
            values[slot - 1] = match param.class {
                ParamClass::Flag => Cell::logic(true),
                ParamClass::Refinement => self.gather_arg(feed, param, mode, label)?,
                _ => return Err(self.bad_refine(label, *canon).into()),
            };
        }

        null_unused_refinements(&paramlist.params, &mut values);
        let ctx = self.alloc_frame(&action, values);
        let mut frame = Frame::new(ctx, action, binding, label);
        frame.state = FrameState::Typecheck;
        self.run_frame(frame)
    }

    fn bad_refine(&self, label: Option<Symbol>, canon: Symbol) -> RenError {
        RenError::BadRefine {
            action: self.label_text(label),
            refinement: self.interner.resolve(canon).to_string(),
        }
    }

    fn gather_arg(
        &mut self,
        feed: &mut Feed,
        param: &Param,
        mode: Lookahead,
        label: Option<Symbol>,
    ) -> Eval<Cell> {
        let missing = |ev: &Self| -> Signal {
            RenError::NeedNonEnd {
                action: ev.label_text(label),
                param: ev.interner.resolve(param.spelling).to_string(),
            }
            .into()
        };
        if feed.is_end() {
            return if param.endable {
                Ok(Cell::null())
            } else {
                Err(missing(self))
            };
        }
        if param.class == ParamClass::Quoted {
            return match feed.next() {
                Some((cell, specifier)) => Ok(self.specify(cell, &specifier)),
                None => Err(missing(self)),
            };
        }
        match self.eval_step(feed, mode)? {
            Completion::Value(value) => Ok(value),
            _ if param.endable => Ok(Cell::null()),
            _ => Err(missing(self)),
        }
    }

    fn alloc_frame(&mut self, action: &Rc<Action>, values: Vec<Cell>) -> ContextRef {
        self.arena.alloc(Varlist::new(
            ContextKind::Frame,
            Rc::clone(&action.paramlist.keylist),
            Cell::action(Rc::clone(action)),
            values,
        ))
    }

    /// Calls `action` with positional arguments in caller order. Arguments
    /// left out must be endable.
    pub fn apply(&mut self, action: &Rc<Action>, args: Vec<Cell>) -> Eval<Cell> {
        self.enter()?;
        let result = self.apply_inner(action, args);
        self.leave();
        result
    }

    fn apply_inner(&mut self, action: &Rc<Action>, args: Vec<Cell>) -> Eval<Cell> {
        let paramlist = Rc::clone(&action.paramlist);
        let order = action.caller_order();
        if args.len() > order.len() {
            return Err(RenError::InvalidArg(format!(
                "too many arguments: {} takes {}",
                args.len(),
                order.len()
            ))
            .into());
        }
        let mut values = action.initial_values();
        let mut args = args.into_iter();
        for slot in order {
            let param = paramlist.param(slot);
            values[slot - 1] = match args.next() {
                Some(arg) => arg,
                None if param.endable => Cell::null(),
                None => {
                    return Err(RenError::NeedNonEnd {
                        action: "apply".to_string(),
                        param: self.interner.resolve(param.spelling).to_string(),
                    }
                    .into());
                }
            };
        }
        null_unused_refinements(&paramlist.params, &mut values);
        let ctx = self.alloc_frame(action, values);
        let mut frame = Frame::new(ctx, Rc::clone(action), None, None);
        frame.state = FrameState::Typecheck;
        let completion = self.run_frame(frame)?;
        self.completion_value(completion)
    }

    /// Runs a FRAME! value. The frame's storage is consumed: running it
    /// again fails with `frame-consumed`.
    pub(crate) fn do_frame(
        &mut self,
        ctx: ContextRef,
        phase: Rc<Action>,
        binding: Option<ContextRef>,
    ) -> Eval<Cell> {
        self.enter()?;
        let result = self.arena.steal(ctx).map_err(Signal::from).and_then(|stolen| {
            let mut frame = Frame::new(stolen, phase, binding, None);
            frame.state = FrameState::Typecheck;
            let completion = self.run_frame(frame)?;
            self.completion_value(completion)
        });
        self.leave();
        result
    }

    pub(crate) fn completion_value(&mut self, completion: Completion) -> Eval<Cell> {
        match completion {
            Completion::Value(value) => Ok(value),
            Completion::Invisible => Ok(Cell::void()),
            Completion::Splice(array) => self.eval_block(&array),
        }
    }

    /// Drives a fulfilled frame through typecheck and dispatch until its
    /// output is produced, then feeds the output through pending CHAIN
    /// steps.
    pub(crate) fn run_frame(&mut self, mut frame: Frame) -> Eval<Completion> {
        let completion = loop {
            match frame.state {
                FrameState::Fulfill | FrameState::Typecheck => {
                    self.typecheck(&frame)?;
                    frame.state = FrameState::Dispatch;
                }
                FrameState::Dispatch => {
                    debug!(
                        dispatcher = frame.phase.dispatcher.name(),
                        label = %self.label_text(frame.label),
                        "dispatch"
                    );
                    let bounce = match self.dispatch(&mut frame) {
                        Ok(bounce) => bounce,
                        Err(signal) => {
                            frame.state = FrameState::Thrown;
                            return Err(signal);
                        }
                    };
                    match bounce {
                        Bounce::Redo { phase, typecheck } => {
                            frame.phase = phase;
                            if frame.state == FrameState::Dispatch {
                                frame.state = if typecheck {
                                    FrameState::Typecheck
                                } else {
                                    FrameState::Dispatch
                                };
                            }
                        }
                        Bounce::Out(value) => break Completion::Value(value),
                        Bounce::Invisible => break Completion::Invisible,
                        Bounce::Splice(array) => break Completion::Splice(array),
                    }
                }
                FrameState::Done | FrameState::Thrown | FrameState::Stolen => {
                    unreachable!("frame dispatched after it finished")
                }
            }
        };
        if frame.state != FrameState::Stolen {
            frame.state = FrameState::Done;
        }

        let mut completion = completion;
        while let Some(next) = frame.pending.pop() {
            let input = self.completion_value(completion)?;
            completion = Completion::Value(self.apply(&next, vec![input])?);
        }
        Ok(completion)
    }

    fn typecheck(&mut self, frame: &Frame) -> Eval<()> {
        let ctx = frame.ctx()?;
        let mut endings = Vec::new();
        {
            let varlist = self.arena.get(ctx)?;
            for (i, param) in frame.phase.paramlist.params.iter().enumerate() {
                let slot = i + 1;
                let value = varlist.get(slot);
                let ok = match param.class {
                    ParamClass::Local | ParamClass::Return => true,
                    ParamClass::Flag => value.is_null() || value.as_logic().is_some(),
                    ParamClass::Refinement => value.is_null() || param.accepts(value),
                    ParamClass::Normal | ParamClass::Quoted if value.is_unset() => {
                        if !param.endable {
                            return Err(RenError::NeedNonEnd {
                                action: self.label_text(frame.label),
                                param: self.interner.resolve(param.spelling).to_string(),
                            }
                            .into());
                        }
                        endings.push(slot);
                        true
                    }
                    ParamClass::Normal | ParamClass::Quoted => param.accepts(value),
                };
                if !ok {
                    return Err(RenError::ExpectArg {
                        action: self.label_text(frame.label),
                        param: self.interner.resolve(param.spelling).to_string(),
                        got: describe(value),
                    }
                    .into());
                }
            }
        }
        if !endings.is_empty() {
            let varlist = self.arena.get_mut(ctx)?;
            for slot in endings {
                varlist.set(slot, Cell::null());
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, frame: &mut Frame) -> Eval<Bounce> {
        let phase = Rc::clone(&frame.phase);
        match &phase.dispatcher {
            Dispatcher::Native(native) => native(self, frame),
            Dispatcher::Func { body } => combinators::func::dispatch_func(self, frame, body),
            Dispatcher::Macro { body } => combinators::macros::dispatch_macro(self, frame, body),
            Dispatcher::Lambda { body } => combinators::lambda::dispatch_lambda(self, frame, body),
            Dispatcher::Does { body } => combinators::does::dispatch_does(self, frame, body),
            Dispatcher::Adapter { prelude, adaptee } => {
                combinators::adapt::dispatch_adapter(self, frame, prelude, adaptee)
            }
            Dispatcher::Chainer { pipeline } => combinators::chain::dispatch_chainer(frame, pipeline),
            Dispatcher::Encloser { inner, outer } => {
                combinators::enclose::dispatch_encloser(self, frame, inner, outer)
            }
            Dispatcher::Augmenter { base }
            | Dispatcher::Reorderer { original: base }
            | Dispatcher::Specializer { base } => Ok(Bounce::Redo {
                phase: Rc::clone(base),
                typecheck: false,
            }),
            Dispatcher::Generic { verb } => generics::dispatch_generic(self, frame, *verb),
            Dispatcher::Downshot { remaining } => {
                combinators::oneshot::dispatch_downshot(self, frame, remaining)
            }
            Dispatcher::Upshot { pending } => combinators::oneshot::dispatch_upshot(self, frame, pending),
        }
    }
}

/// Refinements and flags the caller did not use are NULL.
fn null_unused_refinements(params: &[Param], values: &mut [Cell]) {
    for (param, value) in params.iter().zip(values.iter_mut()) {
        if matches!(param.class, ParamClass::Refinement | ParamClass::Flag) && value.is_unset() {
            *value = Cell::null();
        }
    }
}

/// How a rejected argument is named in errors.
fn describe(value: &Cell) -> String {
    if value.is_null() {
        return "null".to_string();
    }
    match value.isotope_label() {
        Some(_) => "an isotope".to_string(),
        None => value.kind().name().to_string(),
    }
}
