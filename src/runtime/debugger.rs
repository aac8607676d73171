//! Breakpoint consoles and per-step evaluation hooks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use crate::runtime::{
    error::{Eval, Signal},
    interpreter::Interpreter,
    value::Cell,
};
use crate::syntax::symbol::Symbol;

/// Observer invoked before every evaluation step while installed.
pub trait EvalHook {
    fn on_step(&self, ev: &Interpreter, cell: &Cell);
}

/// What a console session decided when it ended.
pub enum BreakpointOutcome {
    /// Throw QUIT with this value from the breakpoint.
    Quit(Cell),
    /// Install a step hook and continue.
    InstallHook(Rc<dyn EvalHook>),
    /// Evaluate this block in place of the breakpoint; its result is the
    /// breakpoint's result.
    Run(Cell),
}

/// A console the interpreter enters on BREAKPOINT.
pub trait Debugger {
    /// `paused` is the label the breakpoint was invoked through.
    fn console(&mut self, ev: &mut Interpreter, paused: Option<Symbol>) -> Eval<BreakpointOutcome>;
}

/// Console that reads its input from a fixed list of lines.
///
/// Each line is evaluated in the user context. `resume` (optionally
/// `/with value` or `/do [code]`) ends the session, as does `quit` or
/// running out of lines. Results and errors go to a shared transcript.
pub struct ScriptedConsole {
    lines: VecDeque<String>,
    hook: Option<Rc<dyn EvalHook>>,
    transcript: Rc<RefCell<Vec<String>>>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            hook: None,
            transcript: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Installs `hook` at the first breakpoint instead of reading lines.
    pub fn with_hook(mut self, hook: Rc<dyn EvalHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn transcript(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.transcript)
    }
}

impl Debugger for ScriptedConsole {
    fn console(&mut self, ev: &mut Interpreter, paused: Option<Symbol>) -> Eval<BreakpointOutcome> {
        let label = paused.map(|symbol| ev.spelling(symbol).to_string());
        debug!(paused = label.as_deref().unwrap_or("top level"), "breakpoint");

        if let Some(hook) = self.hook.take() {
            return Ok(BreakpointOutcome::InstallHook(hook));
        }

        while let Some(line) = self.lines.pop_front() {
            let entry = match ev.do_text(&line) {
                Ok(value) => format!("== {}", ev.mold(&value)),
                Err(Signal::Throw { label, value }) if ev.is_resume_label(&label) => {
                    return Ok(BreakpointOutcome::Run(value));
                }
                Err(Signal::Throw { label, value }) if ev.is_quit_label(&label) => {
                    return Ok(BreakpointOutcome::Quit(value));
                }
                Err(Signal::Throw { label, .. }) => {
                    format!("** no-catch: no CATCH for THROW of {}", ev.mold(&label))
                }
                Err(Signal::Fail(error)) => format!("** {}: {}", error.id(), error),
            };
            self.transcript.borrow_mut().push(entry);
        }
        Ok(BreakpointOutcome::Run(Cell::block(Vec::new())))
    }
}

impl Interpreter {
    /// Enters the installed debugger, if any, and acts on its outcome.
    pub(crate) fn breakpoint(&mut self, paused: Option<Symbol>) -> Eval<Cell> {
        let Some(mut debugger) = self.debugger.take() else {
            return Ok(Cell::void());
        };
        let outcome = debugger.console(self, paused);
        self.debugger = Some(debugger);

        match outcome? {
            BreakpointOutcome::Quit(value) => Err(Signal::Throw {
                label: self.quit_label(),
                value,
            }),
            BreakpointOutcome::InstallHook(hook) => {
                self.hook = Some(hook);
                Ok(Cell::void())
            }
            BreakpointOutcome::Run(code) => match code.as_block() {
                Some(block) => {
                    let block = block.clone();
                    self.eval_block(&block)
                }
                None => Ok(code),
            },
        }
    }
}
