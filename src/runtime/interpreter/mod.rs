//! The evaluator: boot, the host API and top-level entry points.
//!
//! Evaluation itself lives in `eval.rs` (stepping through a feed) and
//! `call.rs` (argument fulfillment and the per-frame state machine).

use std::rc::Rc;

use tracing::{debug, info};

use crate::config::Config;
use crate::runtime::{
    action::{Action, Dispatcher, NativeFn},
    arena::{ContextArena, ContextRef},
    binding::PatchCache,
    compare::same_label,
    context::{ContextKind, Key, Keylist, Varlist},
    debugger::{Debugger, EvalHook},
    error::{Eval, RenError, Signal},
    frame::Frame,
    mold::Molder,
    natives,
    paramlist::{ReturnMode, make_paramlist},
    port::{Port, PortActor},
    value::{ArrayRef, Cell, Payload},
};
use crate::syntax::{interner::Interner, loader::load, symbol::Symbol};

mod bind;
mod call;
mod eval;
mod relativize;


pub(crate) use eval::Lookahead;

/// How a top-level evaluation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Cell),
    /// QUIT was called; carries its /WITH value (or NULL).
    Quit(Cell),
}

impl Outcome {
    pub fn value(&self) -> &Cell {
        match self {
            Outcome::Value(cell) | Outcome::Quit(cell) => cell,
        }
    }
}

/// The handful of natives the evaluator needs to recognize by identity.
struct Specials {
    ret: Rc<Action>,
    quit: Rc<Action>,
    resume: Rc<Action>,
}

pub struct Interpreter {
    pub(crate) interner: Interner,
    pub(crate) arena: ContextArena,
    pub(crate) patches: PatchCache,
    pub(crate) config: Config,
    pub(crate) lib: ContextRef,
    pub(crate) user: ContextRef,
    pub(crate) depth: usize,
    pub(crate) output: Vec<String>,
    pub(crate) debugger: Option<Box<dyn Debugger>>,
    pub(crate) hook: Option<Rc<dyn EvalHook>>,
    specials: Specials,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let mut interner = Interner::new();
        let mut arena = ContextArena::new();
        arena.set_enabled(config.gc_enabled);
        arena.set_threshold(config.recycle_threshold);

        let lib = arena.alloc(Varlist::new(
            ContextKind::Object,
            Rc::new(Keylist::default()),
            Cell::blank(),
            Vec::new(),
        ));
        let user = arena.alloc(Varlist::new(
            ContextKind::Object,
            Rc::new(Keylist::default()),
            Cell::blank(),
            Vec::new(),
        ));

        let installed = natives::install(&mut interner, &mut arena, lib)
            .unwrap_or_else(|err| boot_failure("natives", &err));
        let special = |name: &str| -> Rc<Action> {
            installed
                .iter()
                .find(|(spelling, _)| *spelling == name)
                .map(|(_, action)| Rc::clone(action))
                .unwrap_or_else(|| boot_failure(name, &RenError::User("missing native".into())))
        };
        let specials = Specials {
            ret: special("return"),
            quit: special("quit"),
            resume: special("resume"),
        };

        let mut ev = Self {
            interner,
            arena,
            patches: PatchCache::new(),
            config,
            lib,
            user,
            depth: 0,
            output: Vec::new(),
            debugger: None,
            hook: None,
            specials,
        };
        if let Err(signal) = ev.run_in(natives::BOOT_SCRIPT, lib) {
            boot_failure("boot script", &ev.signal_to_error(signal));
        }
        info!(
            natives = installed.len(),
            lib = ev.arena.get(lib).map(Varlist::len).unwrap_or(0),
            "interpreter booted"
        );
        ev
    }

    /// Loads, binds and evaluates `source` in the user context.
    ///
    /// Uncaught throws other than QUIT become `no-catch` errors. Contexts
    /// are recycled afterwards when the allocation threshold was crossed.
    pub fn do_source(&mut self, source: &str) -> Result<Outcome, RenError> {
        self.depth = 0;
        let outcome = match self.do_text(source) {
            Ok(value) => Ok(Outcome::Value(value)),
            Err(Signal::Throw { label, value }) if self.is_quit_label(&label) => {
                Ok(Outcome::Quit(value))
            }
            Err(signal) => Err(self.signal_to_error(signal)),
        };
        if self.arena.should_recycle() {
            let keep: Vec<Cell> = match &outcome {
                Ok(outcome) => vec![outcome.value().clone()],
                Err(_) => Vec::new(),
            };
            self.recycle(&keep);
        }
        outcome
    }

    /// Loads and evaluates text in the user context without recycling.
    pub(crate) fn do_text(&mut self, source: &str) -> Eval<Cell> {
        let user = self.user;
        self.run_in(source, user)
    }

    fn run_in(&mut self, source: &str, target: ContextRef) -> Eval<Cell> {
        let mut cells = load(source, &mut self.interner)?;
        let fallback = (target != self.lib).then_some(self.lib);
        bind::bind_deep(&mut self.arena, &mut cells, target, fallback)?;
        let block = ArrayRef::new(cells);
        self.eval_block(&block)
    }

    pub(crate) fn signal_to_error(&self, signal: Signal) -> RenError {
        match signal {
            Signal::Fail(error) => error,
            Signal::Throw { label, .. } => RenError::NoCatch {
                label: self.mold(&label),
            },
        }
    }

    /// Registers a native under `name` in the lib context.
    ///
    /// `spec` is a spec block body such as `"value [integer!] /twice"`.
    pub fn register_native(&mut self, name: &str, spec: &str, func: NativeFn) -> Result<(), RenError> {
        let cells = load(spec, &mut self.interner)?;
        let paramlist = make_paramlist(&cells, &self.interner, ReturnMode::None)?;
        let action = Rc::new(Action::new(Rc::new(paramlist), Dispatcher::Native(func)));
        let spelling = self.interner.intern(name);
        let value = Cell::action_bound(action, None, Some(spelling));
        self.define(self.lib, spelling, value)?;
        debug!(name, "registered native");
        Ok(())
    }

    /// Defines or overwrites a key in `ctx`.
    pub(crate) fn define(&mut self, ctx: ContextRef, spelling: Symbol, value: Cell) -> Result<usize, RenError> {
        let canon = self.interner.canon(spelling);
        let varlist = self.arena.get_mut(ctx)?;
        match varlist.find(canon) {
            Some(index) => {
                varlist.set(index, value);
                Ok(index)
            }
            None => Ok(varlist.add_key(Key { spelling, canon }, value)),
        }
    }

    /// Reads a variable from the user context, falling back to lib.
    /// Returns the stored cell as is (isotopes included).
    pub fn get_var(&self, name: &str) -> Option<Cell> {
        let canon = self.interner.canon(self.interner.lookup(name)?);
        [self.user, self.lib].into_iter().find_map(|ctx| {
            let varlist = self.arena.get(ctx).ok()?;
            varlist.find(canon).map(|index| varlist.get(index).clone())
        })
    }

    pub fn set_var(&mut self, name: &str, value: Cell) -> Result<(), RenError> {
        let spelling = self.interner.intern(name);
        self.define(self.user, spelling, value).map(|_| ())
    }

    /// Value of argument `slot` (1-based, spec order) of a running frame.
    pub fn arg(&self, frame: &Frame, slot: usize) -> Result<Cell, RenError> {
        Ok(self.arena.get(frame.ctx()?)?.get(slot).clone())
    }

    pub fn make_port(&self, scheme: &str, actor: Rc<dyn PortActor>) -> Cell {
        Cell::port(Rc::new(Port::new(scheme, actor)))
    }

    pub fn set_debugger(&mut self, debugger: Box<dyn Debugger>) {
        self.debugger = Some(debugger);
    }

    pub fn set_hook(&mut self, hook: Option<Rc<dyn EvalHook>>) {
        self.hook = hook;
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.config.trace = trace;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mold(&self, cell: &Cell) -> String {
        Molder::new(&self.interner, &self.arena).mold(cell)
    }

    pub fn form(&self, cell: &Cell) -> String {
        Molder::new(&self.interner, &self.arena).form(cell)
    }

    /// Lines written by PRINT and PROBE so far.
    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    pub fn spelling(&self, symbol: Symbol) -> &str {
        self.interner.resolve(symbol)
    }

    pub fn arena(&self) -> &ContextArena {
        &self.arena
    }

    /// Runs a full recycle keeping lib, user, the special actions and `keep`.
    pub fn recycle(&mut self, keep: &[Cell]) -> usize {
        let mut roots = vec![
            Cell::object(self.lib),
            Cell::object(self.user),
            Cell::action(Rc::clone(&self.specials.ret)),
            Cell::action(Rc::clone(&self.specials.quit)),
            Cell::action(Rc::clone(&self.specials.resume)),
        ];
        roots.extend(keep.iter().cloned());
        self.arena.recycle(&roots)
    }

    pub(crate) fn return_action(&self) -> &Rc<Action> {
        &self.specials.ret
    }

    pub(crate) fn quit_label(&self) -> Cell {
        Cell::action(Rc::clone(&self.specials.quit))
    }

    pub(crate) fn resume_label(&self) -> Cell {
        Cell::action(Rc::clone(&self.specials.resume))
    }

    pub(crate) fn is_quit_label(&self, label: &Cell) -> bool {
        same_label(label, &self.quit_label())
    }

    pub(crate) fn is_resume_label(&self, label: &Cell) -> bool {
        same_label(label, &self.resume_label())
    }

    /// Whether a throw label is the RETURN of the frame stored at `ctx`.
    pub(crate) fn is_return_for(&self, label: &Cell, ctx: ContextRef) -> bool {
        match label.payload() {
            Payload::Action {
                action, binding, ..
            } => Rc::ptr_eq(action, &self.specials.ret) && *binding == Some(ctx),
            _ => false,
        }
    }

    /// Spelling used for an action in error messages.
    pub(crate) fn label_text(&self, label: Option<Symbol>) -> String {
        label
            .map(|symbol| self.interner.resolve(symbol).to_string())
            .unwrap_or_else(|| "anonymous action".to_string())
    }

    /// Counts one more live action frame, failing past the configured
    /// maximum. Nested blocks and groups are not counted.
    pub(crate) fn enter(&mut self) -> Result<(), RenError> {
        if self.depth >= self.config.max_depth {
            return Err(RenError::StackOverflow {
                depth: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

fn boot_failure(what: &str, err: &RenError) -> ! {
    panic!("interpreter boot failed in {what}: {err}")
}
