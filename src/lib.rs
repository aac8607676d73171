pub mod config;
pub mod runtime;
pub mod syntax;

pub use config::Config;
pub use runtime::{
    action::{Action, NativeFn},
    debugger::{BreakpointOutcome, Debugger, EvalHook, ScriptedConsole},
    error::{Eval, RenError, Signal},
    frame::{Bounce, Frame},
    interpreter::{Interpreter, Outcome},
    kind::Kind,
    port::{Port, PortActor, PortOutcome},
    value::Cell,
};
pub use syntax::symbol::{Symbol, sym};
