use std::fmt;
use std::rc::Rc;

use crate::runtime::{error::Eval, interpreter::Interpreter, value::Cell};
use crate::syntax::symbol::Symbol;

/// Result of offering a generic verb to a port's actor.
#[derive(Debug)]
pub enum PortOutcome {
    Handled(Cell),
    /// The actor does not implement the verb; the caller reports CANNOT-USE.
    Unhandled,
}

/// Host-supplied behavior behind a PORT! value.
///
/// Every generic verb applied to a port (OPEN, READ, WRITE, CLOSE, APPEND,
/// LENGTH-OF, ...) is routed here with the remaining arguments.
pub trait PortActor {
    fn act(
        &self,
        ev: &mut Interpreter,
        port: &Port,
        verb: Symbol,
        args: &[Cell],
    ) -> Eval<PortOutcome>;
}

pub struct Port {
    pub scheme: String,
    pub actor: Rc<dyn PortActor>,
}

impl Port {
    pub fn new(scheme: impl Into<String>, actor: Rc<dyn PortActor>) -> Self {
        Self {
            scheme: scheme.into(),
            actor,
        }
    }
}

impl fmt::Debug for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port").field("scheme", &self.scheme).finish()
    }
}
