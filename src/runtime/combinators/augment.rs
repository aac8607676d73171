use std::rc::Rc;

use crate::runtime::{
    action::{Action, Dispatcher, Paramlist},
    context::{Key, Keylist},
    error::{Eval, RenError},
    interpreter::Interpreter,
    paramlist::{ReturnMode, parse_params},
    value::{ArrayRef, Cell},
};

/// AUGMENT: extends an action's interface with more parameters. The base
/// action ignores them; an ADAPT or ENCLOSE layered on top can read them.
pub(crate) fn make_augment(ev: &Interpreter, base: &Rc<Action>, spec: &ArrayRef) -> Eval<Rc<Action>> {
    let extra = parse_params(&spec.to_vec(), &ev.interner, ReturnMode::None)?;
    for param in &extra {
        if base.paramlist.find(param.canon).is_some() {
            return Err(RenError::BadParameter(format!(
                "duplicate parameter {}",
                ev.spelling(param.spelling)
            ))
            .into());
        }
    }

    let keys = extra.iter().map(|param| Key {
        spelling: param.spelling,
        canon: param.canon,
    });
    let keylist = Rc::new(Keylist::derived(&base.paramlist.keylist, keys));
    let first_new = base.paramlist.len() + 1;
    let mut params = base.paramlist.params.clone();
    params.extend(extra);
    let paramlist = Paramlist { keylist, params };

    let exemplar = base.exemplar.as_ref().map(|values| {
        let mut values = values.as_ref().clone();
        values.resize(paramlist.len(), Cell::unset());
        Rc::new(values)
    });
    let order = base.order.as_ref().map(|order| {
        let mut order = order.as_ref().clone();
        order.extend((first_new..=paramlist.len()).filter(|slot| paramlist.param(*slot).is_argument()));
        Rc::new(order)
    });

    Ok(Rc::new(Action {
        paramlist: Rc::new(paramlist),
        exemplar,
        dispatcher: Dispatcher::Augmenter {
            base: Rc::clone(base),
        },
        order,
        enfix: false,
        defer: false,
    }))
}
