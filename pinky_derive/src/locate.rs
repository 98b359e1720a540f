use crate::attribute::Settings;
use crate::symbols;
use crate::utils;

use if_chain::if_chain;
use std::collections::BTreeMap;
use syn::visit::Visit;
use syn::{visit, Expr, ExprCall, ExprMethodCall, ExprPath, Ident, Item, ItemFn, Macro};

/// Creation markers and configuration patterns found in one test function.
#[derive(Debug, Default)]
pub struct Located {
    /// In pre-order, macro arguments included.
    pub markers: Vec<ExprCall>,
    /// Method name to the argument of its last configuration.
    pub configured: BTreeMap<String, Option<Expr>>,
}

impl Located {
    /// Marker the specification is built from.
    pub fn marker(&self) -> Option<&ExprCall> {
        self.markers.first()
    }
}

/// Walks a function body in pre-order.
pub fn locate(settings: &Settings, func: &ItemFn) -> Located {
    let mut vis = SiteLocator {
        settings,
        located: Located::default(),
    };
    vis.visit_block(&func.block);
    vis.located
}

/// `Ghost::of::<...>(...)`
pub fn is_creation_marker(call: &ExprCall, dispatcher: &Ident) -> bool {
    if_chain! {
        if let Expr::Path(ExprPath { qself: None, path, .. }) = &*call.func;
        if path.leading_colon.is_none();
        if let [receiver, method] = path.segments.iter().collect::<Vec<_>>()[..];
        then {
            receiver.ident == *dispatcher && method.ident == symbols::OF
        } else {
            false
        }
    }
}

/// `<expr>.method().returns(...)`, yields `method`.
pub fn configured_method<'e>(call: &'e ExprMethodCall, returns: &Ident) -> Option<&'e Ident> {
    if call.method != *returns {
        return None;
    }
    match &*call.receiver {
        Expr::MethodCall(inner) => Some(&inner.method),
        _ => None,
    }
}

struct SiteLocator<'s> {
    settings: &'s Settings,
    located: Located,
}

impl<'ast> Visit<'ast> for SiteLocator<'_> {
    fn visit_expr_call(&mut self, i: &'ast ExprCall) {
        if is_creation_marker(i, &self.settings.dispatcher) {
            self.located.markers.push(i.clone());
        }
        visit::visit_expr_call(self, i);
    }

    fn visit_expr_method_call(&mut self, i: &'ast ExprMethodCall) {
        if let Some(method) = configured_method(i, &self.settings.returns) {
            self.located
                .configured
                .insert(method.to_string(), i.args.first().cloned());
        }
        visit::visit_expr_method_call(self, i);
    }

    fn visit_macro(&mut self, i: &'ast Macro) {
        if let Some(args) = utils::macro_args(i) {
            for arg in &args {
                Visit::visit_expr(self, arg);
            }
        }
    }

    // nested items are not part of the body
    fn visit_item(&mut self, _: &'ast Item) {}
}
