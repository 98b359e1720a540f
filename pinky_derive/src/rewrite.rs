use crate::attribute::Settings;
use crate::context::is_test;
use crate::error::AnalysisError;
use crate::locate::{configured_method, is_creation_marker};
use crate::utils;

use quote::ToTokens;
use std::collections::BTreeSet;
use syn::spanned::Spanned;
use syn::visit_mut::VisitMut;
use syn::{
    parse_quote, visit_mut, Expr, ExprCall, Ident, ImplItemFn, ItemFn, ItemMod, LitStr, Macro,
};

/// Bakes identity tokens into creation markers and erases configuration
/// patterns in test functions; reports markers found anywhere else.
pub fn rewrite(
    settings: &Settings,
    module: &mut ItemMod,
    keys: &BTreeSet<String>,
) -> Result<(), Vec<AnalysisError>> {
    let mut vis = Rewriter {
        settings,
        root: module.ident.clone(),
        keys,
        module: Vec::new(),
        current: None,
        errors: Vec::new(),
    };
    if let Some((_, items)) = &mut module.content {
        for item in items {
            vis.visit_item_mut(item);
        }
    }

    if vis.errors.is_empty() {
        Ok(())
    } else {
        Err(vis.errors)
    }
}

/// Function whose body is being walked.
struct Scope {
    key: String,
    is_test: bool,
}

struct Rewriter<'s> {
    settings: &'s Settings,
    root: Ident,
    keys: &'s BTreeSet<String>,
    module: Vec<String>,
    current: Option<Scope>,
    errors: Vec<AnalysisError>,
}

impl<'s> Rewriter<'s> {
    fn enter(&mut self, ident: &Ident, is_test: bool) -> Option<Scope> {
        let key = utils::format_identity_key(&self.root, &self.module, ident);
        self.current.replace(Scope { key, is_test })
    }

    fn current_key(&self) -> String {
        match &self.current {
            Some(scope) => scope.key.clone(),
            None => std::iter::once(self.root.to_string())
                .chain(self.module.iter().cloned())
                .collect::<Vec<_>>()
                .join("::"),
        }
    }

    fn rewrite_marker(&mut self, call: &mut ExprCall) {
        let key = match &self.current {
            Some(scope) if scope.is_test => scope.key.clone(),
            _ => {
                self.errors.push(AnalysisError::NoMatchingSpecification {
                    span: call.span(),
                    key: self.current_key(),
                });
                return;
            }
        };
        if !self.keys.contains(&key) {
            return;
        }

        let of = match &*call.func {
            Expr::Path(path) => path.path.segments.last().cloned(),
            _ => None,
        };
        let of = match of {
            Some(of) => of,
            None => return,
        };

        let to_root = utils::make_path_to_root(self.module.len());
        let aggregate = utils::format_aggregate_unit_ident();
        let dispatcher = &self.settings.dispatcher;
        let key = LitStr::new(&key, call.span());

        *call.func = parse_quote! { #to_root::#aggregate::#dispatcher::#of };
        call.args = parse_quote! { #key };
    }
}

impl<'s> VisitMut for Rewriter<'s> {
    fn visit_item_mod_mut(&mut self, i: &mut ItemMod) {
        self.module.push(i.ident.to_string());
        visit_mut::visit_item_mod_mut(self, i);
        self.module.pop();
    }

    fn visit_item_fn_mut(&mut self, i: &mut ItemFn) {
        let prev = self.enter(&i.sig.ident, is_test(i));
        visit_mut::visit_item_fn_mut(self, i);
        self.current = prev;
    }

    fn visit_impl_item_fn_mut(&mut self, i: &mut ImplItemFn) {
        let prev = self.enter(&i.sig.ident, false);
        visit_mut::visit_impl_item_fn_mut(self, i);
        self.current = prev;
    }

    fn visit_expr_mut(&mut self, i: &mut Expr) {
        let in_test = matches!(&self.current, Some(scope) if scope.is_test);
        let erased = in_test
            && matches!(
                i,
                Expr::MethodCall(call) if configured_method(call, &self.settings.returns).is_some()
            );
        if erased {
            *i = parse_quote! { () };
            return;
        }

        if let Expr::Call(call) = i {
            if is_creation_marker(call, &self.settings.dispatcher) {
                self.rewrite_marker(call);
            }
        }

        visit_mut::visit_expr_mut(self, i);
    }

    fn visit_macro_mut(&mut self, i: &mut Macro) {
        let mut args = match utils::macro_args(i) {
            Some(args) => args,
            None => return,
        };
        let before = args.to_token_stream().to_string();
        for arg in args.iter_mut() {
            self.visit_expr_mut(arg);
        }
        if args.to_token_stream().to_string() != before {
            i.tokens = args.into_token_stream();
        }
    }
}
