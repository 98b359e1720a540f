use crate::symbols;

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, ToTokens};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{visit, Expr, Ident, Lifetime, Macro, Token, Type, TypeReference};

/// `samples`, `inner`, `creates_mock` -> `samples_inner_creates_mock`
pub fn format_generated_name(root: &Ident, module: &[String], func: &Ident) -> String {
    name_segments(root, module, func).join("_")
}

/// `samples`, `inner`, `creates_mock` -> `samples::inner::creates_mock`
pub fn format_identity_key(root: &Ident, module: &[String], func: &Ident) -> String {
    name_segments(root, module, func).join("::")
}

fn name_segments(root: &Ident, module: &[String], func: &Ident) -> Vec<String> {
    std::iter::once(root.unraw().to_string())
        .chain(module.iter().map(|seg| unraw(seg).to_owned()))
        .chain(std::iter::once(func.unraw().to_string()))
        .collect()
}

/// `r#type` -> `type`
pub fn unraw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

/// Identifier for a name as written in source, raw or not.
pub fn make_ident(name: &str, span: Span) -> Ident {
    match name.strip_prefix("r#") {
        Some(raw) => Ident::new_raw(raw, span),
        None => Ident::new(name, span),
    }
}

pub fn format_unit_ident(generated_name: &str) -> Ident {
    format_ident!("{}_{}", symbols::UNIT_PREFIX, generated_name)
}

pub fn format_aggregate_unit_ident() -> Ident {
    format_ident!("{}", symbols::AGGREGATE_UNIT)
}

pub fn format_summon_ident() -> Ident {
    format_ident!("{}", symbols::SUMMON)
}

/// Arguments of a macro invoked like a function, e.g. `assert_eq!(a, b)`.
pub fn macro_args(mac: &Macro) -> Option<Punctuated<Expr, Token![,]>> {
    mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated).ok()
}

/// Path from a module at `depth` below the annotated one back to it.
pub fn make_path_to_root(depth: usize) -> TokenStream {
    if depth == 0 {
        quote! { self }
    } else {
        let supers = (0..depth).map(|_| Ident::new("super", Span::call_site()));
        quote! { #(#supers)::* }
    }
}

/// Whether `ty` borrows anything, so a value of it cannot outlive the call.
pub fn is_borrowed(ty: &Type) -> bool {
    let mut vis = BorrowVisitor::default();
    vis.visit_type(ty);
    vis.found
}

#[derive(Default)]
struct BorrowVisitor {
    found: bool,
}

impl<'ast> Visit<'ast> for BorrowVisitor {
    fn visit_type_reference(&mut self, _: &'ast TypeReference) {
        self.found = true;
    }

    fn visit_lifetime(&mut self, i: &'ast Lifetime) {
        if i.ident != "static" {
            self.found = true;
        }
        visit::visit_lifetime(self, i);
    }
}

/// A `use` item emitted into a generated unit, e.g. `super::contracts::IRepository`.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ImportPath(Vec<String>);

impl ImportPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for ImportPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("::"))
    }
}

impl ToTokens for ImportPath {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let segments = self.0.iter().map(|seg| make_ident(seg, Span::call_site()));
        let v = quote! { use #(#segments)::*; };
        v.to_tokens(tokens);
    }
}
