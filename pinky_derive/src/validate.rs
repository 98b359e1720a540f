use crate::error::AnalysisError;

use proc_macro2::Span;
use quote::ToTokens;
use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{
    FnArg, GenericParam, ItemTrait, TraitItemConst, TraitItemFn, TraitItemMacro, TraitItemType,
};

/// Checks that a trait can be mocked at all: no generics, no supertraits.
pub fn validate_contract(trait_def: &ItemTrait, site: Span) -> Result<(), AnalysisError> {
    if !trait_def.generics.params.is_empty() {
        return Err(AnalysisError::UnresolvableContractType {
            span: site,
            reason: format!("`{}` is generic", trait_def.ident),
        });
    }
    if !trait_def.supertraits.is_empty() {
        return Err(AnalysisError::UnresolvableContractType {
            span: site,
            reason: format!("`{}` has supertraits", trait_def.ident),
        });
    }
    Ok(())
}

/// Checks every member, reporting all unsupported ones.
pub fn validate_members(trait_def: &ItemTrait) -> Result<(), Vec<AnalysisError>> {
    let mut vis = MemberVisitor::default();
    vis.visit_item_trait(trait_def);

    if vis.errors.is_empty() {
        Ok(())
    } else {
        Err(vis.errors)
    }
}

#[derive(Default)]
struct MemberVisitor {
    errors: Vec<AnalysisError>,
}

impl MemberVisitor {
    fn unsupported(&mut self, span: Span, member: String, reason: &str) {
        self.errors.push(AnalysisError::UnsupportedMember {
            span,
            member,
            reason: reason.to_owned(),
        });
    }
}

impl<'ast> Visit<'ast> for MemberVisitor {
    fn visit_trait_item_const(&mut self, i: &'ast TraitItemConst) {
        self.unsupported(
            i.span(),
            i.ident.to_string(),
            "associated consts are not supported",
        );
    }

    fn visit_trait_item_type(&mut self, i: &'ast TraitItemType) {
        self.unsupported(
            i.span(),
            i.ident.to_string(),
            "associated types are not supported",
        );
    }

    fn visit_trait_item_macro(&mut self, i: &'ast TraitItemMacro) {
        self.unsupported(
            i.span(),
            i.mac.path.to_token_stream().to_string(),
            "macros in trait bodies are not supported",
        );
    }

    fn visit_trait_item_fn(&mut self, i: &'ast TraitItemFn) {
        let sig = &i.sig;
        let member = sig.ident.to_string();

        let has_receiver = sig
            .inputs
            .iter()
            .any(|arg| matches!(arg, FnArg::Receiver(_)));
        if !has_receiver {
            self.unsupported(sig.span(), member, "static functions are not supported");
            return;
        }
        if sig.asyncness.is_some() {
            self.unsupported(sig.span(), member, "`async fn` is not supported");
            return;
        }
        if sig.constness.is_some() {
            self.unsupported(sig.span(), member, "`const fn` is not supported");
            return;
        }
        let generic = sig
            .generics
            .params
            .iter()
            .any(|param| !matches!(param, GenericParam::Lifetime(_)));
        if generic {
            self.unsupported(
                sig.generics.span(),
                member,
                "methods with type or const parameters are not supported",
            );
        }
    }
}
