use crate::constant::{ConstScope, ConstantValue};
use crate::context::{Context, Target, TestFn};
use crate::error::AnalysisError;
use crate::locate::Located;
use crate::resolve::{
    collect_imports, import_for, rebase_signature, TypeDescriptor, TypeResolver,
};
use crate::utils::{self, ImportPath};
use crate::validate::{validate_contract, validate_members};

use proc_macro2::Span;
use quote::ToTokens;
use std::collections::BTreeSet;
use syn::spanned::Spanned;
use syn::{
    Expr, ExprCall, GenericArgument, Ident, ItemTrait, Path, PathArguments, ReturnType, Signature,
    Token, TraitBoundModifier, TraitItem, Type, TypeParamBound,
};

/// Everything needed to emit the mock of one test function.
#[derive(Debug, Clone)]
pub struct MockSpecification {
    pub generated_name: String,
    pub key: String,
    pub contract: ContractSpecification,
    pub import_surface: BTreeSet<ImportPath>,
    pub methods: Vec<MethodSpecification>,
    /// Span of the creation marker.
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContractSpecification {
    pub ident: Ident,
    pub unsafety: Option<Token![unsafe]>,
}

#[derive(Debug, Clone)]
pub struct MethodSpecification {
    pub name: Ident,
    pub signature: Signature,
    pub return_type: TypeDescriptor,
    pub configured: Option<ConstantValue>,
}

impl MethodSpecification {
    /// Return type borrows from the mock or its arguments.
    pub fn returns_borrowed(&self) -> bool {
        match &self.signature.output {
            ReturnType::Default => false,
            ReturnType::Type(_, ty) => utils::is_borrowed(ty),
        }
    }
}

/// Builds the specification of `test` if its body contains a creation marker.
pub fn extract(
    cx: &Context<'_>,
    test: TestFn<'_>,
    located: &Located,
) -> Result<Option<MockSpecification>, Vec<AnalysisError>> {
    let marker = match located.marker() {
        Some(marker) => marker,
        None => return Ok(None),
    };
    let span = marker.span();
    let func = &test.item.sig.ident;
    let key = utils::format_identity_key(&cx.root, test.module(), func);

    let (module, trait_def) =
        resolve_contract(cx, test.module(), marker).map_err(|err| vec![err])?;
    check_other_markers(cx, test, located, &key, (&module, trait_def))?;
    validate_contract(trait_def, span).map_err(|err| vec![err])?;
    validate_members(trait_def)?;

    let resolver = TypeResolver::new(cx, &module);
    let consts = ConstScope::new(test.item, cx.consts(test.module()));

    let mut errors = Vec::new();
    let mut methods = Vec::new();
    let mut import_surface = BTreeSet::new();

    if let Some(import) = import_for(cx, &module, &[trait_def.ident.to_string()]) {
        import_surface.insert(import);
    }

    for item in &trait_def.items {
        let sig = match item {
            TraitItem::Fn(item) => &item.sig,
            _ => continue,
        };
        let name = sig.ident.to_string();

        import_surface.extend(collect_imports(cx, &module, sig));

        let return_type = match resolver.resolve_output(&sig.output) {
            Ok(ty) => ty,
            Err(reason) => {
                errors.push(AnalysisError::UnresolvableMemberType {
                    span: sig.output.span(),
                    member: name,
                    reason,
                });
                continue;
            }
        };

        let configured = match located.configured.get(&name) {
            Some(Some(arg)) => match check_configured(&consts, arg, sig, &return_type) {
                Ok(value) => value,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            },
            _ => None,
        };

        let mut signature = sig.clone();
        rebase_signature(cx, &module, &mut signature);

        methods.push(MethodSpecification {
            name: sig.ident.clone(),
            signature,
            return_type,
            configured,
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Some(MockSpecification {
        generated_name: utils::format_generated_name(&cx.root, test.module(), func),
        key,
        contract: ContractSpecification {
            ident: trait_def.ident.clone(),
            unsafety: trait_def.unsafety,
        },
        import_surface,
        methods,
        span,
    }))
}

/// Every marker of a test shares its key, so all of them must name the
/// contract of the first one.
fn check_other_markers(
    cx: &Context<'_>,
    test: TestFn<'_>,
    located: &Located,
    key: &str,
    (module, contract): (&[String], &ItemTrait),
) -> Result<(), Vec<AnalysisError>> {
    let mut errors = Vec::new();
    for marker in located.markers.iter().skip(1) {
        match resolve_contract(cx, test.module(), marker) {
            Ok((other_module, other)) => {
                if other_module != module || other.ident != contract.ident {
                    errors.push(AnalysisError::ConflictingContracts {
                        span: marker.span(),
                        key: key.to_owned(),
                        first: contract.ident.to_string(),
                        second: other.ident.to_string(),
                    });
                }
            }
            Err(err) => errors.push(err),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Constant configured for a member, `None` when the argument is not a
/// compile-time constant.
fn check_configured(
    consts: &ConstScope<'_>,
    arg: &Expr,
    sig: &Signature,
    return_type: &TypeDescriptor,
) -> Result<Option<ConstantValue>, AnalysisError> {
    let value = match consts.evaluate(arg) {
        Some(value) => value,
        None => return Ok(None),
    };
    if return_type.constant(&value).is_some() {
        return Ok(Some(value));
    }

    let expected = match &sig.output {
        ReturnType::Default => "()".to_owned(),
        ReturnType::Type(_, ty) => ty.to_token_stream().to_string(),
    };
    Err(AnalysisError::ConfiguredValueMismatch {
        span: arg.span(),
        member: sig.ident.to_string(),
        expected,
        found: format!("{} `{}`", value.kind(), value),
    })
}

fn resolve_contract<'a>(
    cx: &Context<'a>,
    module: &[String],
    marker: &ExprCall,
) -> Result<(Vec<String>, &'a ItemTrait), AnalysisError> {
    let span = marker.span();
    let unresolvable = |reason: String| AnalysisError::UnresolvableContractType { span, reason };

    let path = contract_path(marker).map_err(|reason| unresolvable(reason.to_owned()))?;
    let segments = path
        .segments
        .iter()
        .map(|seg| seg.ident.to_string())
        .collect::<Vec<_>>();
    let written = segments.join("::");

    if path.segments.iter().any(|seg| !seg.arguments.is_none()) {
        return Err(unresolvable(format!("`{written}` is generic")));
    }

    match cx.resolve(module, &segments) {
        Some(Target::Trait { module, item }) => Ok((module, item)),
        Some(_) => Err(unresolvable(format!(
            "`{written}` is not a trait declared in this module"
        ))),
        None => Err(unresolvable(format!("cannot find trait `{written}`"))),
    }
}

/// Path of the single trait named by `Ghost::of::<dyn Trait>`.
fn contract_path(marker: &ExprCall) -> Result<&Path, &'static str> {
    let of = match &*marker.func {
        Expr::Path(path) => path.path.segments.last(),
        _ => None,
    };
    let args = match of.map(|seg| &seg.arguments) {
        Some(PathArguments::AngleBracketed(args)) => &args.args,
        _ => return Err("expected a type argument, e.g. `Ghost::of::<dyn Trait>()`"),
    };
    if args.len() != 1 {
        return Err("expected exactly one type argument");
    }
    let mut ty = match args.first() {
        Some(GenericArgument::Type(ty)) => ty,
        _ => return Err("expected a trait object type, e.g. `dyn Trait`"),
    };

    loop {
        match ty {
            Type::Paren(inner) => ty = &inner.elem,
            Type::Group(inner) => ty = &inner.elem,
            _ => break,
        }
    }

    match ty {
        Type::Path(path) if path.qself.is_none() => Ok(&path.path),
        Type::TraitObject(object) => {
            if object.bounds.len() != 1 {
                return Err("additional bounds on the mocked trait are not supported");
            }
            match object.bounds.first() {
                Some(TypeParamBound::Trait(bound))
                    if bound.lifetimes.is_none()
                        && matches!(bound.modifier, TraitBoundModifier::None) =>
                {
                    Ok(&bound.path)
                }
                _ => Err("expected a trait object type, e.g. `dyn Trait`"),
            }
        }
        _ => Err("expected a trait object type, e.g. `dyn Trait`"),
    }
}
