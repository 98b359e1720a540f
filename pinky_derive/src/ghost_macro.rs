use crate::attribute::Settings;
use crate::context::Context;
use crate::dispatcher::Dispatcher;
use crate::error::AnalysisError;
use crate::extract::{extract, MockSpecification};
use crate::locate::locate;
use crate::mock::Mock;
use crate::rewrite::rewrite;

use itertools::Itertools;
use proc_macro2::TokenStream;
use proc_macro2_diagnostics::Diagnostic;
use quote::ToTokens;
use std::collections::BTreeMap;
use syn::{Item, ItemMod};

pub fn ghost_impl(args: TokenStream, input: TokenStream) -> Result<TokenStream, Vec<Diagnostic>> {
    let settings = Settings::from_args(args).map_err(|err| vec![err.into()])?;
    let module = syn::parse2::<ItemMod>(input).map_err(|err| vec![err.into()])?;

    expand(&settings, module).map_err(|errors| {
        errors
            .into_iter()
            .map(AnalysisError::into_diagnostic)
            .collect()
    })
}

/// Analyzes every test function, then rewrites the module and appends the
/// generated units. Nothing is generated if any error is found.
fn expand(settings: &Settings, mut module: ItemMod) -> Result<TokenStream, Vec<AnalysisError>> {
    let specs = {
        let cx = Context::from_ast(settings.clone(), &module).map_err(|err| vec![err])?;
        analyze(&cx)
    };

    let keys = specs
        .as_ref()
        .map(|specs| specs.iter().map(|spec| spec.key.clone()).collect())
        .unwrap_or_default();
    let rewritten = rewrite(settings, &mut module, &keys);

    let specs = match (specs, rewritten) {
        (Ok(specs), Ok(())) => specs,
        (specs, rewritten) => {
            let errors = specs
                .err()
                .into_iter()
                .chain(rewritten.err())
                .flatten()
                .sorted_by_key(|err| err.to_string())
                .collect();
            return Err(errors);
        }
    };

    emit(settings, &mut module, &specs);
    Ok(module.into_token_stream())
}

/// Specification of every test function holding a creation marker, in
/// module order. Fails with every error found if any.
fn analyze(cx: &Context<'_>) -> Result<Vec<MockSpecification>, Vec<AnalysisError>> {
    let mut specs = Vec::new();
    let mut errors = Vec::new();

    for test in cx.tests() {
        let located = locate(&cx.settings, test.item);
        match extract(cx, test, &located) {
            Ok(Some(spec)) => specs.push(spec),
            Ok(None) => {}
            Err(errs) => errors.extend(errs),
        }
    }

    let mut names = BTreeMap::new();
    for spec in &specs {
        if let Some(other) = names.insert(spec.generated_name.clone(), &spec.key) {
            if *other != spec.key {
                errors.push(AnalysisError::DuplicateGeneratedName {
                    span: spec.span,
                    name: spec.generated_name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(specs)
    } else {
        Err(errors)
    }
}

/// Appends one unit per specification, the aggregate unit and its import.
fn emit(settings: &Settings, module: &mut ItemMod, specs: &[MockSpecification]) {
    let mut dispatcher = Dispatcher::new(settings.dispatcher.clone());
    let mut units = Vec::<Item>::new();

    for spec in specs {
        let mock = Mock::from_spec(spec);
        dispatcher.register(&spec.key, &mock);
        units.push(Item::Verbatim(mock.into_token_stream()));
    }

    if let Some((_, items)) = &mut module.content {
        items.insert(0, Item::Use(dispatcher.import()));
        items.extend(units);
        items.push(Item::Verbatim(dispatcher.into_token_stream()));
    }
}
