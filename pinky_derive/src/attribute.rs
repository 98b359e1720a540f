use crate::symbols;
use crate::symbols::Symbol;

use proc_macro2::{Span, TokenStream};
use syn::parse::{Parse, ParseStream, Parser};
use syn::punctuated::Punctuated;
use syn::{Ident, LitStr, Meta, Token};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GhostAttribute {
    Rename(RenameAttribute),
    Returns(ReturnsAttribute),
}

impl Parse for GhostAttribute {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ahead = input.fork();
        let meta = ahead.parse::<Meta>()?;

        if meta.path() == RenameAttribute::symbol() {
            input.parse::<RenameAttribute>().map(GhostAttribute::Rename)
        } else if meta.path() == ReturnsAttribute::symbol() {
            input.parse::<ReturnsAttribute>().map(GhostAttribute::Returns)
        } else {
            Err(syn::Error::new_spanned(meta, "unsupported attribute"))
        }
    }
}

/// Identifiers the analyzer looks for, after applying the macro arguments.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Receiver of the creation marker and name of the generated dispatcher.
    pub dispatcher: Ident,
    /// Method of the configuration pattern.
    pub returns: Ident,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dispatcher: Ident::new(symbols::GHOST.inner(), Span::call_site()),
            returns: Ident::new(symbols::RETURNS.inner(), Span::call_site()),
        }
    }
}

impl Settings {
    pub fn from_args(args: TokenStream) -> Result<Self, syn::Error> {
        let attrs = Punctuated::<GhostAttribute, Token![,]>::parse_terminated.parse2(args)?;

        let mut settings = Settings::default();
        for attr in attrs {
            match attr {
                GhostAttribute::Rename(rename) => settings.dispatcher = rename.ident,
                GhostAttribute::Returns(returns) => settings.returns = returns.ident,
            }
        }
        Ok(settings)
    }
}

fn parse_ident_value(input: ParseStream, expected: Symbol<'static>) -> syn::Result<Ident> {
    let symbol = input.parse::<Ident>()?;
    if symbol != expected {
        return Err(syn::Error::new_spanned(
            symbol,
            format_args!("'{}' expected", expected),
        ));
    }

    let _ = input.parse::<Token![=]>()?;
    let lit = input.parse::<LitStr>()?;
    lit.parse::<Ident>()
}

// ======================= RenameAttribute ======================= //

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RenameAttribute {
    pub ident: Ident,
}

impl RenameAttribute {
    pub fn symbol() -> Symbol<'static> {
        symbols::RENAME
    }
}

impl Parse for RenameAttribute {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident = parse_ident_value(input, Self::symbol())?;
        Ok(RenameAttribute { ident })
    }
}

// ======================= ReturnsAttribute ======================= //

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReturnsAttribute {
    pub ident: Ident,
}

impl ReturnsAttribute {
    pub fn symbol() -> Symbol<'static> {
        symbols::RETURNS
    }
}

impl Parse for ReturnsAttribute {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident = parse_ident_value(input, Self::symbol())?;
        Ok(ReturnsAttribute { ident })
    }
}
