use crate::mock::Mock;
use crate::utils;

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{parse_quote, Ident, ItemImpl, ItemUse, LitStr};

/// Aggregate unit: the dispatcher type and the registry of every generated mock.
#[derive(Debug)]
pub struct Dispatcher {
    unit_ident: Ident,
    self_ident: Ident,
    registrations: Vec<(LitStr, Ident, Ident)>,
}

impl Dispatcher {
    pub fn new(self_ident: Ident) -> Self {
        Self {
            unit_ident: utils::format_aggregate_unit_ident(),
            self_ident,
            registrations: Vec::new(),
        }
    }

    pub fn register(&mut self, key: &str, mock: &Mock) {
        let key = LitStr::new(key, mock.self_ident().span());
        self.registrations
            .push((key, mock.unit_ident().clone(), mock.self_ident().clone()));
    }

    /// `use self::__pinky_ghost::Ghost;`
    pub fn import(&self) -> ItemUse {
        let unit_ident = &self.unit_ident;
        let self_ident = &self.self_ident;
        parse_quote! {
            #[allow(unused_imports)]
            use self::#unit_ident::#self_ident;
        }
    }
}

impl ToTokens for Dispatcher {
    fn to_tokens(&self, dst: &mut TokenStream) {
        let unit_ident = &self.unit_ident;
        let self_ident = &self.self_ident;
        let summon = utils::format_summon_ident();
        let registrations = self.registrations.iter().map(|(key, unit, mock)| {
            quote! { registry.register(#key, super::#unit::#mock::#summon); }
        });

        let self_impl: ItemImpl = parse_quote! {
            impl #self_ident {
                fn registry() -> &'static ::pinky::Registry {
                    static REGISTRY: ::std::sync::OnceLock<::pinky::Registry> =
                        ::std::sync::OnceLock::new();
                    REGISTRY.get_or_init(|| {
                        let mut registry = ::pinky::Registry::new();
                        #(#registrations)*
                        registry
                    })
                }

                /// Mock registered for the calling test function.
                #[track_caller]
                pub fn of<T: ?Sized + 'static>(key: &'static str) -> ::pinky::Ghosted<T> {
                    match Self::registry().summon::<T>(key) {
                        Ok(ghost) => ghost,
                        Err(err) => panic!("{}", err),
                    }
                }

                /// Verifier of `ghost` expecting exactly `count` calls of the
                /// method invoked on it.
                #[track_caller]
                pub fn received<T: ?Sized + 'static>(
                    ghost: &::pinky::Ghosted<T>,
                    count: usize,
                ) -> ::std::boxed::Box<T> {
                    match Self::registry().received::<T>(ghost, count) {
                        Ok(mock) => mock,
                        Err(err) => panic!("{}", err),
                    }
                }

                /// Verifier of `ghost` expecting no call.
                #[track_caller]
                pub fn did_not_receive<T: ?Sized + 'static>(
                    ghost: &::pinky::Ghosted<T>,
                ) -> ::std::boxed::Box<T> {
                    Self::received(ghost, 0)
                }
            }
        };

        let unit = quote! {
            #[doc(hidden)]
            #[allow(non_camel_case_types, non_snake_case, dead_code, unused_mut)]
            mod #unit_ident {
                pub struct #self_ident;

                #self_impl
            }
        };
        unit.to_tokens(dst);
    }
}
