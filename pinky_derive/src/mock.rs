use crate::extract::{MethodSpecification, MockSpecification};
use crate::resolve::TypeDescriptor;
use crate::utils::{self, ImportPath};

use proc_macro2::{Span, TokenStream};
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{parse_quote, Ident, ImplItemFn, ItemImpl, ItemStruct, LitStr, ReturnType, Token};

/// Module holding the generated type of one specification.
#[derive(Debug)]
pub struct Mock {
    unit_ident: Ident,
    self_ident: Ident,
    imports: Vec<ImportPath>,
    trait_unsafety: Option<Token![unsafe]>,
    trait_ident: Ident,
    trait_impl_items: Vec<ImplItemFn>,
}

impl Mock {
    pub fn from_spec(spec: &MockSpecification) -> Self {
        Self {
            unit_ident: utils::format_unit_ident(&spec.generated_name),
            self_ident: Ident::new(&spec.generated_name, Span::call_site()),
            imports: spec.import_surface.iter().cloned().collect(),
            trait_unsafety: spec.contract.unsafety,
            trait_ident: spec.contract.ident.clone(),
            trait_impl_items: spec.methods.iter().map(trait_func).collect(),
        }
    }

    pub fn unit_ident(&self) -> &Ident {
        &self.unit_ident
    }

    pub fn self_ident(&self) -> &Ident {
        &self.self_ident
    }
}

impl ToTokens for Mock {
    fn to_tokens(&self, dst: &mut TokenStream) {
        let unit_ident = &self.unit_ident;
        let self_ident = &self.self_ident;
        let imports = &self.imports;
        let trait_unsafety = &self.trait_unsafety;
        let trait_ident = &self.trait_ident;
        let trait_impl_items = &self.trait_impl_items;
        let summon = utils::format_summon_ident();

        let def: ItemStruct = parse_quote! {
            pub struct #self_ident {
                core: ::std::rc::Rc<::pinky::MockCore>,
                mode: ::pinky::Mode,
            }
        };

        let self_impl: ItemImpl = parse_quote! {
            impl #self_ident {
                pub fn #summon(
                    core: ::std::rc::Rc<::pinky::MockCore>,
                    mode: ::pinky::Mode,
                ) -> ::std::boxed::Box<dyn ::std::any::Any> {
                    let mock: ::std::boxed::Box<dyn #trait_ident> =
                        ::std::boxed::Box::new(Self { core, mode });
                    ::std::boxed::Box::new(mock)
                }
            }
        };

        let trait_impl: ItemImpl = parse_quote! {
            #trait_unsafety impl #trait_ident for #self_ident {
                #(#trait_impl_items)*
            }
        };

        let unit = quote! {
            #[doc(hidden)]
            #[allow(non_camel_case_types, non_snake_case, dead_code, unused_imports)]
            mod #unit_ident {
                #(#imports)*

                #def
                #self_impl
                #trait_impl
            }
        };
        unit.to_tokens(dst);
    }
}

fn trait_func(method: &MethodSpecification) -> ImplItemFn {
    let sig = &method.signature;
    let name = LitStr::new(&method.name.unraw().to_string(), method.name.span());
    let block = trait_func_block(method, &name);

    parse_quote! {
        #[allow(unused_variables)]
        #sig {
            self.core.observe(self.mode, #name, &[]);
            #block
        }
    }
}

/// Value returned after the call is observed: a runtime override, else the
/// configured constant, else the default of the return type.
fn trait_func_block(method: &MethodSpecification, name: &LitStr) -> Option<TokenStream> {
    let ret_ty = match &method.signature.output {
        ReturnType::Type(_, ty) if method.return_type != TypeDescriptor::NoValue => ty,
        _ => return None,
    };

    let value = method
        .configured
        .as_ref()
        .and_then(|value| method.return_type.constant(value))
        .or_else(|| method.return_type.default_value())?;

    if method.returns_borrowed() {
        Some(value)
    } else {
        Some(quote! { self.core.returned::<#ret_ty>(#name, || #value) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::ConstantValue;
    use crate::resolve::{IntKind, Ownership};
    use syn::{parse_quote, Signature};

    fn method(
        sig: Signature,
        return_type: TypeDescriptor,
        configured: Option<ConstantValue>,
    ) -> MethodSpecification {
        MethodSpecification {
            name: sig.ident.clone(),
            signature: sig,
            return_type,
            configured,
        }
    }

    #[test]
    fn void_method_only_observes() {
        let m = method(parse_quote! { fn void_method(&self) }, TypeDescriptor::NoValue, None);
        let expected: ImplItemFn = parse_quote! {
            #[allow(unused_variables)]
            fn void_method(&self) {
                self.core.observe(self.mode, "void_method", &[]);
            }
        };
        assert_eq!(trait_func(&m), expected);
    }

    #[test]
    fn configured_value_goes_through_overrides() {
        let m = method(
            parse_quote! { fn int_method(&self) -> i32 },
            TypeDescriptor::Int(IntKind::I32),
            Some(ConstantValue::Int(15)),
        );
        let expected: ImplItemFn = parse_quote! {
            #[allow(unused_variables)]
            fn int_method(&self) -> i32 {
                self.core.observe(self.mode, "int_method", &[]);
                self.core.returned::<i32>("int_method", || 15)
            }
        };
        assert_eq!(trait_func(&m), expected);
    }

    #[test]
    fn raw_method_name_is_recorded_unraw() {
        let m = method(parse_quote! { fn r#type(&self) }, TypeDescriptor::NoValue, None);
        let expected: ImplItemFn = parse_quote! {
            #[allow(unused_variables)]
            fn r#type(&self) {
                self.core.observe(self.mode, "type", &[]);
            }
        };
        assert_eq!(trait_func(&m), expected);
    }

    #[test]
    fn borrowed_value_is_returned_directly() {
        let m = method(
            parse_quote! { fn name<'a>(&'a self) -> &'a str },
            TypeDescriptor::Str(Ownership::Borrowed),
            None,
        );
        let expected: ImplItemFn = parse_quote! {
            #[allow(unused_variables)]
            fn name<'a>(&'a self) -> &'a str {
                self.core.observe(self.mode, "name", &[]);
                ""
            }
        };
        assert_eq!(trait_func(&m), expected);
    }

    #[test]
    fn unit_layout() {
        let spec = MockSpecification {
            generated_name: "samples_t".to_owned(),
            key: "samples::t".to_owned(),
            contract: crate::extract::ContractSpecification {
                ident: parse_quote!(IWithVoidMethod),
                unsafety: None,
            },
            import_surface: [ImportPath::new(vec![
                "super".to_owned(),
                "IWithVoidMethod".to_owned(),
            ])]
            .into_iter()
            .collect(),
            methods: vec![method(
                parse_quote! { fn void_method(&self) },
                TypeDescriptor::NoValue,
                None,
            )],
            span: Span::call_site(),
        };
        let mock = Mock::from_spec(&spec);
        assert_eq!(mock.unit_ident(), "__pinky_samples_t");
        assert_eq!(mock.self_ident(), "samples_t");

        let unit: syn::ItemMod = syn::parse2(mock.to_token_stream()).unwrap();
        let (_, items) = unit.content.unwrap();
        assert_eq!(items.len(), 4);
        assert!(matches!(&items[0], syn::Item::Use(_)));
        assert!(matches!(&items[3], syn::Item::Impl(item) if item.trait_.is_some()));
    }
}
