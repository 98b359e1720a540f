mod attribute;
mod constant;
mod context;
mod dispatcher;
mod error;
mod extract;
mod ghost_macro;
mod locate;
mod mock;
mod resolve;
mod rewrite;
mod symbols;
mod utils;
mod validate;

use proc_macro::TokenStream;

/// Macro that generates a mock for every `Ghost::of::<dyn Trait>()` found in the
/// tests of the annotated module
///
/// ## Example
/// ```ignore
/// #[pinky::ghost]
/// mod samples {
///     pub trait IWithIntMethod {
///         fn int_method(&self) -> i32;
///     }
///
///     #[test]
///     fn change_int_return() {
///         let instance = Ghost::of::<dyn IWithIntMethod>();
///         instance.int_method().returns(15);
///
///         assert_eq!(instance.int_method(), 15);
///         Ghost::received(&instance, 1).int_method();
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn ghost(args: TokenStream, input: TokenStream) -> TokenStream {
    match ghost_macro::ghost_impl(args.into(), input.into()) {
        Ok(output) => output.into(),
        Err(diags) => diags
            .into_iter()
            .map(|diag| diag.emit_as_item_tokens())
            .collect::<proc_macro2::TokenStream>()
            .into(),
    }
}
