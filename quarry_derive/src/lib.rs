use proc_macro::TokenStream;

mod or_variant;

/// Emits the annotated builder method and an `or_` prefixed twin joined with `or`.
///
/// `#[or_variant(or_where)]` picks the twin's name explicitly.
#[proc_macro_attribute]
pub fn or_variant(attr: TokenStream, item: TokenStream) -> TokenStream {
    or_variant::or_variant_impl(attr.into(), item.into()).into()
}
