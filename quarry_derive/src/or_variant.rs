use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{ExprPath, ImplItemFn, visit_mut::VisitMut};

/// Rewrites every `Conjunction::And` path in a method body to `Conjunction::Or`.
struct SwapConjunction;

impl VisitMut for SwapConjunction {
    fn visit_expr_path_mut(&mut self, node: &mut ExprPath) {
        let segments = &mut node.path.segments;
        let len = segments.len();
        if len >= 2 && segments[len - 2].ident == "Conjunction" && segments[len - 1].ident == "And"
        {
            let span = segments[len - 1].ident.span();
            segments[len - 1].ident = syn::Ident::new("Or", span);
        }
        syn::visit_mut::visit_expr_path_mut(self, node);
    }
}

pub fn or_variant_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    // optional ident names the twin
    let rename = if attr.is_empty() {
        None
    } else {
        match syn::parse2::<syn::Ident>(attr) {
            Ok(ident) => Some(ident),
            Err(err) => return err.to_compile_error(),
        }
    };

    let method = match syn::parse2::<ImplItemFn>(item) {
        Ok(method) => method,
        Err(err) => return err.to_compile_error(),
    };

    let name = &method.sig.ident;
    let mut twin = method.clone();
    twin.sig.ident = rename.unwrap_or_else(|| format_ident!("or_{}", name));
    twin.attrs.retain(|attr| !attr.path().is_ident("doc"));
    SwapConjunction.visit_block_mut(&mut twin.block);

    let doc = format!("Same as [`Self::{name}`], joined to the previous clause with `or`.");

    quote! {
        #method

        #[doc = #doc]
        #twin
    }
}
