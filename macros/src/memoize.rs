use super::*;

/// Memoize a function.
pub fn expand(mut func: syn::ItemFn) -> Result<proc_macro2::TokenStream> {
    if !func.sig.generics.params.is_empty() {
        bail!(func.sig.generics, "generic functions are not supported");
    }

    if let Some(asyncness) = &func.sig.asyncness {
        bail!(asyncness, "async functions are not supported");
    }

    let mut args = vec![];
    let mut types = vec![];
    for input in &func.sig.inputs {
        let typed = match input {
            syn::FnArg::Typed(typed) => typed,
            syn::FnArg::Receiver(_) => {
                bail!(input, "methods are not supported")
            }
        };

        let name = match typed.pat.as_ref() {
            syn::Pat::Ident(syn::PatIdent {
                by_ref: None,
                mutability: None,
                ident,
                subpat: None,
                ..
            }) => ident,
            pat => bail!(pat, "only simple identifiers are supported"),
        };

        let ty = typed.ty.as_ref();
        match ty {
            syn::Type::Reference(_) => {
                bail!(ty, "reference arguments are not supported, pass an owned value")
            }
            syn::Type::ImplTrait(_) => bail!(ty, "`impl Trait` arguments are not supported"),
            _ => {}
        }

        args.push(name);
        types.push(ty);
    }

    let output = match &func.sig.output {
        syn::ReturnType::Default => quote! { () },
        syn::ReturnType::Type(_, ty) => quote! { #ty },
    };

    // Construct a tuple from all arguments and one from their types.
    let arg_tuple = quote! { (#(#args,)*) };
    let type_tuple = quote! { (#(#types,)*) };

    // Construct assertions that the arguments fulfill the necessary bounds.
    let bounds = types.iter().map(|ty| {
        quote_spanned! { ty.span() =>
            ::recall::internal::assert_key::<#ty>();
        }
    });

    // Construct the inner closure.
    let body = &func.block;
    let closure = quote! { move |#arg_tuple: #type_tuple| -> #output #body };

    // Adjust the function's body.
    let name = func.sig.ident.to_string();
    func.block = parse_quote! { {
        static __RECALL_CACHE: ::recall::internal::Cache<#type_tuple, #output> =
            ::recall::internal::Cache::new();
        #(#bounds)*
        ::recall::internal::cached(#name, &__RECALL_CACHE, #arg_tuple, #closure)
    } };

    Ok(quote! { #func })
}
