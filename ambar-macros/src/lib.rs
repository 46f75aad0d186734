//! Procedural macros for Ambar.
//!
//! `#[derive(Construct)]` registers a struct's constructor with the
//! container: every field is a parameter resolved in declaration order,
//! except fields marked `#[construct(default)]`.

use darling::util::Ignored;
use darling::{FromDeriveInput, FromField, ast};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

#[derive(FromDeriveInput)]
#[darling(attributes(construct), supports(struct_named, struct_tuple, struct_unit))]
struct ConstructInput {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<Ignored, ConstructField>,
    /// Path to the facade crate, for crates that rename it.
    #[darling(rename = "crate")]
    krate: Option<syn::Path>,
}

#[derive(FromField)]
#[darling(attributes(construct))]
struct ConstructField {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    /// Fill with `Default::default()` instead of resolving.
    #[darling(default)]
    default: bool,
}

/// Derives `ambar::Construct` for a struct.
///
/// ```rust,ignore
/// #[derive(Construct)]
/// struct PlayerController {
///     input: Rc<dyn InputSource>,
///     stats: Rc<PlayerStats>,
///     #[construct(default)]
///     frames: u64,
/// }
/// ```
#[proc_macro_derive(Construct, attributes(construct))]
pub fn derive_construct(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ConstructInput::from_derive_input(&input) {
        Ok(parsed) => expand(parsed).into(),
        Err(err) => err.write_errors().into(),
    }
}

fn expand(input: ConstructInput) -> TokenStream2 {
    let krate = input
        .krate
        .unwrap_or_else(|| syn::parse_quote!(::ambar));
    let ident = &input.ident;

    // `Construct: 'static`, so every type parameter must be too.
    let mut generics = input.generics.clone();
    let type_params: Vec<syn::Ident> = generics.type_params().map(|param| param.ident.clone()).collect();
    let predicates = &mut generics.make_where_clause().predicates;
    for param in type_params {
        predicates.push(syn::parse_quote!(#param: 'static));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let Some(fields) = input.data.take_struct() else {
        return darling::Error::unsupported_shape("enum").write_errors();
    };
    let style = fields.style;

    let dependencies = fields
        .iter()
        .filter(|field| !field.default)
        .map(|field| {
            let ty = &field.ty;
            quote! { <#ty as #krate::Injected>::key() }
        });

    let initializers: Vec<TokenStream2> = fields
        .iter()
        .map(|field| {
            if field.default {
                quote! { ::std::default::Default::default() }
            } else {
                let ty = &field.ty;
                quote! { args.take::<#ty>()? }
            }
        })
        .collect();

    let body = match style {
        ast::Style::Struct => {
            let names = fields.iter().map(|field| &field.ident);
            quote! { Self { #( #names: #initializers ),* } }
        }
        ast::Style::Tuple => quote! { Self( #( #initializers ),* ) },
        ast::Style::Unit => quote! { Self },
    };

    quote! {
        impl #impl_generics #krate::Construct for #ident #ty_generics #where_clause {
            fn dependencies() -> ::std::vec::Vec<#krate::DependencyKey> {
                ::std::vec![ #( #dependencies ),* ]
            }

            #[allow(unused_variables)]
            fn construct(args: &mut #krate::Arguments<'_>) -> #krate::Result<Self> {
                ::std::result::Result::Ok(#body)
            }
        }
    }
}
