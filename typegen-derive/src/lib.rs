//! Derive macro for typegen.
//!
//! `#[derive(Derivable)]` writes the builder descriptor that the
//! derivation engine consumes, so user types need no hand-written
//! `Derivable` impl.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DataEnum, DeriveInput, Fields, Ident};

const MAX_FIELDS: usize = 12;

/// Derive `typegen::Derivable`.
///
/// - Fieldless enums derive as a uniform choice among their variants.
/// - Structs derive through one constructor taking every field in
///   declaration order.
/// - `#[derivable(mutate)]` on a struct with named fields derives through
///   `Default::default()` followed by one setter per field instead.
///
/// Every field type must itself implement `Derivable`.
///
/// # Example
///
/// ```rust,ignore
/// use typegen::*;
///
/// #[derive(Derivable, Debug, Clone, PartialEq)]
/// enum Gender {
///     Male,
///     Female,
///     Other,
/// }
///
/// #[derive(Derivable, Debug)]
/// struct Patient {
///     id: Uuid,
///     gender: Gender,
///     visits: Vec<NaiveDate>,
/// }
///
/// let gen = Registry::new().derive::<Patient>()?;
/// ```
#[proc_macro_derive(Derivable, attributes(derivable))]
pub fn derive_derivable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derivable_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the implementation of the Derivable trait.
fn derivable_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let mutate = parse_options(input)?;

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::typegen::Derivable));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let shape = match &input.data {
        Data::Struct(data) if mutate => mutate_shape(input, &data.fields)?,
        Data::Struct(data) => constructor_shape(&data.fields)?,
        Data::Enum(data) if mutate => {
            return Err(syn::Error::new_spanned(
                &data.enum_token,
                "#[derivable(mutate)] applies to structs only",
            ));
        }
        Data::Enum(data) => enumerated_shape(data)?,
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Derivable cannot be derived for unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::typegen::Derivable for #name #ty_generics #where_clause {
            fn shape() -> ::typegen::Shape<Self> {
                #shape
            }
        }
    })
}

/// Read the container-level `#[derivable(...)]` options.
fn parse_options(input: &DeriveInput) -> Result<bool, syn::Error> {
    let mut mutate = false;
    for attr in &input.attrs {
        if !attr.path().is_ident("derivable") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("mutate") {
                mutate = true;
                Ok(())
            } else {
                Err(meta.error("unsupported derivable option, expected `mutate`"))
            }
        })?;
    }
    Ok(mutate)
}

fn enumerated_shape(data: &DataEnum) -> Result<TokenStream2, syn::Error> {
    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Derivable supports fieldless enums only",
            ));
        }
        variants.push(&variant.ident);
    }

    Ok(quote! {
        ::typegen::Shape::Enumerated(::typegen::Variants::with_duplicate(
            vec![#(Self::#variants),*],
            |value| match *value {
                #(Self::#variants => Self::#variants,)*
            },
        ))
    })
}

fn constructor_shape(fields: &Fields) -> Result<TokenStream2, syn::Error> {
    check_arity(fields)?;

    let vars: Vec<Ident> = (0..fields.len())
        .map(|i| Ident::new(&format!("field_{i}"), Span::call_site()))
        .collect();
    let types = fields.iter().map(|field| &field.ty);

    let construct = match fields {
        Fields::Named(named) => {
            let names = named.named.iter().map(|field| &field.ident);
            quote! { Self { #(#names: #vars),* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#vars),*) },
        Fields::Unit => quote! { Self },
    };

    Ok(quote! {
        ::typegen::Shape::Composite(
            ::typegen::Composite::new()
                .constructor(|(#(#vars,)*): (#(#types,)*)| #construct)
        )
    })
}

fn mutate_shape(input: &DeriveInput, fields: &Fields) -> Result<TokenStream2, syn::Error> {
    let Fields::Named(named) = fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "#[derivable(mutate)] requires named fields",
        ));
    };

    let setters = named.named.iter().map(|field| {
        let name = &field.ident;
        let ty = &field.ty;
        quote! {
            .setter(|target: &mut Self, value: #ty| target.#name = value)
        }
    });

    Ok(quote! {
        ::typegen::Shape::Composite(
            ::typegen::Composite::new()
                .constructor(|(): ()| <Self as ::core::default::Default>::default())
                #(#setters)*
        )
    })
}

fn check_arity(fields: &Fields) -> Result<(), syn::Error> {
    if fields.len() > MAX_FIELDS {
        return Err(syn::Error::new_spanned(
            fields,
            format!("Derivable supports at most {MAX_FIELDS} fields, use #[derivable(mutate)] or a manual impl"),
        ));
    }
    Ok(())
}
