//! # Polycode Derive Macros
//!
//! This crate provides `#[derive(Codec)]` for `polycode`. The expansion
//! implements the `Codec` trait so a type's wire shape follows directly
//! from its definition:
//!
//! - **Structs:** fields are applied in declaration order, which makes the
//!   derived stream identical to a hand-written field-by-field serializer.
//! - **Fieldless enums:** the variant travels as its `u32` discriminant;
//!   decoding an unknown discriminant fails instead of inventing a
//!   variant.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DataEnum, DataStruct, DeriveInput, Fields, Index};

/// Derives `polycode::Codec`.
#[proc_macro_derive(Codec)]
pub fn derive_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    match input.data {
        Data::Struct(data) => expand_struct(&name, &input.generics, &data),
        Data::Enum(data) => expand_enum(&name, &data),
        Data::Union(_) => syn::Error::new(name.span(), "Codec cannot be derived for unions")
            .to_compile_error()
            .into(),
    }
}

// --- Generator: structs ---

fn expand_struct(name: &syn::Ident, generics: &syn::Generics, data: &DataStruct) -> TokenStream {
    let steps: Vec<proc_macro2::TokenStream> = match &data.fields {
        Fields::Named(fields) => fields
            .named
            .iter()
            .map(|field| {
                let ident = &field.ident;
                quote! { ::polycode::Codec::serialize(archive, &mut value.#ident)?; }
            })
            .collect(),
        Fields::Unnamed(fields) => (0..fields.unnamed.len())
            .map(|position| {
                let index = Index::from(position);
                quote! { ::polycode::Codec::serialize(archive, &mut value.#index)?; }
            })
            .collect(),
        Fields::Unit => Vec::new(),
    };

    // Every type parameter must itself be serializable.
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::polycode::Codec));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    // Unit structs leave both parameters untouched.
    let body = if steps.is_empty() {
        quote! {
            let _ = archive;
            let _ = value;
            ::core::result::Result::Ok(())
        }
    } else {
        quote! {
            #(#steps)*
            ::core::result::Result::Ok(())
        }
    };

    let expanded = quote! {
        #[automatically_derived]
        impl #impl_generics ::polycode::Codec for #name #ty_generics #where_clause {
            fn serialize<__A: ::polycode::Archive>(
                archive: &mut __A,
                value: &mut Self,
            ) -> ::polycode::Result<()> {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}

// --- Generator: fieldless enums ---

fn expand_enum(name: &syn::Ident, data: &DataEnum) -> TokenStream {
    if data.variants.is_empty() {
        return syn::Error::new(
            name.span(),
            "Codec cannot be derived for enums with no variants",
        )
        .to_compile_error()
        .into();
    }

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(
                variant.ident.span(),
                "Codec can only be derived for enums with fieldless variants",
            )
            .to_compile_error()
            .into();
        }
    }

    let save_arms = data.variants.iter().map(|variant| {
        let ident = &variant.ident;
        quote! { #name::#ident => #name::#ident as u32, }
    });

    let load_arms = data.variants.iter().map(|variant| {
        let ident = &variant.ident;
        quote! { tag if tag == #name::#ident as u32 => #name::#ident, }
    });

    let expanded = quote! {
        #[automatically_derived]
        impl ::polycode::Codec for #name {
            fn serialize<__A: ::polycode::Archive>(
                archive: &mut __A,
                value: &mut Self,
            ) -> ::polycode::Result<()> {
                match <__A as ::polycode::Archive>::KIND {
                    ::polycode::ArchiveKind::Saving => {
                        let mut tag: u32 = match *value { #(#save_arms)* };
                        ::polycode::Codec::serialize(archive, &mut tag)
                    }
                    ::polycode::ArchiveKind::Loading => {
                        let mut tag: u32 = 0;
                        ::polycode::Codec::serialize(archive, &mut tag)?;
                        *value = match tag {
                            #(#load_arms)*
                            unknown => {
                                return ::core::result::Result::Err(
                                    ::polycode::PolycodeError::Malformed(::std::format!(
                                        "unknown discriminant {} for enum {}",
                                        unknown,
                                        ::core::stringify!(#name),
                                    )),
                                )
                            }
                        };
                        ::core::result::Result::Ok(())
                    }
                }
            }
        }
    };

    TokenStream::from(expanded)
}
