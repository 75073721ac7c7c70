//! `#[derive(EventMap)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Implementation of `#[derive(EventMap)]`.
pub fn derive_event_map_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let enum_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let variants = match &input.data {
        Data::Enum(data_enum) => &data_enum.variants,
        _ => {
            return syn::Error::new_spanned(&input, "#[derive(EventMap)] can only be used on enums")
                .to_compile_error()
                .into();
        }
    };
    if variants.is_empty() {
        return syn::Error::new_spanned(&input.ident, "an event map needs at least one variant")
            .to_compile_error()
            .into();
    }

    let mut idents = Vec::new();
    let mut types = Vec::new();
    for variant in variants {
        match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                idents.push(&variant.ident);
                types.push(&fields.unnamed[0].ty);
            }
            _ => {
                return syn::Error::new_spanned(
                    variant,
                    "event map variants must wrap exactly one event: `Variant(Event)`",
                )
                .to_compile_error()
                .into();
            }
        }
    }

    let from_impls = idents.iter().zip(&types).map(|(ident, ty)| {
        quote! {
            impl #impl_generics ::core::convert::From<#ty> for #enum_name #ty_generics #where_clause {
                fn from(event: #ty) -> Self {
                    #enum_name::#ident(event)
                }
            }
        }
    });

    let variant_impls = idents.iter().zip(&types).map(|(ident, ty)| {
        quote! {
            impl #impl_generics ::typed_target::MapVariant<#enum_name #ty_generics> for #ty #where_clause {
                fn project(event: &#enum_name #ty_generics) -> ::core::option::Option<&Self> {
                    match event {
                        #enum_name::#ident(inner) => ::core::option::Option::Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => ::core::option::Option::None,
                    }
                }
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics ::typed_target::Event for #enum_name #ty_generics #where_clause {
            fn event_type(&self) -> &str {
                match self {
                    #(#enum_name::#idents(inner) => ::typed_target::Event::event_type(inner)),*
                }
            }

            fn cancelable(&self) -> bool {
                match self {
                    #(#enum_name::#idents(inner) => ::typed_target::Event::cancelable(inner)),*
                }
            }

            fn state(&self) -> &::typed_target::EventState {
                match self {
                    #(#enum_name::#idents(inner) => ::typed_target::Event::state(inner)),*
                }
            }
        }

        #(#from_impls)*

        #(#variant_impls)*
    };

    TokenStream::from(expanded)
}
