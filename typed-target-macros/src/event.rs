//! `#[derive(Event)]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Field, Fields, Ident, Index, LitStr, Member, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Container arguments: `#[event(name = "...", cancelable)]`.
#[derive(Default)]
struct EventArgs {
    name: Option<String>,
    cancelable: bool,
}

impl Parse for EventArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = EventArgs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "name" => {
                    input.parse::<Token![=]>()?;
                    let lit: LitStr = input.parse()?;
                    if lit.value().is_empty() || lit.value() == "*" {
                        return Err(syn::Error::new(
                            lit.span(),
                            "event name must be non-empty and not the wildcard",
                        ));
                    }
                    args.name = Some(lit.value());
                }
                "cancelable" => args.cancelable = true,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

fn event_args(attrs: &[Attribute]) -> syn::Result<EventArgs> {
    let mut args = EventArgs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("event")) {
        let parsed: EventArgs = attr.parse_args()?;
        if parsed.name.is_some() {
            args.name = parsed.name;
        }
        args.cancelable |= parsed.cancelable;
    }
    Ok(args)
}

fn is_marked_state(field: &Field) -> syn::Result<bool> {
    let mut marked = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("event")) {
        let ident: Ident = attr.parse_args()?;
        if ident != "state" {
            return Err(syn::Error::new(
                ident.span(),
                format!("unknown field attribute: {}", ident),
            ));
        }
        marked = true;
    }
    Ok(marked)
}

fn is_state_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|s| s.ident == "EventState"),
        _ => false,
    }
}

/// Find the field holding the event's `EventState`.
fn state_member(input: &DeriveInput) -> syn::Result<Member> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Event)] can only be used on structs",
            ));
        }
    };

    let member = |index: usize, field: &Field| match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(Index::from(index)),
    };

    let iter: Vec<(usize, &Field)> = match fields {
        Fields::Named(named) => named.named.iter().enumerate().collect(),
        Fields::Unnamed(unnamed) => unnamed.unnamed.iter().enumerate().collect(),
        Fields::Unit => Vec::new(),
    };

    for (index, field) in &iter {
        if is_marked_state(field)? {
            return Ok(member(*index, field));
        }
    }
    let mut typed = iter.iter().filter(|(_, f)| is_state_type(&f.ty));
    match (typed.next(), typed.next()) {
        (Some((index, field)), None) => Ok(member(*index, field)),
        (Some(_), Some((_, second))) => Err(syn::Error::new_spanned(
            second,
            "several `EventState` fields; mark one with #[event(state)]",
        )),
        (None, _) => Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Event)] needs a field of type `EventState`",
        )),
    }
}

/// `UserLogin` -> `user-login`.
fn kebab_case(ident: &Ident) -> String {
    let chars: Vec<char> = ident.to_string().chars().collect();
    let mut out = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !out.ends_with('-') {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // `HTTPRequest` splits before the `R` only.
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Implementation of `#[derive(Event)]`.
pub fn derive_event_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match event_args(&input.attrs) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };
    let state = match state_member(&input) {
        Ok(state) => state,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &input.ident;
    let event_name = args.name.unwrap_or_else(|| kebab_case(name));
    let cancelable = args.cancelable;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::typed_target::NamedEvent for #name #ty_generics #where_clause {
            const TYPE: &'static str = #event_name;
        }

        impl #impl_generics ::typed_target::Event for #name #ty_generics #where_clause {
            fn event_type(&self) -> &str {
                <Self as ::typed_target::NamedEvent>::TYPE
            }

            fn cancelable(&self) -> bool {
                #cancelable
            }

            fn state(&self) -> &::typed_target::EventState {
                &self.#state
            }
        }
    };

    TokenStream::from(expanded)
}
