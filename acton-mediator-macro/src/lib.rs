/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */
#![forbid(unsafe_code)]

//! Acton Mediator Macro Library
//!
//! Procedural macros that declare request and event types for `acton-mediator`.
//!
//! # Request Macro
//!
//! ```ignore
//! // A request matched by behaviours on its own type and on `dyn Message`
//! #[mediator_request]
//! pub struct GetBalance {
//!     pub account: String,
//! }
//!
//! // A request that behaviours registered for `dyn Audited` also wrap
//! #[mediator_request(targets(dyn Audited))]
//! pub struct TransferFunds {
//!     pub from: String,
//!     pub to: String,
//! }
//! ```
//!
//! # Event Macro
//!
//! ```ignore
//! #[mediator_event]
//! pub struct FundsTransferred {
//!     pub amount: u64,
//! }
//! ```

use proc_macro::TokenStream;

use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::parse::Parse;
use syn::{parenthesized, parse_macro_input, DeriveInput, Token, Type};

fn has_derive(input: &DeriveInput, trait_name: &str) -> bool {
    input.attrs.iter().any(|attr| {
        if attr.path().is_ident("derive") {
            let mut found = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(trait_name) {
                    found = true;
                }
                Ok(())
            });
            found
        } else {
            false
        }
    })
}

/// `#[derive(Clone, Debug)]`, limited to the traits not already derived.
fn missing_derives(input: &DeriveInput) -> proc_macro2::TokenStream {
    let mut traits = Vec::new();
    if !has_derive(input, "Clone") {
        traits.push(quote!(Clone));
    }
    if !has_derive(input, "Debug") {
        traits.push(quote!(Debug));
    }
    if traits.is_empty() {
        quote!()
    } else {
        quote!(#[derive(#(#traits),*)])
    }
}

/// Compile-time assertion that the annotated type is `Send + Sync + 'static`.
fn bounds_assertion(input: &DeriveInput, prefix: &str) -> proc_macro2::TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let assert_ident = format_ident!("_Assert{}_{}", prefix, name);
    quote! {
        #[doc(hidden)]
        #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::needless_lifetimes)]
        const _: () = {
            fn #assert_ident #impl_generics () #where_clause {
                fn assert_bounds<T: Send + Sync + 'static>() {}
                assert_bounds::<#name #ty_generics>();
            }
        };
    }
}

/// Options parsed from `#[mediator_request(...)]`.
#[derive(Default)]
struct RequestConfig {
    /// Additional behaviour targets, usually trait objects.
    targets: Vec<Type>,
}

impl RequestConfig {
    fn parse(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("targets") {
            let content;
            parenthesized!(content in meta.input);
            let targets = content.parse_terminated(Type::parse, Token![,])?;
            self.targets.extend(targets);
            Ok(())
        } else {
            Err(meta.error("unsupported mediator_request option, expected `targets(...)`"))
        }
    }
}

/// Declares a request type for the mediator.
///
/// # Basic Usage
///
/// ```ignore
/// use acton_mediator::prelude::*;
///
/// #[mediator_request]
/// pub struct Ping;
/// ```
///
/// This expands to:
/// - `#[derive(Clone, Debug)]` (only traits not already present)
/// - `impl Request for Ping {}`
/// - A compile-time assertion that the type is `Send + Sync + 'static`
///
/// # Behaviour Targets
///
/// Every request is wrapped by behaviours registered for its own type and for
/// `dyn Message`. List further targets with `targets(...)`; the type must be
/// viewable as each of them through an unsizing coercion, so each target is
/// normally a trait object the request implements:
///
/// ```ignore
/// pub trait Audited: Message {
///     fn actor(&self) -> &str;
/// }
///
/// #[mediator_request(targets(dyn Audited))]
/// pub struct TransferFunds {
///     pub actor: String,
/// }
///
/// impl Audited for TransferFunds {
///     fn actor(&self) -> &str {
///         &self.actor
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn mediator_request(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut config = RequestConfig::default();
    let config_parser = syn::meta::parser(|meta| config.parse(meta));
    parse_macro_input!(attr with config_parser);

    let input = parse_macro_input!(item as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let derives = missing_derives(&input);
    let assertion = bounds_assertion(&input, "MediatorRequest");

    let targets = &config.targets;
    let body = if targets.is_empty() {
        quote!()
    } else {
        quote! {
            fn behaviour_targets(targets: &mut ::acton_mediator::prelude::Targets<Self>) {
                #(
                    targets.add::<#targets>(
                        |request: ::std::sync::Arc<Self>| -> ::std::sync::Arc<#targets> { request },
                    );
                )*
            }
        }
    };

    let expanded = quote! {
        #derives
        #input

        impl #impl_generics ::acton_mediator::prelude::Request for #name #ty_generics #where_clause {
            #body
        }

        #assertion
    };

    TokenStream::from(expanded)
}

/// Declares an event type for the mediator.
///
/// ```ignore
/// use acton_mediator::prelude::*;
///
/// #[mediator_event]
/// pub struct UserRegistered {
///     pub user_id: u64,
/// }
/// ```
///
/// This expands to:
/// - `#[derive(Clone, Debug)]` (only traits not already present)
/// - A compile-time assertion that the type is `Send + Sync + 'static`
#[proc_macro_attribute]
pub fn mediator_event(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let derives = missing_derives(&input);
    let assertion = bounds_assertion(&input, "MediatorEvent");

    let expanded = quote! {
        #derives
        #input

        #assertion
    };

    TokenStream::from(expanded)
}
