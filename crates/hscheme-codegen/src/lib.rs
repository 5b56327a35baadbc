// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Struct-level `#[scheme(...)]` options
#[derive(Default)]
struct StructAttrs {
    /// Kind name used by `add_known_type` (defaults to the struct name)
    kind: Option<String>,
    /// Canonical type this struct converts to and from, field by field
    hub: Option<syn::Path>,
}

/// Field-level `#[scheme(...)]` options
#[derive(Default)]
struct FieldAttrs {
    /// Field may be absent from a conversion source
    optional: bool,
    /// Field is invisible to reflection and hub conversions
    skip: bool,
}

struct FieldInfo {
    ident: syn::Ident,
    name: String,
    optional: bool,
}

/// Reflected fields of a struct, plus whether any field was skipped
struct StructFields {
    fields: Vec<FieldInfo>,
    has_skipped: bool,
}

fn parse_struct_attrs(input: &DeriveInput) -> syn::Result<StructAttrs> {
    let mut attrs = StructAttrs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("scheme")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("kind must not be empty"));
                }
                attrs.kind = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("hub") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.hub = Some(lit.parse::<syn::Path>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported scheme attribute, expected `kind` or `hub`"))
            }
        })?;
    }
    Ok(attrs)
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("scheme")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("optional") {
                attrs.optional = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported scheme field attribute, expected `optional` or `skip`"))
            }
        })?;
    }
    Ok(attrs)
}

/// Collect the reflected fields of a plain named struct
fn struct_fields(input: &DeriveInput) -> syn::Result<StructFields> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Generic structs are not supported",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            Fields::Unit => {
                return Ok(StructFields {
                    fields: Vec::new(),
                    has_skipped: false,
                })
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only named fields are supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "Only structs are supported")),
    };

    let mut infos = Vec::new();
    let mut has_skipped = false;
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let attrs = parse_field_attrs(field)?;
        if attrs.skip {
            has_skipped = true;
            continue;
        }
        let name = ident.to_string();
        let name = name.strip_prefix("r#").unwrap_or(&name).to_string();
        infos.push(FieldInfo {
            ident: ident.clone(),
            name,
            optional: attrs.optional,
        });
    }
    Ok(StructFields {
        fields: infos,
        has_skipped,
    })
}

/// `#[derive(Reflect)]`: structural access for the conversion and copy engines
///
/// Generates `hscheme::Reflect` and `hscheme::Struct` for a named struct.
/// Every non-skipped field type must itself implement `Reflect`.
///
/// Attributes:
/// - `#[scheme(optional)]` on a field: the field may be missing from a
///   conversion source without failing the conversion
/// - `#[scheme(skip)]` on a field: hidden from reflection. Structural
///   conversions and hub functions leave the destination's field untouched
///   (a fresh destination keeps its `Default`). Deep copies of the struct
///   fail with `NoDeepCopyFunc` unless a `DeepCopyFunc` is registered for it
/// - `#[scheme(hub = "path::Canonical")]` on the struct: also generates
///   `hub_conversion_funcs()`, two field-by-field conversion functions
///   between this type and the canonical type
///
/// Example:
/// ```ignore
/// use hscheme::{Reflect, TypeMeta};
///
/// #[derive(Debug, Default, Reflect)]
/// #[scheme(hub = "crate::internal::Widget")]
/// struct Widget {
///     type_meta: TypeMeta,
///     name: String,
///     #[scheme(optional)]
///     labels: Option<Vec<String>>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(scheme))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_reflect(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_reflect(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let struct_attrs = parse_struct_attrs(input)?;
    let StructFields {
        fields,
        has_skipped,
    } = struct_fields(input)?;

    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    let idents: Vec<_> = fields.iter().map(|f| &f.ident).collect();
    let optional: Vec<_> = fields
        .iter()
        .filter(|f| f.optional)
        .map(|f| f.name.as_str())
        .collect();

    let hub_funcs = match &struct_attrs.hub {
        Some(hub) => quote! {
            impl #name {
                /// Field-by-field conversions between this type and its canonical type
                pub fn hub_conversion_funcs() -> ::std::vec::Vec<::hscheme::ConversionFunc> {
                    ::std::vec![
                        ::hscheme::ConversionFunc::new::<#name, #hub, _>(|src, dst, scope| {
                            #( scope.convert(&src.#idents, &mut dst.#idents, ::hscheme::FieldMatchingFlags::DEST_FROM_SOURCE)?; )*
                            ::std::result::Result::Ok(())
                        }),
                        ::hscheme::ConversionFunc::new::<#hub, #name, _>(|src, dst, scope| {
                            #( scope.convert(&src.#idents, &mut dst.#idents, ::hscheme::FieldMatchingFlags::DEST_FROM_SOURCE)?; )*
                            ::std::result::Result::Ok(())
                        }),
                    ]
                }
            }
        },
        None => quote! {},
    };

    Ok(quote! {
        impl ::hscheme::Reflect for #name {
            fn type_name(&self) -> &'static str {
                ::std::concat!(::std::module_path!(), "::", ::std::stringify!(#name))
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn reflect_ref(&self) -> ::hscheme::ReflectRef<'_> {
                ::hscheme::ReflectRef::Struct(self)
            }

            fn reflect_mut(&mut self) -> ::hscheme::ReflectMut<'_> {
                ::hscheme::ReflectMut::Struct(self)
            }

            fn fill_from(
                &mut self,
                src: &dyn ::hscheme::Reflect,
                walker: &mut dyn ::hscheme::Walker,
            ) -> ::hscheme::Result<()> {
                ::hscheme::reflect::fill_struct(self, src, walker)
            }
        }

        impl ::hscheme::Struct for #name {
            fn field_names(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }

            #[allow(unused_variables)]
            fn field(&self, name: &str) -> ::std::option::Option<&dyn ::hscheme::Reflect> {
                match name {
                    #( #names => ::std::option::Option::Some(&self.#idents), )*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn field_mut(&mut self, name: &str) -> ::std::option::Option<&mut dyn ::hscheme::Reflect> {
                match name {
                    #( #names => ::std::option::Option::Some(&mut self.#idents), )*
                    _ => ::std::option::Option::None,
                }
            }

            fn is_optional_field(&self, name: &str) -> bool {
                let optional: &[&str] = &[#(#optional),*];
                optional.contains(&name)
            }

            fn has_skipped_fields(&self) -> bool {
                #has_skipped
            }
        }

        #hub_funcs
    })
}

/// `#[derive(Object)]`: a top-level registrable object
///
/// Requires `Reflect`, `Default`, `Debug`, `serde::Serialize` and
/// `serde::Deserialize` on the same struct. The kind defaults to the struct
/// name and can be overridden with `#[scheme(kind = "...")]`.
#[proc_macro_derive(Object, attributes(scheme))]
pub fn derive_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_object(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_object(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Generic structs are not supported",
        ));
    }
    if !matches!(input.data, Data::Struct(_)) {
        return Err(syn::Error::new_spanned(input, "Only structs are supported"));
    }
    let struct_attrs = parse_struct_attrs(input)?;
    let kind = struct_attrs.kind.unwrap_or_else(|| name.to_string());

    Ok(quote! {
        impl ::hscheme::Object for #name {
            fn default_kind() -> &'static str
            where
                Self: Sized,
            {
                #kind
            }

            fn new_empty(&self) -> ::std::boxed::Box<dyn ::hscheme::Object> {
                ::std::boxed::Box::new(<#name as ::std::default::Default>::default())
            }

            fn encode_json(&self) -> ::hscheme::Result<::std::vec::Vec<u8>> {
                ::hscheme::__private::serde_json::to_vec(self).map_err(::hscheme::Error::Json)
            }

            fn decode_json(&mut self, data: &[u8]) -> ::hscheme::Result<()> {
                *self = ::hscheme::__private::serde_json::from_slice(data).map_err(::hscheme::Error::Json)?;
                ::std::result::Result::Ok(())
            }

            fn as_reflect(&self) -> &dyn ::hscheme::Reflect {
                self
            }

            fn as_reflect_mut(&mut self) -> &mut dyn ::hscheme::Reflect {
                self
            }

            fn as_struct_mut(&mut self) -> &mut dyn ::hscheme::Struct {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }
    })
}
