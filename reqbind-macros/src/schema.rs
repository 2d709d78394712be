//! Schema derive and attribute macro implementation
//!
//! Generates the `reqbind::Schema` trait implementation: field names per
//! data source, key remapping for key/value sources and the uploaded-file
//! overlay.

use crate::utils::apply_rename_all;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, GenericArgument, Ident,
    LitStr, PathArguments, Token, Type,
};

/// How a field can receive uploaded files
#[derive(Clone, Copy)]
enum FileShape {
    Single,
    Sequence,
}

/// Everything the generated impl needs to know about one field
struct FieldSpec {
    ident: Ident,
    rust_name: String,
    serde_name: String,
    query: Option<String>,
    params: Option<String>,
    form: Option<String>,
    file_shape: Option<FileShape>,
    shape: String,
}

impl FieldSpec {
    fn query_name(&self) -> &str {
        self.query.as_deref().unwrap_or(&self.serde_name)
    }

    fn params_name(&self) -> &str {
        self.params.as_deref().unwrap_or(&self.serde_name)
    }

    fn form_name(&self) -> &str {
        self.form.as_deref().unwrap_or(&self.serde_name)
    }
}

/// Implementation of `#[derive(Schema)]`
pub fn derive_schema_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Implementation of the `#[schema]` attribute macro
///
/// ```rust,ignore
/// #[schema]
/// pub struct Upload {
///     pub title: String,
///     pub document: Option<UploadedFile>,
/// }
/// ```
///
/// expands to:
///
/// ```rust,ignore
/// #[derive(Default, ::serde::Deserialize, ::validator::Validate, ::reqbind::Schema)]
/// #[serde(default)]
/// pub struct Upload {
///     pub title: String,
///     #[serde(skip_deserializing)]
///     pub document: Option<UploadedFile>,
/// }
/// ```
pub fn schema_attr_impl(attr: TokenStream, input: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "#[schema] takes no arguments")
            .to_compile_error()
            .into();
    }

    let mut input = parse_macro_input!(input as DeriveInput);

    let fields = match &mut input.data {
        Data::Struct(data) => match &mut data.fields {
            Fields::Named(fields) => fields,
            _ => return named_struct_error(&input.ident, "#[schema]"),
        },
        _ => return named_struct_error(&input.ident, "#[schema]"),
    };

    for field in fields.named.iter_mut() {
        if file_shape(&field.ty).is_some()
            && !has_serde_flag(&field.attrs, &["skip", "skip_deserializing"])
        {
            field.attrs.push(parse_quote!(#[serde(skip_deserializing)]));
        }
    }

    let mut attrs: Vec<Attribute> = vec![parse_quote!(
        #[derive(Default, ::serde::Deserialize, ::validator::Validate, ::reqbind::Schema)]
    )];
    attrs.append(&mut input.attrs);
    if !has_serde_flag(&attrs, &["default"]) {
        attrs.push(parse_quote!(#[serde(default)]));
    }
    input.attrs = attrs;

    quote!(#input).into()
}

fn named_struct_error(ident: &Ident, what: &str) -> TokenStream {
    syn::Error::new_spanned(ident, format!("{} requires a struct with named fields", what))
        .to_compile_error()
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "#[derive(Schema)] requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Schema)] requires a struct with named fields",
            ))
        }
    };

    let rename_all = container_rename_all(&input.attrs)?;
    let specs = fields
        .iter()
        .map(|field| field_spec(field, rename_all.as_deref()))
        .collect::<syn::Result<Vec<_>>>()?;

    let field_name = field_name_fn(&specs);
    let source_key = source_key_fn(&specs);
    let assign_files = assign_files_fn(&specs);

    Ok(quote! {
        impl #impl_generics ::reqbind::Schema for #name #ty_generics #where_clause {
            #field_name
            #source_key
            #assign_files
        }
    })
}

fn field_spec(field: &syn::Field, rename_all: Option<&str>) -> syn::Result<FieldSpec> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
    let rust_name = ident.unraw().to_string();

    let serde_name = match field_rename(&field.attrs)? {
        Some(renamed) => renamed,
        None => rename_all
            .and_then(|rule| apply_rename_all(rule, &rust_name))
            .unwrap_or_else(|| rust_name.clone()),
    };

    let mut spec = FieldSpec {
        ident,
        rust_name,
        serde_name,
        query: None,
        params: None,
        form: None,
        file_shape: file_shape(&field.ty),
        shape: {
            let ty = &field.ty;
            quote!(#ty).to_string().replace(' ', "")
        },
    };

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("query") {
                &mut spec.query
            } else if meta.path.is_ident("params") {
                &mut spec.params
            } else if meta.path.is_ident("form") {
                &mut spec.form
            } else {
                return Err(meta.error("expected `query`, `params` or `form`"));
            };
            *slot = Some(meta.value()?.parse::<LitStr>()?.value());
            Ok(())
        })?;
    }

    Ok(spec)
}

fn field_name_fn(specs: &[FieldSpec]) -> TokenStream2 {
    let mut seen = HashSet::new();
    let arms = specs.iter().filter_map(|spec| {
        let patterns: Vec<&str> = [spec.rust_name.as_str(), spec.serde_name.as_str()]
            .into_iter()
            .filter(|p| seen.insert(p.to_string()))
            .collect();
        if patterns.is_empty() {
            return None;
        }

        let json = &spec.serde_name;
        let query = spec.query_name();
        let params = spec.params_name();
        let form = spec.form_name();
        Some(quote! {
            #(#patterns)|* => ::core::option::Option::Some(match source {
                ::reqbind::Source::Json | ::reqbind::Source::Xml => #json,
                ::reqbind::Source::Query => #query,
                ::reqbind::Source::Params => #params,
                ::reqbind::Source::Body | ::reqbind::Source::Form => #form,
            }),
        })
    });
    let arms: Vec<TokenStream2> = arms.collect();

    quote! {
        fn field_name(field: &str, source: ::reqbind::Source) -> ::core::option::Option<&'static str> {
            match field {
                #(#arms)*
                _ => ::core::option::Option::None,
            }
        }
    }
}

fn source_key_fn(specs: &[FieldSpec]) -> TokenStream2 {
    let key_match = |name_for: fn(&FieldSpec) -> &str| {
        let mut seen = HashSet::new();
        let arms: Vec<TokenStream2> = specs
            .iter()
            .filter(|spec| name_for(*spec) != spec.serde_name)
            .filter(|spec| seen.insert(name_for(*spec).to_string()))
            .map(|spec| {
                let key = name_for(spec);
                let serde_name = &spec.serde_name;
                quote!(#key => ::core::option::Option::Some(#serde_name),)
            })
            .collect();
        quote! {
            match key {
                #(#arms)*
                _ => ::core::option::Option::None,
            }
        }
    };

    let query = key_match(FieldSpec::query_name);
    let params = key_match(FieldSpec::params_name);
    let form = key_match(FieldSpec::form_name);

    quote! {
        fn source_key(key: &str, source: ::reqbind::Source) -> ::core::option::Option<&'static str> {
            match source {
                ::reqbind::Source::Query => #query,
                ::reqbind::Source::Params => #params,
                ::reqbind::Source::Body | ::reqbind::Source::Form => #form,
                ::reqbind::Source::Json | ::reqbind::Source::Xml => ::core::option::Option::None,
            }
        }
    }
}

fn assign_files_fn(specs: &[FieldSpec]) -> TokenStream2 {
    let arms = specs.iter().map(|spec| {
        let name = &spec.rust_name;
        match spec.file_shape {
            Some(_) => {
                let ident = &spec.ident;
                quote! {
                    #name => {
                        ::reqbind::FileSlot::fill(&mut self.#ident, files);
                        ::core::result::Result::Ok(())
                    }
                }
            }
            None => {
                let shape = &spec.shape;
                quote! {
                    #name => ::core::result::Result::Err(
                        ::reqbind::BindError::unsupported_file_field(field, #shape)
                    ),
                }
            }
        }
    });

    let consume = if specs.iter().any(|s| s.file_shape.is_some()) {
        quote!()
    } else {
        quote!(let _ = files;)
    };

    quote! {
        fn assign_files(
            &mut self,
            field: &str,
            files: ::std::vec::Vec<::reqbind::UploadedFile>,
        ) -> ::core::result::Result<(), ::reqbind::BindError> {
            #consume
            match field {
                #(#arms)*
                _ => ::core::result::Result::Err(
                    ::reqbind::BindError::unsupported_file_field(field, "missing")
                ),
            }
        }
    }
}

/// Detect `Option<UploadedFile>` and `Vec<UploadedFile>`
fn file_shape(ty: &Type) -> Option<FileShape> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let Some(GenericArgument::Type(inner)) = args.args.first() else {
        return None;
    };
    if !is_uploaded_file(inner) {
        return None;
    }

    match segment.ident.to_string().as_str() {
        "Option" => Some(FileShape::Single),
        "Vec" => Some(FileShape::Sequence),
        _ => None,
    }
}

fn is_uploaded_file(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "UploadedFile"),
        _ => false,
    }
}

/// Container-level `#[serde(rename_all = "..")]`
fn container_rename_all(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rule = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                rule = deserialize_name(&meta)?.or(rule.take());
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(rule)
}

/// Field-level `#[serde(rename = "..")]`
fn field_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut renamed = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                renamed = deserialize_name(&meta)?.or(renamed.take());
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(renamed)
}

/// Read `key = ".."` or `key(deserialize = "..")`
fn deserialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse::<LitStr>()?.value()));
    }

    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("deserialize") {
            name = Some(inner.value()?.parse::<LitStr>()?.value());
        } else {
            skip_meta_value(&inner)?;
        }
        Ok(())
    })?;
    Ok(name)
}

fn skip_meta_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<TokenStream2>()?;
    }
    Ok(())
}

/// Whether any `#[serde(..)]` attribute carries one of `flags`
fn has_serde_flag(attrs: &[Attribute], flags: &[&str]) -> bool {
    let mut found = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if flags.iter().any(|flag| meta.path.is_ident(flag)) {
                found = true;
            }
            skip_meta_value(&meta)
        });
    }
    found
}
