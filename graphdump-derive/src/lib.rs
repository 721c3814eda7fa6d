//! # graphdump Derive Macros
//!
//! This crate provides the procedural macro for `graphdump`. It generates the
//! `TypeInfo` of a struct together with its `DumpType`, `DumpObject` and
//! `Dumpable` implementations.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitInt, LitStr, parse_macro_input};

/// Derives `DumpType`, `DumpObject` and `Dumpable`.
///
/// Type attributes (`#[dump(...)]` on the struct): `nulls = "skip" | "dump"`,
/// `recurse = "skip" | "dump"`, `default_property = "member"`,
/// `max_depth = N`, `max_entries = N`, `metadata = "path::Type"`, `display`.
///
/// Field attributes: `order = N`, `skip`, `ignore`, `nulls = ...`,
/// `recurse = ...`, `label = "..."`, `display`, `formatter = "name"`,
/// `formatter_owner = "path::Type"`, `max_entries = N`, `enumerate`,
/// `property`, `overridable`, `overrides`, `rename = "name"`, `base`.
#[proc_macro_derive(Dumpable, attributes(dump))]
pub fn derive_dumpable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Dumpable cannot be derived for generic types",
        ));
    }

    let data_struct = match &input.data {
        Data::Struct(ds) => ds,
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "Dumpable only supports structs",
            ));
        }
    };

    let named = match &data_struct.fields {
        Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new(
                name.span(),
                "Dumpable requires named fields",
            ));
        }
    };

    let type_attrs = parse_type_attributes(&input.attrs)?;

    let mut members = Vec::new();
    let mut base: Option<BaseField> = None;
    for field in named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let attrs = parse_field_attributes(&field.attrs)?;
        if attrs.ignore {
            continue;
        }
        if attrs.base {
            if base.is_some() {
                return Err(syn::Error::new(ident.span(), "only one field can be the base"));
            }
            base = Some(BaseField {
                ident,
                ty: field.ty.clone(),
            });
            continue;
        }
        let public = matches!(field.vis, syn::Visibility::Public(_));
        members.push(MemberField {
            member_name: attrs
                .rename
                .clone()
                .unwrap_or_else(|| ident.to_string()),
            ident,
            ty: field.ty.clone(),
            public,
            attrs,
        });
    }

    let impl_type = generate_type_info(name, &type_attrs, &members, base.as_ref());
    let impl_object = generate_object(name, &type_attrs, &members, base.as_ref());

    Ok(quote! {
        #impl_type
        #impl_object

        impl ::graphdump::Dumpable for #name {
            fn dump_value(&self) -> ::graphdump::Value<'_> {
                ::graphdump::Value::Object(self)
            }
        }
    })
}

// --- Internal Data Structures ---

struct BaseField {
    ident: syn::Ident,
    ty: syn::Type,
}

struct MemberField {
    ident: syn::Ident,
    ty: syn::Type,
    member_name: String,
    public: bool,
    attrs: FieldAttrs,
}

#[derive(Default)]
struct TypeAttrs {
    nulls: Option<TokenStream2>,
    recurse: Option<TokenStream2>,
    default_property: Option<LitStr>,
    max_depth: Option<LitInt>,
    max_entries: Option<LitInt>,
    metadata: Option<syn::Path>,
    display: bool,
}

impl TypeAttrs {
    fn has_config(&self) -> bool {
        self.nulls.is_some()
            || self.recurse.is_some()
            || self.default_property.is_some()
            || self.max_depth.is_some()
            || self.max_entries.is_some()
    }
}

#[derive(Default)]
struct FieldAttrs {
    order: Option<syn::Expr>,
    skip: bool,
    ignore: bool,
    nulls: Option<TokenStream2>,
    recurse: Option<TokenStream2>,
    label: Option<LitStr>,
    display: bool,
    formatter: Option<LitStr>,
    formatter_owner: Option<LitStr>,
    max_entries: Option<LitInt>,
    enumerate: bool,
    property: bool,
    overridable: bool,
    overrides: bool,
    rename: Option<String>,
    base: bool,
}

impl FieldAttrs {
    fn has_config(&self) -> bool {
        self.order.is_some()
            || self.skip
            || self.nulls.is_some()
            || self.recurse.is_some()
            || self.label.is_some()
            || self.display
            || self.formatter.is_some()
            || self.max_entries.is_some()
            || self.enumerate
    }
}

fn parse_null_policy(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<TokenStream2> {
    let s: LitStr = meta.value()?.parse()?;
    match s.value().to_lowercase().as_str() {
        "skip" => Ok(quote! { ::graphdump::NullPolicy::Skip }),
        "dump" => Ok(quote! { ::graphdump::NullPolicy::Dump }),
        _ => Err(meta.error("Unknown null policy. Supported: skip, dump")),
    }
}

fn parse_recurse_policy(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<TokenStream2> {
    let s: LitStr = meta.value()?.parse()?;
    match s.value().to_lowercase().as_str() {
        "skip" => Ok(quote! { ::graphdump::RecursePolicy::Skip }),
        "dump" => Ok(quote! { ::graphdump::RecursePolicy::Dump }),
        _ => Err(meta.error("Unknown recursion policy. Supported: skip, dump")),
    }
}

fn parse_type_attributes(attrs: &[Attribute]) -> syn::Result<TypeAttrs> {
    let mut out = TypeAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("dump") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("nulls") {
                out.nulls = Some(parse_null_policy(&meta)?);
                return Ok(());
            }
            if meta.path.is_ident("recurse") {
                out.recurse = Some(parse_recurse_policy(&meta)?);
                return Ok(());
            }
            if meta.path.is_ident("default_property") {
                out.default_property = Some(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("max_depth") {
                out.max_depth = Some(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("max_entries") {
                out.max_entries = Some(meta.value()?.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("metadata") {
                let s: LitStr = meta.value()?.parse()?;
                out.metadata = Some(s.parse()?);
                return Ok(());
            }
            if meta.path.is_ident("display") {
                out.display = true;
                return Ok(());
            }
            Err(meta.error(
                "Unknown dump type attribute. Supported: nulls, recurse, default_property, \
                 max_depth, max_entries, metadata, display",
            ))
        })?;
    }
    Ok(out)
}

fn parse_field_attributes(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("dump") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let path = &meta.path;
            if path.is_ident("order") {
                out.order = Some(meta.value()?.parse()?);
            } else if path.is_ident("skip") {
                out.skip = true;
            } else if path.is_ident("ignore") {
                out.ignore = true;
            } else if path.is_ident("nulls") {
                out.nulls = Some(parse_null_policy(&meta)?);
            } else if path.is_ident("recurse") {
                out.recurse = Some(parse_recurse_policy(&meta)?);
            } else if path.is_ident("label") {
                out.label = Some(meta.value()?.parse()?);
            } else if path.is_ident("display") {
                out.display = true;
            } else if path.is_ident("formatter") {
                out.formatter = Some(meta.value()?.parse()?);
            } else if path.is_ident("formatter_owner") {
                out.formatter_owner = Some(meta.value()?.parse()?);
            } else if path.is_ident("max_entries") {
                out.max_entries = Some(meta.value()?.parse()?);
            } else if path.is_ident("enumerate") {
                out.enumerate = true;
            } else if path.is_ident("property") {
                out.property = true;
            } else if path.is_ident("overridable") {
                out.overridable = true;
            } else if path.is_ident("overrides") {
                out.overrides = true;
            } else if path.is_ident("rename") {
                let s: LitStr = meta.value()?.parse()?;
                out.rename = Some(s.value());
            } else if path.is_ident("base") {
                out.base = true;
            } else {
                return Err(meta.error(
                    "Unknown dump field attribute. Supported: order, skip, ignore, nulls, recurse, \
                     label, display, formatter, formatter_owner, max_entries, enumerate, property, \
                     overridable, overrides, rename, base",
                ));
            }
            Ok(())
        })?;
    }
    if out.formatter_owner.is_some() && out.formatter.is_none() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "formatter_owner requires formatter",
        ));
    }
    Ok(out)
}

// --- Generator: TypeInfo / DumpType ---

fn type_config_expr(attrs: &TypeAttrs) -> Option<TokenStream2> {
    if !attrs.has_config() {
        return None;
    }
    let mut expr = quote! { ::graphdump::TypeDumpConfig::default() };
    if let Some(policy) = &attrs.nulls {
        expr = quote! { #expr.null_values(#policy) };
    }
    if let Some(policy) = &attrs.recurse {
        expr = quote! { #expr.recurse(#policy) };
    }
    if let Some(property) = &attrs.default_property {
        expr = quote! { #expr.default_property(#property) };
    }
    if let Some(depth) = &attrs.max_depth {
        expr = quote! { #expr.max_depth(#depth) };
    }
    if let Some(max) = &attrs.max_entries {
        expr = quote! { #expr.max_entries(#max) };
    }
    Some(expr)
}

fn member_config_expr(attrs: &FieldAttrs) -> Option<TokenStream2> {
    if !attrs.has_config() {
        return None;
    }
    let mut expr = quote! { ::graphdump::MemberDumpConfig::default() };
    if let Some(order) = &attrs.order {
        expr = quote! { #expr.order(#order) };
    }
    if attrs.skip {
        expr = quote! { #expr.skip() };
    }
    if let Some(policy) = &attrs.nulls {
        expr = quote! { #expr.null_values(#policy) };
    }
    if let Some(policy) = &attrs.recurse {
        expr = quote! { #expr.recurse(#policy) };
    }
    if let Some(label) = &attrs.label {
        expr = quote! { #expr.label(#label) };
    }
    if attrs.display {
        expr = quote! { #expr.use_display() };
    }
    if let Some(name) = &attrs.formatter {
        let reference = match &attrs.formatter_owner {
            Some(owner) => quote! { ::graphdump::FormatterRef::owned_by(#name, #owner) },
            None => quote! { ::graphdump::FormatterRef::named(#name) },
        };
        expr = quote! { #expr.formatter(#reference) };
    }
    if let Some(max) = &attrs.max_entries {
        expr = quote! { #expr.max_entries(#max) };
    }
    if attrs.enumerate {
        expr = quote! { #expr.enumerate() };
    }
    Some(expr)
}

fn generate_type_info(
    name: &syn::Ident,
    attrs: &TypeAttrs,
    members: &[MemberField],
    base: Option<&BaseField>,
) -> TokenStream2 {
    let config = type_config_expr(attrs).map(|cfg| quote! { .config(#cfg) });
    let base = base.map(|b| {
        let ty = &b.ty;
        quote! { .base(<#ty as ::graphdump::DumpType>::static_type_info) }
    });
    let metadata = attrs.metadata.as_ref().map(|path| {
        quote! { .metadata(<#path as ::graphdump::DumpType>::static_type_info) }
    });

    let member_decls = members.iter().map(|m| {
        let member_name = &m.member_name;
        let ty = &m.ty;
        let ctor = if m.attrs.property {
            quote! { ::graphdump::MemberDescriptor::property(#member_name) }
        } else {
            quote! { ::graphdump::MemberDescriptor::field(#member_name) }
        };
        let visibility = if m.public {
            quote! { ::graphdump::Visibility::Public }
        } else {
            quote! { ::graphdump::Visibility::Private }
        };
        let config = member_config_expr(&m.attrs).map(|cfg| quote! { .with_config(#cfg) });
        let overridable = m.attrs.overridable.then(|| quote! { .overridable() });
        let overrides = m.attrs.overrides.then(|| quote! { .overrides() });
        quote! {
            .member(
                #ctor
                    .with_visibility(#visibility)
                    .value_type::<#ty>()
                    #config
                    #overridable
                    #overrides
            )
        }
    });

    quote! {
        impl ::graphdump::DumpType for #name {
            fn static_type_info() -> &'static ::graphdump::TypeInfo {
                static INFO: ::graphdump::rt::OnceLock<::graphdump::TypeInfo> =
                    ::graphdump::rt::OnceLock::new();
                INFO.get_or_init(|| {
                    ::graphdump::TypeInfo::builder::<#name>()
                        #config
                        #base
                        #metadata
                        #(#member_decls)*
                        .finish()
                })
            }
        }
    }
}

// --- Generator: DumpObject ---

fn generate_object(
    name: &syn::Ident,
    attrs: &TypeAttrs,
    members: &[MemberField],
    base: Option<&BaseField>,
) -> TokenStream2 {
    let arms = members.iter().map(|m| {
        let member_name = &m.member_name;
        let ident = &m.ident;
        quote! { #member_name => return ::graphdump::rt::field(&self.#ident), }
    });

    let fallback = match base {
        Some(b) => {
            let ident = &b.ident;
            quote! { ::graphdump::DumpObject::read_member(&self.#ident, member) }
        }
        None => quote! { None },
    };

    let display = attrs.display.then(|| {
        quote! {
            fn display(&self) -> Option<String> {
                Some(::std::string::ToString::to_string(self))
            }
        }
    });

    quote! {
        impl ::graphdump::DumpObject for #name {
            fn type_info(&self) -> &'static ::graphdump::TypeInfo {
                <Self as ::graphdump::DumpType>::static_type_info()
            }

            #[allow(clippy::match_single_binding)]
            fn read_member(
                &self,
                member: &::graphdump::MemberDescriptor,
            ) -> Option<::graphdump::MemberValue<'_>> {
                if ::graphdump::rt::answers::<Self>(member) {
                    match member.name() {
                        #(#arms)*
                        _ => {}
                    }
                }
                #fallback
            }

            #display

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    }
}
