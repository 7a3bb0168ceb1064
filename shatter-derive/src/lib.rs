//! Derive macros for the shatter engine.
//!
//! This crate provides two derive macros:
//!
//! - [`InstanceLayout`] - Generates wgpu vertex attributes and WGSL input
//!   fields for a per-instance GPU struct
//! - [`MeshKind`] - Creates `u32` conversions for enums that select a mesh
//!
//! # Usage
//!
//! These macros are re-exported from the main `shatter` crate. You don't need
//! to add this crate directly:
//!
//! ```ignore
//! use shatter::{InstanceLayout, MeshKind};
//!
//! #[repr(C)]
//! #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, InstanceLayout)]
//! #[instance(start_location = 2)]
//! struct Instance {
//!     model: [[f32; 4]; 4],
//!     color: [f32; 4],
//! }
//!
//! #[derive(MeshKind, Clone, Copy, PartialEq)]
//! enum Shape {
//!     Box,
//!     Sphere,
//! }
//! ```
//!
//! # The InstanceLayout Macro
//!
//! `#[derive(InstanceLayout)]` walks the fields in declaration order and
//! assigns consecutive shader locations starting at `start_location`
//! (default 0). Offsets follow `#[repr(C)]` layout; every supported type is a
//! multiple of four bytes so no padding is ever inserted.
//!
//! | Rust type | Vertex format | WGSL type |
//! |-----------|---------------|-----------|
//! | `f32` | `Float32` | `f32` |
//! | `u32` | `Uint32` | `u32` |
//! | `[f32; 2]` | `Float32x2` | `vec2<f32>` |
//! | `[f32; 3]` | `Float32x3` | `vec3<f32>` |
//! | `[f32; 4]` | `Float32x4` | `vec4<f32>` |
//! | `[[f32; 4]; 4]` | 4 × `Float32x4` | 4 × `vec4<f32>` (`name_0` .. `name_3`) |

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitInt, Type};

/// Derive macro for mesh selector enums.
///
/// Variants are assigned sequential IDs starting from 0, which the renderer
/// uses as the index of the mesh an instance is drawn with.
///
/// # Generated Items
///
/// For an enum `Shape`:
///
/// - `impl From<Shape> for u32` - Convert variant to index
/// - `impl From<u32> for Shape` - Convert index to variant (invalid values default to first variant)
/// - `Shape::count() -> u32` - Returns number of variants
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to a struct instead of an enum
/// - Any variant has fields
/// - Enum has zero variants
#[proc_macro_derive(MeshKind)]
pub fn derive_mesh_kind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => panic!("MeshKind derive only supports enums"),
    };

    for variant in variants.iter() {
        if !matches!(variant.fields, Fields::Unit) {
            panic!(
                "MeshKind enum variants must be unit variants (no fields). \
                 Found fields on variant '{}'",
                variant.ident
            );
        }
    }

    let into_arms: Vec<_> = variants
        .iter()
        .enumerate()
        .map(|(i, variant)| {
            let variant_name = &variant.ident;
            let idx = i as u32;
            quote! { #name::#variant_name => #idx }
        })
        .collect();

    let from_arms: Vec<_> = variants
        .iter()
        .enumerate()
        .map(|(i, variant)| {
            let variant_name = &variant.ident;
            let idx = i as u32;
            quote! { #idx => #name::#variant_name }
        })
        .collect();

    let first_variant = &variants
        .first()
        .expect("MeshKind enum must have at least one variant")
        .ident;
    let variant_count = variants.len() as u32;

    let expanded = quote! {
        impl From<#name> for u32 {
            fn from(value: #name) -> u32 {
                match value {
                    #(#into_arms),*
                }
            }
        }

        impl From<u32> for #name {
            fn from(value: u32) -> #name {
                match value {
                    #(#from_arms,)*
                    _ => #name::#first_variant,
                }
            }
        }

        impl #name {
            /// Returns the number of variants in this mesh selector.
            pub const fn count() -> u32 {
                #variant_count
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for per-instance GPU structs.
///
/// Implements `shatter::InstanceData`, producing the `wgpu::VertexAttribute`
/// list and the matching WGSL struct fields so the shader input and the
/// buffer layout can never drift apart.
///
/// # Attributes
///
/// - `#[instance(start_location = N)]` - first shader location (default 0).
///   Use this to leave room for per-vertex attributes.
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to anything but a struct with named fields
/// - A field has an unsupported type
#[proc_macro_derive(InstanceLayout, attributes(instance))]
pub fn derive_instance_layout(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let mut start_location: u32 = 0;
    for attr in &input.attrs {
        if !attr.path().is_ident("instance") {
            continue;
        }
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("start_location") {
                let lit: LitInt = meta.value()?.parse()?;
                start_location = lit.base10_parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported instance attribute"))
            }
        });
        if let Err(e) = parsed {
            return e.to_compile_error().into();
        }
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("InstanceLayout only supports structs with named fields"),
        },
        _ => panic!("InstanceLayout only supports structs"),
    };

    let mut attributes = Vec::new();
    let mut wgsl_fields = String::new();
    let mut offset: u64 = 0;
    let mut location = start_location;

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .expect("named fields always carry an ident")
            .to_string();
        let info = attribute_info(&field.ty);

        for column in 0..info.columns {
            let format = &info.format;
            attributes.push(quote! {
                ::shatter::wgpu::VertexAttribute {
                    format: ::shatter::wgpu::VertexFormat::#format,
                    offset: #offset,
                    shader_location: #location,
                }
            });

            let wgsl_name = if info.columns > 1 {
                format!("{}_{}", field_name, column)
            } else {
                field_name.clone()
            };
            wgsl_fields.push_str(&format!(
                "    @location({}) {}: {},\n",
                location, wgsl_name, info.wgsl_type
            ));

            offset += info.size as u64;
            location += 1;
        }
    }

    let expanded = quote! {
        impl ::shatter::InstanceData for #name {
            const ATTRIBUTES: &'static [::shatter::wgpu::VertexAttribute] = &[
                #(#attributes),*
            ];

            const WGSL_FIELDS: &'static str = #wgsl_fields;
        }
    };

    TokenStream::from(expanded)
}

/// Vertex attribute metadata for one field.
struct AttributeInfo {
    /// `wgpu::VertexFormat` variant name
    format: proc_macro2::TokenStream,
    /// WGSL type of one column
    wgsl_type: &'static str,
    /// Size of one column in bytes
    size: u32,
    /// Number of consecutive locations the field occupies
    columns: u32,
}

/// Map a Rust field type to its vertex format.
fn attribute_info(ty: &Type) -> AttributeInfo {
    let type_str = quote!(#ty).to_string().replace(' ', "");

    match type_str.as_str() {
        "f32" => AttributeInfo {
            format: quote! { Float32 },
            wgsl_type: "f32",
            size: 4,
            columns: 1,
        },
        "u32" => AttributeInfo {
            format: quote! { Uint32 },
            wgsl_type: "u32",
            size: 4,
            columns: 1,
        },
        "[f32;2]" => AttributeInfo {
            format: quote! { Float32x2 },
            wgsl_type: "vec2<f32>",
            size: 8,
            columns: 1,
        },
        "[f32;3]" => AttributeInfo {
            format: quote! { Float32x3 },
            wgsl_type: "vec3<f32>",
            size: 12,
            columns: 1,
        },
        "[f32;4]" => AttributeInfo {
            format: quote! { Float32x4 },
            wgsl_type: "vec4<f32>",
            size: 16,
            columns: 1,
        },
        "[[f32;4];4]" => AttributeInfo {
            format: quote! { Float32x4 },
            wgsl_type: "vec4<f32>",
            size: 16,
            columns: 4,
        },
        _ => panic!("Unsupported type in InstanceLayout struct: {}", type_str),
    }
}
