use anyhow::{Context, Result};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::LitInt;

/// `0xXXXX_XXXX` literal, the way register addresses are written by hand.
pub fn hex_literal(value: u32) -> LitInt {
    LitInt::new(
        &format!("0x{:04X}_{:04X}", value >> 16, value & 0xFFFF),
        Span::call_site(),
    )
}

/// `#[doc]` attributes, one per line.
pub fn doc_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> TokenStream {
    let lines = lines.into_iter().map(|line| format!(" {line}"));
    quote! { #(#[doc = #lines])* }
}

/// Pretty print a generated Rust file, prefixed with the `@generated` marker.
pub fn unparse(generator: &str, tokens: TokenStream) -> Result<String> {
    let file: syn::File = syn::parse2(tokens)
        .with_context(|| format!("{generator} produced invalid Rust"))?;
    Ok(format!(
        "// @generated by {generator}, do not edit\n\n{}",
        prettyplease::unparse(&file)
    ))
}
