//! Cookie header parsing module
//!
//! Minimal parser for the request `Cookie` header (RFC 6265 syntax, lenient).

use std::collections::HashMap;

/// Parse a `Cookie` header into name/value pairs.
///
/// Pairs are separated by `;`, names and values are trimmed, and values may
/// be surrounded by double quotes. Fragments without a `=` are skipped.
/// A missing header yields an empty map.
pub fn parse_cookie_header(header: Option<&str>) -> HashMap<String, String> {
    let Some(header) = header else {
        return HashMap::new();
    };

    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches('"');
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
