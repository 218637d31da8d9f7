//! `Cookie` request header parsing.

use axum::http::{header, HeaderMap};

/// Iterate `(name, value)` pairs across every `Cookie` header.
pub fn iter(headers: &HeaderMap) -> impl Iterator<Item = (&str, &str)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name, value.trim().trim_matches('"')))
        })
}

/// Value of the first cookie called `name`.
pub fn get<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    iter(headers).find(|(n, _)| *n == name).map(|(_, v)| v)
}

/// Whether the request carries any cookie at all.
pub fn any(headers: &HeaderMap) -> bool {
    iter(headers).next().is_some()
}
