//! Finds placeholder assignments in a `NAME=VALUE` environment listing.

use std::collections::BTreeMap;

use crate::reference::PLACEHOLDER_PREFIX;

/// Returns `NAME -> VALUE` for every entry whose value is a placeholder.
///
/// Entries are split on the first `=` only. Entries without `=` are skipped.
pub fn find_placeholders<I, S>(environ: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    environ
        .into_iter()
        .filter_map(|entry| {
            let (name, value) = entry.as_ref().split_once('=')?;
            value
                .starts_with(PLACEHOLDER_PREFIX)
                .then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}

/// Renders the current process environment as `NAME=VALUE` strings.
///
/// Variables whose name or value is not valid unicode are skipped.
pub fn process_environ() -> Vec<String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some(format!("{}={}", k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}
