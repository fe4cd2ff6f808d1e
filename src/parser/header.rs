//! RFC 822 header construction: name canonicalization and parameter splitting.

use indexmap::IndexMap;

use crate::model::field::StructuredField;
use crate::model::header::Header;

/// Canonicalize a header name: the first character of every alphanumeric run
/// is uppercased and the rest lowercased; separators pass through.
///
/// Idempotent. `"CoNTent-TYPE"` and `"content-type"` both give `"Content-Type"`.
pub fn canonical_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut at_run_start = true;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if at_run_start {
                canonical.push(c.to_ascii_uppercase());
                at_run_start = false;
            } else {
                canonical.push(c.to_ascii_lowercase());
            }
        } else {
            canonical.push(c);
            at_run_start = true;
        }
    }

    canonical
}

/// Split `raw` on `;` followed by optional whitespace.
///
/// Empty segments (e.g. from a trailing `;`) are dropped.
fn split_parameters(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';')
        .enumerate()
        .map(|(i, segment)| {
            if i == 0 {
                segment
            } else {
                segment.trim_start()
            }
        })
        .filter(|segment| !segment.is_empty())
}

/// Build a [`Header`] from the name and the (possibly unfolded) text after the colon.
///
/// Parameter names keep their spelling (only trimmed); parameter values are
/// structured fields, so quoting and escapes are resolved by [`StructuredField::value`].
pub fn build_header(name: &str, raw_value: &str, line: usize) -> Header {
    let raw = raw_value.trim();
    let value = StructuredField::new(raw);
    let mut parameters = IndexMap::new();

    let value_without_parameters = if raw.contains(';') {
        let mut segments = split_parameters(raw);
        let first = segments.next().unwrap_or_default();

        for param in segments {
            let (param_name, param_value) = param.split_once('=').unwrap_or((param, ""));
            parameters.insert(
                param_name.trim().to_string(),
                StructuredField::new(param_value),
            );
        }

        StructuredField::new(first)
    } else {
        value.clone()
    };

    Header {
        name: canonical_name(name),
        value,
        value_without_parameters,
        parameters,
        line,
    }
}
