//! Parsing of generated registration snippets.
//!
//! The documentation generator emits one snippet per library: a nested data
//! literal mapping each subject to its wrapped descriptor fragments, then a
//! trailing `//{...}` comment carrying the splice table (a byte offset plus
//! per-subject fragment lengths) that loaders use to validate and carve the
//! payload. The helpers here recover the mapping without executing anything:
//! descriptor contents pass through opaquely, while broken framing (bad splice
//! table, unparseable fragments) is an error with enough context to name the
//! offending subject or offset.

use crate::mapping::{Descriptor, DescriptorList, ImplementorMapping, Subject};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
/// Out-of-band splice table from the snippet's trailing comment.
///
/// `start` is the byte offset of the first subject fragment within the
/// snippet body; `fragment_lengths` gives the byte length of each fragment in
/// subject order. Fragments are separated by a single comma byte.
pub struct SpliceInfo {
    pub start: usize,
    pub fragment_lengths: Vec<usize>,
}

#[derive(Debug)]
/// Outcome of parsing one generated snippet.
pub struct ParsedSnippet {
    pub mapping: ImplementorMapping,
    pub splice: SpliceInfo,
}

/// Parse a generated registration snippet into its mapping and splice table.
///
/// The splice table is the authority for locating subject fragments, so a
/// snippet whose comment is missing or inconsistent with the payload is
/// rejected outright rather than half-parsed.
pub fn parse_snippet(text: &str) -> Result<ParsedSnippet> {
    let (body, splice) = split_trailing_comment(text)?;
    let fragments = carve_fragments(body, &splice)?;

    let mut mapping = ImplementorMapping::new();
    for (idx, fragment) in fragments.iter().copied().enumerate() {
        let (subject, descriptors) = parse_fragment(fragment)
            .with_context(|| format!("parsing subject fragment {} of the snippet", idx + 1))?;
        if mapping.contains_key(&subject) {
            bail!("snippet registers subject '{subject}' more than once");
        }
        mapping.insert(subject, descriptors);
    }

    Ok(ParsedSnippet { mapping, splice })
}

/// Split off the trailing `//{...}` comment and parse the splice table.
fn split_trailing_comment(text: &str) -> Result<(&str, SpliceInfo)> {
    let trimmed = text.trim_end();
    let comment_at = trimmed
        .rfind("\n//")
        .map(|at| at + 1)
        .or_else(|| trimmed.starts_with("//").then_some(0));
    let Some(comment_at) = comment_at else {
        bail!("snippet is missing the trailing splice comment");
    };

    let comment = &trimmed[comment_at + 2..];
    let splice: SpliceInfo =
        serde_json::from_str(comment).context("parsing the trailing splice comment")?;
    if splice.fragment_lengths.is_empty() {
        bail!("splice table declares no subject fragments");
    }

    Ok((&text[..comment_at], splice))
}

/// Slice the body into per-subject fragments at the advertised offsets.
///
/// Offsets and lengths come straight from the file, so every advance is
/// checked: an overflowing or out-of-bounds table is malformed framing, not a
/// panic. The table must also account for the whole data literal; a table
/// that stops short would silently drop the uncounted subjects.
fn carve_fragments<'a>(body: &'a str, splice: &SpliceInfo) -> Result<Vec<&'a str>> {
    let mut fragments = Vec::with_capacity(splice.fragment_lengths.len());
    let mut offset = splice.start;
    for (idx, length) in splice.fragment_lengths.iter().copied().enumerate() {
        if idx > 0 {
            // One comma byte separates consecutive fragments.
            match body.get(offset..offset + 1) {
                Some(",") => offset += 1,
                _ => bail!(
                    "splice table expects a fragment separator at byte {offset}, found none"
                ),
            }
        }
        let Some(end) = offset.checked_add(length) else {
            bail!(
                "splice table overflows the snippet body: fragment {} at byte {offset}, length {length}",
                idx + 1
            );
        };
        let Some(fragment) = body.get(offset..end) else {
            bail!(
                "splice table points outside the snippet body: fragment {} at byte {offset}, length {length}",
                idx + 1
            );
        };
        fragments.push(fragment);
        offset = end;
    }
    // The data literal closes immediately after the last fragment; anything
    // else means the table undercounts the payload's subjects.
    match body.get(offset..offset + 1) {
        Some("}") => {}
        _ => bail!(
            "splice table stops short of the data literal's closing brace at byte {offset}"
        ),
    }
    Ok(fragments)
}

/// Parse one `"subject":[...]` fragment into its subject and descriptors.
fn parse_fragment(fragment: &str) -> Result<(Subject, DescriptorList)> {
    let value: Value = serde_json::from_str(&format!("{{{fragment}}}"))
        .context("fragment is not a valid object entry")?;
    let Value::Object(map) = value else {
        bail!("fragment did not parse as an object entry");
    };
    if map.len() != 1 {
        bail!("fragment must register exactly one subject, found {}", map.len());
    }
    // Single-entry map; the iterator yields exactly one pair.
    let Some((name, entries)) = map.into_iter().next() else {
        bail!("fragment registered no subject");
    };
    let subject = Subject(name);
    let descriptors = descriptor_list_from_value(&entries)
        .with_context(|| format!("reading descriptors for subject '{subject}'"))?;
    Ok((subject, descriptors))
}

/// Lift a fragment's entry list into descriptors.
///
/// Each entry is either a bare string or a wrapper array whose first element
/// is the descriptor text; either way the text itself stays opaque. Trailing
/// wrapper elements (generator-internal bookkeeping) are ignored.
fn descriptor_list_from_value(value: &Value) -> Result<DescriptorList> {
    let Value::Array(entries) = value else {
        bail!("descriptor list must be an array");
    };
    let mut descriptors = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let text = match entry {
            Value::String(text) => text,
            Value::Array(wrapper) => match wrapper.first() {
                Some(Value::String(text)) => text,
                _ => bail!("descriptor wrapper {} does not lead with a string", idx + 1),
            },
            _ => bail!("descriptor entry {} is neither a string nor a wrapper", idx + 1),
        };
        descriptors.push(Descriptor(text.clone()));
    }
    Ok(descriptors)
}

impl SpliceInfo {
    /// Check that this table carves `text` into fragments that reassemble
    /// into `mapping`.
    ///
    /// Used by loaders that receive the snippet and the mapping through
    /// separate channels and want to confirm they describe the same payload.
    pub fn verify(&self, text: &str, mapping: &ImplementorMapping) -> Result<()> {
        let parsed = parse_snippet(text)?;
        if &parsed.splice != self {
            bail!("snippet carries a different splice table");
        }
        if &parsed.mapping != mapping {
            bail!("snippet payload does not match the expected mapping");
        }
        Ok(())
    }
}
