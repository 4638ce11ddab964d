use anyhow::Result;

use crate::edit::{self, Edit, EditBuffer};
use crate::pattern::{EnvPattern, ACCESS_PREFIX};

/// Outcome of a rewrite that changed something. `edits` lists every overwrite in
/// original byte offsets; hosts build source maps from it or from `map_offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub code: String,
    pub edits: Vec<Edit>,
}

impl Rewrite {
    /// Offset in [`Rewrite::code`] corresponding to `offset` in the original source.
    pub fn map_offset(&self, offset: usize) -> usize {
        edit::map_offset(&self.edits, offset)
    }
}

/// Replace every eligible `import.meta.env.NAME` in `code` with `<replacement_prefix>NAME`.
///
/// Returns `Ok(None)` when nothing was rewritten, so callers can tell "untouched"
/// apart from "rewritten to the same text".
pub fn rewrite(code: &str, pattern: &EnvPattern, replacement_prefix: &str) -> Result<Option<Rewrite>> {
    if !code.contains(ACCESS_PREFIX) {
        return Ok(None);
    }

    let mut buffer = EditBuffer::new(code);
    for span in pattern.find_spans(code) {
        buffer.overwrite(span.start, span.end, format!("{replacement_prefix}{}", span.name))?;
    }

    if !buffer.has_changed() {
        return Ok(None);
    }
    let (code, edits) = buffer.finish();
    Ok(Some(Rewrite { code, edits }))
}

/// Whole-string variant for callers that do not need edit positions.
pub fn rewrite_to_string(code: &str, pattern: &EnvPattern, replacement_prefix: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut cursor = 0;
    for span in pattern.find_spans(code) {
        out.push_str(&code[cursor..span.start]);
        out.push_str(replacement_prefix);
        out.push_str(span.name);
        cursor = span.end;
    }
    out.push_str(&code[cursor..]);
    out
}
