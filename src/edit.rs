use anyhow::{bail, Result};

/// A single overwrite of `original[start..end]` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Collects position-tracked overwrites against an original text.
///
/// Edits must be added in ascending order and may not overlap, which is what the
/// match enumeration produces. Untouched bytes are copied verbatim by [`EditBuffer::finish`].
#[derive(Debug)]
pub struct EditBuffer<'a> {
    original: &'a str,
    edits: Vec<Edit>,
}

impl<'a> EditBuffer<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            edits: Vec::new(),
        }
    }

    pub fn overwrite(&mut self, start: usize, end: usize, text: impl Into<String>) -> Result<()> {
        if start > end || end > self.original.len() {
            bail!(
                "edit {start}..{end} is out of bounds for text of length {}",
                self.original.len()
            );
        }
        if !self.original.is_char_boundary(start) || !self.original.is_char_boundary(end) {
            bail!("edit {start}..{end} does not fall on character boundaries");
        }
        if let Some(last) = self.edits.last() {
            if start < last.end {
                bail!(
                    "edit {start}..{end} overlaps or precedes edit {}..{}",
                    last.start,
                    last.end
                );
            }
        }
        self.edits.push(Edit {
            start,
            end,
            text: text.into(),
        });
        Ok(())
    }

    pub fn has_changed(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Apply all edits and hand back the rewritten text together with the edit list.
    pub fn finish(self) -> (String, Vec<Edit>) {
        let delta: isize = self
            .edits
            .iter()
            .map(|e| e.text.len() as isize - (e.end - e.start) as isize)
            .sum();
        let capacity = (self.original.len() as isize + delta).max(0) as usize;

        let mut out = String::with_capacity(capacity);
        let mut cursor = 0;
        for edit in &self.edits {
            out.push_str(&self.original[cursor..edit.start]);
            out.push_str(&edit.text);
            cursor = edit.end;
        }
        out.push_str(&self.original[cursor..]);
        (out, self.edits)
    }
}

/// Map a byte offset in the original text to the matching offset after `edits` were
/// applied. Offsets inside an overwritten range map to the start of its replacement.
pub fn map_offset(edits: &[Edit], offset: usize) -> usize {
    let mut shift: isize = 0;
    for edit in edits {
        if offset < edit.start {
            break;
        }
        if offset < edit.end {
            return (edit.start as isize + shift) as usize;
        }
        shift += edit.text.len() as isize - (edit.end - edit.start) as isize;
    }
    (offset as isize + shift) as usize
}
