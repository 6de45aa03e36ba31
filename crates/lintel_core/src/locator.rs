//! Offset-to-line/column translation.
//!
//! Diagnostics carry raw byte offsets; front-end consumers want lines and
//! columns. The LSP adapter counts columns in UTF-16 code units while the
//! CLI counts UTF-8 bytes, so the caller picks the unit per query.

use std::cell::OnceCell;

use crate::padded::PaddedString;
use crate::text::TextPos;

/// How to count the column component of a position.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColumnKind {
    /// Columns count UTF-8 bytes since the start of the line.
    Utf8,
    /// Columns count UTF-16 code units since the start of the line.
    Utf16,
}

/// A resolved source position.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SourcePosition {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column in the requested unit.
    pub column: u32,
    /// 0-based byte offset.
    pub offset: TextPos,
}

/// Translates byte offsets in one source buffer into line/column positions.
///
/// Line-start offsets are computed on the first query and cached for the
/// lifetime of the locator. Replacing the buffer means building a new
/// locator, which drops the cache.
pub struct Locator<'s> {
    source: &'s PaddedString,
    line_starts: OnceCell<Vec<TextPos>>,
}

impl<'s> Locator<'s> {
    pub fn new(source: &'s PaddedString) -> Self {
        Self {
            source,
            line_starts: OnceCell::new(),
        }
    }

    /// Resolve a byte offset to a position. Offsets past the end of the
    /// buffer clamp to the end.
    pub fn position(&self, offset: TextPos, column_kind: ColumnKind) -> SourcePosition {
        let offset = offset.min(self.source.len() as TextPos);
        let line_starts = self.line_starts();
        let line_index = match line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_begin = line_starts[line_index];
        let column = match column_kind {
            ColumnKind::Utf8 => offset - line_begin,
            ColumnKind::Utf16 => {
                let line_text = &self.source.as_str()[line_begin as usize..offset as usize];
                line_text.chars().map(|c| c.len_utf16() as u32).sum()
            }
        };
        SourcePosition {
            line: line_index as u32 + 1,
            column: column + 1,
            offset,
        }
    }

    /// The number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    fn line_starts(&self) -> &[TextPos] {
        self.line_starts.get_or_init(|| {
            let mut starts = vec![0 as TextPos];
            let bytes = self.source.as_bytes();
            let mut i = 0;
            while i < bytes.len() {
                match bytes[i] {
                    b'\n' => starts.push(i as TextPos + 1),
                    b'\r' => {
                        if bytes.get(i + 1) == Some(&b'\n') {
                            i += 1;
                        }
                        starts.push(i as TextPos + 1);
                    }
                    // U+2028 and U+2029 encode as E2 80 A8/A9.
                    0xE2 if bytes.get(i + 1) == Some(&0x80)
                        && matches!(bytes.get(i + 2), Some(&0xA8) | Some(&0xA9)) =>
                    {
                        i += 2;
                        starts.push(i as TextPos + 1);
                    }
                    _ => {}
                }
                i += 1;
            }
            starts
        })
    }
}
