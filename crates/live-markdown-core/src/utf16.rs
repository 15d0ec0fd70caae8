//! UTF-16 code unit helpers.
//!
//! Every offset in this crate is a UTF-16 code unit index, matching the native
//! indexing of the editable surfaces the engine targets. Text is stored as
//! Rust strings (UTF-8) internally, so range math goes through this
//! conversion layer.

/// Length of `text` in UTF-16 code units.
pub(crate) fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 code unit offset into a byte offset into `text`.
///
/// Offsets past the end map to `text.len()`. An offset landing inside a
/// surrogate pair snaps forward to the next character boundary.
pub(crate) fn byte_for_utf16(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte_index, ch) in text.char_indices() {
        if units >= offset {
            return byte_index;
        }
        units += ch.len_utf16();
    }
    text.len()
}

/// Slice `text` by UTF-16 code unit offsets, clamping to the text bounds.
pub(crate) fn slice_utf16(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let start_byte = byte_for_utf16(text, start);
    let end_byte = byte_for_utf16(text, end);
    &text[start_byte..end_byte]
}
