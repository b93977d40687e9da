//! Source-location helpers for case-data diagnostics

use miette::SourceSpan;

/// Convert a 1-based line/column pair, as reported by `serde_json`, to a
/// byte offset in `source`.
///
/// Columns count bytes from the start of the line. Positions past the end of
/// a line clamp to its end and land on a char boundary.
pub fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        0
    } else {
        source
            .match_indices('\n')
            .nth(line - 2)
            .map_or(source.len(), |(i, _)| i + 1)
    };
    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |i| line_start + i);

    let mut offset = (line_start + column.saturating_sub(1)).min(line_end);
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// A one-character span at `offset`, or an empty span at the end of `source`
pub fn point_span(source: &str, offset: usize) -> SourceSpan {
    let offset = offset.min(source.len());
    let len = source[offset..].chars().next().map_or(0, char::len_utf8);
    SourceSpan::from((offset, len))
}

/// Suggest a fix for a JSON parse error in the case literal
pub fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("key must be a string") {
        return Some(
            "Object keys must be double-quoted: use \"id\": \"case_01\" rather than id: \"case_01\""
                .to_string(),
        );
    }

    if msg_lower.contains("trailing comma") {
        return Some("Remove the comma after the last item of the list or object".to_string());
    }

    if msg_lower.contains("expected value") {
        return Some(
            "The case literal must be plain JSON: no comments, no single quotes, no undefined"
                .to_string(),
        );
    }

    if msg_lower.contains("expected `,` or") {
        return Some("Add commas between items: [item1, item2, item3]".to_string());
    }

    if msg_lower.contains("eof while parsing") {
        return Some("A bracket or brace is not closed before the `;`".to_string());
    }

    None
}
