//! Terminal output sanitization for message contents
//!
//! Message contents come straight from the export and may carry ANSI escape
//! sequences or control characters. Anything printed by `list` or shown in the
//! `purge` progress line goes through [`sanitize`] or [`one_line_preview`] first.

/// Strips ANSI CSI sequences and control characters (tab, newline and carriage
/// return are kept)
///
/// # Examples
///
/// ```
/// use discord_purge::utils::terminal::sanitize;
///
/// assert_eq!(sanitize("\x1b[31mhi\x1b[0m"), "hi");
/// ```
pub fn sanitize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            // ESC [ ... final byte
            if chars.peek() == Some(&'[') {
                chars.next();
                while let Some(next_ch) = chars.next() {
                    if next_ch.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Sanitized single-line preview, truncated to `max_chars` characters
///
/// Line breaks and tabs collapse to spaces; truncation appends `…`.
pub fn one_line_preview(text: &str, max_chars: usize) -> String {
    let clean = sanitize(text);
    let mut flat = String::with_capacity(clean.len().min(max_chars * 4));
    let mut count = 0;

    for ch in clean.chars() {
        if count == max_chars {
            flat.push('…');
            return flat;
        }
        flat.push(if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch });
        count += 1;
    }

    flat
}
