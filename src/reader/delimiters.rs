//! Delimited substring extraction.
//!
//! Hall2De headers nest their payloads in quotes (`"z(m)"`), parentheses and square
//! brackets (`VARLOCATION=([3-4]=CELLCENTERED)`). [`extract_delimited`] pulls the text
//! between one pair of delimiters and reports a typed error when a delimiter is missing
//! instead of returning a truncated token.

use crate::tecplot_errors::FormatErrorKind;

/// Return the text enclosed by the first `open` delimiter of `text` and its matching `close`.
///
/// Characters before the opening delimiter are ignored. When `open` and `close` are the
/// same character (quotes), the next occurrence of `close` ends the token. Otherwise
/// nested pairs are balanced, so `((a)b)` with `(`/`)` yields `(a)b`.
///
/// Arguments
/// -----------------
/// * `text` – The text to scan.
/// * `open` – Opening delimiter.
/// * `close` – Closing delimiter.
///
/// Return
/// ----------
/// * The enclosed substring, borrowed from `text`.
/// * [`FormatErrorKind::MissingDelimiter`] if `open` does not occur in `text`.
/// * [`FormatErrorKind::UnterminatedDelimiter`] if no matching `close` follows it.
///
/// Examples
/// ----------
/// ```rust
/// use hallplot::reader::delimiters::extract_delimited;
///
/// assert_eq!(extract_delimited("VARIABLES = \"z(m)\"", '"', '"'), Ok("z(m)"));
/// assert_eq!(extract_delimited("([3-4]=CELLCENTERED)", '(', ')'), Ok("[3-4]=CELLCENTERED"));
/// assert!(extract_delimited("\"open", '"', '"').is_err());
/// ```
pub fn extract_delimited(text: &str, open: char, close: char) -> Result<&str, FormatErrorKind> {
    let start = text
        .find(open)
        .ok_or_else(|| FormatErrorKind::MissingDelimiter {
            open,
            text: text.to_string(),
        })?
        + open.len_utf8();
    let body = &text[start..];

    let unterminated = || FormatErrorKind::UnterminatedDelimiter {
        close,
        text: text.to_string(),
    };

    if open == close {
        return body.find(close).map(|end| &body[..end]).ok_or_else(unterminated);
    }

    let mut depth = 0usize;
    for (i, c) in body.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return Ok(&body[..i]);
            }
            depth -= 1;
        }
    }
    Err(unterminated())
}
