//! Escape decoding for string, character and template literals.

/// An invalid escape; `offset` is the byte offset of the backslash within
/// the literal body.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EscapeError {
    pub offset: usize,
    pub len: usize,
}

/// Decode `\n \t \r \0 \\ \" \' \` \{ \}` and `\u{XXXX}`.
pub fn unescape(body: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let bad = |len: usize| EscapeError { offset, len };
        let Some((_, escaped)) = chars.next() else {
            return Err(bad(1));
        };
        let decoded = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' | '"' | '\'' | '`' | '{' | '}' => escaped,
            'u' => {
                if chars.next().map(|(_, c)| c) != Some('{') {
                    return Err(bad(2));
                }
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, h)) if h.is_ascii_hexdigit() && hex.len() < 6 => hex.push(h),
                        Some((end, _)) => return Err(bad(end - offset + 1)),
                        None => return Err(bad(body.len() - offset)),
                    }
                }
                let len = hex.len() + 4;
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(bad(len))?
            }
            _ => return Err(bad(1 + escaped.len_utf8())),
        };
        out.push(decoded);
    }

    Ok(out)
}
