//! Template strings: `` `Hello {name}, {count + 1} items` ``.
//!
//! The lexer hands over the raw body. Here it is split into literal text and
//! `{...}` segments; each segment is re-lexed with its real offset and parsed
//! into the same arena. `{{` and `}}` stand for literal braces.

use bind_ir::{Expr, ExprId, ExprKind, Name, Span, TemplatePart};

use crate::{ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    pub(crate) fn parse_template(&mut self, body: Name, span: Span) -> Result<ExprId, ParseError> {
        let text = self.interner.lookup(body);
        let base = span.start + 1;
        let bytes = text.as_bytes();

        let mut head: Option<Name> = None;
        let mut parts: Vec<TemplatePart> = Vec::new();
        let mut pending: Option<ExprId> = None;
        let mut literal = String::new();
        let mut literal_start = 0usize;
        let mut i = 0usize;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    // Escapes are decoded with the whole literal run.
                    let width = text[i + 1..].chars().next().map_or(0, char::len_utf8);
                    literal.push_str(&text[i..i + 1 + width]);
                    i += 1 + width;
                }
                b'{' if bytes.get(i + 1) == Some(&b'{') => {
                    literal.push_str("\\{");
                    i += 2;
                }
                b'}' if bytes.get(i + 1) == Some(&b'}') => {
                    literal.push_str("\\}");
                    i += 2;
                }
                b'}' => {
                    return Err(malformed(base, i, 1, "unmatched `}`"));
                }
                b'{' => {
                    let text_name = self.finish_literal(&literal, base, literal_start)?;
                    match pending.take() {
                        Some(expr) => parts.push(TemplatePart {
                            expr,
                            text_after: text_name,
                        }),
                        None => head = Some(text_name),
                    }
                    literal.clear();

                    let close = segment_end(text, i + 1).ok_or_else(|| {
                        ParseError::new(
                            ParseErrorKind::UnclosedDelimiter {
                                open: point(base, i, 1),
                                delimiter: '{',
                            },
                            point(base, text.len(), 0),
                        )
                    })?;
                    pending = Some(self.parse_segment(&text[i + 1..close], base, i + 1)?);
                    i = close + 1;
                    literal_start = i;
                }
                _ => {
                    let width = text[i..].chars().next().map_or(1, char::len_utf8);
                    literal.push_str(&text[i..i + width]);
                    i += width;
                }
            }
        }

        let tail = self.finish_literal(&literal, base, literal_start)?;
        match pending {
            Some(expr) => parts.push(TemplatePart {
                expr,
                text_after: tail,
            }),
            None => head = Some(tail),
        }

        let parts = self.arena.alloc_template_parts(&parts);
        let kind = ExprKind::Template {
            head: head.unwrap_or(Name::EMPTY),
            parts,
        };
        Ok(self.arena.alloc_expr(Expr::new(kind, span)))
    }

    /// Decode a literal run and intern it.
    fn finish_literal(&self, raw: &str, base: u32, start: usize) -> Result<Name, ParseError> {
        match bind_lexer::unescape(raw) {
            Ok(decoded) => Ok(self.interner.intern(&decoded)),
            Err(err) => Err(ParseError::new(
                ParseErrorKind::MalformedTemplate {
                    reason: "invalid escape sequence",
                },
                point(base, start + err.offset, err.len),
            )),
        }
    }

    /// Lex and parse one `{...}` segment into this parser's arena.
    fn parse_segment(&mut self, source: &str, base: u32, start: usize) -> Result<ExprId, ParseError> {
        let offset = base + u32::try_from(start).unwrap_or(u32::MAX);
        let lexed = bind_lexer::lex_with_offset(source, offset, self.interner);
        if let Some(err) = lexed.errors.into_iter().next() {
            return Err(err.into());
        }

        let arena = std::mem::take(&mut self.arena);
        let mut sub = Parser::new(&lexed.tokens, self.interner, arena);
        let result = sub.parse_expr().and_then(|id| sub.expect_end().map(|()| id));
        self.arena = sub.arena;
        result
    }
}

/// Index of the `}` closing a segment that starts at `from`, skipping
/// quoted strings and characters.
fn segment_end(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'}' => return Some(i),
            None => {}
        }
        i += 1;
    }
    None
}

fn point(base: u32, offset: usize, len: usize) -> Span {
    let start = base + u32::try_from(offset).unwrap_or(u32::MAX - base);
    Span::new(start, start + u32::try_from(len).unwrap_or(0))
}

fn malformed(base: u32, offset: usize, len: usize, reason: &'static str) -> ParseError {
    ParseError::new(
        ParseErrorKind::MalformedTemplate { reason },
        point(base, offset, len),
    )
}
