//! Line scanner for Python source.
//!
//! The scanner walks a file one physical line at a time and reports a
//! [`LineEvent`] for each line: whether it is blank or a comment, whether it
//! starts or finishes a logical line, and how it relates to string literals
//! (a leading literal, a triple-quoted literal that is opened, continued or
//! closed). State that spans lines is kept in the scanner itself:
//!
//! - the [`LexState`] (inside a triple-quoted literal or not),
//! - the bracket depth, for implicit line joining,
//! - whether the previous line ended with a `\` line join.
//!
//! The scanner only lexes. Whether a literal is a docstring is decided by
//! [`crate::docstring`].

/// Quote character of a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// `'`
    Single,
    /// `"`
    Double,
}

impl Quote {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'\'' => Some(Quote::Single),
            b'"' => Some(Quote::Double),
            _ => None,
        }
    }

    fn byte(self) -> u8 {
        match self {
            Quote::Single => b'\'',
            Quote::Double => b'"',
        }
    }
}

/// The scanner's running state between lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    /// Outside any multi-line literal.
    #[default]
    Normal,
    /// Inside a triple-quoted literal that opened on an earlier line.
    InTripleString { quote: Quote },
}

/// How a line that began inside a triple-quoted literal relates to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resumed {
    /// The literal is still open at the end of the line.
    Continues,
    /// The literal closes on this line.
    Closes {
        /// Only whitespace or a comment follows the closing delimiter.
        bare: bool,
    },
}

/// Where a leading string literal ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralEnd {
    /// The literal closes on its opening line. `bare` when only whitespace
    /// or a comment follows it.
    SameLine { bare: bool },
    /// A triple-quoted literal that is still open at the end of the line.
    Later,
}

/// A string literal that is the first token of a statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingLiteral {
    pub quote: Quote,
    pub triple: bool,
    /// The prefix (if any) is one a docstring may carry: none, `r` or `u`.
    pub docstring_prefix: bool,
    pub end: LiteralEnd,
}

/// What the scanner saw on one physical line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEvent {
    /// Indentation width in columns (tabs advance to the next multiple of 8).
    pub indent: usize,
    /// The line holds only whitespace.
    pub blank: bool,
    /// The first non-whitespace character is an unquoted `#`.
    pub comment_only: bool,
    /// Byte offset of an unquoted `#`, if any.
    pub comment_at: Option<usize>,
    /// The line begins a new logical line.
    pub starts_statement: bool,
    /// No logical line is left open at the end of this line.
    pub ends_statement: bool,
    /// The last significant character outside strings and comments is `:`.
    pub ends_with_colon: bool,
    /// Set when the line began inside a triple-quoted literal.
    pub resumed: Option<Resumed>,
    /// A string literal that begins this statement line.
    pub leading: Option<LeadingLiteral>,
    /// Quote of a triple-quoted literal left open at the end of the line.
    pub opened: Option<Quote>,
}

/// Stateful line scanner. Feed it lines in file order.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    state: LexState,
    depth: usize,
    joined: bool,
}

impl Scanner {
    /// Create a scanner positioned at the start of a file.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current lexical state.
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Scan one physical line (without its terminator).
    pub fn scan_line(&mut self, text: &str) -> LineEvent {
        let bytes = text.as_bytes();
        let mut event = LineEvent {
            indent: indent_width(text),
            blank: text.trim().is_empty(),
            ..Default::default()
        };

        let mut pos = 0;
        let mut leading_at = None;

        if let LexState::InTripleString { quote } = self.state {
            match find_triple_close(bytes, 0, quote) {
                Some(end) => {
                    self.state = LexState::Normal;
                    event.resumed = Some(Resumed::Closes {
                        bare: is_bare_tail(&bytes[end..]),
                    });
                    pos = end;
                }
                None => {
                    event.resumed = Some(Resumed::Continues);
                    return event;
                }
            }
        } else {
            event.comment_only = text.trim_start().starts_with('#');
            event.starts_statement =
                !event.blank && !event.comment_only && self.depth == 0 && !self.joined;
            if event.starts_statement {
                leading_at = leading_literal_start(text);
            }
        }

        let mut last_significant = None;

        while pos < bytes.len() {
            let byte = bytes[pos];
            if let Some(quote) = Quote::from_byte(byte) {
                let leading = leading_at.filter(|(at, _)| *at == pos);
                let triple = bytes[pos..].starts_with(&[byte; 3]);
                let end = if triple {
                    find_triple_close(bytes, pos + 3, quote)
                } else {
                    Some(skip_single(bytes, pos + 1, quote))
                };

                match end {
                    Some(end) => {
                        if let Some((_, docstring_prefix)) = leading {
                            event.leading = Some(LeadingLiteral {
                                quote,
                                triple,
                                docstring_prefix,
                                end: LiteralEnd::SameLine {
                                    bare: is_bare_tail(&bytes[end..]),
                                },
                            });
                        }
                        last_significant = Some(byte);
                        pos = end;
                    }
                    None => {
                        if let Some((_, docstring_prefix)) = leading {
                            event.leading = Some(LeadingLiteral {
                                quote,
                                triple,
                                docstring_prefix,
                                end: LiteralEnd::Later,
                            });
                        }
                        self.state = LexState::InTripleString { quote };
                        event.opened = Some(quote);
                        last_significant = None;
                        break;
                    }
                }
                continue;
            }

            match byte {
                b'#' => {
                    event.comment_at = Some(pos);
                    break;
                }
                b'(' | b'[' | b'{' => self.depth += 1,
                b')' | b']' | b'}' => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
            if !byte.is_ascii_whitespace() {
                last_significant = Some(byte);
            }
            pos += 1;
        }

        let open = matches!(self.state, LexState::InTripleString { .. });
        self.joined = !open && event.comment_at.is_none() && last_significant == Some(b'\\');
        event.ends_statement = !open && self.depth == 0 && !self.joined;
        event.ends_with_colon = last_significant == Some(b':');

        event
    }
}

/// Indentation width of a line in columns.
fn indent_width(text: &str) -> usize {
    let mut width = 0;
    for c in text.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / 8 + 1) * 8,
            _ => break,
        }
    }
    width
}

/// Locate a string literal that is the first token of the line.
///
/// Returns the byte offset of its opening quote and whether its prefix is
/// one a docstring may carry.
fn leading_literal_start(text: &str) -> Option<(usize, bool)> {
    let start = text.len() - text.trim_start().len();
    let rest = &text.as_bytes()[start..];
    let prefix_len = rest.iter().take_while(|b| b.is_ascii_alphabetic()).count();

    if prefix_len > 2 || Quote::from_byte(*rest.get(prefix_len)?).is_none() {
        return None;
    }

    let prefix = text[start..start + prefix_len].to_ascii_lowercase();
    let docstring_prefix = match prefix.as_str() {
        "" | "r" | "u" => true,
        "b" | "f" | "br" | "rb" | "fr" | "rf" => false,
        _ => return None,
    };

    Some((start + prefix_len, docstring_prefix))
}

/// Find the end (exclusive) of a triple-quoted literal, searching from `from`.
fn find_triple_close(bytes: &[u8], from: usize, quote: Quote) -> Option<usize> {
    let q = quote.byte();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == q && bytes[i..].starts_with(&[q; 3]) => return Some(i + 3),
            _ => i += 1,
        }
    }
    None
}

/// Find the end (exclusive) of a single-quoted literal. An unterminated
/// literal ends at the end of the line.
fn skip_single(bytes: &[u8], from: usize, quote: Quote) -> usize {
    let q = quote.byte();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == q => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Nothing but whitespace or a comment.
fn is_bare_tail(rest: &[u8]) -> bool {
    rest.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_none_or(|&b| b == b'#')
}
