//! Docstring disambiguation.
//!
//! A bare string literal is a docstring only when it is the first statement
//! of a module, function or class body. [`BlockContext`] keeps one flag per
//! open scope ("the next statement here is the first one") and
//! [`Disambiguator`] combines that flag with what the scanner saw at the
//! start of a statement.
//!
//! Comments and blank lines never reach the disambiguator, so they are
//! transparent to the "first statement" lookback.

use crate::scanner::{LeadingLiteral, LiteralEnd};

/// Verdict for a string literal that starts a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A docstring.
    Docstring,
    /// An ordinary expression statement.
    Code,
    /// A multi-line docstring candidate. It is a docstring if nothing but
    /// whitespace or a comment follows its closing delimiter.
    Pending,
}

impl Verdict {
    /// Settle a pending verdict once the literal's closing line is known.
    pub fn resolve(self, bare: bool) -> Self {
        match self {
            Verdict::Pending if bare => Verdict::Docstring,
            Verdict::Pending => Verdict::Code,
            settled => settled,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    /// Indentation of the header that opened the scope. `None` for the module.
    header_indent: Option<usize>,
    expects_docstring: bool,
}

/// Per-scope "next statement is the first one" flags.
#[derive(Debug, Clone)]
pub struct BlockContext {
    scopes: Vec<Scope>,
}

impl Default for BlockContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockContext {
    /// Start at the top of a module, where the first statement may be a
    /// docstring.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                header_indent: None,
                expects_docstring: true,
            }],
        }
    }

    /// Consume a statement at `indent`.
    ///
    /// Scopes whose header sits at or right of `indent` have been left and
    /// are dropped. The innermost remaining flag is returned and cleared.
    pub fn take_flag(&mut self, indent: usize) -> bool {
        while self
            .scopes
            .last()
            .and_then(|scope| scope.header_indent)
            .is_some_and(|header| indent <= header)
        {
            self.scopes.pop();
        }

        self.scopes
            .last_mut()
            .is_some_and(|scope| std::mem::take(&mut scope.expects_docstring))
    }

    /// Enter the body of a header at `header_indent`.
    pub fn enter_block(&mut self, header_indent: usize) {
        self.scopes.push(Scope {
            header_indent: Some(header_indent),
            expects_docstring: true,
        });
    }
}

#[derive(Debug, Clone, Copy)]
struct Statement {
    indent: usize,
    header: bool,
}

/// Decides whether statement-level string literals are docstrings.
#[derive(Debug, Clone, Default)]
pub struct Disambiguator {
    context: BlockContext,
    current: Option<Statement>,
}

impl Disambiguator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new logical line starts with `text`.
    ///
    /// Returns the verdict for its leading string literal, if it has one.
    pub fn begin_statement(
        &mut self,
        text: &str,
        indent: usize,
        leading: Option<&LeadingLiteral>,
    ) -> Option<Verdict> {
        let expects_docstring = self.context.take_flag(indent);
        self.current = Some(Statement {
            indent,
            header: is_block_header(text),
        });
        leading.map(|literal| verdict(expects_docstring, literal))
    }

    /// The current logical line is complete.
    pub fn end_statement(&mut self, ends_with_colon: bool) {
        if let Some(statement) = self.current.take() {
            if statement.header && ends_with_colon {
                self.context.enter_block(statement.indent);
            }
        }
    }
}

/// Verdict for a leading literal given the enclosing scope's flag.
pub fn verdict(expects_docstring: bool, literal: &LeadingLiteral) -> Verdict {
    if !expects_docstring || !literal.docstring_prefix {
        return Verdict::Code;
    }

    match literal.end {
        LiteralEnd::SameLine { bare: true } => Verdict::Docstring,
        LiteralEnd::SameLine { bare: false } => Verdict::Code,
        LiteralEnd::Later => Verdict::Pending,
    }
}

/// Whether a logical line starting with `text` is a `def`, `async def` or
/// `class` header.
pub fn is_block_header(text: &str) -> bool {
    let trimmed = text.trim_start();
    let rest = strip_keyword(trimmed, "async").unwrap_or(trimmed);
    strip_keyword(rest, "def").is_some() || strip_keyword(rest, "class").is_some()
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    text.strip_prefix(keyword)
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
}
