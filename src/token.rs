use compact_str::CompactString;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Keyword or unquoted identifier.
    Word,
    /// `"name"`, `` `name` `` or `[name]`.
    QuotedName,
    /// String literal, including PostgreSQL dollar-quoted bodies.
    String,
    Number,
    Operator,
    OpenParen,
    CloseParen,
    Comma,
    Dot,
    Semicolon,
    /// Bind variables and placeholders: `:name`, `@var`, `?`, `$1`.
    Parameter,
    Comment,
    /// Dialect batch punctuation: Oracle `/`, T-SQL `GO`, MySQL `DELIMITER` tokens.
    Delimiter,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Word => "Word",
            Self::QuotedName => "QuotedName",
            Self::String => "String",
            Self::Number => "Number",
            Self::Operator => "Operator",
            Self::OpenParen => "OpenParen",
            Self::CloseParen => "CloseParen",
            Self::Comma => "Comma",
            Self::Dot => "Dot",
            Self::Semicolon => "Semicolon",
            Self::Parameter => "Parameter",
            Self::Comment => "Comment",
            Self::Delimiter => "Delimiter",
        }
    }
}

/// An immutable token produced by the lexer.
///
/// `prefix` holds the exact whitespace between the previous token (or the
/// start of the document) and this one, so `prefix + text` over all tokens
/// reproduces the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub prefix: CompactString,
    pub text: CompactString,
}

impl Token {
    pub fn new(kind: TokenKind, prefix: &str, text: &str) -> Self {
        Self {
            kind,
            prefix: CompactString::from(prefix),
            text: CompactString::from(text),
        }
    }

    /// Number of line breaks between the previous token and this one.
    pub fn vertical_space(&self) -> usize {
        memchr::memchr_iter(b'\n', self.prefix.as_bytes()).count()
    }

    /// Whitespace on this token's own line, before the token.
    pub fn horizontal_space(&self) -> &str {
        match memchr::memrchr(b'\n', self.prefix.as_bytes()) {
            Some(pos) => &self.prefix[pos + 1..],
            None => &self.prefix,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    /// Comments that run to the end of their line.
    pub fn is_line_comment(&self) -> bool {
        self.is_comment() && !self.text.starts_with("/*")
    }

    pub fn is_delimiter(&self) -> bool {
        self.kind == TokenKind::Delimiter
    }

    /// Case-insensitive keyword comparison for words.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }
}
