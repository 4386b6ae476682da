use std::borrow::Cow;

use compact_str::CompactString;

use crate::dialect::Dialect;
use crate::error::SqltidyError;
use crate::string_utils::{line_end, scan_block_comment, scan_dollar_quoted, scan_quoted};
use crate::token::{Token, TokenKind};

/// Operators longer than one byte, longest first.
const MULTI_CHAR_OPERATORS: &[&str] = &[
    "->>", "<>", "<=", ">=", "!=", "||", "::", ":=", "=>", "->", "**", "<<", ">>",
];

/// Tokenize `source` under the rules of `dialect`.
///
/// CRLF line endings are normalized to LF first. Trailing whitespace after
/// the last token is not represented.
pub fn tokenize(source: &str, dialect: &dyn Dialect) -> Result<Vec<Token>, SqltidyError> {
    let normalized = normalize_newlines(source);
    let mut lexer = Lexer::new(&normalized, dialect);
    lexer.run()?;
    log::debug!(
        "lexed {} tokens under the {} dialect",
        lexer.tokens.len(),
        dialect.name()
    );
    Ok(lexer.tokens)
}

fn normalize_newlines(source: &str) -> Cow<'_, str> {
    if source.contains('\r') {
        Cow::Owned(source.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(source)
    }
}

/// Byte-level lexer state for one document.
struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    dialect: &'a dyn Dialect,
    pos: usize,
    tokens: Vec<Token>,
    /// Active client-side delimiter set by a `DELIMITER` directive.
    custom_delimiter: Option<CompactString>,
    /// The previous token was a `DELIMITER` directive keyword.
    expect_delimiter_definition: bool,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, dialect: &'a dyn Dialect) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            dialect,
            pos: 0,
            tokens: Vec::new(),
            custom_delimiter: None,
            expect_delimiter_definition: false,
        }
    }

    fn run(&mut self) -> Result<(), SqltidyError> {
        let source = self.source;
        loop {
            let prefix_start = self.pos;
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.bytes.len() {
                return Ok(());
            }
            let prefix = &source[prefix_start..self.pos];
            let at_line_start = self.tokens.is_empty() || prefix.contains('\n');

            if self.expect_delimiter_definition {
                self.expect_delimiter_definition = false;
                if !at_line_start {
                    self.lex_delimiter_definition(prefix);
                    continue;
                }
            }

            let (kind, end) = self.next_token(at_line_start)?;
            let text = &source[self.pos..end];
            self.tokens.push(Token::new(kind, prefix, text));
            self.pos = end;
        }
    }

    /// Read the argument of a `DELIMITER` directive.
    fn lex_delimiter_definition(&mut self, prefix: &str) {
        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        self.custom_delimiter = if text == ";" {
            None
        } else {
            Some(CompactString::from(text))
        };
        self.tokens.push(Token::new(TokenKind::Delimiter, prefix, text));
    }

    fn next_token(&mut self, at_line_start: bool) -> Result<(TokenKind, usize), SqltidyError> {
        let pos = self.pos;
        let rest = &self.source[pos..];

        if let Some(delimiter) = &self.custom_delimiter {
            if rest.starts_with(delimiter.as_str()) {
                return Ok((TokenKind::Delimiter, pos + delimiter.len()));
            }
        }
        if at_line_start {
            if let Some(end) = self.line_delimiter() {
                return Ok((TokenKind::Delimiter, end));
            }
        }

        let b = self.bytes[pos];
        let next = self.bytes.get(pos + 1).copied();

        match b {
            b'-' if next == Some(b'-') => Ok((TokenKind::Comment, line_end(self.bytes, pos))),
            b'#' if self.dialect.hash_comments() => {
                Ok((TokenKind::Comment, line_end(self.bytes, pos)))
            }
            b'/' if next == Some(b'*') => {
                match scan_block_comment(self.bytes, pos, self.dialect.nested_block_comments()) {
                    Some(end) => Ok((TokenKind::Comment, end)),
                    None => Err(self.error(pos, "unterminated block comment")),
                }
            }
            b'\'' => self.quoted(pos, b'\'', TokenKind::String, "unterminated string literal"),
            b'"' => self.quoted(pos, b'"', TokenKind::QuotedName, "unterminated quoted name"),
            b'`' if self.dialect.backtick_names() => {
                self.quoted(pos, b'`', TokenKind::QuotedName, "unterminated quoted name")
            }
            b'[' if self.dialect.bracket_names() => {
                match scan_quoted(self.bytes, pos, b']', false) {
                    Some(end) => Ok((TokenKind::QuotedName, end)),
                    None => Err(self.error(pos, "unterminated quoted name")),
                }
            }
            b'$' => self.dollar(pos),
            b'(' => Ok((TokenKind::OpenParen, pos + 1)),
            b')' => Ok((TokenKind::CloseParen, pos + 1)),
            b',' => Ok((TokenKind::Comma, pos + 1)),
            b';' => Ok((TokenKind::Semicolon, pos + 1)),
            b'.' if next.is_some_and(|c| c.is_ascii_digit()) && !self.follows_name() => {
                Ok((TokenKind::Number, self.scan_number(pos)))
            }
            b'.' => Ok((TokenKind::Dot, pos + 1)),
            b'?' => Ok((TokenKind::Parameter, pos + 1)),
            b':' if next.is_some_and(is_word_start) => {
                Ok((TokenKind::Parameter, self.scan_word(pos + 1)))
            }
            b'@' => {
                let start = if next == Some(b'@') { pos + 2 } else { pos + 1 };
                Ok((TokenKind::Parameter, self.scan_word(start)))
            }
            b'0'..=b'9' => Ok((TokenKind::Number, self.scan_number(pos))),
            b'#' => Ok((TokenKind::Word, self.scan_word(pos + 1))),
            _ if is_word_start(b) => self.word(pos),
            _ => Ok((TokenKind::Operator, self.scan_operator(pos))),
        }
    }

    /// Dialect delimiters that must occupy a line of their own: SQL*Plus `/`
    /// and T-SQL `GO`.
    fn line_delimiter(&self) -> Option<usize> {
        let pos = self.pos;
        let eol = line_end(self.bytes, pos);
        let line = self.source[pos..eol].trim_end();
        if self.dialect.slash_delimiter() && line == "/" {
            return Some(pos + 1);
        }
        if self.dialect.go_delimiter() && line.eq_ignore_ascii_case("go") {
            return Some(pos + 2);
        }
        None
    }

    fn quoted(
        &self,
        pos: usize,
        close: u8,
        kind: TokenKind,
        message: &str,
    ) -> Result<(TokenKind, usize), SqltidyError> {
        let escapes = close != b'`' && self.dialect.backslash_escapes();
        match scan_quoted(self.bytes, pos, close, escapes) {
            Some(end) => Ok((kind, end)),
            None => Err(self.error(pos, message)),
        }
    }

    /// `$1` placeholders and `$tag$` bodies.
    fn dollar(&self, pos: usize) -> Result<(TokenKind, usize), SqltidyError> {
        let mut j = pos + 1;
        if self.bytes.get(j).is_some_and(|c| c.is_ascii_digit()) {
            while self.bytes.get(j).is_some_and(|c| c.is_ascii_digit()) {
                j += 1;
            }
            return Ok((TokenKind::Parameter, j));
        }
        if self.dialect.dollar_quoting() {
            while self
                .bytes
                .get(j)
                .is_some_and(|&c| c.is_ascii_alphanumeric() || c == b'_')
            {
                j += 1;
            }
            if self.bytes.get(j) == Some(&b'$') {
                return match scan_dollar_quoted(self.source, pos, j + 1) {
                    Some(end) => Ok((TokenKind::String, end)),
                    None => Err(self.error(pos, "unterminated dollar-quoted string")),
                };
            }
        }
        Ok((TokenKind::Operator, pos + 1))
    }

    /// Words, plus prefixed string literals such as `N'...'` and `E'...'`.
    fn word(&mut self, pos: usize) -> Result<(TokenKind, usize), SqltidyError> {
        let end = self.scan_word(pos);
        let word = &self.source[pos..end];
        if end - pos == 1
            && self.bytes.get(end) == Some(&b'\'')
            && matches!(word.as_bytes()[0].to_ascii_uppercase(), b'N' | b'E' | b'X' | b'B')
        {
            return match scan_quoted(self.bytes, end, b'\'', self.dialect.backslash_escapes()) {
                Some(literal_end) => Ok((TokenKind::String, literal_end)),
                None => Err(self.error(pos, "unterminated string literal")),
            };
        }
        if self.dialect.delimiter_directive()
            && word.eq_ignore_ascii_case("delimiter")
            && self.starts_line(pos)
        {
            self.expect_delimiter_definition = true;
        }
        Ok((TokenKind::Word, end))
    }

    fn scan_word(&self, start: usize) -> usize {
        let hash_is_word = !self.dialect.hash_comments();
        let mut j = start;
        while let Some(&c) = self.bytes.get(j) {
            // `END$$` under `DELIMITER $$`
            if j > start && self.at_custom_delimiter(j) {
                break;
            }
            if c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80 || (hash_is_word && c == b'#') {
                j += 1;
            } else {
                break;
            }
        }
        j
    }

    fn at_custom_delimiter(&self, pos: usize) -> bool {
        self.custom_delimiter
            .as_ref()
            .is_some_and(|d| self.bytes[pos..].starts_with(d.as_bytes()))
    }

    fn scan_number(&self, start: usize) -> usize {
        let bytes = self.bytes;
        let mut j = start;
        while bytes.get(j).is_some_and(|c| c.is_ascii_digit()) {
            j += 1;
        }
        if bytes.get(j) == Some(&b'.') && bytes.get(j + 1).is_some_and(|c| c.is_ascii_digit()) {
            j += 1;
            while bytes.get(j).is_some_and(|c| c.is_ascii_digit()) {
                j += 1;
            }
        } else if bytes.get(j) == Some(&b'.') && !bytes.get(j + 1).is_some_and(|&c| c == b'.') {
            // `1.` is a complete numeric literal
            j += 1;
        }
        if matches!(bytes.get(j), Some(b'e') | Some(b'E')) {
            let mut k = j + 1;
            if matches!(bytes.get(k), Some(b'+') | Some(b'-')) {
                k += 1;
            }
            if bytes.get(k).is_some_and(|c| c.is_ascii_digit()) {
                j = k;
                while bytes.get(j).is_some_and(|c| c.is_ascii_digit()) {
                    j += 1;
                }
            }
        }
        j
    }

    fn scan_operator(&self, pos: usize) -> usize {
        let rest = &self.source[pos..];
        for op in MULTI_CHAR_OPERATORS {
            if rest.starts_with(op) {
                return pos + op.len();
            }
        }
        pos + rest.chars().next().map_or(1, char::len_utf8)
    }

    /// A `.` right after a name, closing paren or quoted name is member
    /// access, never the start of a number.
    fn follows_name(&self) -> bool {
        let glued = self.pos > 0 && !self.bytes[self.pos - 1].is_ascii_whitespace();
        glued
            && self.tokens.last().is_some_and(|tok| {
                matches!(
                    tok.kind,
                    TokenKind::Word | TokenKind::QuotedName | TokenKind::CloseParen
                )
            })
    }

    /// Only whitespace separates `pos` from the start of its line.
    fn starts_line(&self, pos: usize) -> bool {
        self.source[..pos]
            .rsplit('\n')
            .next()
            .map_or(true, |before| before.trim().is_empty())
    }

    fn error(&self, pos: usize, message: &str) -> SqltidyError {
        let before = &self.source[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = self.source[line_start..pos].chars().count() + 1;
        SqltidyError::Parsing {
            line,
            column,
            message: message.to_string(),
        }
    }
}

fn is_word_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MsSql, MySql, Oracle, PostgreSql, Standard};

    fn kinds_and_texts(source: &str, dialect: &dyn Dialect) -> Vec<(TokenKind, String)> {
        tokenize(source, dialect)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text.to_string()))
            .collect()
    }

    fn reconstruct(tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|t| format!("{}{}", t.prefix, t.text))
            .collect()
    }

    #[test]
    fn test_simple_ddl() {
        let toks = kinds_and_texts("CREATE TABLE foo (a INT, b INT);", &Standard);
        use TokenKind::*;
        assert_eq!(
            toks,
            vec![
                (Word, "CREATE".into()),
                (Word, "TABLE".into()),
                (Word, "foo".into()),
                (OpenParen, "(".into()),
                (Word, "a".into()),
                (Word, "INT".into()),
                (Comma, ",".into()),
                (Word, "b".into()),
                (Word, "INT".into()),
                (CloseParen, ")".into()),
                (Semicolon, ";".into()),
            ]
        );
    }

    #[test]
    fn test_dotted_identifier() {
        let toks = kinds_and_texts("a.b.c", &Standard);
        let kinds: Vec<_> = toks.iter().map(|(k, _)| *k).collect();
        use TokenKind::*;
        assert_eq!(kinds, vec![Word, Dot, Word, Dot, Word]);
    }

    #[test]
    fn test_numbers() {
        let toks = kinds_and_texts("1 2.5 .5 1e10 3.", &Standard);
        assert!(toks.iter().all(|(k, _)| *k == TokenKind::Number));
        assert_eq!(toks[2].1, ".5");
        assert_eq!(toks[3].1, "1e10");
    }

    #[test]
    fn test_prefix_preserves_whitespace() {
        let source = "SELECT 1;\n\n  -- note\nDROP TABLE t;";
        let tokens = tokenize(source, &Standard).unwrap();
        assert_eq!(reconstruct(&tokens), source);
        let comment = tokens.iter().find(|t| t.is_comment()).unwrap();
        assert_eq!(comment.vertical_space(), 2);
        assert_eq!(comment.horizontal_space(), "  ");
    }

    #[test]
    fn test_crlf_is_normalized() {
        let tokens = tokenize("SELECT 1\r\nFROM t", &Standard).unwrap();
        assert_eq!(reconstruct(&tokens), "SELECT 1\nFROM t");
    }

    #[test]
    fn test_oracle_slash_delimiter() {
        let toks = kinds_and_texts("BEGIN NULL; END;\n/\nSELECT 4 / 2 FROM dual;", &Oracle);
        assert!(toks.contains(&(TokenKind::Delimiter, "/".into())));
        assert!(toks.contains(&(TokenKind::Operator, "/".into())));
    }

    #[test]
    fn test_slash_is_operator_outside_oracle() {
        let toks = kinds_and_texts("SELECT 1\n/\n", &Standard);
        assert_eq!(toks.last().unwrap().0, TokenKind::Operator);
    }

    #[test]
    fn test_mssql_go_and_brackets() {
        let toks = kinds_and_texts("SELECT [my col] FROM #tmp\nGO\nSELECT 1", &MsSql);
        assert!(toks.contains(&(TokenKind::QuotedName, "[my col]".into())));
        assert!(toks.contains(&(TokenKind::Word, "#tmp".into())));
        assert!(toks.contains(&(TokenKind::Delimiter, "GO".into())));
    }

    #[test]
    fn test_mysql_delimiter_directive() {
        let source = "DELIMITER //\nCREATE PROCEDURE p() BEGIN SELECT 1; END //\nDELIMITER ;";
        let toks = kinds_and_texts(source, &MySql);
        let delimiters: Vec<_> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::Delimiter)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(delimiters, vec!["//", "//", ";"]);
        // The semicolon inside the body stays ordinary punctuation.
        assert!(toks.contains(&(TokenKind::Semicolon, ";".into())));
    }

    #[test]
    fn test_custom_delimiter_glued_to_word() {
        let toks = kinds_and_texts("DELIMITER $$\nBEGIN SELECT 1; END$$\nDELIMITER ;", &MySql);
        assert!(toks.contains(&(TokenKind::Word, "END".into())));
        let delimiters = toks.iter().filter(|(k, _)| *k == TokenKind::Delimiter).count();
        assert_eq!(delimiters, 3);
    }

    #[test]
    fn test_mysql_hash_comment_and_backslash() {
        let toks = kinds_and_texts("# note\nSELECT 'it\\'s' FROM `t`", &MySql);
        assert_eq!(toks[0], (TokenKind::Comment, "# note".into()));
        assert!(toks.contains(&(TokenKind::String, "'it\\'s'".into())));
        assert!(toks.contains(&(TokenKind::QuotedName, "`t`".into())));
    }

    #[test]
    fn test_postgres_dollar_quoting() {
        let source = "CREATE FUNCTION f() RETURNS int AS $body$ SELECT 1; $body$ LANGUAGE sql;";
        let toks = kinds_and_texts(source, &PostgreSql);
        assert!(toks.contains(&(TokenKind::String, "$body$ SELECT 1; $body$".into())));
        let semicolons = toks.iter().filter(|(k, _)| *k == TokenKind::Semicolon).count();
        assert_eq!(semicolons, 1);
    }

    #[test]
    fn test_parameters() {
        let toks = kinds_and_texts("WHERE a = :id AND b = $1 AND c = ? AND d = @v", &PostgreSql);
        let params: Vec<_> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::Parameter)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(params, vec![":id", "$1", "?", "@v"]);
    }

    #[test]
    fn test_operators() {
        let toks = kinds_and_texts("a <> b || c::int", &PostgreSql);
        let ops: Vec<_> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::Operator)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(ops, vec!["<>", "||", "::"]);
    }

    #[test]
    fn test_unterminated_string_reports_position() {
        let err = tokenize("SELECT 1;\nSELECT 'oops", &Standard).unwrap_err();
        match err {
            SqltidyError::Parsing { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(tokenize("/* never closed", &Standard).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("", &Standard).unwrap().is_empty());
        assert!(tokenize("  \n\t", &Standard).unwrap().is_empty());
    }
}
