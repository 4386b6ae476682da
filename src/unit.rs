use compact_str::CompactString;

use crate::keywords;
use crate::token::{Token, TokenKind};

/// The statement category a tagger assigns to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Comment,
    ProceduralBlock,
    DataManipulation,
    DataDefinition,
}

impl StatementKind {
    /// Short label used by the debug dump.
    pub fn label(self) -> &'static str {
        match self {
            Self::Comment => "Comment",
            Self::ProceduralBlock => "PL",
            Self::DataManipulation => "DML",
            Self::DataDefinition => "DDL",
        }
    }
}

/// Classification state of a unit. `Unclassified` only exists between queue
/// construction and the end of the classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unclassified,
    Tagged(StatementKind),
}

impl Category {
    pub fn is(self, kind: StatementKind) -> bool {
        self == Category::Tagged(kind)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Unclassified => "Unclassified",
            Category::Tagged(kind) => kind.label(),
        }
    }
}

/// Letter case applied to keywords in the rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCase {
    #[default]
    Preserve,
    Upper,
    Lower,
}

impl KeywordCase {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "preserve" => Some(Self::Preserve),
            "upper" => Some(Self::Upper),
            "lower" => Some(Self::Lower),
            _ => None,
        }
    }
}

/// Spacing decisions a formatter makes for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotation {
    pub vertical_space: usize,
    pub indent_level: usize,
    pub leading_space: usize,
}

/// One token plus the mutable tagging and formatting metadata the pipeline
/// attaches to it.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    pub token: Token,
    pub(crate) category: Category,
    pub vertical_space: usize,
    pub indent_level: usize,
    pub leading_space: usize,
    pub value: CompactString,
}

impl WorkUnit {
    pub fn new(token: Token) -> Self {
        let value = token.text.clone();
        Self {
            token,
            category: Category::Unclassified,
            vertical_space: 0,
            indent_level: 0,
            leading_space: 0,
            value,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn text(&self) -> &str {
        &self.token.text
    }

    pub fn is_comment(&self) -> bool {
        self.token.is_comment()
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.token.is_word(word)
    }

    /// The token's source vertical space, capped at `max`.
    pub fn natural_vertical_space(&self, max: usize) -> usize {
        self.token.vertical_space().min(max)
    }

    /// New parenthesis depth after this unit, clamped at zero.
    pub fn paren_depth_after(&self, depth: usize) -> usize {
        match self.token.kind {
            TokenKind::OpenParen => depth + 1,
            TokenKind::CloseParen => depth.saturating_sub(1),
            _ => depth,
        }
    }

    /// `;` or a dialect delimiter.
    pub fn is_terminator(&self) -> bool {
        matches!(self.token.kind, TokenKind::Semicolon | TokenKind::Delimiter)
    }

    /// Rendered text with keyword case applied. Only bare words change.
    pub fn formatted_value(&self, case: KeywordCase) -> CompactString {
        if self.token.kind != TokenKind::Word || !keywords::is_keyword(&self.token.text) {
            return self.token.text.clone();
        }
        match case {
            KeywordCase::Preserve => self.token.text.clone(),
            KeywordCase::Upper => CompactString::from(self.token.text.to_ascii_uppercase()),
            KeywordCase::Lower => CompactString::from(self.token.text.to_ascii_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(kind: TokenKind, text: &str) -> WorkUnit {
        WorkUnit::new(Token::new(kind, "", text))
    }

    #[test]
    fn test_new_unit_defaults() {
        let wu = unit(TokenKind::Word, "foo");
        assert_eq!(wu.category(), Category::Unclassified);
        assert_eq!(wu.vertical_space, 0);
        assert_eq!(wu.indent_level, 0);
        assert_eq!(wu.leading_space, 0);
        assert_eq!(wu.value, "foo");
    }

    #[test]
    fn test_paren_depth_is_clamped() {
        assert_eq!(unit(TokenKind::OpenParen, "(").paren_depth_after(0), 1);
        assert_eq!(unit(TokenKind::CloseParen, ")").paren_depth_after(2), 1);
        assert_eq!(unit(TokenKind::CloseParen, ")").paren_depth_after(0), 0);
        assert_eq!(unit(TokenKind::Word, "x").paren_depth_after(3), 3);
    }

    #[test]
    fn test_natural_vertical_space_cap() {
        let wu = WorkUnit::new(Token::new(TokenKind::Word, "\n\n\n\n", "x"));
        assert_eq!(wu.natural_vertical_space(2), 2);
        assert_eq!(wu.natural_vertical_space(5), 4);
    }

    #[test]
    fn test_formatted_value_only_changes_keywords() {
        let kw = unit(TokenKind::Word, "create");
        assert_eq!(kw.formatted_value(KeywordCase::Upper), "CREATE");
        assert_eq!(kw.formatted_value(KeywordCase::Preserve), "create");

        let ident = unit(TokenKind::Word, "MyTable");
        assert_eq!(ident.formatted_value(KeywordCase::Lower), "MyTable");

        let quoted = unit(TokenKind::QuotedName, "\"select\"");
        assert_eq!(quoted.formatted_value(KeywordCase::Upper), "\"select\"");
    }

    #[test]
    fn test_keyword_case_from_name() {
        assert_eq!(KeywordCase::from_name("UPPER"), Some(KeywordCase::Upper));
        assert_eq!(KeywordCase::from_name("preserve"), Some(KeywordCase::Preserve));
        assert_eq!(KeywordCase::from_name("title"), None);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Unclassified.label(), "Unclassified");
        assert_eq!(Category::Tagged(StatementKind::DataDefinition).label(), "DDL");
        assert!(Category::Tagged(StatementKind::Comment).is(StatementKind::Comment));
    }
}
