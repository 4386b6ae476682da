//! Spacing rules shared by the taggers.

use crate::taggers::{NewLine, Window};
use crate::token::TokenKind;
use crate::unit::{Annotation, WorkUnit};

/// Most newlines kept from the source before a unit (one blank line).
pub const MAX_VERTICAL_SPACE: usize = 2;

/// Vertical space for a unit given its source spacing and the line decision.
pub fn vertical_space(natural: usize, newline: NewLine) -> usize {
    match newline {
        NewLine::Required => natural.max(1),
        NewLine::Allowed => natural,
        NewLine::None => 0,
    }
}

/// Whether a unit that stays on the previous unit's line is padded with a
/// single space. Commas, member access and the first unit are never padded;
/// `.5` is a number and keeps its space.
pub fn wants_leading_space(window: &Window<'_>) -> bool {
    let current = &window.current.token;
    let member_access = current.text.starts_with('.') && current.kind != TokenKind::Number;
    !(window.position == 0
        || current.kind == TokenKind::Comma
        || member_access
        || window.last_significant_text().ends_with('.'))
}

/// Comments keep their own line when they had one in the source; so does a
/// unit that follows a block comment on a new line.
pub fn comment_newline(current: &WorkUnit, previous: Option<&WorkUnit>, incoming: NewLine) -> NewLine {
    let starts_line = current.token.vertical_space() > 0;
    if current.is_comment() && starts_line {
        return NewLine::Allowed;
    }
    if previous.is_some_and(|p| p.is_comment()) && starts_line {
        return NewLine::Allowed;
    }
    incoming
}

/// Nothing may be joined onto the end of a line comment.
pub fn break_after_line_comment(previous: Option<&WorkUnit>, newline: NewLine) -> NewLine {
    if previous.is_some_and(|p| p.token.is_line_comment()) {
        NewLine::Required
    } else {
        newline
    }
}

/// Turn a line decision into the final annotation for a unit.
pub fn annotation(window: &Window<'_>, newline: NewLine, indent_level: usize) -> Annotation {
    let vertical_space = if window.position == 0 {
        0
    } else {
        vertical_space(
            window.current.natural_vertical_space(MAX_VERTICAL_SPACE),
            newline,
        )
    };
    let leading_space = usize::from(vertical_space == 0 && wants_leading_space(window));
    Annotation {
        vertical_space,
        indent_level,
        leading_space,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::WorkQueue;
    use crate::token::Token;

    fn queue(tokens: &[(TokenKind, &str, &str)]) -> WorkQueue {
        WorkQueue::from_tokens(
            tokens
                .iter()
                .map(|(kind, prefix, text)| Token::new(*kind, prefix, text))
                .collect(),
        )
    }

    #[test]
    fn test_vertical_space_rules() {
        assert_eq!(vertical_space(0, NewLine::Required), 1);
        assert_eq!(vertical_space(2, NewLine::Required), 2);
        assert_eq!(vertical_space(2, NewLine::Allowed), 2);
        assert_eq!(vertical_space(0, NewLine::Allowed), 0);
        assert_eq!(vertical_space(2, NewLine::None), 0);
    }

    #[test]
    fn test_no_leading_space_in_identifier_chains() {
        let q = queue(&[
            (TokenKind::Word, "", "a"),
            (TokenKind::Dot, "", "."),
            (TokenKind::Word, "", "b"),
            (TokenKind::Comma, " ", ","),
            (TokenKind::Word, " ", "c"),
        ]);
        assert!(!wants_leading_space(&Window::at(&q, 0)));
        assert!(!wants_leading_space(&Window::at(&q, 1)));
        assert!(!wants_leading_space(&Window::at(&q, 2)));
        assert!(!wants_leading_space(&Window::at(&q, 3)));
        assert!(wants_leading_space(&Window::at(&q, 4)));
    }

    #[test]
    fn test_comment_newline() {
        let q = queue(&[
            (TokenKind::Word, "", "a"),
            (TokenKind::Comment, "\n", "/* own line */"),
            (TokenKind::Word, "\n", "b"),
            (TokenKind::Comment, " ", "-- trailing"),
        ]);
        let units = q.units();
        assert_eq!(
            comment_newline(&units[1], Some(&units[0]), NewLine::None),
            NewLine::Allowed
        );
        assert_eq!(
            comment_newline(&units[2], Some(&units[1]), NewLine::None),
            NewLine::Allowed
        );
        assert_eq!(
            comment_newline(&units[3], Some(&units[2]), NewLine::None),
            NewLine::None
        );
    }

    #[test]
    fn test_break_after_line_comment() {
        let line = WorkUnit::new(Token::new(TokenKind::Comment, "", "-- x"));
        let block = WorkUnit::new(Token::new(TokenKind::Comment, "", "/* x */"));
        assert_eq!(break_after_line_comment(Some(&line), NewLine::None), NewLine::Required);
        assert_eq!(break_after_line_comment(Some(&block), NewLine::None), NewLine::None);
        assert_eq!(break_after_line_comment(None, NewLine::Allowed), NewLine::Allowed);
    }

    #[test]
    fn test_annotation_is_exclusive() {
        let q = queue(&[(TokenKind::Word, "", "a"), (TokenKind::Word, "\n", "b")]);
        let first = annotation(&Window::at(&q, 0), NewLine::Required, 0);
        assert_eq!((first.vertical_space, first.leading_space), (0, 0));

        let broken = annotation(&Window::at(&q, 1), NewLine::Required, 1);
        assert_eq!((broken.vertical_space, broken.leading_space), (1, 0));

        let joined = annotation(&Window::at(&q, 1), NewLine::None, 1);
        assert_eq!((joined.vertical_space, joined.leading_space), (0, 1));
    }
}
