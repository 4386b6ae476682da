//! Statement taggers.
//!
//! Each tagger owns one statement category. It claims units in the
//! classification pass and annotates its own units in the formatting pass.
//! The data-definition tagger is the catch-all and must run last.

pub mod comment;
pub mod common;
pub mod ddl;
pub mod dml;
pub mod pl;

use crate::queue::WorkQueue;
use crate::unit::{KeywordCase, StatementKind, WorkUnit};

pub use comment::CommentTagger;
pub use ddl::DdlTagger;
pub use dml::DmlTagger;
pub use pl::PlTagger;

/// Formatting options shared by every tagger.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    pub keyword_case: KeywordCase,
}

/// Whether a unit must, may, or must not start a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewLine {
    None,
    Allowed,
    Required,
}

/// The context a tagger sees for one unit: the unit itself, its raw
/// neighbours, and the last non-comment unit before it. Comments never become
/// the `last_significant` reference.
#[derive(Debug, Clone, Copy)]
pub struct Window<'q> {
    pub position: usize,
    pub current: &'q WorkUnit,
    pub previous: Option<&'q WorkUnit>,
    pub last_significant: Option<&'q WorkUnit>,
    pub next: Option<&'q WorkUnit>,
}

impl<'q> Window<'q> {
    /// Build the window for `position`, with `last_significant` carried by
    /// the caller's pass.
    pub fn new(queue: &'q WorkQueue, position: usize, last_significant: Option<usize>) -> Self {
        let units = queue.units();
        Self {
            position,
            current: &units[position],
            previous: position.checked_sub(1).map(|p| &units[p]),
            last_significant: last_significant.map(|p| &units[p]),
            next: units.get(position + 1),
        }
    }

    /// Build the window for `position`, looking up the last non-comment unit.
    pub fn at(queue: &'q WorkQueue, position: usize) -> Self {
        Self::new(queue, position, queue.previous_significant(position))
    }

    /// The last non-comment unit is absent or terminates a statement.
    pub fn at_statement_boundary(&self) -> bool {
        self.last_significant.map_or(true, |u| u.is_terminator())
    }

    pub fn last_significant_text(&self) -> &str {
        self.last_significant.map_or("", |u| u.text())
    }
}

/// A classifier and formatter for one statement category.
pub trait Tagger: Send + Sync {
    fn kind(&self) -> StatementKind;

    fn name(&self) -> &'static str;

    /// Whether the current unit plausibly begins a statement of this kind.
    fn is_start(&self, window: &Window<'_>) -> bool;

    /// Claim still-unclassified units in one pass over the whole queue.
    fn classify(&self, queue: &mut WorkQueue);

    /// Annotate the units of this tagger's kind in one pass over the whole queue.
    fn format(&self, queue: &mut WorkQueue, options: &FormatOptions);

    /// A fallback tagger claims everything left unclassified.
    fn is_fallback(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Token, TokenKind};

    #[test]
    fn test_statement_boundary_skips_comments() {
        let queue = WorkQueue::from_tokens(
            [
                (TokenKind::Word, "SELECT"),
                (TokenKind::Number, "1"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Comment, "-- c"),
                (TokenKind::Word, "DROP"),
            ]
            .iter()
            .map(|(kind, text)| Token::new(*kind, " ", text))
            .collect(),
        );
        let boundaries: Vec<bool> = (0..queue.len())
            .map(|i| Window::at(&queue, i).at_statement_boundary())
            .collect();
        assert_eq!(boundaries, vec![true, false, false, true, true]);
    }
}
