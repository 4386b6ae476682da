//! Data-manipulation statements: queries and row changes.

use crate::queue::WorkQueue;
use crate::taggers::common::{annotation, break_after_line_comment, comment_newline};
use crate::taggers::{FormatOptions, NewLine, Tagger, Window};
use crate::token::TokenKind;
use crate::unit::{Category, StatementKind};

const START_KEYWORDS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE", "MERGE", "WITH"];

/// Clauses that begin their own line at the top level of a statement.
const CLAUSE_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP", "ORDER", "HAVING", "LIMIT", "OFFSET", "UNION",
    "INTERSECT", "EXCEPT", "MINUS", "VALUES", "SET", "RETURNING", "QUALIFY", "WINDOW", "JOIN",
    "LEFT", "RIGHT", "INNER", "FULL", "CROSS", "NATURAL",
];

/// Words that modify a following `JOIN`.
const JOIN_MODIFIERS: &[&str] = &["LEFT", "RIGHT", "INNER", "FULL", "CROSS", "NATURAL", "OUTER"];

/// Definition statements that end an unterminated query.
const DEFINITION_KEYWORDS: &[&str] = &["CREATE", "ALTER", "DROP", "TRUNCATE"];

#[derive(Debug, Default)]
pub struct DmlTagger;

impl DmlTagger {
    pub fn new() -> Self {
        Self
    }

    /// Index of the last unit of the statement starting at `start`: the first
    /// top-level `;`, the unit before a delimiter or a definition keyword, or
    /// the end of input.
    fn statement_end(&self, queue: &WorkQueue, start: usize) -> usize {
        let units = queue.units();
        let mut depth = 0;
        for (j, unit) in units.iter().enumerate().skip(start) {
            if j > start {
                if unit.token.is_delimiter() {
                    return j - 1;
                }
                if depth == 0 && DEFINITION_KEYWORDS.iter().any(|kw| unit.is_word(kw)) {
                    return j - 1;
                }
            }
            depth = unit.paren_depth_after(depth);
            if depth == 0 && unit.token.kind == TokenKind::Semicolon {
                return j;
            }
        }
        units.len() - 1
    }

    fn is_clause(&self, window: &Window<'_>) -> bool {
        let current = window.current;
        if !CLAUSE_KEYWORDS.iter().any(|kw| current.is_word(kw)) {
            return false;
        }
        // `LEFT(name, 3)` is a function call
        if window.next.is_some_and(|n| n.token.kind == TokenKind::OpenParen) {
            return false;
        }
        if current.is_word("JOIN") {
            return !window
                .last_significant
                .is_some_and(|u| JOIN_MODIFIERS.iter().any(|kw| u.is_word(kw)));
        }
        true
    }
}

impl Tagger for DmlTagger {
    fn kind(&self) -> StatementKind {
        StatementKind::DataManipulation
    }

    fn name(&self) -> &'static str {
        "dml"
    }

    fn is_start(&self, window: &Window<'_>) -> bool {
        START_KEYWORDS.iter().any(|kw| window.current.is_word(kw))
    }

    fn classify(&self, queue: &mut WorkQueue) {
        let mut claimed = 0;
        let mut i = 0;
        while i < queue.len() {
            let window = Window::at(queue, i);
            let starts = window.current.category() == Category::Unclassified
                && self.is_start(&window)
                && window.at_statement_boundary();
            if !starts {
                i += 1;
                continue;
            }
            let end = self.statement_end(queue, i);
            for j in i..=end {
                if queue.claim(j, StatementKind::DataManipulation) {
                    claimed += 1;
                }
            }
            i = end + 1;
        }
        log::debug!("{} tagger claimed {} units", self.name(), claimed);
    }

    fn format(&self, queue: &mut WorkQueue, options: &FormatOptions) {
        let mut depth = 0;
        let mut last_significant = None;

        for i in 0..queue.len() {
            let window = Window::new(queue, i, last_significant);
            let current = window.current;
            let is_comment = current.is_comment();

            if current.category().is(StatementKind::DataManipulation) {
                depth = current.paren_depth_after(depth);
                let mut indent = 1;
                let mut newline = NewLine::None;

                if window.position == 0 {
                    indent = 0;
                } else if !is_comment && window.at_statement_boundary() {
                    newline = NewLine::Required;
                    indent = 0;
                } else if depth == 0 && self.is_clause(&window) {
                    newline = NewLine::Required;
                    indent = 0;
                } else if depth == 0 && window.last_significant_text() == "," {
                    newline = NewLine::Required;
                } else {
                    newline = comment_newline(current, window.previous, newline);
                }
                newline = break_after_line_comment(window.previous, newline);

                let annotation = annotation(&window, newline, indent);
                let value = current.formatted_value(options.keyword_case);
                queue.annotate(i, annotation);
                queue.set_value(i, value);
            } else if !is_comment {
                depth = 0;
            }

            if !is_comment {
                last_significant = Some(i);
            }
        }
    }
}
