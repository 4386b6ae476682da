//! Procedural blocks: stored functions, procedures, triggers, packages and
//! anonymous blocks.
//!
//! How a block ends depends on the dialect. Oracle and T-SQL bodies run to
//! the next delimiter line (`/`, `GO`); elsewhere the block closes at the
//! first `;` outside parentheses and BEGIN/END nesting.

use crate::dialect::{BlockTerminator, Dialect};
use crate::queue::WorkQueue;
use crate::taggers::common::{annotation, break_after_line_comment, comment_newline};
use crate::taggers::{FormatOptions, NewLine, Tagger, Window};
use crate::token::TokenKind;
use crate::unit::{Category, StatementKind, WorkUnit};

/// Object types whose definition carries a procedural body.
const BODY_OBJECTS: &[&str] = &["FUNCTION", "PROCEDURE", "PROC", "PACKAGE", "TRIGGER"];

/// How far past `CREATE` the object type may appear
/// (`CREATE OR REPLACE EDITIONABLE PACKAGE`, `CREATE DEFINER = ... PROCEDURE`).
const OBJECT_LOOKAHEAD: usize = 6;

/// Words that follow `END` when it closes a control statement rather than a block.
const END_QUALIFIERS: &[&str] = &["IF", "LOOP", "WHILE", "REPEAT", "FOR"];

/// Words after `BEGIN` that make it a transaction rather than a block.
const TRANSACTION_WORDS: &[&str] = &["TRAN", "TRANSACTION", "WORK"];

/// BEGIN/CASE ... END nesting inside a block body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockNesting {
    pub depth: usize,
}

impl BlockNesting {
    /// Whether `unit` opens a nested block, given its significant neighbours.
    pub fn opens(unit: &WorkUnit, previous: Option<&WorkUnit>, next: Option<&WorkUnit>) -> bool {
        if unit.is_word("BEGIN") {
            return !next.is_some_and(|n| TRANSACTION_WORDS.iter().any(|w| n.is_word(w)));
        }
        // `END CASE` closes, it does not open
        unit.is_word("CASE") && !previous.is_some_and(|p| p.is_word("END"))
    }

    pub fn closes(unit: &WorkUnit, next: Option<&WorkUnit>) -> bool {
        unit.is_word("END") && !next.is_some_and(|n| END_QUALIFIERS.iter().any(|w| n.is_word(w)))
    }

    /// Apply `unit` to the nesting and return the depth it is displayed at.
    pub fn advance(&mut self, unit: &WorkUnit, previous: Option<&WorkUnit>, next: Option<&WorkUnit>) -> usize {
        if Self::closes(unit, next) {
            self.depth = self.depth.saturating_sub(1);
            return self.depth;
        }
        let shown = self.depth;
        if Self::opens(unit, previous, next) {
            self.depth += 1;
        }
        shown
    }
}

/// `CREATE` opens a statement after a terminator, and also at the start of a
/// line after an unterminated client command such as `SET SERVEROUTPUT ON`.
fn opens_statement(window: &Window<'_>) -> bool {
    if window.at_statement_boundary() {
        return true;
    }
    // `GRANT SELECT,\nCREATE PROCEDURE TO app`
    let continues_list = window.last_significant.is_some_and(|u| {
        u.token.kind == TokenKind::Comma || u.is_word("GRANT") || u.is_word("REVOKE")
    });
    window.current.token.vertical_space() > 0 && !continues_list
}

#[derive(Debug)]
pub struct PlTagger {
    terminator: BlockTerminator,
    anonymous_block_keywords: &'static [&'static str],
}

impl PlTagger {
    pub fn new(terminator: BlockTerminator, anonymous_block_keywords: &'static [&'static str]) -> Self {
        Self {
            terminator,
            anonymous_block_keywords,
        }
    }

    pub fn for_dialect(dialect: &dyn Dialect) -> Self {
        Self::new(dialect.block_terminator(), dialect.anonymous_block_keywords())
    }

    /// `CREATE ... FUNCTION|PROCEDURE|...` within a few significant tokens,
    /// before any parenthesis or terminator.
    fn creates_body_object(&self, queue: &WorkQueue, index: usize) -> bool {
        if !queue.units()[index].is_word("CREATE") {
            return false;
        }
        let mut position = index;
        for _ in 0..OBJECT_LOOKAHEAD {
            let Some(next) = queue.next_significant(position) else {
                return false;
            };
            let unit = &queue.units()[next];
            if unit.is_terminator() || unit.token.kind == TokenKind::OpenParen {
                return false;
            }
            if BODY_OBJECTS.iter().any(|kw| unit.is_word(kw)) {
                return true;
            }
            position = next;
        }
        false
    }

    /// Index of the last unit of the block starting at `start`.
    fn block_end(&self, queue: &WorkQueue, start: usize) -> usize {
        let units = queue.units();
        let mut parens = 0;
        let mut nesting = BlockNesting::default();
        let mut previous = None;

        for (j, unit) in units.iter().enumerate().skip(start) {
            if unit.is_comment() {
                continue;
            }
            if unit.token.is_delimiter() {
                return j;
            }
            if self.terminator == BlockTerminator::Semicolon {
                let next = queue.next_significant(j).map(|n| &units[n]);
                nesting.advance(unit, previous, next);
                parens = unit.paren_depth_after(parens);
                if unit.token.kind == TokenKind::Semicolon && parens == 0 && nesting.depth == 0 {
                    return j;
                }
            }
            previous = Some(unit);
        }
        units.len() - 1
    }
}

impl Tagger for PlTagger {
    fn kind(&self) -> StatementKind {
        StatementKind::ProceduralBlock
    }

    fn name(&self) -> &'static str {
        "pl"
    }

    fn is_start(&self, window: &Window<'_>) -> bool {
        let current = window.current;
        current.is_word("CREATE")
            || self
                .anonymous_block_keywords
                .iter()
                .any(|kw| current.is_word(kw))
    }

    fn classify(&self, queue: &mut WorkQueue) {
        let mut claimed = 0;
        let mut blocks = 0;
        let mut i = 0;
        while i < queue.len() {
            let window = Window::at(queue, i);
            let starts = window.current.category() == Category::Unclassified
                && self.is_start(&window)
                && if window.current.is_word("CREATE") {
                    opens_statement(&window) && self.creates_body_object(queue, i)
                } else {
                    window.at_statement_boundary()
                };
            if !starts {
                i += 1;
                continue;
            }
            let end = self.block_end(queue, i);
            for j in i..=end {
                if queue.claim(j, StatementKind::ProceduralBlock) {
                    claimed += 1;
                }
            }
            blocks += 1;
            i = end + 1;
        }

        // Stand-alone delimiters belong here too, so the statement before
        // them can see where it ends.
        for i in 0..queue.len() {
            if queue.units()[i].token.is_delimiter() && queue.claim(i, StatementKind::ProceduralBlock) {
                claimed += 1;
            }
        }
        log::debug!(
            "{} tagger claimed {} units in {} blocks",
            self.name(),
            claimed,
            blocks
        );
    }

    fn format(&self, queue: &mut WorkQueue, options: &FormatOptions) {
        let mut block_open = false;
        let mut parens = 0;
        let mut nesting = BlockNesting::default();
        let mut last_significant = None;

        for i in 0..queue.len() {
            let window = Window::new(queue, i, last_significant);
            let current = window.current;
            let is_comment = current.is_comment();

            if !current.category().is(StatementKind::ProceduralBlock) {
                if !is_comment {
                    block_open = false;
                    last_significant = Some(i);
                }
                continue;
            }

            let next = queue.next_significant(i).map(|n| &queue.units()[n]);
            let (newline, indent) = if current.token.is_delimiter() {
                block_open = false;
                // `/` and `GO` own their line; `END //` and `DELIMITER ;`
                // keep the delimiter where it was written.
                if current.token.vertical_space() > 0 {
                    (NewLine::Required, 0)
                } else {
                    (NewLine::None, 0)
                }
            } else if !block_open && !is_comment {
                block_open = true;
                parens = current.paren_depth_after(0);
                nesting = BlockNesting::default();
                nesting.advance(current, window.last_significant, next);
                (NewLine::Required, 0)
            } else {
                let shown = if is_comment {
                    nesting.depth
                } else {
                    parens = current.paren_depth_after(parens);
                    nesting.advance(current, window.last_significant, next)
                };
                let indent = if ["BEGIN", "END", "DECLARE"].iter().any(|kw| current.is_word(kw)) {
                    shown
                } else if current.is_word("EXCEPTION") {
                    shown.saturating_sub(1)
                } else {
                    shown.max(1)
                };
                let newline = if current.token.vertical_space() > 0 {
                    NewLine::Allowed
                } else {
                    comment_newline(current, window.previous, NewLine::None)
                };
                (newline, indent)
            };
            let newline = break_after_line_comment(window.previous, newline);

            if self.terminator == BlockTerminator::Semicolon
                && current.token.kind == TokenKind::Semicolon
                && parens == 0
                && nesting.depth == 0
            {
                block_open = false;
            }

            let annotation = annotation(&window, newline, indent);
            let value = current.formatted_value(options.keyword_case);
            queue.annotate(i, annotation);
            queue.set_value(i, value);
            if !is_comment {
                last_significant = Some(i);
            }
        }
    }
}
