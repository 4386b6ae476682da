//! Stand-alone comments between statements.

use crate::queue::WorkQueue;
use crate::taggers::common::annotation;
use crate::taggers::{FormatOptions, NewLine, Tagger, Window};
use crate::unit::{Category, StatementKind};

/// Claims comments that sit on their own line at a statement boundary.
/// Trailing comments and comments inside a statement stay with the statement.
#[derive(Debug, Default)]
pub struct CommentTagger;

impl CommentTagger {
    pub fn new() -> Self {
        Self
    }
}

impl Tagger for CommentTagger {
    fn kind(&self) -> StatementKind {
        StatementKind::Comment
    }

    fn name(&self) -> &'static str {
        "comment"
    }

    fn is_start(&self, window: &Window<'_>) -> bool {
        window.current.is_comment()
    }

    fn classify(&self, queue: &mut WorkQueue) {
        let mut claimed = 0;
        for i in 0..queue.len() {
            let window = Window::at(queue, i);
            let own_line = i == 0 || window.current.token.vertical_space() > 0;
            if window.current.category() == Category::Unclassified
                && self.is_start(&window)
                && own_line
                && window.at_statement_boundary()
                && queue.claim(i, StatementKind::Comment)
            {
                claimed += 1;
            }
        }
        log::debug!("{} tagger claimed {} units", self.name(), claimed);
    }

    fn format(&self, queue: &mut WorkQueue, _options: &FormatOptions) {
        for i in 0..queue.len() {
            if !queue.units()[i].category().is(StatementKind::Comment) {
                continue;
            }
            let window = Window::at(queue, i);
            let mut annotation = annotation(&window, NewLine::Required, 0);
            annotation.leading_space = 0;
            // Comment text is never re-cased.
            let value = window.current.token.text.clone();
            queue.annotate(i, annotation);
            queue.set_value(i, value);
        }
    }
}
