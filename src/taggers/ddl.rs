//! Data-definition statements.
//!
//! This is the catch-all tagger: it runs last and claims every unit no other
//! tagger recognized, so it also covers statements that are not strictly DDL
//! (`SET`, `SHOW`, `GRANT`, client directives).

use crate::queue::WorkQueue;
use crate::taggers::common::{annotation, break_after_line_comment, comment_newline};
use crate::taggers::{FormatOptions, NewLine, Tagger, Window};
use crate::token::TokenKind;
use crate::unit::{Annotation, StatementKind};

/// Keywords that open a data-definition statement. `SET` and `SHOW` are not
/// really DDL but have no better home.
const START_KEYWORDS: &[&str] = &["CREATE", "ALTER", "DROP", "COMMENT", "SET", "SHOW"];

/// State threaded through the data-definition format pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DdlState {
    pub paren_depth: usize,
    pub in_statement: bool,
}

#[derive(Debug, Default)]
pub struct DdlTagger;

impl DdlTagger {
    pub fn new() -> Self {
        Self
    }

    /// One transition of the format pass: the annotation for the current unit
    /// (only when it is tagged as data-definition) and the state carried to
    /// the next unit.
    pub fn step(&self, state: DdlState, window: &Window<'_>) -> (DdlState, Option<Annotation>) {
        let mut state = state;
        let current = window.current;
        let mut result = None;

        if current.category().is(StatementKind::DataDefinition) {
            state.paren_depth = current.paren_depth_after(state.paren_depth);
            let mut indent = 1;
            let mut newline = NewLine::None;

            if window.position == 0 {
                if !current.is_comment() {
                    state.in_statement = true;
                    indent = 0;
                }
            } else if self.is_start(window) {
                newline = NewLine::Required;
                state.in_statement = true;
                indent = 0;
            } else if window.last_significant_text() == "," {
                if state.paren_depth == 0 {
                    newline = NewLine::Required;
                }
            } else if !current.is_comment() && !state.in_statement {
                // Statements opened by a keyword outside the start set.
                newline = NewLine::Required;
                state.in_statement = true;
                indent = 0;
            } else {
                newline = comment_newline(current, window.previous, newline);
            }
            newline = break_after_line_comment(window.previous, newline);

            // Stand-alone comments between statements are never indented.
            if current.is_comment() && !state.in_statement {
                indent = 0;
            }

            result = Some(annotation(window, newline, indent));
        }

        // Procedural bodies and some client commands carry no trailing
        // semicolon, so a following block delimiter also closes the statement.
        if current.token.kind == TokenKind::Semicolon {
            state.in_statement = false;
        } else if window.next.is_some_and(|next| {
            next.category().is(StatementKind::ProceduralBlock) && next.is_terminator()
        }) {
            state.in_statement = false;
        }

        (state, result)
    }
}

impl Tagger for DdlTagger {
    fn kind(&self) -> StatementKind {
        StatementKind::DataDefinition
    }

    fn name(&self) -> &'static str {
        "ddl"
    }

    fn is_start(&self, window: &Window<'_>) -> bool {
        START_KEYWORDS.iter().any(|kw| window.current.is_word(kw))
    }

    /// Runs after every other tagger, so anything still unclassified is
    /// considered data-definition.
    fn classify(&self, queue: &mut WorkQueue) {
        let mut claimed = 0;
        for i in 0..queue.len() {
            if queue.claim(i, StatementKind::DataDefinition) {
                claimed += 1;
            }
        }
        log::debug!("{} tagger claimed {} units", self.name(), claimed);
    }

    fn format(&self, queue: &mut WorkQueue, options: &FormatOptions) {
        let mut state = DdlState::default();
        let mut last_significant = None;

        for i in 0..queue.len() {
            let window = Window::new(queue, i, last_significant);
            let is_comment = window.current.is_comment();
            let (next_state, annotation) = self.step(state, &window);
            state = next_state;

            if let Some(annotation) = annotation {
                let value = queue.units()[i].formatted_value(options.keyword_case);
                queue.annotate(i, annotation);
                queue.set_value(i, value);
            }
            if !is_comment {
                last_significant = Some(i);
            }
        }
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::dialect::{Oracle, Standard};
    use crate::pipeline::Pipeline;
    use crate::unit::Category;

    /// Lex and tag everything as data-definition.
    fn ddl_queue(source: &str) -> WorkQueue {
        let mut queue = WorkQueue::from_tokens(tokenize(source, &Standard).unwrap());
        DdlTagger::new().classify(&mut queue);
        queue
    }

    /// Run the pass by hand, recording the state after every unit.
    fn states(queue: &WorkQueue) -> Vec<DdlState> {
        let tagger = DdlTagger::new();
        let mut state = DdlState::default();
        let mut out = Vec::new();
        for i in 0..queue.len() {
            let window = Window::at(queue, i);
            state = tagger.step(state, &window).0;
            out.push(state);
        }
        out
    }

    fn formatted(source: &str) -> WorkQueue {
        let mut queue = ddl_queue(source);
        DdlTagger::new().format(&mut queue, &FormatOptions::default());
        queue
    }

    #[test]
    fn test_classify_claims_everything_left() {
        let mut queue = WorkQueue::from_tokens(tokenize("SELECT 1; DROP t;", &Standard).unwrap());
        queue.claim(0, StatementKind::DataManipulation);
        DdlTagger::new().classify(&mut queue);
        assert_eq!(queue.unclassified_count(), 0);
        assert_eq!(
            queue.get(0).unwrap().category(),
            Category::Tagged(StatementKind::DataManipulation)
        );
        assert_eq!(
            queue.get(1).unwrap().category(),
            Category::Tagged(StatementKind::DataDefinition)
        );
    }

    #[test]
    fn test_is_start_keywords() {
        let queue = ddl_queue("create Alter DROP comment set SHOW grant");
        let tagger = DdlTagger::new();
        let starts: Vec<bool> = (0..queue.len())
            .map(|i| tagger.is_start(&Window::at(&queue, i)))
            .collect();
        assert_eq!(starts, vec![true, true, true, true, true, true, false]);
    }

    #[test]
    fn test_create_table_scenario() {
        // CREATE TABLE foo ( a INT , b INT ) ;
        let queue = ddl_queue("CREATE TABLE foo (a INT, b INT);");
        let states = states(&queue);

        assert!(states[0].in_statement);
        assert_eq!(states[3].paren_depth, 1);
        // the comma after `a INT` is inside parens
        assert_eq!(states[6].paren_depth, 1);
        assert_eq!(states[9].paren_depth, 0);
        assert!(!states[10].in_statement);

        let queue = formatted("CREATE TABLE foo (a INT, b INT);");
        let first = queue.get(0).unwrap();
        assert_eq!((first.vertical_space, first.indent_level), (0, 0));
        // `b` follows a comma at depth 1: no forced newline
        let b = queue.get(7).unwrap();
        assert_eq!((b.vertical_space, b.leading_space), (0, 1));
    }

    #[test]
    fn test_implicit_statement_end_before_create() {
        let queue = formatted("SET serveroutput on\nCREATE TABLE t (x INT);");
        let create = queue.iter().position(|u| u.is_word("CREATE")).unwrap();
        let unit = queue.get(create).unwrap();
        assert_eq!(unit.vertical_space, 1);
        assert_eq!(unit.indent_level, 0);
        assert_eq!(unit.leading_space, 0);
        // `on` stays on the SET line
        let on = queue.get(create - 1).unwrap();
        assert_eq!((on.vertical_space, on.leading_space), (0, 1));
    }

    #[test]
    fn test_statement_ends_before_block_delimiter() {
        let mut queue = WorkQueue::from_tokens(
            tokenize("CREATE TYPE t AS OBJECT (x NUMBER)\n/\nGRANT EXECUTE ON t TO u;", &Oracle).unwrap(),
        );
        Pipeline::for_dialect(&Oracle, FormatOptions::default())
            .unwrap()
            .classify(&mut queue);
        let slash = queue.iter().position(|u| u.text() == "/").unwrap();
        assert!(queue.get(slash).unwrap().category().is(StatementKind::ProceduralBlock));
        assert!(queue.get(slash - 1).unwrap().category().is(StatementKind::DataDefinition));

        let states = states(&queue);
        assert!(states[slash - 2].in_statement);
        // `)` has no semicolon after it but the delimiter still closes the statement
        assert!(!states[slash - 1].in_statement);
        assert_eq!(states[slash - 1].paren_depth, 0);
        assert!(states[slash + 1].in_statement);
    }

    #[test]
    fn test_standalone_comment_is_not_indented() {
        let queue = formatted("DROP TABLE a;\n-- note\nDROP TABLE t;");
        let comment = queue.iter().find(|u| u.is_comment()).unwrap();
        assert_eq!(comment.vertical_space, 1);
        assert_eq!(comment.indent_level, 0);
    }

    #[test]
    fn test_comment_inside_statement_is_indented() {
        let queue = formatted("CREATE TABLE t (\n-- the key\nid INT);");
        let comment = queue.iter().find(|u| u.is_comment()).unwrap();
        assert_eq!(comment.vertical_space, 1);
        assert_eq!(comment.indent_level, 1);
        // nothing may follow the line comment on its line
        let id = queue.iter().find(|u| u.is_word("id")).unwrap();
        assert_eq!((id.vertical_space, id.indent_level), (1, 1));
    }

    #[test]
    fn test_dotted_chain_has_no_spaces() {
        let queue = formatted("a.b.c");
        for unit in queue.iter() {
            assert_eq!(unit.vertical_space, 0);
            assert_eq!(unit.leading_space, 0, "unexpected space before {}", unit.text());
        }
    }

    #[test]
    fn test_top_level_comma_forces_newline() {
        let queue = formatted("ALTER TABLE t ADD a INT, ADD b INT;");
        let second_add = queue.iter().rposition(|u| u.is_word("ADD")).unwrap();
        let unit = queue.get(second_add).unwrap();
        assert_eq!((unit.vertical_space, unit.indent_level), (1, 1));
    }

    #[test]
    fn test_unknown_statement_after_terminator_starts_line() {
        let queue = formatted("DROP TABLE t; GRANT SELECT ON x TO y;");
        let grant = queue.iter().find(|u| u.is_word("GRANT")).unwrap();
        assert_eq!((grant.vertical_space, grant.indent_level), (1, 0));
        let select = queue.iter().find(|u| u.is_word("SELECT")).unwrap();
        assert_eq!((select.vertical_space, select.leading_space), (0, 1));
    }

    #[test]
    fn test_paren_depth_returns_to_zero() {
        let queue = ddl_queue("CREATE TABLE t (a NUMERIC(10, 2), b INT);\nALTER TABLE t ADD (c INT);");
        let states = states(&queue);
        for (i, unit) in queue.iter().enumerate() {
            if unit.text() == ";" {
                assert_eq!(states[i].paren_depth, 0);
                assert!(!states[i].in_statement);
            }
        }
    }

    #[test]
    fn test_keyword_case_is_applied() {
        let mut queue = ddl_queue("create table t (x int);");
        let options = FormatOptions {
            keyword_case: crate::unit::KeywordCase::Upper,
        };
        DdlTagger::new().format(&mut queue, &options);
        let values: Vec<&str> = queue.iter().map(|u| u.value.as_str()).collect();
        assert_eq!(values, vec!["CREATE", "TABLE", "t", "(", "x", "INT", ")", ";"]);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let mut queue = formatted("CREATE TABLE t (\n  a INT, -- c\n  b INT\n);\nSET x = 1\nSHOW y");
        let first: Vec<_> = queue
            .iter()
            .map(|u| (u.vertical_space, u.indent_level, u.leading_space))
            .collect();
        DdlTagger::new().format(&mut queue, &FormatOptions::default());
        let second: Vec<_> = queue
            .iter()
            .map(|u| (u.vertical_space, u.indent_level, u.leading_space))
            .collect();
        assert_eq!(first, second);
    }
}
