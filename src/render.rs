use crate::queue::WorkQueue;
use crate::token::Token;

/// Render an annotated queue. Each unit is preceded by its vertical space
/// plus indentation, or by a single space when it stays on the line.
/// Non-empty output ends with exactly one newline.
pub fn render(queue: &WorkQueue, indent: &str) -> String {
    let mut out = String::with_capacity(queue.len() * 8);
    for unit in queue.iter() {
        if unit.vertical_space > 0 {
            for _ in 0..unit.vertical_space {
                out.push('\n');
            }
            for _ in 0..unit.indent_level {
                out.push_str(indent);
            }
        } else if unit.leading_space > 0 {
            out.push(' ');
        }
        out.push_str(&unit.value);
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Reproduce the source text from its tokens.
pub fn reconstruct(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.prefix);
        out.push_str(&token.text);
    }
    out
}
