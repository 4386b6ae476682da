use std::fmt::Write;

use crate::queue::WorkQueue;

/// Human-readable listing of a classified queue, one line per unit.
pub fn dump(queue: &WorkQueue, dialect_name: &str, file_name: &str) -> String {
    let mut out = String::new();
    out.push_str("Parsed\n");
    let _ = writeln!(out, "InputFile   {}", file_name);
    let _ = writeln!(out, "Dialect     {}", dialect_name);
    out.push('\n');

    for unit in queue.iter() {
        let _ = writeln!(
            out,
            "{:<8} {:<11} {:>2} {:>3}  {}",
            unit.category().label(),
            unit.token.kind.name(),
            unit.token.vertical_space(),
            unit.token.horizontal_space().len(),
            unit.text().escape_debug()
        );
    }
    out
}
