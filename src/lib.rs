pub mod api;
pub mod config;
pub mod dialect;
pub mod dump;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod logging;
pub mod mode;
pub mod pipeline;
pub mod queue;
pub mod render;
pub mod report;
mod string_utils;
pub mod taggers;
pub mod token;
pub mod unit;

// Re-export the main public API
pub use api::{dump_string, format_queue, format_string, get_matching_paths, run};
pub use config::load_config;
pub use error::{Result, SqltidyError};
pub use mode::Mode;
