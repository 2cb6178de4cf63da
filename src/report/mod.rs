pub mod formatters;

pub use formatters::{formatter_for, JsonFormatter, MarkdownFormatter, ReportFormatter, TextFormatter};
