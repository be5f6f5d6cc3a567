pub mod console_formatter;
pub mod json_formatter;

pub use console_formatter::ConsoleFormatter;
pub use json_formatter::JsonFormatter;
