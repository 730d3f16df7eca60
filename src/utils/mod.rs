pub mod shell;
pub mod style;
