//! Line-oriented builder used by the PHP file templates.

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
