pub mod ast;
pub mod cheatsheet;
mod cli;
pub mod describe;
pub mod engine;
pub mod error;
pub mod outline;
pub mod parser;
pub mod render;
pub mod svg;
pub mod tokenizer;

pub use ast::AstNode;
pub use cli::{run, Cli, Command, Format};
pub use engine::{FancyEngine, PatternValidator};
pub use error::PipelineError;
pub use parser::parse_pattern;
pub use render::{render, VisualTree};

pub const PLACEHOLDER: &str = "Enter a regular expression to see its diagram.";

/// What the caller should display for a pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum Visualization {
    /// The pattern is empty.
    Placeholder(&'static str),
    /// The host engine or the parser rejected the pattern.
    Failed(String),
    Diagram(VisualTree),
}

/// Validates `pattern` with the fancy-regex engine and parses it.
pub fn analyze(pattern: &str) -> Result<AstNode, PipelineError> {
    parser::parse_with(&FancyEngine, pattern)
}

pub fn visualize(pattern: &str, scale: u32) -> Visualization {
    visualize_with(&FancyEngine, pattern, scale)
}

/// Pattern in, diagram or message out. Never fails: errors come back as
/// [`Visualization::Failed`] and the renderer only runs on a parsed tree.
pub fn visualize_with<V: PatternValidator + ?Sized>(validator: &V, pattern: &str, scale: u32) -> Visualization {
    if pattern.is_empty() {
        return Visualization::Placeholder(PLACEHOLDER);
    }
    match parser::parse_with(validator, pattern) {
        Ok(ast) => Visualization::Diagram(render(&ast, scale)),
        Err(e) => Visualization::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    mod cheatsheet_tests;
    mod engine_tests;
    mod outline_tests;
    mod parser_tests;
    mod pipeline_tests;
    mod render_tests;
    mod svg_tests;
    mod tokenizer_tests;
}
