use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated character class starting at position {offset}")]
    UnterminatedClass { offset: usize },
    #[error("trailing backslash at position {offset}")]
    TrailingBackslash { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("nothing to repeat before quantifier {0}")]
    NothingToRepeat(String),
    #[error("quantifier {0} cannot follow another quantifier")]
    RepeatedQuantifier(String),
    #[error("quantifier {0} cannot apply to a zero-width assertion")]
    QuantifiedAssertion(String),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

/// Every way turning a pattern into a tree can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The host engine rejected the pattern; holds its diagnostic verbatim.
    #[error("{0}")]
    InvalidPattern(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Regex(#[from] fancy_regex::Error),
}
