use crate::ast::{AstNode, GroupKind};
use crate::describe;
use crate::engine::PatternValidator;
use crate::error::{ParseError, PipelineError};
use crate::tokenizer::{tokenize, GroupOpener, Token, TokenKind};
use std::collections::HashMap;

/// Tokenizes and parses without consulting a host engine.
pub fn parse_pattern(s: &str) -> Result<AstNode, ParseError> {
    let mut tokens = tokenize(s)?;
    tokens.retain(|t| t.kind != TokenKind::Trivia);
    Parser::new(&tokens).parse()
}

/// Runs the host validity check first and only parses patterns it accepts.
pub fn parse_with<V: PatternValidator + ?Sized>(validator: &V, s: &str) -> Result<AstNode, PipelineError> {
    if let Err(message) = validator.validate(s) {
        log::debug!("host engine rejected {:?}: {}", s, message);
        return Err(PipelineError::InvalidPattern(message));
    }
    let ast = parse_pattern(s)?;
    log::debug!("parsed {:?}: {:?}", s, ast);
    Ok(ast)
}

// Cursor over one token list. A fresh parser is created for every pattern.
pub struct Parser<'t, 'p> {
    tokens: &'t [Token<'p>],
    position: usize,
    next_group: usize,
    names: HashMap<&'p str, usize>,
}

impl<'t, 'p> Parser<'t, 'p> {
    pub fn new(tokens: &'t [Token<'p>]) -> Self {
        Parser { tokens, position: 0, next_group: 1, names: HashMap::new() }
    }

    pub fn parse(mut self) -> Result<AstNode, ParseError> {
        let ast = self.parse_alternatives()?;
        match self.peek() {
            Some(token) => Err(ParseError::UnexpectedToken(token.raw.to_string())),
            None => Ok(ast),
        }
    }

    fn peek(&self) -> Option<&'t Token<'p>> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'t Token<'p>> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    // sequence ('|' sequence)*
    fn parse_alternatives(&mut self) -> Result<AstNode, ParseError> {
        let mut options = vec![self.parse_sequence()?];
        while let Some(Token { kind: TokenKind::Alternation, .. }) = self.peek() {
            self.position += 1;
            options.push(self.parse_sequence()?);
        }
        Ok(AstNode::choice(options))
    }

    fn parse_sequence(&mut self) -> Result<AstNode, ParseError> {
        let mut parts = Vec::new();
        while let Some(token) = self.peek() {
            if matches!(token.kind, TokenKind::GroupClose | TokenKind::Alternation) {
                break;
            }
            parts.push(self.parse_token()?);
        }
        Ok(AstNode::sequence(parts))
    }

    fn parse_token(&mut self) -> Result<AstNode, ParseError> {
        let primary = self.parse_primary()?;
        let Some(token) = self.peek() else {
            return Ok(primary);
        };
        let TokenKind::Quantifier(quantifier) = token.kind else {
            return Ok(primary);
        };
        if primary.is_zero_width() {
            return Err(ParseError::QuantifiedAssertion(token.raw.to_string()));
        }
        self.position += 1;

        if let Some(next) = self.peek().filter(|t| matches!(t.kind, TokenKind::Quantifier(_))) {
            return Err(ParseError::RepeatedQuantifier(next.raw.to_string()));
        }

        let repeated = AstNode::Quantifier {
            kind: quantifier.repetition,
            greedy: quantifier.greedy,
            content: Box::new(primary),
        };
        if !quantifier.possessive {
            return Ok(repeated);
        }
        // `x*+` behaves exactly like `(?>x*)`.
        Ok(AstNode::Group {
            label: "Atomic group (possessive)".to_string(),
            kind: GroupKind::Atomic,
            index: None,
            content: Box::new(repeated),
        })
    }

    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::UnexpectedToken("end of pattern".to_string()));
        };

        let terminal = match token.kind {
            TokenKind::GroupOpen(opener) => return self.parse_group(token, opener),
            TokenKind::Quantifier(_) => return Err(ParseError::NothingToRepeat(token.raw.to_string())),
            TokenKind::GroupClose | TokenKind::Alternation | TokenKind::Trivia => {
                return Err(ParseError::UnexpectedToken(token.raw.to_string()))
            }
            TokenKind::CharClass | TokenKind::Anchor | TokenKind::ControlChar => {
                describe::known(token.raw).unwrap_or_else(|| describe::literal(token.raw))
            }
            TokenKind::UnicodeProperty { negated } => describe::unicode_property(token.raw, negated),
            TokenKind::Bracket => describe::bracket(token.raw),
            TokenKind::Backreference(group) => describe::backreference(token.raw, group),
            TokenKind::NamedBackreference => {
                let name = token.name().unwrap_or_default();
                describe::named_backreference(token.raw, name, self.names.get(name).copied())
            }
            TokenKind::Complex => describe::known(token.raw)
                .unwrap_or_else(|| describe::unknown(token.raw, "Complex token the diagram does not break down.")),
            TokenKind::Escape => describe::escaped_literal(token.raw),
            TokenKind::InlineFlags => describe::modifier(token.raw, token.flags().unwrap_or_default()),
            TokenKind::Literal => describe::literal(token.raw),
        };
        Ok(AstNode::Terminal(terminal))
    }

    fn parse_group(&mut self, opener_token: &'t Token<'p>, opener: GroupOpener) -> Result<AstNode, ParseError> {
        // Numbered at the opening parenthesis so nested groups count outside-in.
        let index = opener.is_capturing().then(|| {
            let index = self.next_group;
            self.next_group += 1;
            index
        });

        let kind = match opener {
            GroupOpener::Capturing => GroupKind::Capturing,
            GroupOpener::Named => {
                let name = opener_token.name().unwrap_or_default();
                if let Some(index) = index {
                    self.names.insert(name, index);
                }
                GroupKind::Named(name.to_string())
            }
            GroupOpener::NonCapturing => GroupKind::NonCapturing,
            GroupOpener::Flagged => GroupKind::Flagged(opener_token.flags().unwrap_or_default().to_string()),
            GroupOpener::Atomic => GroupKind::Atomic,
            GroupOpener::LookAhead => GroupKind::LookAhead,
            GroupOpener::NegativeLookAhead => GroupKind::NegativeLookAhead,
            GroupOpener::LookBehind => GroupKind::LookBehind,
            GroupOpener::NegativeLookBehind => GroupKind::NegativeLookBehind,
            GroupOpener::Conditional => {
                GroupKind::Conditional(opener_token.condition().unwrap_or_default().to_string())
            }
        };

        let content = self.parse_alternatives()?;
        match self.advance() {
            Some(Token { kind: TokenKind::GroupClose, .. }) => {}
            _ => return Err(ParseError::UnbalancedParentheses),
        }

        Ok(AstNode::Group { label: kind.label(index), kind, index, content: Box::new(content) })
    }
}
