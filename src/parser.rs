use crate::lexer::{RedirectOp, Token};
use thiserror::Error;

/// A simple command: its name, positional arguments and optional stdout target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// First non-redirection token.
    pub name: String,
    /// Remaining words in order, without the name.
    pub args: Vec<String>,
    /// File that receives standard output instead of the terminal.
    pub output_target: Option<String>,
}

/// Errors that can occur while turning tokens into a [`ParsedCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    /// A redirection operator was the last token on the line.
    #[error("syntax error: no filename provided for redirection after '{operator}'")]
    MissingRedirectTarget { operator: RedirectOp },
}

struct CommandBuilder {
    tokens: std::vec::IntoIter<Token>,
    words: Vec<String>,
    output_target: Option<String>,
}

impl CommandBuilder {
    fn from(tokens: Vec<Token>) -> Self {
        CommandBuilder {
            tokens: tokens.into_iter(),
            words: Vec::new(),
            output_target: None,
        }
    }

    fn build(mut self) -> Result<Option<ParsedCommand>, ParsingError> {
        while let Some(token) = self.tokens.next() {
            match token {
                Token::Word(text) => self.words.push(text),
                Token::RedirectStdout(operator) => self.parse_redirect(operator)?,
            }
        }

        let mut words = self.words.into_iter();
        Ok(words.next().map(|name| ParsedCommand {
            name,
            args: words.collect(),
            output_target: self.output_target,
        }))
    }

    /// Parse a redirect target: the token right after the operator, whatever it is.
    /// A later redirect replaces an earlier one.
    fn parse_redirect(&mut self, operator: RedirectOp) -> Result<(), ParsingError> {
        match self.tokens.next() {
            Some(target) => {
                self.output_target = Some(match target {
                    Token::Word(text) => text,
                    op => op.to_string(),
                });
                Ok(())
            }
            None => Err(ParsingError::MissingRedirectTarget { operator }),
        }
    }
}

/// Splits a token list into a command and its redirection target.
///
/// Returns `Ok(None)` when there is nothing to run (no tokens, or only a redirect
/// such as `> file`). A dangling operator fails the whole line.
pub fn parse(tokens: Vec<Token>) -> Result<Option<ParsedCommand>, ParsingError> {
    CommandBuilder::from(tokens).build()
}
