//! Lexical analysis (tokenization) of a single command line.
//!
//! The lexer never fails: unterminated quotes are closed implicitly at the end of
//! input and whatever was collected is emitted as the last token.

use std::fmt;

/// Output redirection operator as it was spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOp {
    /// `>`
    Greater,
    /// `1>`
    FdGreater,
}

impl RedirectOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectOp::Greater => ">",
            RedirectOp::FdGreater => "1>",
        }
    }
}

impl fmt::Display for RedirectOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a token resulting from lexical analysis.
///
/// Only an unquoted `>` or `1>` becomes [`Token::RedirectStdout`]; the same
/// characters inside quotes or after a backslash are ordinary word text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text with quotes and escapes already resolved.
    Word(String),
    /// Redirect standard output to the file named by the next token.
    RedirectStdout(RedirectOp),
}

impl Token {
    /// Text of the token: the word itself, or the operator spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Token::Word(text) => text,
            Token::RedirectStdout(op) => op.as_str(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Normal,
    SingleQuote,
    DoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    // Set by a backslash outside single quotes; the next character is taken literally.
    escape_next: bool,
    buffer: String,
    out: Vec<Token>,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Normal,
            escape_next: false,
            buffer: String::new(),
            out: Vec::new(),
        }
    }

    /// Runs the state machine over the whole input and returns the tokens.
    fn make_tokens(mut self) -> Vec<Token> {
        while let Some(ch) = self.read_char() {
            if self.escape_next {
                self.escape_next = false;
                self.buffer.push(ch);
                continue;
            }
            match self.state {
                LexingState::Normal => self.handle_normal(ch),
                LexingState::SingleQuote => self.handle_single_quote(ch),
                LexingState::DoubleQuote => self.handle_double_quote(ch),
            }
        }

        // Unterminated quotes and a dangling backslash are accepted as-is.
        self.flush_word();
        self.out
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn flush_word(&mut self) {
        if !self.buffer.is_empty() {
            self.out.push(Token::Word(std::mem::take(&mut self.buffer)));
        }
    }

    fn emit_redirect(&mut self, op: RedirectOp) {
        self.flush_word();
        self.out.push(Token::RedirectStdout(op));
    }

    fn handle_normal(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::SingleQuote,
            '"' => self.state = LexingState::DoubleQuote,
            '\\' => self.escape_next = true,
            '>' => self.emit_redirect(RedirectOp::Greater),
            '1' if self.peek_char() == Some('>') => {
                self.read_char();
                self.emit_redirect(RedirectOp::FdGreater);
            }
            c if c.is_whitespace() => self.flush_word(),
            c => self.buffer.push(c),
        }
    }

    fn handle_single_quote(&mut self, ch: char) {
        match ch {
            '\'' => self.state = LexingState::Normal,
            c => self.buffer.push(c),
        }
    }

    fn handle_double_quote(&mut self, ch: char) {
        match ch {
            '"' => self.state = LexingState::Normal,
            '\\' => self.escape_next = true,
            c => self.buffer.push(c),
        }
    }
}

/// Splits a raw command line into tokens, resolving quotes and escapes.
///
/// Total and deterministic: every input produces a token list, possibly empty.
pub fn tokenize(line: &str) -> Vec<Token> {
    LexingFSM::new(line).make_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        tokenize(line).iter().map(|t| t.as_str().to_string()).collect()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(texts("  echo   hello\tworld  "), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_single_quotes_are_fully_literal() {
        assert_eq!(
            tokenize("echo 'a\\nb>c'"),
            vec![word("echo"), word("a\\nb>c")]
        );
        assert_eq!(texts("echo 'hello    world'"), vec!["echo", "hello    world"]);
        assert_eq!(texts("echo 'a\"b'"), vec!["echo", "a\"b"]);
    }

    #[test]
    fn test_double_quote_escapes() {
        assert_eq!(texts("echo \"a\\\"b\""), vec!["echo", "a\"b"]);
        assert_eq!(texts("echo \"a\\\\b\""), vec!["echo", "a\\b"]);
        // The backslash is dropped before any character.
        assert_eq!(texts("echo \"a\\nb\" \"x\\$y\""), vec!["echo", "anb", "x$y"]);
        assert_eq!(texts("echo \"a\\ b\""), vec!["echo", "a b"]);
        assert_eq!(texts("echo \"it's\""), vec!["echo", "it's"]);
    }

    #[test]
    fn test_unquoted_backslash_escapes_anything() {
        assert_eq!(texts("echo a\\ b"), vec!["echo", "a b"]);
        assert_eq!(texts("echo \\\"x\\\""), vec!["echo", "\"x\""]);
        assert_eq!(texts("echo \\\\"), vec!["echo", "\\"]);
        assert_eq!(texts("echo \\'quoted\\'"), vec!["echo", "'quoted'"]);
    }

    #[test]
    fn test_adjacent_quotes_join_into_one_word() {
        assert_eq!(texts("echo 'foo'\"bar\"baz"), vec!["echo", "foobarbaz"]);
        assert_eq!(texts("echo \"a  b\" 'c'"), vec!["echo", "a  b", "c"]);
    }

    #[test]
    fn test_redirect_operators() {
        assert_eq!(texts("echo hi 1> out.txt"), vec!["echo", "hi", "1>", "out.txt"]);
        assert_eq!(
            tokenize("echo hi>out.txt"),
            vec![
                word("echo"),
                word("hi"),
                Token::RedirectStdout(RedirectOp::Greater),
                word("out.txt"),
            ]
        );
        assert_eq!(
            tokenize("pwd 1>f"),
            vec![
                word("pwd"),
                Token::RedirectStdout(RedirectOp::FdGreater),
                word("f"),
            ]
        );
    }

    #[test]
    fn test_one_without_greater_is_plain_text() {
        assert_eq!(tokenize("echo 1 12 a1"), vec![word("echo"), word("1"), word("12"), word("a1")]);
    }

    #[test]
    fn test_quoted_or_escaped_operator_is_a_word() {
        assert_eq!(tokenize("echo '>'"), vec![word("echo"), word(">")]);
        assert_eq!(tokenize("echo \"1>\""), vec![word("echo"), word("1>")]);
        assert_eq!(tokenize("echo \\>"), vec![word("echo"), word(">")]);
    }

    #[test]
    fn test_unterminated_quotes_are_accepted() {
        assert_eq!(texts("echo 'abc"), vec!["echo", "abc"]);
        assert_eq!(texts("echo \"abc def"), vec!["echo", "abc def"]);
        assert_eq!(texts("echo abc\\"), vec!["echo", "abc"]);
    }

    #[test]
    fn test_empty_quotes_produce_no_token() {
        assert_eq!(texts("echo '' \"\""), vec!["echo"]);
    }

    #[test]
    fn test_unicode_input() {
        assert_eq!(texts("echo 'héllo wörld' ✓1>x"), vec!["echo", "héllo wörld", "✓", "1>", "x"]);
    }
}
