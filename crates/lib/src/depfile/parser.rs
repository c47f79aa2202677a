//! Make-rule parser for compiler dependency files.
//!
//! Accepts the subset of make syntax that `-MD`/`-MF` produce:
//!
//! ```text
//! out.o: src/a.c \
//!   include/a.h include/with\ space.h
//!
//! include/a.h:
//! ```
//!
//! Recognized escapes are `\ `, `\#`, `\:`, `\\` and `$$`. A backslash before
//! a newline joins lines. `#` starts a comment. Anything else after a
//! backslash is rejected rather than guessed at.

use super::types::{DependencyRecord, ParseError, ParseErrorKind};

#[derive(Debug, PartialEq, Eq)]
enum Token {
  Word(String),
  Colon,
  EndOfLine,
}

struct Lexer<'a> {
  chars: std::iter::Peekable<std::str::Chars<'a>>,
  line: usize,
  column: usize,
}

impl<'a> Lexer<'a> {
  fn new(input: &'a str) -> Self {
    Self {
      chars: input.chars().peekable(),
      line: 1,
      column: 0,
    }
  }

  fn bump(&mut self) -> Option<char> {
    let c = self.chars.next()?;
    if c == '\n' {
      self.line += 1;
      self.column = 0;
    } else {
      self.column += 1;
    }
    Some(c)
  }

  fn error(&self, kind: ParseErrorKind) -> ParseError {
    ParseError {
      line: self.line,
      column: self.column,
      kind,
    }
  }

  fn skip_comment(&mut self) {
    while let Some(&c) = self.chars.peek() {
      if c == '\n' {
        break;
      }
      self.bump();
    }
  }

  /// Tokenize the whole input, pairing each token with the line it ends on.
  /// The result always ends with `EndOfLine`.
  fn tokenize(mut self) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    fn flush(word: &mut String, tokens: &mut Vec<(Token, usize)>, line: usize) {
      if !word.is_empty() {
        tokens.push((Token::Word(std::mem::take(word)), line));
      }
    }

    while let Some(c) = self.bump() {
      let line = self.line;
      match c {
        '\\' => match self.bump() {
          None => return Err(self.error(ParseErrorKind::UnbalancedContinuation)),
          Some('\n') => flush(&mut word, &mut tokens, line),
          Some('\r') if self.chars.peek() == Some(&'\n') => {
            self.bump();
            flush(&mut word, &mut tokens, line);
          }
          Some(escaped @ (' ' | '#' | ':' | '\\')) => word.push(escaped),
          Some(other) => return Err(self.error(ParseErrorKind::UnknownEscape(other))),
        },
        '$' => match self.bump() {
          Some('$') => word.push('$'),
          _ => return Err(self.error(ParseErrorKind::UnescapedDollar)),
        },
        '#' => {
          flush(&mut word, &mut tokens, line);
          self.skip_comment();
        }
        '\n' => {
          // `bump` already advanced past the newline.
          flush(&mut word, &mut tokens, line - 1);
          tokens.push((Token::EndOfLine, line - 1));
        }
        ':' => {
          flush(&mut word, &mut tokens, line);
          tokens.push((Token::Colon, line));
        }
        c if c.is_whitespace() => flush(&mut word, &mut tokens, line),
        c => word.push(c),
      }
    }

    flush(&mut word, &mut tokens, self.line);
    tokens.push((Token::EndOfLine, self.line));
    Ok(tokens)
  }
}

#[derive(Default)]
struct Rule {
  targets: Vec<String>,
  prerequisites: Vec<String>,
  has_colon: bool,
  line: usize,
}

/// Parse dependency-file contents.
///
/// Returns `Ok(None)` when the input holds no rules at all (empty, blank or
/// comment-only). Only the first rule's prerequisites are kept; later rules
/// must be phony header rules without prerequisites.
pub fn parse(input: &str) -> Result<Option<DependencyRecord>, ParseError> {
  let tokens = Lexer::new(input).tokenize()?;

  let mut rules: Vec<Rule> = Vec::new();
  let mut current = Rule::default();

  let at = |line: usize, kind: ParseErrorKind| ParseError { line, column: 0, kind };

  for (token, line) in tokens {
    match token {
      Token::Word(word) if current.has_colon => current.prerequisites.push(word),
      Token::Word(word) => current.targets.push(word),
      Token::Colon => {
        if current.has_colon {
          return Err(at(line, ParseErrorKind::UnexpectedColon));
        }
        if current.targets.is_empty() {
          return Err(at(line, ParseErrorKind::MissingTarget));
        }
        current.has_colon = true;
      }
      Token::EndOfLine => {
        if current.has_colon {
          current.line = line;
          rules.push(std::mem::take(&mut current));
        } else if !current.targets.is_empty() {
          return Err(at(line, ParseErrorKind::MissingColon));
        }
      }
    }
  }

  let mut rules = rules.into_iter();
  let Some(first) = rules.next() else {
    return Ok(None);
  };

  if let Some(extra) = rules.find(|rule| !rule.prerequisites.is_empty()) {
    let name = extra.targets.join(" ");
    return Err(at(extra.line, ParseErrorKind::ExtraRule(name)));
  }

  Ok(Some(DependencyRecord {
    targets: first.targets,
    prerequisites: first.prerequisites,
  }))
}
