/// Characters that force a token to be quoted.
fn needs_quoting(c: char) -> bool {
  c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '#' | '\0')
}

/// Quote a single token for an argfile.
///
/// Tokens made only of safe characters are written as-is. Anything else,
/// including the empty token, is wrapped in double quotes with `\` and `"`
/// backslash-escaped.
pub fn escape(token: &str) -> String {
  if !token.is_empty() && !token.chars().any(needs_quoting) {
    return token.to_string();
  }

  let mut out = String::with_capacity(token.len() + 2);
  out.push('"');
  for c in token.chars() {
    if matches!(c, '"' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('"');
  out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
  /// Between tokens.
  Init,
  Unquoted,
  Quoted(char),
}

/// Split argfile contents into tokens the way the compiler driver does.
pub fn split(contents: &str) -> Vec<String> {
  let mut tokens = Vec::new();
  let mut token = String::new();
  let mut state = State::Init;
  let mut chars = contents.chars();

  while let Some(c) = chars.next() {
    match state {
      State::Init | State::Unquoted => {
        if c.is_whitespace() || c == '\0' {
          if state == State::Unquoted {
            tokens.push(std::mem::take(&mut token));
            state = State::Init;
          }
          continue;
        }
        state = State::Unquoted;
        match c {
          '"' | '\'' => state = State::Quoted(c),
          '\\' => {
            if let Some(next) = chars.next() {
              token.push(next);
            }
          }
          _ => token.push(c),
        }
      }
      State::Quoted(quote) => {
        if c == quote {
          state = State::Unquoted;
        } else if c == '\\' {
          match chars.next() {
            Some(next) => token.push(next),
            None => token.push(c),
          }
        } else {
          token.push(c);
        }
      }
    }
  }

  if state != State::Init {
    tokens.push(token);
  }
  tokens
}
