//! Path expression scanner.
//!
//! The scanner walks the path text once, left to right, and hands out one
//! [`Chunk`] per call. Brackets are captured whole (honoring nested quotes,
//! brackets and parentheses) and classified afterwards; everything else is
//! read as a run of name characters.

use super::chunk::Chunk;
use super::error::QueryError;

/// Cursor over the characters of a path expression.
pub struct Scanner {
    input: Vec<char>,
    position: usize,
}

impl Scanner {
    /// Creates a scanner positioned at the start of `path`.
    pub fn new(path: &str) -> Self {
        Self {
            input: path.chars().collect(),
            position: 0,
        }
    }

    /// Splits a whole path into chunks, stopping before [`Chunk::Empty`].
    pub fn tokenize(path: &str) -> Result<Vec<Chunk>, QueryError> {
        let mut scanner = Scanner::new(path);
        let mut chunks = Vec::new();
        loop {
            match scanner.next_chunk()? {
                Chunk::Empty => return Ok(chunks),
                chunk => chunks.push(chunk),
            }
        }
    }

    /// Returns the next chunk and advances past it.
    ///
    /// Once the input is exhausted every further call returns
    /// [`Chunk::Empty`].
    pub fn next_chunk(&mut self) -> Result<Chunk, QueryError> {
        match self.peek() {
            None => Ok(Chunk::Empty),
            Some('.') => {
                self.position += 1;
                Ok(Chunk::Dot)
            }
            Some('[') => {
                self.position += 1;
                let content = self.scan_brace()?;
                Ok(classify_brace(content.trim()))
            }
            Some(_) => self.scan_member(),
        }
    }

    /// Offset of the first unconsumed character.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Text not yet consumed.
    pub fn remaining(&self) -> String {
        self.input[self.position..].iter().collect()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    /// Captures everything up to the `]` matching an already consumed `[`.
    ///
    /// The cursor ends up after the closing bracket.
    fn scan_brace(&mut self) -> Result<String, QueryError> {
        let opened_at = self.position - 1;
        let start = self.position;
        let mut closers: Vec<char> = Vec::new();

        loop {
            let ch = match self.peek() {
                Some(ch) => ch,
                None => {
                    let message = match closers.last() {
                        Some(closer) => format!("'{}' is never closed inside '['", closer),
                        None => "'[' is never closed".to_string(),
                    };
                    return Err(QueryError::scan(opened_at, message));
                }
            };

            match closers.last().copied() {
                None => match ch {
                    ']' => {
                        let content: String = self.input[start..self.position].iter().collect();
                        self.position += 1;
                        return Ok(content);
                    }
                    '\'' | '"' => closers.push(ch),
                    '(' => closers.push(')'),
                    '[' => closers.push(']'),
                    _ => {}
                },
                Some(quote @ ('\'' | '"')) => {
                    if ch == '\\' {
                        // escaped character, including an escaped quote
                        self.position += 1;
                    } else if ch == quote {
                        closers.pop();
                    }
                }
                Some(closer) => {
                    if ch == closer {
                        closers.pop();
                    }
                }
            }
            self.position += 1;
        }
    }

    /// Reads a run of name characters, then decides between function,
    /// index and member.
    fn scan_member(&mut self) -> Result<Chunk, QueryError> {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                self.position += 1;
            } else {
                break;
            }
        }

        if self.position == start {
            let found = self.peek().unwrap_or_default();
            return Err(QueryError::scan(
                start,
                format!("unexpected character {:?}", found),
            ));
        }

        let name: String = self.input[start..self.position].iter().collect();

        if self.peek() == Some('(') {
            if self.peek_at(1) != Some(')') {
                return Err(QueryError::scan(
                    self.position,
                    format!("function {:?} must be called with empty '()'", name),
                ));
            }
            self.position += 2;
            return Ok(Chunk::Function(name));
        }

        if name.chars().all(|ch| ch.is_ascii_digit()) {
            Ok(Chunk::Index(name))
        } else {
            Ok(Chunk::Member(name))
        }
    }
}

/// Classifies trimmed bracket content.
fn classify_brace(content: &str) -> Chunk {
    if content == "*" {
        return Chunk::Star;
    }
    if let Some(name) = strip_matching_quotes(content) {
        return Chunk::Member(name.to_string());
    }
    // An empty bracket lands here too and fails later as an index.
    if content.chars().all(|ch| ch.is_ascii_digit()) {
        return Chunk::Index(content.to_string());
    }
    Chunk::Brace(content.to_string())
}

fn strip_matching_quotes(content: &str) -> Option<&str> {
    for quote in ['\'', '"'] {
        if content.len() >= 2 && content.starts_with(quote) && content.ends_with(quote) {
            return Some(&content[1..content.len() - 1]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> Chunk {
        Chunk::Member(name.to_string())
    }

    #[test]
    fn test_empty_path() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.next_chunk().unwrap(), Chunk::Empty);
        assert_eq!(scanner.next_chunk().unwrap(), Chunk::Empty);
    }

    #[test]
    fn test_dotted_members() {
        let chunks = Scanner::tokenize("locale.en.errors").unwrap();
        assert_eq!(
            chunks,
            vec![
                member("locale"),
                Chunk::Dot,
                member("en"),
                Chunk::Dot,
                member("errors"),
            ]
        );
    }

    #[test]
    fn test_bare_digits_are_index() {
        let chunks = Scanner::tokenize("errors.0.text").unwrap();
        assert_eq!(chunks[2], Chunk::Index("0".to_string()));
    }

    #[test]
    fn test_mixed_digits_and_letters_are_member() {
        let chunks = Scanner::tokenize("0x1f").unwrap();
        assert_eq!(chunks, vec![member("0x1f")]);
    }

    #[test]
    fn test_hyphen_and_underscore_in_member() {
        let chunks = Scanner::tokenize("client_id.x-forwarded").unwrap();
        assert_eq!(chunks[0], member("client_id"));
        assert_eq!(chunks[2], member("x-forwarded"));
    }

    #[test]
    fn test_function() {
        let chunks = Scanner::tokenize("phones.length()").unwrap();
        assert_eq!(chunks[2], Chunk::Function("length".to_string()));
    }

    #[test]
    fn test_function_with_arguments_fails() {
        let err = Scanner::tokenize("phones.length(1)").unwrap_err();
        assert!(matches!(err, QueryError::Scan { position: 13, .. }));
    }

    #[test]
    fn test_star() {
        assert_eq!(Scanner::tokenize("[*]").unwrap(), vec![Chunk::Star]);
        assert_eq!(Scanner::tokenize("[ * ]").unwrap(), vec![Chunk::Star]);
    }

    #[test]
    fn test_quoted_member() {
        let chunks = Scanner::tokenize(r#"keys["key with spaces and dot."].value"#).unwrap();
        assert_eq!(
            chunks,
            vec![
                member("keys"),
                member("key with spaces and dot."),
                Chunk::Dot,
                member("value"),
            ]
        );
        assert_eq!(
            Scanner::tokenize("['single']").unwrap(),
            vec![member("single")]
        );
    }

    #[test]
    fn test_bracket_index() {
        assert_eq!(
            Scanner::tokenize("items[ 12 ]").unwrap(),
            vec![member("items"), Chunk::Index("12".to_string())]
        );
    }

    #[test]
    fn test_empty_bracket_is_index() {
        assert_eq!(
            Scanner::tokenize("[]").unwrap(),
            vec![Chunk::Index(String::new())]
        );
    }

    #[test]
    fn test_predicate_with_nested_brackets_and_quotes() {
        let chunks = Scanner::tokenize(r#"contacts[tags[0] == "a]b"].name"#).unwrap();
        assert_eq!(
            chunks,
            vec![
                member("contacts"),
                Chunk::Brace(r#"tags[0] == "a]b""#.to_string()),
                Chunk::Dot,
                member("name"),
            ]
        );
    }

    #[test]
    fn test_predicate_with_function() {
        let chunks = Scanner::tokenize("contacts[phones.length() > 2]").unwrap();
        assert_eq!(
            chunks[1],
            Chunk::Brace("phones.length() > 2".to_string())
        );
    }

    #[test]
    fn test_predicate_with_escaped_quote() {
        let chunks = Scanner::tokenize(r#"[name == "a\"]"]"#).unwrap();
        assert_eq!(chunks, vec![Chunk::Brace(r#"name == "a\"]""#.to_string())]);
    }

    #[test]
    fn test_unterminated_bracket() {
        let err = Scanner::tokenize("items[0").unwrap_err();
        assert!(matches!(err, QueryError::Scan { position: 5, .. }));
    }

    #[test]
    fn test_unterminated_quote_in_bracket() {
        let err = Scanner::tokenize(r#"items[name == "x]"#).unwrap_err();
        match err {
            QueryError::Scan { message, .. } => assert!(message.contains("never closed")),
            other => panic!("Expected scan error, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_character_does_not_loop() {
        let err = Scanner::tokenize("a.$b").unwrap_err();
        assert!(matches!(err, QueryError::Scan { position: 2, .. }));
    }

    #[test]
    fn test_remaining_tracks_cursor() {
        let mut scanner = Scanner::new("a.b");
        scanner.next_chunk().unwrap();
        assert_eq!(scanner.position(), 1);
        assert_eq!(scanner.remaining(), ".b");
    }
}
