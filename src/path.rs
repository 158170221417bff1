//! Straight-line SVG path data.
//!
//! Only absolute `M`, `L` and `Z` commands are understood. UML exports draw
//! class borders and connectors with those alone; curves, arcs and relative
//! commands are not recognized and are left out of a transformed path.
//!
//! SVG path syntax: https://www.w3.org/TR/SVG/paths.html

use crate::matrix::{Matrix, format_coord};

/// A lexed piece of path data.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// `M` or `L` with its raw numeric literals, in order.
    Command { letter: char, literals: Vec<&'a str> },
    /// `Z`
    ClosePath,
}

/// Split path data into `M`/`L`/`Z` tokens, skipping anything else.
pub fn tokenize(d: &str) -> Vec<Token<'_>> {
    let mut lexer = PathLexer::new(d);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }
    tokens
}

/// Rewrite the coordinates of a straight-line path through `matrix`.
///
/// Each `x y` pair that parses is mapped and written with six decimals; an
/// unparseable or incomplete pair is dropped.
pub fn transform_path_data(d: &str, matrix: &Matrix) -> String {
    let mut out: Vec<String> = Vec::new();

    for token in tokenize(d) {
        match token {
            Token::ClosePath => out.push("Z".into()),
            Token::Command { letter, literals } => {
                out.push(letter.to_string());
                for pair in literals.chunks_exact(2) {
                    if let (Ok(x), Ok(y)) = (pair[0].parse::<f64>(), pair[1].parse::<f64>()) {
                        let (x, y) = matrix.apply(x, y);
                        out.push(format_coord(x));
                        out.push(format_coord(y));
                    }
                }
            }
        }
    }

    out.join(" ").trim().to_string()
}

/// Collapse a close command immediately repeated (`Z Z`, `zz`) into one.
///
/// Returns `None` when the data has no such repetition.
pub fn collapse_close_paths(d: &str) -> Option<String> {
    let chars: Vec<char> = d.chars().collect();
    let mut out = String::with_capacity(d.len());
    let mut changed = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        if is_close(c) {
            loop {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_ascii_whitespace() {
                    j += 1;
                }
                if j < chars.len() && is_close(chars[j]) {
                    i = j;
                    changed = true;
                } else {
                    break;
                }
            }
        }
        i += 1;
    }

    changed.then_some(out)
}

fn is_close(c: char) -> bool {
    c == 'Z' || c == 'z'
}

struct PathLexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathLexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        while let Some(c) = self.next() {
            match c {
                'M' | 'L' => {
                    let run = self.numeric_run();
                    // A command letter with nothing after it carries no data.
                    if run.is_empty() {
                        continue;
                    }
                    return Some(Token::Command {
                        letter: c,
                        literals: run.split_whitespace().collect(),
                    });
                }
                'Z' => {
                    self.numeric_run();
                    return Some(Token::ClosePath);
                }
                _ => {}
            }
        }
        None
    }

    /// Consume digits, `.`, `-` and whitespace following a command letter.
    fn numeric_run(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .map(|c| c.is_ascii_digit() || c == '.' || c == '-' || c.is_whitespace())
            .unwrap_or(false)
        {
            self.next();
        }
        &self.input[start..self.pos]
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_straight_lines() {
        let tokens = tokenize("M 0 0 L 10 0 L10 10 Z");
        assert_eq!(
            tokens,
            vec![
                Token::Command { letter: 'M', literals: vec!["0", "0"] },
                Token::Command { letter: 'L', literals: vec!["10", "0"] },
                Token::Command { letter: 'L', literals: vec!["10", "10"] },
                Token::ClosePath,
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_unknown_commands() {
        let tokens = tokenize("M 0 0 C 1 1 2 2 3 3 z");
        assert_eq!(tokens, vec![Token::Command { letter: 'M', literals: vec!["0", "0"] }]);
    }

    #[test]
    fn test_transform_identity() {
        let out = transform_path_data("M 0 0 L 10 0 L 10 10 Z", &Matrix::IDENTITY);
        assert_eq!(out, "M 0.000000 0.000000 L 10.000000 0.000000 L 10.000000 10.000000 Z");
    }

    #[test]
    fn test_transform_translation() {
        let out = transform_path_data("M 0 0 L 10 0 Z", &Matrix::translate(5.0, 5.0));
        assert_eq!(out, "M 5.000000 5.000000 L 15.000000 5.000000 Z");
    }

    #[test]
    fn test_transform_scale_and_negative() {
        let m = Matrix::new(2.0, 0.0, 0.0, 2.0, -1.0, 0.0);
        let out = transform_path_data("M -1.5 2", &m);
        assert_eq!(out, "M -4.000000 4.000000");
    }

    #[test]
    fn test_transform_drops_incomplete_pair() {
        let out = transform_path_data("M 1 2 3", &Matrix::IDENTITY);
        assert_eq!(out, "M 1.000000 2.000000");
    }

    #[test]
    fn test_transform_drops_malformed_pair() {
        let out = transform_path_data("M 1-2 3 L 4 5", &Matrix::IDENTITY);
        assert_eq!(out, "M L 4.000000 5.000000");
    }

    #[test]
    fn test_transform_multiple_pairs_per_command() {
        let out = transform_path_data("M 0 0 1 1", &Matrix::translate(1.0, 0.0));
        assert_eq!(out, "M 1.000000 0.000000 2.000000 1.000000");
    }

    #[test]
    fn test_transform_already_formatted_is_stable() {
        let d = "M 5.000000 5.000000 L 15.000000 5.000000 Z";
        assert_eq!(transform_path_data(d, &Matrix::IDENTITY), d);
    }

    #[test]
    fn test_collapse_close_paths() {
        assert_eq!(collapse_close_paths("M 0 0 L 1 1 Z Z").as_deref(), Some("M 0 0 L 1 1 Z"));
        assert_eq!(collapse_close_paths("M0 0L1 1ZZZ").as_deref(), Some("M0 0L1 1Z"));
        assert_eq!(collapse_close_paths("M 0 0 z Z M 2 2").as_deref(), Some("M 0 0 z M 2 2"));
        assert_eq!(collapse_close_paths("M 0 0 Z M 1 1 Z"), None);
    }
}
