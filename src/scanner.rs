//! Scanner: regex source text → token stream (spec.md §4.1).
//!
//! Tokenizes literals, `.`, character classes (with negation and
//! ranges), the `\d \D \w \W \s \S` shorthands, anchors, grouping,
//! alternation, quantifiers (with an optional lazy `?` suffix), and
//! backreferences `\1`..`\9`. Every literal punctuation character seen
//! outside a character class is recorded into a punctuation inventory
//! that the test generator later uses to synthesize wrong-punctuation
//! evil strings (spec.md §4.6).

use std::collections::BTreeSet;

use crate::error::ScanError;
use crate::token::{AnchorKind, ClassItem, Shorthand, Token};

/// Seeded into every punctuation inventory regardless of what literally
/// appears in the source, so a regex with no outside-class punctuation
/// at all (e.g. `[abc]+`) still has candidates to try as a
/// wrong-punctuation evil variant (spec.md §8 scenario 6).
const DEFAULT_PUNCTUATION: [char; 4] = ['.', ',', '-', '_'];

/// The result of a successful scan.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    pub punctuation: BTreeSet<char>,
}

/// Tokenizes a regex source string.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    punctuation: BTreeSet<char>,
}

impl Scanner {
    pub fn scan(source: &str) -> Result<ScanOutput, ScanError> {
        let mut scanner = Scanner {
            chars: source.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            punctuation: DEFAULT_PUNCTUATION.iter().copied().collect(),
        };
        scanner.run()?;
        Ok(ScanOutput {
            tokens: scanner.tokens,
            punctuation: scanner.punctuation,
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn record_literal(&mut self, ch: char) {
        if ch.is_ascii_punctuation() {
            self.punctuation.insert(ch);
        }
        self.tokens.push(Token::Literal(ch));
    }

    fn run(&mut self) -> Result<(), ScanError> {
        while let Some(c) = self.peek() {
            match c {
                '(' => {
                    if self.peek_at(1) == Some('?') && self.peek_at(2) == Some(':') {
                        self.pos += 3;
                        self.tokens.push(Token::GroupOpen { capturing: false });
                    } else {
                        self.pos += 1;
                        self.tokens.push(Token::GroupOpen { capturing: true });
                    }
                }
                ')' => {
                    self.pos += 1;
                    self.tokens.push(Token::GroupClose);
                }
                '|' => {
                    self.pos += 1;
                    self.tokens.push(Token::Alternation);
                }
                '.' => {
                    self.pos += 1;
                    self.tokens.push(Token::Wildcard);
                }
                '^' => {
                    self.pos += 1;
                    self.tokens.push(Token::Anchor(AnchorKind::Start));
                }
                '$' => {
                    self.pos += 1;
                    self.tokens.push(Token::Anchor(AnchorKind::End));
                }
                '*' => {
                    self.pos += 1;
                    self.push_quantifier(0, None);
                }
                '+' => {
                    self.pos += 1;
                    self.push_quantifier(1, None);
                }
                '?' => {
                    self.pos += 1;
                    self.push_quantifier(0, Some(1));
                }
                '{' => {
                    let start = self.pos;
                    match self.try_scan_counted() {
                        Some((lower, upper)) => self.push_quantifier(lower, upper),
                        None => {
                            self.pos = start + 1;
                            self.record_literal('{');
                        }
                    }
                }
                '[' => self.scan_class()?,
                '\\' => self.scan_escape(false)?,
                other => {
                    self.pos += 1;
                    self.record_literal(other);
                }
            }
        }
        self.tokens.push(Token::EndOfInput);
        Ok(())
    }

    /// Pushes a quantifier token, absorbing a trailing `?` as the lazy flag.
    fn push_quantifier(&mut self, lower: u32, upper: Option<u32>) {
        let lazy = if self.peek() == Some('?') {
            self.pos += 1;
            true
        } else {
            false
        };
        self.tokens.push(Token::Quantifier { lower, upper, lazy });
    }

    /// Attempts to parse `{n}`, `{n,}`, or `{n,m}` starting at `self.pos`
    /// (which must point at `{`). Leaves `self.pos` unchanged on failure.
    fn try_scan_counted(&mut self) -> Option<(u32, Option<u32>)> {
        let save = self.pos;
        let mut p = self.pos + 1;
        let digits_start = p;
        while self.chars.get(p).is_some_and(|c| c.is_ascii_digit()) {
            p += 1;
        }
        if p == digits_start {
            self.pos = save;
            return None;
        }
        let lower: u32 = self.chars[digits_start..p].iter().collect::<String>().parse().ok()?;

        let upper = if self.chars.get(p) == Some(&',') {
            p += 1;
            let upper_start = p;
            while self.chars.get(p).is_some_and(|c| c.is_ascii_digit()) {
                p += 1;
            }
            if p == upper_start {
                None
            } else {
                let val: u32 = self.chars[upper_start..p].iter().collect::<String>().parse().ok()?;
                Some(val)
            }
        } else {
            Some(lower)
        };

        if self.chars.get(p) != Some(&'}') {
            self.pos = save;
            return None;
        }
        self.pos = p + 1;
        Some((lower, upper))
    }

    /// Scans a `\`-escape. `in_class` changes which escapes are legal
    /// (anchors and backreferences never appear inside a class).
    fn scan_escape(&mut self, in_class: bool) -> Result<(), ScanError> {
        let backslash_pos = self.pos;
        self.pos += 1;
        let c2 = self.peek().ok_or(ScanError::TrailingBackslash { pos: backslash_pos })?;

        if let Some(sh) = shorthand_for(c2) {
            self.pos += 1;
            // A bare shorthand outside a class is itself a one-item
            // character class atom; the parser treats a lone ClassItem
            // token the same way whether or not it came from inside `[...]`.
            self.tokens.push(Token::ClassItem(ClassItem::Shorthand(sh)));
            return Ok(());
        }

        if !in_class {
            if c2.is_ascii_digit() && c2 != '0' {
                self.pos += 1;
                self.tokens.push(Token::Backref(c2.to_digit(10).unwrap()));
                return Ok(());
            }
            if c2 == 'b' {
                self.pos += 1;
                self.tokens.push(Token::Anchor(AnchorKind::WordBoundary));
                return Ok(());
            }
            if c2 == 'B' {
                self.pos += 1;
                self.tokens.push(Token::Anchor(AnchorKind::NonWordBoundary));
                return Ok(());
            }
        }

        if is_escapable_punctuation(c2) {
            self.pos += 1;
            if in_class {
                self.tokens.push(Token::ClassItem(ClassItem::Char(c2)));
            } else {
                self.record_literal(c2);
            }
            return Ok(());
        }

        Err(ScanError::UnsupportedEscape { pos: backslash_pos, ch: c2 })
    }

    /// Scans a `[...]` character class, emitting `ClassOpen`, zero or
    /// more `ClassItem`s, and `ClassClose`.
    fn scan_class(&mut self) -> Result<(), ScanError> {
        let open_pos = self.pos;
        self.pos += 1; // consume '['
        let negated = if self.peek() == Some('^') {
            self.pos += 1;
            true
        } else {
            false
        };
        self.tokens.push(Token::ClassOpen { negated });

        loop {
            match self.peek() {
                None => return Err(ScanError::UnterminatedClass { pos: open_pos }),
                Some(']') => {
                    self.pos += 1;
                    self.tokens.push(Token::ClassClose);
                    return Ok(());
                }
                Some('\\') => self.scan_escape(true)?,
                Some(lo) => {
                    // a-z style range: lo, '-', hi, where hi != ']'
                    if self.peek_at(1) == Some('-')
                        && self.peek_at(2).is_some()
                        && self.peek_at(2) != Some(']')
                    {
                        let hi = self.peek_at(2).unwrap();
                        if hi < lo {
                            return Err(ScanError::InvalidRange { pos: self.pos, lo, hi });
                        }
                        self.pos += 3;
                        self.tokens.push(Token::ClassItem(ClassItem::Range(lo, hi)));
                    } else {
                        self.pos += 1;
                        self.tokens.push(Token::ClassItem(ClassItem::Char(lo)));
                    }
                }
            }
        }
    }
}

fn shorthand_for(c: char) -> Option<Shorthand> {
    match c {
        'd' => Some(Shorthand::Digit),
        'D' => Some(Shorthand::NonDigit),
        'w' => Some(Shorthand::Word),
        'W' => Some(Shorthand::NonWord),
        's' => Some(Shorthand::Space),
        'S' => Some(Shorthand::NonSpace),
        _ => None,
    }
}

fn is_escapable_punctuation(c: char) -> bool {
    matches!(
        c,
        '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\' | '-' | '/'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_literal_sequence() {
        let out = Scanner::scan("abc").unwrap();
        assert_eq!(
            out.tokens,
            vec![
                Token::Literal('a'),
                Token::Literal('b'),
                Token::Literal('c'),
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn scans_counted_quantifier() {
        let out = Scanner::scan("a{2,4}").unwrap();
        assert_eq!(
            out.tokens[1],
            Token::Quantifier { lower: 2, upper: Some(4), lazy: false }
        );
    }

    #[test]
    fn treats_malformed_brace_as_literal() {
        let out = Scanner::scan("a{x}").unwrap();
        assert!(out.tokens.contains(&Token::Literal('{')));
    }

    #[test]
    fn scans_negated_class_with_range() {
        let out = Scanner::scan("[^a-z]").unwrap();
        assert_eq!(
            out.tokens,
            vec![
                Token::ClassOpen { negated: true },
                Token::ClassItem(ClassItem::Range('a', 'z')),
                Token::ClassClose,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn unterminated_class_errors() {
        assert_eq!(
            Scanner::scan("[abc"),
            Err(ScanError::UnterminatedClass { pos: 0 })
        );
    }

    #[test]
    fn trailing_backslash_errors() {
        assert_eq!(
            Scanner::scan("ab\\"),
            Err(ScanError::TrailingBackslash { pos: 2 })
        );
    }

    #[test]
    fn unsupported_escape_errors() {
        assert_eq!(
            Scanner::scan("\\q"),
            Err(ScanError::UnsupportedEscape { pos: 0, ch: 'q' })
        );
    }

    #[test]
    fn records_punctuation_inventory() {
        let out = Scanner::scan("a\\.b,c").unwrap();
        assert!(out.punctuation.contains(&'.'));
        assert!(out.punctuation.contains(&','));
    }

    #[test]
    fn lazy_quantifier_flag_recorded() {
        let out = Scanner::scan("a*?").unwrap();
        assert_eq!(
            out.tokens[1],
            Token::Quantifier { lower: 0, upper: None, lazy: true }
        );
    }

    #[test]
    fn backreference_and_anchors() {
        let out = Scanner::scan("(a)\\1^$\\b\\B").unwrap();
        assert!(out.tokens.contains(&Token::Backref(1)));
        assert!(out.tokens.contains(&Token::Anchor(AnchorKind::Start)));
        assert!(out.tokens.contains(&Token::Anchor(AnchorKind::End)));
        assert!(out.tokens.contains(&Token::Anchor(AnchorKind::WordBoundary)));
        assert!(out.tokens.contains(&Token::Anchor(AnchorKind::NonWordBoundary)));
    }
}
