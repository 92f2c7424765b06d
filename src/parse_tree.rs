//! ParseTree: token stream → typed AST (spec.md §4.2).
//!
//! Recursive-descent parser over the grammar:
//!
//! ```text
//! regex     := alt
//! alt       := concat ('|' concat)*
//! concat    := repeat+
//! repeat    := atom quantifier?
//! atom      := group | charclass | literal | anchor | backref | wildcard
//! group     := '(' [ '?:' ] regex ')'
//! ```

use std::collections::{BTreeSet, HashSet};

use crate::ast::ParseNode;
use crate::charclass::CharClassSpec;
use crate::error::{EgretError, ParseError};
use crate::scanner::Scanner;
use crate::token::{ClassItem, Token};
use crate::{GroupId, LoopId};

#[derive(Debug, Clone)]
pub struct ParseTree {
    pub root: ParseNode,
    pub group_count: u32,
    pub loop_count: u32,
    pub punctuation: BTreeSet<char>,
}

impl ParseTree {
    pub fn build(regex: &str) -> Result<ParseTree, EgretError> {
        let scan = Scanner::scan(regex)?;
        let mut parser = Parser {
            tokens: scan.tokens,
            pos: 0,
            next_group_id: 1,
            next_loop_id: 0,
            closed_groups: HashSet::new(),
        };
        let root = parser.parse_alt()?;
        if parser.peek() != &Token::EndOfInput {
            return Err(ParseError::TrailingInput { pos: parser.pos }.into());
        }
        Ok(ParseTree {
            root,
            group_count: parser.next_group_id - 1,
            loop_count: parser.next_loop_id,
            punctuation: scan.punctuation,
        })
    }

    /// True if two or more character classes in the tree have an
    /// identical expanded member set (spec.md §4.6 duplicate-set warning).
    pub fn has_duplicate_character_sets(&self) -> bool {
        let mut seen: Vec<BTreeSet<char>> = Vec::new();
        let mut duplicate = false;
        self.root.for_each_char_class(&mut |spec| {
            let set = spec.expanded_set();
            if seen.contains(&set) {
                duplicate = true;
            } else {
                seen.push(set);
            }
        });
        duplicate
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    next_group_id: GroupId,
    next_loop_id: LoopId,
    closed_groups: HashSet<GroupId>,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn parse_alt(&mut self) -> Result<ParseNode, ParseError> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek() == &Token::Alternation {
            self.bump();
            branches.push(self.parse_concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.pop().unwrap()
        } else {
            ParseNode::Alt(branches)
        })
    }

    fn parse_concat(&mut self) -> Result<ParseNode, ParseError> {
        let mut items = Vec::new();
        while self.starts_atom() {
            items.push(self.parse_repeat()?);
        }
        if items.is_empty() {
            return Err(ParseError::EmptyConcat { pos: self.pos });
        }
        Ok(if items.len() == 1 {
            items.pop().unwrap()
        } else {
            ParseNode::Concat(items)
        })
    }

    fn starts_atom(&self) -> bool {
        !matches!(
            self.peek(),
            Token::Alternation | Token::GroupClose | Token::EndOfInput
        )
    }

    fn parse_repeat(&mut self) -> Result<ParseNode, ParseError> {
        let atom = self.parse_atom()?;
        if let Token::Quantifier { lower, upper, lazy } = self.peek().clone() {
            if let Some(upper) = upper {
                if upper < lower {
                    return Err(ParseError::BadQuantifier { pos: self.pos, lower, upper });
                }
            }
            self.bump();
            let loop_id = self.next_loop_id;
            self.next_loop_id += 1;
            return Ok(ParseNode::Repeat {
                child: Box::new(atom),
                lower,
                upper,
                lazy,
                loop_id,
            });
        }
        Ok(atom)
    }

    fn parse_atom(&mut self) -> Result<ParseNode, ParseError> {
        match self.peek().clone() {
            Token::GroupOpen { capturing } => {
                self.bump();
                let id = if capturing {
                    let id = self.next_group_id;
                    self.next_group_id += 1;
                    Some(id)
                } else {
                    None
                };
                let inner = self.parse_alt()?;
                if self.peek() != &Token::GroupClose {
                    return Err(ParseError::UnmatchedParen { pos: self.pos });
                }
                self.bump();
                if let Some(id) = id {
                    self.closed_groups.insert(id);
                }
                Ok(ParseNode::Group { id, child: Box::new(inner) })
            }
            Token::ClassOpen { negated } => {
                self.bump();
                let mut items = Vec::new();
                while let Token::ClassItem(item) = self.peek().clone() {
                    items.push(item);
                    self.bump();
                }
                if self.peek() != &Token::ClassClose {
                    return Err(ParseError::UnexpectedToken {
                        pos: self.pos,
                        detail: "expected end of character class".to_string(),
                    });
                }
                self.bump();
                Ok(ParseNode::CharClass(CharClassSpec::explicit(items, negated)))
            }
            Token::ClassItem(item) => {
                self.bump();
                Ok(ParseNode::CharClass(CharClassSpec::explicit(vec![item], false)))
            }
            Token::Literal(c) => {
                self.bump();
                Ok(ParseNode::Literal(c))
            }
            Token::Wildcard => {
                self.bump();
                Ok(ParseNode::Wildcard)
            }
            Token::Anchor(kind) => {
                self.bump();
                Ok(ParseNode::Anchor(kind))
            }
            Token::Backref(id) => {
                self.bump();
                if !self.closed_groups.contains(&id) {
                    return Err(ParseError::InvalidBackref { pos: self.pos, id });
                }
                Ok(ParseNode::Backref(id))
            }
            Token::Quantifier { .. } => Err(ParseError::QuantifierOnNothing { pos: self.pos }),
            other => Err(ParseError::UnexpectedToken {
                pos: self.pos,
                detail: format!("{other:?}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_concat() {
        let tree = ParseTree::build("abc").unwrap();
        assert!(matches!(tree.root, ParseNode::Concat(ref v) if v.len() == 3));
    }

    #[test]
    fn parses_alternation() {
        let tree = ParseTree::build("a|b").unwrap();
        assert!(matches!(tree.root, ParseNode::Alt(ref v) if v.len() == 2));
    }

    #[test]
    fn assigns_group_ids_left_to_right() {
        let tree = ParseTree::build("(a)(b)").unwrap();
        assert_eq!(tree.group_count, 2);
    }

    #[test]
    fn non_capturing_group_gets_no_id() {
        let tree = ParseTree::build("(?:ab)(c)").unwrap();
        assert_eq!(tree.group_count, 1);
    }

    #[test]
    fn self_backreference_rejected() {
        let err = ParseTree::build("(\\1)").unwrap_err();
        assert!(matches!(err, EgretError::Parse(ParseError::InvalidBackref { .. })));
    }

    #[test]
    fn valid_backreference_accepted() {
        let tree = ParseTree::build("(a)\\1").unwrap();
        assert!(matches!(tree.root, ParseNode::Concat(_)));
    }

    #[test]
    fn bad_quantifier_bounds_rejected() {
        let err = ParseTree::build("a{3,2}").unwrap_err();
        assert!(matches!(err, EgretError::Parse(ParseError::BadQuantifier { .. })));
    }

    #[test]
    fn unmatched_paren_rejected() {
        let err = ParseTree::build("(a").unwrap_err();
        assert!(matches!(err, EgretError::Parse(ParseError::UnmatchedParen { .. })));
    }
}
