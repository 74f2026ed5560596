//! Bracket notation for [`Literal`] trees.
//!
//! `[[3,5],[6,9]]` is a binary tree of depth 2; a bare number is a single
//! leaf. Commas and whitespace both separate siblings.

use std::fmt;
use std::str::FromStr;

use crate::error::NotationError;
use crate::literal::{Literal, LiteralTree};

impl FromStr for Literal {
    type Err = NotationError;

    fn from_str(input: &str) -> Result<Literal, NotationError> {
        let mut parser = Parser { input, pos: 0 };
        parser.skip_separators();
        if parser.peek().is_none() {
            return Err(NotationError::Empty);
        }
        let literal = parser.term()?;
        parser.skip_separators();
        if parser.peek().is_some() {
            return Err(NotationError::Trailing { offset: parser.pos });
        }
        Ok(literal)
    }
}

impl FromStr for LiteralTree {
    type Err = NotationError;

    fn from_str(input: &str) -> Result<LiteralTree, NotationError> {
        input.parse::<Literal>().map(LiteralTree::new)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn term(&mut self) -> Result<Literal, NotationError> {
        match self.peek() {
            Some('[') => self.branch(),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) => Err(NotationError::UnexpectedChar {
                character: c,
                offset: self.pos,
            }),
            None => Err(NotationError::Empty),
        }
    }

    fn branch(&mut self) -> Result<Literal, NotationError> {
        let open = self.pos;
        self.pos += 1;
        let mut children = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => children.push(self.term()?),
                None => return Err(NotationError::Unterminated { offset: open }),
            }
        }
        if children.is_empty() {
            return Err(NotationError::EmptyBranch { offset: open });
        }
        Ok(Literal::Branch(children))
    }

    fn number(&mut self) -> Result<Literal, NotationError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Literal::Leaf)
            .map_err(|_| NotationError::InvalidNumber {
                found: text.to_string(),
                offset: start,
            })
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Leaf(value) => write!(f, "{value}"),
            Literal::Branch(children) => {
                f.write_str("[")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("]")
            }
        }
    }
}
