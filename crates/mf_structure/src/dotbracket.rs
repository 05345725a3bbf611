use std::fmt;
use std::ops::Deref;
use std::convert::TryFrom;

use crate::StructureError;

/// Bracket types by pseudoknot layer: layer 0 is the nested structure.
const BRACKETS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

pub const MAX_LAYERS: usize = BRACKETS.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotBracket {
    Unpaired,  // '.'
    Open(u8),  // '(' '[' '{' '<'
    Close(u8), // ')' ']' '}' '>'
    Break,     // '+' or '&'
}

impl TryFrom<char> for DotBracket {
    type Error = StructureError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => return Ok(DotBracket::Unpaired),
            '+' | '&' => return Ok(DotBracket::Break),
            _ => (),
        }
        for (layer, &(open, close)) in BRACKETS.iter().enumerate() {
            if c == open {
                return Ok(DotBracket::Open(layer as u8));
            }
            if c == close {
                return Ok(DotBracket::Close(layer as u8));
            }
        }
        Err(StructureError::InvalidToken(c.to_string(), "dot-bracket".into(), 0))
    }
}

impl From<DotBracket> for char {
    fn from(db: DotBracket) -> Self {
        match db {
            DotBracket::Open(l) => BRACKETS[l as usize].0,
            DotBracket::Close(l) => BRACKETS[l as usize].1,
            DotBracket::Unpaired => '.',
            DotBracket::Break => '+',
        }
    }
}

/// Dot-bracket notation with one bracket type per pseudoknot layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DotBracketVec(pub Vec<DotBracket>);

impl Deref for DotBracketVec {
    type Target = [DotBracket];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DotBracketVec {
    /// Render `len` positions with pairs `(i, j, layer)`, `i < j`, and strand
    /// breaks inserted before each position listed in `breaks`.
    ///
    /// Layers beyond the available bracket types are clamped to the last one.
    pub fn from_pairs(len: usize, pairs: &[(usize, usize, usize)], breaks: &[usize]) -> Self {
        let mut symbols = vec![DotBracket::Unpaired; len];
        for &(i, j, layer) in pairs {
            let l = layer.min(MAX_LAYERS - 1) as u8;
            symbols[i] = DotBracket::Open(l);
            symbols[j] = DotBracket::Close(l);
        }
        let mut result = Vec::with_capacity(len + breaks.len());
        for (i, s) in symbols.into_iter().enumerate() {
            if breaks.contains(&i) {
                result.push(DotBracket::Break);
            }
            result.push(s);
        }
        DotBracketVec(result)
    }

    /// Pairs `(i, j, layer)` in positions that skip strand breaks.
    pub fn pairs(&self) -> Result<Vec<(usize, usize, usize)>, StructureError> {
        let mut stacks: Vec<Vec<usize>> = vec![Vec::new(); MAX_LAYERS];
        let mut pairs = Vec::new();
        let mut pos = 0;
        for db in self.iter() {
            match db {
                DotBracket::Break => continue,
                DotBracket::Unpaired => (),
                DotBracket::Open(l) => stacks[*l as usize].push(pos),
                DotBracket::Close(l) => {
                    let i = stacks[*l as usize].pop().ok_or_else(|| StructureError::InvalidToken(
                            format!("unmatched '{}'", char::from(*db)), "dot-bracket".into(), pos))?;
                    pairs.push((i, pos, *l as usize));
                }
            }
            pos += 1;
        }
        for stack in stacks {
            if let Some(i) = stack.last() {
                return Err(StructureError::InvalidToken("unmatched opening bracket".into(), "dot-bracket".into(), *i));
            }
        }
        pairs.sort_unstable();
        Ok(pairs)
    }
}

impl TryFrom<&str> for DotBracketVec {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut vec = Vec::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            match DotBracket::try_from(c) {
                Ok(db) => vec.push(db),
                Err(StructureError::InvalidToken(tok, src, _)) => {
                    return Err(StructureError::InvalidToken(tok, src, i));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(DotBracketVec(vec))
    }
}

impl fmt::Display for DotBracketVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for db in &self.0 {
            write!(f, "{}", char::from(*db))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_bracket_from_char() {
        assert_eq!(DotBracket::try_from('.').unwrap(), DotBracket::Unpaired);
        assert_eq!(DotBracket::try_from('(').unwrap(), DotBracket::Open(0));
        assert_eq!(DotBracket::try_from(']').unwrap(), DotBracket::Close(1));
        assert_eq!(DotBracket::try_from('&').unwrap(), DotBracket::Break);
    }

    #[test]
    fn test_dot_bracket_from_invalid_char() {
        let res = DotBracketVec::try_from("((x))");
        assert!(matches!(res, Err(StructureError::InvalidToken(_, src, 2)) if src == "dot-bracket"));
    }

    #[test]
    fn test_from_pairs_with_pseudoknot() {
        let dbv = DotBracketVec::from_pairs(8, &[(0, 4, 0), (2, 6, 1), (3, 7, 1)], &[]);
        assert_eq!(dbv.to_string(), "(.[[).]]");
    }

    #[test]
    fn test_from_pairs_with_break() {
        let dbv = DotBracketVec::from_pairs(4, &[(0, 3, 0)], &[2]);
        assert_eq!(dbv.to_string(), "(.+.)");
    }

    #[test]
    fn test_pairs_round_trip() {
        let dbv = DotBracketVec::try_from("((.[[)).]]").unwrap();
        let pairs = dbv.pairs().unwrap();
        assert_eq!(pairs, vec![(0, 6, 0), (1, 5, 0), (3, 9, 1), (4, 8, 1)]);
        assert_eq!(DotBracketVec::from_pairs(10, &pairs, &[]), dbv);
    }

    #[test]
    fn test_pairs_unmatched() {
        assert!(DotBracketVec::try_from("((.)").unwrap().pairs().is_err());
        assert!(DotBracketVec::try_from("(.))").unwrap().pairs().is_err());
    }
}
