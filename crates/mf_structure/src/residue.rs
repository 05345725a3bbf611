use std::fmt;
use std::str::FromStr;

use log::warn;
use colored::*;
use serde::{Serialize, Deserialize};

use crate::StructureError;

/// Residue identifier: chain, sequence number and insertion code.
///
/// The derived ordering is lexicographic on (chain, number, insertion),
/// which is the order in which residues are walked through a graph. The
/// blank insertion code `' '` sorts before every lettered one, so `A10`
/// precedes `A10A`, which precedes `A11`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResId {
    pub chain: char,
    pub number: i32,
    pub insertion: char,
}

impl ResId {
    pub fn new(chain: char, number: i32) -> Self {
        Self { chain, number, insertion: ' ' }
    }

    pub fn with_insertion(chain: char, number: i32, insertion: char) -> Self {
        Self { chain, number, insertion }
    }

    /// True if both identifiers are direct neighbors within one chain.
    pub fn is_contiguous(&self, other: &ResId) -> bool {
        if self.chain != other.chain {
            return false;
        }
        let (lo, hi) = if self < other { (self, other) } else { (other, self) };
        if lo.number == hi.number {
            next_insertion(lo.insertion) == Some(hi.insertion)
        } else {
            lo.number.checked_add(1) == Some(hi.number) && hi.insertion == ' '
        }
    }
}

fn next_insertion(c: char) -> Option<char> {
    match c {
        ' ' => Some('A'),
        'A'..='Y' | 'a'..='y' => char::from_u32(c as u32 + 1),
        _ => None,
    }
}

impl fmt::Display for ResId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chain, self.number)?;
        if self.insertion != ' ' {
            write!(f, "{}", self.insertion)?;
        }
        Ok(())
    }
}

impl FromStr for ResId {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StructureError::InvalidResId(s.to_string());
        let mut chars = s.trim().chars();
        let chain = chars.next().ok_or_else(invalid)?;
        let rest: String = chars.collect();

        let (digits, insertion) = match rest.chars().last() {
            Some(c) if c.is_ascii_alphabetic() => (&rest[..rest.len() - 1], c),
            Some(_) => (rest.as_str(), ' '),
            None => return Err(invalid()),
        };
        let number = digits.parse::<i32>().map_err(|_| invalid())?;
        Ok(ResId { chain, number, insertion })
    }
}

impl TryFrom<String> for ResId {
    type Error = StructureError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ResId> for String {
    fn from(r: ResId) -> Self {
        r.to_string()
    }
}

/// Residue type. Modified or unknown residues are reported as `N`.
#[derive(Clone, Hash, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Base { A, C, G, U, N }

impl TryFrom<char> for Base {
    type Error = StructureError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Base::A),
            'C' => Ok(Base::C),
            'G' => Ok(Base::G),
            'U' | 'T' => Ok(Base::U),
            'N' => Ok(Base::N),
            _ => Err(StructureError::InvalidToken(format!("residue type '{}'", c), "base".into(), 0)),
        }
    }
}

impl From<Base> for char {
    fn from(b: Base) -> Self {
        match b {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::U => 'U',
            Base::N => 'N',
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl Base {
    pub fn from_lossy(c: char) -> Self {
        Base::try_from(c).unwrap_or_else(|e| {
            warn!("{} {} -> converted to 'N'", "WARNING:".red(), e);
            Base::N
        })
    }

    /// Watson-Crick complementary or G-U wobble.
    pub fn is_complementary(&self, other: Base) -> bool {
        use Base::*;
        matches!((self, other), (A, U) | (U, A) | (C, G) | (G, C) | (G, U) | (U, G))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resid_ordering() {
        let a10 = ResId::new('A', 10);
        let a10a = ResId::with_insertion('A', 10, 'A');
        let a11 = ResId::new('A', 11);
        let b1 = ResId::new('B', 1);
        assert!(a10 < a10a);
        assert!(a10a < a11);
        assert!(a11 < b1);
    }

    #[test]
    fn test_resid_contiguity() {
        let a10 = ResId::new('A', 10);
        let a10a = ResId::with_insertion('A', 10, 'A');
        let a11 = ResId::new('A', 11);
        let a12 = ResId::new('A', 12);
        assert!(a10.is_contiguous(&a11));
        assert!(a11.is_contiguous(&a10));
        assert!(a10.is_contiguous(&a10a));
        assert!(a10a.is_contiguous(&a11));
        assert!(!a10.is_contiguous(&a12));
        assert!(!a10.is_contiguous(&a10));
        assert!(!a10.is_contiguous(&ResId::new('B', 11)));
    }

    #[test]
    fn test_resid_contiguity_at_number_limits() {
        let (min, max) = (ResId::new('A', i32::MIN), ResId::new('A', i32::MAX));
        assert!(!min.is_contiguous(&max));
        assert!(!max.is_contiguous(&min));
        assert!(max.is_contiguous(&ResId::new('A', i32::MAX - 1)));
        assert!(min.is_contiguous(&ResId::new('A', i32::MIN + 1)));

        let far: ResId = "A-2147483648".parse().unwrap();
        assert!(!far.is_contiguous(&"A2147483647".parse().unwrap()));
    }

    #[test]
    fn test_resid_parse_and_display() {
        for s in ["A12", "B-3", "C10A", "112"] {
            let r: ResId = s.parse().unwrap();
            assert_eq!(r.to_string(), s);
        }
        let r: ResId = "C10A".parse().unwrap();
        assert_eq!(r, ResId::with_insertion('C', 10, 'A'));
        assert!("A".parse::<ResId>().is_err());
        assert!("Axy1".parse::<ResId>().is_err());
    }

    #[test]
    fn test_base_from_char() {
        assert_eq!(Base::try_from('a').unwrap(), Base::A);
        assert_eq!(Base::try_from('T').unwrap(), Base::U);
        assert!(Base::try_from('x').is_err());
        assert_eq!(Base::from_lossy('x'), Base::N);
    }

    #[test]
    fn test_base_complementarity() {
        assert!(Base::G.is_complementary(Base::C));
        assert!(Base::G.is_complementary(Base::U));
        assert!(!Base::A.is_complementary(Base::G));
        assert!(!Base::N.is_complementary(Base::N));
    }
}
