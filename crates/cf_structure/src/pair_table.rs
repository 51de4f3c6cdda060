use std::convert::TryFrom;
use std::fmt;
use std::ops::Deref;

use crate::NAIDX;
use crate::StructureError;
use crate::DotBracket;
use crate::DotBracketVec;

/// `pt[i] == Some(j)` iff position `i` pairs with position `j`; `None` iff
/// unpaired. Single-stranded: `cp > 0` is tracked separately by callers, it
/// is not encoded in a break token here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable(pub Vec<Option<NAIDX>>);

impl Deref for PairTable {
    type Target = [Option<NAIDX>];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PairTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Option<NAIDX>> {
        self.0.iter()
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut table: Vec<Option<NAIDX>> = vec![None; s.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, ch) in s.chars().enumerate() {
            match ch {
                '(' => stack.push(i),
                ')' => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[j] = Some(i as NAIDX);
                    table[i] = Some(j as NAIDX);
                }
                '.' => {}
                _ => {
                    return Err(StructureError::InvalidToken(
                        format!("character '{}'", ch),
                        "pair table".to_string(),
                        i,
                    ));
                }
            }
        }

        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }

        Ok(PairTable(table))
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(db: &DotBracketVec) -> Result<Self, Self::Error> {
        let mut table: Vec<Option<NAIDX>> = vec![None; db.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, dot) in db.iter().enumerate() {
            match dot {
                DotBracket::Open => stack.push(i),
                DotBracket::Close => {
                    let j = stack.pop().ok_or(StructureError::UnmatchedClose(i))?;
                    table[j] = Some(i as NAIDX);
                    table[i] = Some(j as NAIDX);
                }
                DotBracket::Unpaired => {}
                DotBracket::Break => {
                    return Err(StructureError::InvalidToken(
                        "strand break".into(),
                        "pair table".into(),
                        i,
                    ));
                }
            }
        }

        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }

        Ok(PairTable(table))
    }
}

impl fmt::Display for PairTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", DotBracketVec::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_table_from_str() {
        let pt = PairTable::try_from("((..))").unwrap();
        assert_eq!(pt.len(), 6);
        assert_eq!(pt[0], Some(5));
        assert_eq!(pt[1], Some(4));
        assert_eq!(pt[2], None);
        assert_eq!(pt[5], Some(0));
    }

    #[test]
    fn test_pair_table_unmatched_open() {
        let err = PairTable::try_from("(((.))").unwrap_err();
        assert!(matches!(err, StructureError::UnmatchedOpen(0)));
    }

    #[test]
    fn test_pair_table_unmatched_close() {
        let err = PairTable::try_from("(...))").unwrap_err();
        assert!(matches!(err, StructureError::UnmatchedClose(5)));
    }

    #[test]
    fn test_pair_table_display_round_trip() {
        let pt = PairTable::try_from(".(((...)).").unwrap();
        assert_eq!(format!("{}", pt), ".(((...)).");
    }
}
