//! Flowchart node identifiers.
//!
//! Node identifiers in the diagram grammar are a single uppercase ASCII
//! letter, optionally followed by a decimal number: `A`, `B`, `Z`, `A1`, `C12`.
//! Generated diagrams assign them in first-introduction order through
//! [`NodeId::from_index`].

use std::{fmt, str::FromStr};

use thiserror::Error;

const LETTERS: u32 = 26;

/// Error returned when a string is not a valid node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeIdError {
    #[error("node identifier is empty")]
    Empty,

    #[error("node identifier must start with an uppercase letter, found `{0}`")]
    InvalidLetter(char),

    #[error("node identifier suffix `{0}` must be decimal digits")]
    InvalidSuffix(String),
}

/// A flowchart node identifier such as `A` or `B2`.
///
/// # Examples
///
/// ```
/// use codeflow_core::identifier::NodeId;
///
/// let first = NodeId::from_index(0);
/// assert_eq!(first.to_string(), "A");
///
/// let wrapped = NodeId::from_index(27);
/// assert_eq!(wrapped.to_string(), "B1");
///
/// let parsed: NodeId = "C".parse().unwrap();
/// assert_eq!(parsed.index(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    letter: u8,
    number: Option<u32>,
}

impl NodeId {
    /// Creates the identifier at position `index` in first-introduction order.
    ///
    /// Indices `0..26` map to `A..Z`; later indices continue with `A1..Z1`,
    /// then `A2..Z2`, and so on.
    pub fn from_index(index: usize) -> Self {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let letter = b'A' + (index % LETTERS) as u8;
        let tier = index / LETTERS;
        Self {
            letter,
            number: (tier > 0).then_some(tier),
        }
    }

    /// Returns the ordinal of this identifier in first-introduction order.
    ///
    /// `A0` and `A` share ordinal `0`.
    pub fn index(&self) -> usize {
        let tier = self.number.unwrap_or(0) as usize;
        tier * LETTERS as usize + (self.letter - b'A') as usize
    }

    /// Returns the leading letter.
    pub fn letter(&self) -> char {
        self.letter as char
    }

    /// Returns the numeric suffix, if any.
    pub fn number(&self) -> Option<u32> {
        self.number
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter as char)?;
        if let Some(number) = self.number {
            write!(f, "{number}")?;
        }
        Ok(())
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let first = chars.next().ok_or(NodeIdError::Empty)?;
        if !first.is_ascii_uppercase() {
            return Err(NodeIdError::InvalidLetter(first));
        }

        let rest = chars.as_str();
        let number = if rest.is_empty() {
            None
        } else if rest.chars().all(|c| c.is_ascii_digit()) {
            Some(
                rest.parse::<u32>()
                    .map_err(|_| NodeIdError::InvalidSuffix(rest.to_string()))?,
            )
        } else {
            return Err(NodeIdError::InvalidSuffix(rest.to_string()));
        };

        Ok(Self {
            letter: first as u8,
            number,
        })
    }
}
