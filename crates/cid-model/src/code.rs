#![deny(unsafe_code)]

//! CID-10 codes and closed code ranges.
//!
//! A code is a letter followed by two digits (`T65`), optionally extended with
//! a subcategory digit (`T65.9`). Codes order by letter, then by the two-digit
//! number; ranges are defined at category granularity so the subcategory digit
//! never takes part in range membership.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// A parsed, normalized CID-10 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CidCode {
    letter: u8,
    number: u8,
    subdivision: Option<u8>,
}

impl CidCode {
    /// Parses a code after trimming and upper-casing it.
    ///
    /// Accepts `A00`, `A00.9`, and the dotless `A009` form used by the official
    /// `SUBCAT` column.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ModelError::EmptyCode);
        }
        let bytes = normalized.as_bytes();
        let invalid = || ModelError::InvalidCode(raw.trim().to_string());

        let subdivision = match bytes.len() {
            3 => None,
            4 => Some(bytes[3]),
            5 if bytes[3] == b'.' => Some(bytes[4]),
            _ => return Err(invalid()),
        };
        if !bytes[0].is_ascii_uppercase()
            || !bytes[1].is_ascii_digit()
            || !bytes[2].is_ascii_digit()
        {
            return Err(invalid());
        }
        let subdivision = match subdivision {
            Some(digit) if digit.is_ascii_digit() => Some(digit - b'0'),
            Some(_) => return Err(invalid()),
            None => None,
        };

        Ok(Self {
            letter: bytes[0],
            number: (bytes[1] - b'0') * 10 + (bytes[2] - b'0'),
            subdivision,
        })
    }

    /// Leading chapter letter.
    pub fn letter(&self) -> char {
        char::from(self.letter)
    }

    /// Two-digit numeric part.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Subcategory digit, if any.
    pub fn subdivision(&self) -> Option<u8> {
        self.subdivision
    }

    pub fn is_subcategory(&self) -> bool {
        self.subdivision.is_some()
    }

    /// The enclosing category (the code itself when it already is one).
    #[must_use]
    pub fn category(&self) -> Self {
        Self {
            subdivision: None,
            ..*self
        }
    }

    /// Key used for range membership: letter first, then number.
    pub fn range_key(&self) -> (u8, u8) {
        (self.letter, self.number)
    }
}

impl Ord for CidCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.range_key()
            .cmp(&other.range_key())
            .then(self.subdivision.cmp(&other.subdivision))
    }
}

impl PartialOrd for CidCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CidCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.letter(), self.number)?;
        if let Some(digit) = self.subdivision {
            write!(f, ".{digit}")?;
        }
        Ok(())
    }
}

impl FromStr for CidCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl serde::Serialize for CidCode {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for CidCode {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A closed interval of category codes, written `START-END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeRange {
    start: CidCode,
    end: CidCode,
}

impl CodeRange {
    /// Builds a range from its bounds. Subcategory digits on the bounds are
    /// dropped; an inverted range is rejected.
    pub fn new(start: CidCode, end: CidCode) -> Result<Self> {
        let start = start.category();
        let end = end.category();
        if start > end {
            return Err(ModelError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Builds a range from the two raw columns of an official table
    /// (`CATINIC`, `CATFIM`).
    pub fn from_bounds(start: &str, end: &str) -> Result<Self> {
        Self::new(CidCode::parse(start)?, CidCode::parse(end)?)
    }

    /// Parses `A00-A09`. A single code (`A00`) is a one-category range.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let invalid = || ModelError::InvalidRange(trimmed.to_string());
        match trimmed.split_once('-') {
            Some((start, end)) => {
                let start = CidCode::parse(start).map_err(|_| invalid())?;
                let end = CidCode::parse(end).map_err(|_| invalid())?;
                Self::new(start, end)
            }
            None => {
                let code = CidCode::parse(trimmed).map_err(|_| invalid())?;
                Self::new(code, code)
            }
        }
    }

    pub fn start(&self) -> CidCode {
        self.start
    }

    pub fn end(&self) -> CidCode {
        self.end
    }

    /// Closed-interval membership on the category part of `code`.
    pub fn contains(&self, code: &CidCode) -> bool {
        let key = code.range_key();
        self.start.range_key() <= key && key <= self.end.range_key()
    }

    /// Whether the range covers more than one leading letter (e.g. `S00-T98`).
    pub fn spans_letters(&self) -> bool {
        self.start.letter != self.end.letter
    }
}

impl fmt::Display for CodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for CodeRange {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl serde::Serialize for CodeRange {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
