//! Four-byte tags as the shaping engines expect them
//!
//! OpenType tags and script identifiers are both four ASCII bytes packed
//! big-endian into a `u32`. Scripts additionally follow the engine's case
//! convention: the first letter of the ISO-15924 code is lower-cased and the
//! rest is left untouched, so `Latn` travels as `latn`.

use std::fmt;
use std::str::FromStr;

use crate::error::ShapingError;

/// A packed OpenType tag such as `liga` or `kern`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u32);

impl Tag {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl FromStr for Tag {
    type Err = ShapingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| ShapingError::Tag(format!("{s:?} is not four bytes long")))?;
        if !bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return Err(ShapingError::Tag(format!("{s:?} is not printable ASCII")));
        }
        Ok(Self::from_bytes(bytes))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.to_bytes() {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

/// A script identifier derived from a 4-letter ISO-15924 code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptTag(u32);

impl ScriptTag {
    pub const LATIN: ScriptTag = ScriptTag(u32::from_be_bytes(*b"latn"));

    /// Pack a 4-letter ISO-15924 code, lower-casing its first letter
    pub fn from_iso15924(code: &str) -> Result<Self, ShapingError> {
        let mut bytes: [u8; 4] = code
            .as_bytes()
            .try_into()
            .map_err(|_| ShapingError::Tag(format!("script {code:?} must have 4 letters")))?;
        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(ShapingError::Tag(format!(
                "script {code:?} must consist of ASCII letters"
            )));
        }
        bytes[0] = bytes[0].to_ascii_lowercase();
        Ok(Self(u32::from_be_bytes(bytes)))
    }

    /// Split the packed value back into its four letters
    pub fn to_iso15924(self) -> String {
        self.0.to_be_bytes().iter().map(|&b| b as char).collect()
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl Default for ScriptTag {
    fn default() -> Self {
        Self::LATIN
    }
}

impl FromStr for ScriptTag {
    type Err = ShapingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso15924(s)
    }
}

impl fmt::Display for ScriptTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso15924())
    }
}
