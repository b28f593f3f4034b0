use std::fmt;

use thiserror::Error;

/// Number of leading characters in a catalog codepoint reference (`U+`).
const UNICODE_REF_PREFIX_CHARS: usize = 2;

/// A displayable symbol identified by its codepoint.
///
/// Invariant: the codepoint is a Unicode scalar value, so [`Glyph::as_char`]
/// never has to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Glyph(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlyphError {
    #[error("codepoint reference {raw:?} is too short")]
    TooShort { raw: String },
    #[error("codepoint reference {raw:?} is not hexadecimal")]
    InvalidHex { raw: String },
    #[error("U+{codepoint:X} is not a Unicode scalar value")]
    NotAScalar { codepoint: u32 },
}

impl Glyph {
    pub fn from_codepoint(codepoint: u32) -> Result<Self, GlyphError> {
        if char::from_u32(codepoint).is_none() {
            return Err(GlyphError::NotAScalar { codepoint });
        }
        Ok(Self(codepoint))
    }

    /// Parse a catalog reference such as `U+1F600`.
    ///
    /// The first two characters are dropped unconditionally and the rest must
    /// be hex digits.
    pub fn parse_unicode_ref(raw: &str) -> Result<Self, GlyphError> {
        let digits = match raw.char_indices().nth(UNICODE_REF_PREFIX_CHARS) {
            Some((offset, _)) => &raw[offset..],
            None => {
                return Err(GlyphError::TooShort {
                    raw: raw.to_string(),
                });
            }
        };

        // from_str_radix tolerates a leading '+', the catalog format does not.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(GlyphError::InvalidHex {
                raw: raw.to_string(),
            });
        }

        let codepoint = u32::from_str_radix(digits, 16).map_err(|_| GlyphError::InvalidHex {
            raw: raw.to_string(),
        })?;
        Self::from_codepoint(codepoint)
    }

    #[must_use]
    pub fn codepoint(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from_u32(self.0).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

impl TryFrom<u32> for Glyph {
    type Error = GlyphError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_codepoint(value)
    }
}

impl From<Glyph> for u32 {
    fn from(value: Glyph) -> Self {
        value.0
    }
}

impl From<char> for Glyph {
    fn from(value: char) -> Self {
        Self(value as u32)
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
