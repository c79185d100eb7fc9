//! Font encodings and fallback chains
//!
//! A symbol such as `\sum` can be drawn from a full Unicode math face, from a
//! legacy Windows "Symbol" face, or approximated with plain ASCII. Which of
//! these is tried first depends on the encoding of the active face; the rest
//! form its fallback chain.

use crate::error::{TextError, TextResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encoding of the glyphs a face provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontEncoding {
    /// Full Unicode face with math symbols (e.g. STIX, XITS)
    Unicode,
    /// Unicode face with only a limited symbol repertoire
    UnicodeLimited,
    /// MS Windows style Symbol face
    WinSymbol,
    /// Plain text face, letters and digits only
    Standard,
}

impl Default for FontEncoding {
    fn default() -> Self {
        Self::Unicode
    }
}

impl FontEncoding {
    /// Encodings to try, in order, when resolving a symbol for this face
    pub fn fallback_chain(self) -> &'static [FontEncoding] {
        use FontEncoding::*;
        match self {
            Unicode => &[Unicode, WinSymbol, Standard],
            UnicodeLimited => &[UnicodeLimited, Unicode, WinSymbol, Standard],
            WinSymbol => &[WinSymbol, Unicode, Standard],
            Standard => &[Standard],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unicode => "unicode",
            Self::UnicodeLimited => "unicode-limited",
            Self::WinSymbol => "win-symbol",
            Self::Standard => "standard",
        }
    }
}

impl fmt::Display for FontEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontEncoding {
    type Err = TextError;

    fn from_str(s: &str) -> TextResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode" => Ok(Self::Unicode),
            "unicode-limited" | "unicodelimited" => Ok(Self::UnicodeLimited),
            "win-symbol" | "winsymbol" | "symbol" => Ok(Self::WinSymbol),
            "standard" | "ascii" => Ok(Self::Standard),
            other => Err(TextError::UnknownEncoding(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_starts_with_self() {
        for enc in [
            FontEncoding::Unicode,
            FontEncoding::UnicodeLimited,
            FontEncoding::WinSymbol,
            FontEncoding::Standard,
        ] {
            assert_eq!(enc.fallback_chain()[0], enc);
        }
    }

    #[test]
    fn test_standard_has_no_fallback() {
        assert_eq!(FontEncoding::Standard.fallback_chain(), &[FontEncoding::Standard]);
    }

    #[test]
    fn test_parse_roundtrip_names() {
        for enc in [
            FontEncoding::Unicode,
            FontEncoding::UnicodeLimited,
            FontEncoding::WinSymbol,
            FontEncoding::Standard,
        ] {
            assert_eq!(enc.to_string().parse::<FontEncoding>().unwrap(), enc);
        }
        assert_eq!("Symbol".parse::<FontEncoding>().unwrap(), FontEncoding::WinSymbol);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "klingon".parse::<FontEncoding>().unwrap_err();
        assert_eq!(err, TextError::UnknownEncoding("klingon".to_string()));
    }
}
