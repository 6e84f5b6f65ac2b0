//! Format sniffing by magic bytes
//!
//! Classification looks only at content. File names and extensions are
//! never consulted.

use std::fmt;

use crate::format::constants::{signatures, SNIFF_LEN};

/// Container formats the inspector recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
    Unknown,
}

impl FormatTag {
    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Png => "png",
            FormatTag::Jpeg => "jpeg",
            FormatTag::Gif => "gif",
            FormatTag::Bmp => "bmp",
            FormatTag::Webp => "webp",
            FormatTag::Unknown => "unknown",
        }
    }

    /// Numeric code used by the C ABI
    pub fn code(&self) -> u8 {
        match self {
            FormatTag::Unknown => 0,
            FormatTag::Png => 1,
            FormatTag::Jpeg => 2,
            FormatTag::Gif => 3,
            FormatTag::Bmp => 4,
            FormatTag::Webp => 5,
        }
    }

    /// Inverse of [`FormatTag::code`]; unrecognised codes map to `Unknown`
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => FormatTag::Png,
            2 => FormatTag::Jpeg,
            3 => FormatTag::Gif,
            4 => FormatTag::Bmp,
            5 => FormatTag::Webp,
            _ => FormatTag::Unknown,
        }
    }

    /// File extensions conventionally used for this format
    ///
    /// Only used to flag suspicious names in diagnostics.
    pub fn conventional_extensions(&self) -> &'static [&'static str] {
        match self {
            FormatTag::Png => &["png"],
            FormatTag::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            FormatTag::Gif => &["gif"],
            FormatTag::Bmp => &["bmp", "dib"],
            FormatTag::Webp => &["webp"],
            FormatTag::Unknown => &[],
        }
    }

    /// Guesses a format from a file extension, case-insensitively
    ///
    /// Never used for classification; only the mock backend relies on it.
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.to_ascii_lowercase();
        [FormatTag::Png, FormatTag::Jpeg, FormatTag::Gif, FormatTag::Bmp, FormatTag::Webp]
            .into_iter()
            .find(|tag| tag.conventional_extensions().contains(&extension.as_str()))
            .unwrap_or(FormatTag::Unknown)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signature: byte runs that must appear at fixed offsets
struct Signature {
    format: FormatTag,
    parts: &'static [(usize, &'static [u8])],
}

impl Signature {
    /// Number of bytes needed to check every part
    fn span(&self) -> usize {
        self.parts
            .iter()
            .map(|(offset, bytes)| offset + bytes.len())
            .max()
            .unwrap_or(0)
    }

    fn matches(&self, bytes: &[u8]) -> bool {
        self.parts.iter().all(|(offset, expected)| {
            bytes
                .get(*offset..offset + expected.len())
                .map_or(false, |actual| actual == *expected)
        })
    }
}

/// Signature table in match priority order
const SIGNATURES: &[Signature] = &[
    Signature { format: FormatTag::Png, parts: &[(0, &signatures::PNG)] },
    Signature { format: FormatTag::Jpeg, parts: &[(0, &signatures::JPEG)] },
    Signature { format: FormatTag::Gif, parts: &[(0, signatures::GIF87A)] },
    Signature { format: FormatTag::Gif, parts: &[(0, signatures::GIF89A)] },
    Signature { format: FormatTag::Bmp, parts: &[(0, signatures::BMP)] },
    Signature {
        format: FormatTag::Webp,
        parts: &[(0, signatures::RIFF), (8, signatures::WEBP)],
    },
];

/// Classifies the leading bytes of a file
///
/// Needs at least [`SNIFF_LEN`] bytes; anything shorter, or anything that
/// matches no signature, is `Unknown`.
pub fn classify(bytes: &[u8]) -> FormatTag {
    if bytes.len() < SNIFF_LEN {
        return FormatTag::Unknown;
    }
    sniff_prefix(bytes).unwrap_or(FormatTag::Unknown)
}

/// Matches signatures against however many bytes are available
///
/// A signature only matches when all of its bytes are present, so a
/// truncated WEBP header never matches while a 10-byte GIF does. Used by
/// inspection to tell "too short to be this format" apart from "not an image".
pub fn sniff_prefix(bytes: &[u8]) -> Option<FormatTag> {
    SIGNATURES
        .iter()
        .filter(|signature| bytes.len() >= signature.span())
        .find(|signature| signature.matches(bytes))
        .map(|signature| signature.format)
}
