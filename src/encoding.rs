//! Text encodings for files marked for rendering.
//! Decoding and encoding are strict: a byte or char outside the encoding is an error,
//! never a replacement character.

use std::fmt;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Encoding {
    #[default]
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    #[value(name = "ascii")]
    Ascii,
    #[value(name = "latin-1", aliases = ["latin1", "iso-8859-1"])]
    Latin1,
}

impl Encoding {
    /// Decodes raw file bytes, returning `None` on the first invalid byte.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Ascii => bytes.is_ascii().then(|| bytes.iter().map(|&b| b as char).collect()),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    /// Encodes rendered text, returning `None` on the first unrepresentable char.
    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Encoding::Utf8 => Some(text.as_bytes().to_vec()),
            Encoding::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
            Encoding::Latin1 => text.chars().map(|c| u8::try_from(c).ok()).collect(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_is_strict() {
        assert_eq!(Encoding::Utf8.decode("héllo".as_bytes()), Some("héllo".to_string()));
        assert_eq!(Encoding::Utf8.decode(&[0x66, 0xff, 0x6f]), None);
    }

    #[test]
    fn test_ascii_rejects_high_bytes() {
        assert_eq!(Encoding::Ascii.decode(b"plain"), Some("plain".to_string()));
        assert_eq!(Encoding::Ascii.decode(&[0xe9]), None);
        assert_eq!(Encoding::Ascii.encode("é"), None);
    }

    #[test]
    fn test_latin1_maps_bytes_to_chars() {
        assert_eq!(Encoding::Latin1.decode(&[0x63, 0x61, 0x66, 0xe9]), Some("café".to_string()));
        assert_eq!(Encoding::Latin1.encode("café"), Some(vec![0x63, 0x61, 0x66, 0xe9]));
        assert_eq!(Encoding::Latin1.encode("€"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Encoding::default().to_string(), "utf-8");
        assert_eq!(Encoding::Latin1.to_string(), "latin-1");
    }
}
