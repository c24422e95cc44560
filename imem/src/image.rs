use core::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

// One word per line, optionally prefixed
static HEX_WORD_RESTR: &str = r"^(0[xX])?(?P<word>[0-9a-fA-F]{1,4})$";

static HEX_WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(HEX_WORD_RESTR).unwrap());

/// Provides error conditions for loading and fitting a memory image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    InvalidWord { line: usize, text: String },
    OddByteCount(usize),
    TooLarge { words: usize, capacity: usize },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWord { line, text } => write!(f, "Invalid Word '{text}' on line {line}"),
            Self::OddByteCount(n) => write!(f, "Binary image has odd byte count {n}"),
            Self::TooLarge { words, capacity } => {
                write!(f, "Image of {words} words exceeds capacity of {capacity} words")
            }
        }
    }
}

/// The ordered list of 16-bit words a memory is initialized from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryImage {
    words: Vec<u16>,
}

impl MemoryImage {
    pub fn new(words: Vec<u16>) -> Self {
        Self { words }
    }

    /// Parses a hex listing with one word per line
    pub fn from_hex_text(txt: &str) -> Result<Self, ImageError> {
        let mut words = Vec::new();

        for (i, l) in txt.lines().enumerate() {
            let s = Self::trim_line(l);
            if s.is_empty() {
                continue;
            }

            let word = HEX_WORD_REGEX
                .captures(s)
                .and_then(|c| u16::from_str_radix(&c["word"], 16).ok())
                .ok_or_else(|| ImageError::InvalidWord {
                    line: i + 1,
                    text: s.to_string(),
                })?;

            words.push(word);
        }

        Ok(Self { words })
    }

    /// Reads a big-endian byte stream, two bytes per word
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.len() % 2 != 0 {
            return Err(ImageError::OddByteCount(bytes.len()));
        }

        let words = bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();

        Ok(Self { words })
    }

    fn trim_line(line: &str) -> &str {
        let s = line.trim();
        if let Some(ind) = s.find(';') {
            s[..ind].trim_end()
        } else {
            s
        }
    }

    /// Provides the image resized to exactly `capacity` words, zero-padding a short image
    pub fn fit(&self, capacity: usize) -> Result<Vec<u16>, ImageError> {
        if self.words.len() > capacity {
            return Err(ImageError::TooLarge {
                words: self.words.len(),
                capacity,
            });
        }

        let mut words = self.words.clone();
        words.resize(capacity, 0);
        Ok(words)
    }

    pub fn get(&self, index: usize) -> Option<u16> {
        self.words.get(index).copied()
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Renders the image in the same listing format `from_hex_text` reads
    pub fn to_hex_text(&self) -> String {
        self.words
            .iter()
            .map(|v| format!("0x{:04X}", v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<u16>> for MemoryImage {
    fn from(words: Vec<u16>) -> Self {
        Self::new(words)
    }
}

impl FromIterator<u16> for MemoryImage {
    fn from_iter<T: IntoIterator<Item = u16>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test parsing a listing with prefixes, comments and blank lines
    #[test]
    fn test_hex_text() {
        let txt = "; boot vector\n0x1234\n\nabcd ; second word\n  0X00ff\n";
        let img = MemoryImage::from_hex_text(txt).unwrap();
        assert_eq!(img.words(), &[0x1234, 0xABCD, 0x00FF]);
    }

    /// Test that a bad word reports the line it was found on
    #[test]
    fn test_hex_text_invalid() {
        let txt = "0x1234\n0x12345\n";
        let err = MemoryImage::from_hex_text(txt).unwrap_err();
        assert_eq!(
            err,
            ImageError::InvalidWord {
                line: 2,
                text: "0x12345".to_string()
            }
        );

        assert!(MemoryImage::from_hex_text("zz").is_err());
    }

    /// Test binary images are read big-endian
    #[test]
    fn test_be_bytes() {
        let img = MemoryImage::from_be_bytes(&[0x12, 0x34, 0xAB, 0xCD]).unwrap();
        assert_eq!(img.words(), &[0x1234, 0xABCD]);

        let err = MemoryImage::from_be_bytes(&[0x12, 0x34, 0xAB]).unwrap_err();
        assert_eq!(err, ImageError::OddByteCount(3));
    }

    /// Test fitting pads short images and rejects long ones
    #[test]
    fn test_fit() {
        let img = MemoryImage::new(vec![1, 2, 3]);
        assert_eq!(img.fit(5).unwrap(), vec![1, 2, 3, 0, 0]);
        assert_eq!(img.fit(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            img.fit(2).unwrap_err(),
            ImageError::TooLarge {
                words: 3,
                capacity: 2
            }
        );
    }

    /// Test the exported listing reads back as the same image
    #[test]
    fn test_hex_export() {
        let img: MemoryImage = [0x0001, 0xBEEF].into_iter().collect();
        assert_eq!(img.to_hex_text(), "0x0001\n0xBEEF");
        assert_eq!(MemoryImage::from_hex_text(&img.to_hex_text()).unwrap(), img);
    }
}
