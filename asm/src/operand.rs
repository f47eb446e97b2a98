use arch::{INDEX_SUFFIX, LOC_MAX};

use crate::error::Error;

// ----------------------------------------------------------------------------
// BYTE literal

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteLiteral {
    /// `C'...'`, one byte per character
    Char(String),
    /// `X'...'`, two hex digits per byte
    Hex(String),
}

impl ByteLiteral {
    pub fn parse(operand: &str) -> Option<Self> {
        let quoted = |prefix: &str| {
            operand
                .strip_prefix(prefix)
                .and_then(|s| s.strip_suffix('\''))
                .filter(|body| !body.is_empty())
        };
        if let Some(body) = quoted("C'") {
            return Some(ByteLiteral::Char(body.to_string()));
        }
        if let Some(body) = quoted("X'") {
            if body.chars().all(|c| c.is_ascii_hexdigit()) {
                return Some(ByteLiteral::Hex(body.to_ascii_uppercase()));
            }
        }
        None
    }

    /// Number of bytes the literal occupies.
    pub fn len(&self) -> usize {
        match self {
            ByteLiteral::Char(chars) => chars.len(),
            ByteLiteral::Hex(digits) => (digits.len() + 1) / 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            ByteLiteral::Char(chars) => chars.bytes().collect(),
            ByteLiteral::Hex(digits) => {
                let padded = if digits.len() % 2 == 1 {
                    format!("0{}", digits)
                } else {
                    digits.clone()
                };
                padded
                    .as_bytes()
                    .chunks(2)
                    .filter_map(|pair| std::str::from_utf8(pair).ok())
                    .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
                    .collect()
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Instruction target

/// Symbol referenced by an instruction, with the indexed-addressing suffix
/// stripped off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    pub symbol: &'a str,
    pub indexed: bool,
}

impl<'a> Target<'a> {
    pub fn parse(operand: &'a str) -> Self {
        match operand.strip_suffix(INDEX_SUFFIX) {
            Some(symbol) if !symbol.is_empty() => Target {
                symbol,
                indexed: true,
            },
            _ => Target {
                symbol: operand,
                indexed: false,
            },
        }
    }
}

// ----------------------------------------------------------------------------
// Numbers

/// Decimal count of a `RESW`/`RESB` reservation.
pub fn parse_count(operand: &str) -> Result<u32, Error> {
    operand
        .parse::<u32>()
        .map_err(|_| Error::InvalidNumber(operand.to_string(), "decimal count"))
}

/// Hexadecimal `START` address within the 24-bit address space.
pub fn parse_address(operand: &str) -> Result<u32, Error> {
    u32::from_str_radix(operand, 16)
        .ok()
        .filter(|addr| *addr <= LOC_MAX)
        .ok_or_else(|| Error::InvalidNumber(operand.to_string(), "hex address"))
}

/// Decimal `WORD` constant as three big-endian bytes. Negative values are
/// stored in 24-bit two's complement.
pub fn parse_word(operand: &str) -> Result<[u8; 3], Error> {
    let invalid = || Error::InvalidNumber(operand.to_string(), "24-bit word");
    let value = operand.parse::<i32>().map_err(|_| invalid())?;
    if !(-0x80_0000..=0xFF_FFFF).contains(&value) {
        return Err(invalid());
    }
    let [_, hi, mid, lo] = (value as u32 & 0xFF_FFFF).to_be_bytes();
    Ok([hi, mid, lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_literal() {
        let lit = ByteLiteral::parse("C'AB'").unwrap();
        assert_eq!(lit.len(), 2);
        assert_eq!(lit.to_bytes(), vec![0x41, 0x42]);
        assert_eq!(
            ByteLiteral::parse("C'a b'").unwrap().to_bytes(),
            vec![0x61, 0x20, 0x62]
        );
    }

    #[test]
    fn hex_literal_is_padded() {
        let lit = ByteLiteral::parse("X'1'").unwrap();
        assert_eq!(lit.len(), 1);
        assert_eq!(lit.to_bytes(), vec![0x01]);
        assert_eq!(
            ByteLiteral::parse("X'F1A'").unwrap().to_bytes(),
            vec![0x0F, 0x1A]
        );
    }

    #[test]
    fn malformed_literals() {
        for bad in ["C'AB", "X'G1'", "X''", "C''", "'AB'", "Z'00'", "C'", ""] {
            assert_eq!(ByteLiteral::parse(bad), None, "{bad}");
        }
    }

    #[test]
    fn targets() {
        assert_eq!(
            Target::parse("BUFFER,X"),
            Target {
                symbol: "BUFFER",
                indexed: true
            }
        );
        assert_eq!(
            Target::parse("BUFFER"),
            Target {
                symbol: "BUFFER",
                indexed: false
            }
        );
        assert!(!Target::parse(",X").indexed);
    }

    #[test]
    fn words() {
        assert_eq!(parse_word("5").unwrap(), [0x00, 0x00, 0x05]);
        assert_eq!(parse_word("4096").unwrap(), [0x00, 0x10, 0x00]);
        assert_eq!(parse_word("-1").unwrap(), [0xFF, 0xFF, 0xFF]);
        assert!(parse_word("16777216").is_err());
        assert!(parse_word("FIVE").is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_address("1000").unwrap(), 0x1000);
        assert_eq!(parse_count("4096").unwrap(), 4096);
        assert!(parse_count("-3").is_err());
        assert!(parse_address("GG").is_err());
        assert_eq!(parse_address("FFFFFF").unwrap(), 0xFFFFFF);
        assert!(parse_address("1000000").is_err());
    }
}
