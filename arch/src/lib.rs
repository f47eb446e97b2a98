pub mod directive;
pub mod op;

/// Width in bytes of every SIC instruction.
pub const INST_BYTES: u32 = 3;

/// Width in bytes of a SIC word.
pub const WORD_BYTES: u32 = 3;

/// Address field bit selecting indexed addressing.
pub const INDEX_BIT: u16 = 0x8000;

/// Largest location a 6-digit hex field can carry.
pub const LOC_MAX: u32 = 0xFF_FFFF;

/// Largest address that fits the 15-bit address field.
pub const ADDR_MAX: u16 = 0x7FFF;

/// Operand suffix requesting indexed addressing (`BUFFER,X`).
pub const INDEX_SUFFIX: &str = ",X";

/// Upper bound of bytes carried by a single text record.
pub const TEXT_RECORD_MAX: usize = 30;
