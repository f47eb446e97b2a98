use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

/// SIC instruction set. The discriminant of each variant is its opcode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum Mnemonic {
    LDA = 0x00,
    LDX = 0x04,
    LDL = 0x08,
    STA = 0x0C,
    STX = 0x10,
    STL = 0x14,
    ADD = 0x18,
    SUB = 0x1C,
    MUL = 0x20,
    DIV = 0x24,
    COMP = 0x28,
    TIX = 0x2C,
    JEQ = 0x30,
    JGT = 0x34,
    JLT = 0x38,
    J = 0x3C,
    JSUB = 0x48,
    RSUB = 0x4C,
    LDCH = 0x50,
    STCH = 0x54,
    RD = 0xD8,
    WD = 0xDC,
    TD = 0xE0,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn opcode(self) -> u8 {
        self.into()
    }

    /// `RSUB` returns through the linkage register and has no target.
    pub fn takes_operand(self) -> bool {
        !matches!(self, Mnemonic::RSUB)
    }
}
