use strum::{Display, EnumString};

/// Assembler directives. They steer the location counter instead of
/// mapping onto an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Directive {
    START,
    END,
    BYTE,
    WORD,
    RESB,
    RESW,
}

impl Directive {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn is_reservation(self) -> bool {
        matches!(self, Directive::RESB | Directive::RESW)
    }
}

#[test]
fn test() {
    assert_eq!(Directive::parse("RESW"), Some(Directive::RESW));
    assert_eq!(Directive::parse("LDA"), None);
    assert!(Directive::RESB.is_reservation());
    assert!(!Directive::BYTE.is_reservation());
    assert_eq!(Directive::START.to_string(), "START");
}
