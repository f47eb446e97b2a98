use arch::{directive::Directive, op::Mnemonic};
use std::fmt;

// ----------------------------------------------------------------------------
// Canonical line

/// One source statement after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalLine {
    pub label: Option<String>,
    pub operation: String,
    pub operand: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Directive(Directive),
    Instruction(Mnemonic),
    Unknown,
}

impl CanonicalLine {
    /// Empty fields become `None`.
    pub fn new(label: &str, operation: &str, operand: &str) -> Self {
        let some = |s: &str| (!s.is_empty()).then(|| s.to_string());
        CanonicalLine {
            label: some(label),
            operation: operation.to_string(),
            operand: some(operand),
        }
    }

    /// Read a line back from its canonical text. A leading blank means the
    /// label is absent; the next word is the operation and the rest is the
    /// operand.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_end();
        if text.trim_start().is_empty() {
            return None;
        }
        let has_label = !text.starts_with(char::is_whitespace);
        let (label, rest) = if has_label {
            split_word(text)
        } else {
            ("", text)
        };
        let (operation, rest) = split_word(rest.trim_start());
        Some(CanonicalLine::new(label, operation, rest.trim()))
    }

    pub fn kind(&self) -> OpKind {
        if let Some(directive) = Directive::parse(&self.operation) {
            OpKind::Directive(directive)
        } else if let Some(mnemonic) = Mnemonic::parse(&self.operation) {
            OpKind::Instruction(mnemonic)
        } else {
            OpKind::Unknown
        }
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => s.split_at(idx),
        None => (s, ""),
    }
}

impl fmt::Display for CanonicalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label.as_deref().unwrap_or("");
        match &self.operand {
            Some(operand) => write!(f, "{:<8} {:<6}  {}", label, self.operation, operand),
            None => write!(f, "{:<8} {}", label, self.operation),
        }
    }
}

// ----------------------------------------------------------------------------
// Intermediate line

/// A canonical line with the location counter value assigned in pass one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateLine {
    pub loc: u32,
    pub line: CanonicalLine,
}

impl IntermediateLine {
    pub fn parse(text: &str) -> Option<Self> {
        let loc = u32::from_str_radix(text.get(..6)?, 16).ok()?;
        let rest = text.get(6..)?.strip_prefix(' ')?;
        let line = CanonicalLine::parse(rest)?;
        Some(IntermediateLine { loc, line })
    }
}

impl fmt::Display for IntermediateLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X} {}", self.loc, self.line)
    }
}
