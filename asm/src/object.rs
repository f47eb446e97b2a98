use std::fmt;

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub start: u32,
    pub length: u32,
}

/// A contiguous run of object code loaded at `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub start: u32,
    pub code: Vec<u8>,
}

impl TextRecord {
    pub fn new(start: u32) -> Self {
        TextRecord {
            start,
            code: vec![],
        }
    }

    /// Address one past the last byte.
    pub fn end(&self) -> u32 {
        self.start.wrapping_add(self.code.len() as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectModule {
    pub header: Header,
    pub texts: Vec<TextRecord>,
    /// First instruction to execute
    pub entry: u32,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{:<6.6}{:06X}{:06X}", self.name, self.start, self.length)
    }
}

impl fmt::Display for TextRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T{:06X}{:02X}{}",
            self.start,
            self.code.len(),
            hex(&self.code)
        )
    }
}

impl fmt::Display for ObjectModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for text in &self.texts {
            writeln!(f, "{}", text)?;
        }
        writeln!(f, "E{:06X}", self.entry)
    }
}
