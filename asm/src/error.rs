use color_print::ceprintln;
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Multiple START directives")]
    MultipleStart,

    #[error("Duplicate symbol: `{0}`")]
    DuplicateSymbol(String),

    #[error("Symbol `{0}` was first defined here, the later definition wins")]
    PreviousDefinition(String),

    #[error("Undefined symbol: `{0}`")]
    UndefinedSymbol(String),

    #[error("Invalid BYTE operand: `{0}`")]
    InvalidByteOperand(String),

    #[error("Missing operand for `{0}`")]
    MissingOperand(String),

    #[error("Cannot parse `{0}` as {1}")]
    InvalidNumber(String, &'static str),

    #[error("Address 0x{1:06X} of `{0}` does not fit the 15-bit address field")]
    AddressOverflow(String, u32),

    #[error("`{0}` moves the location counter to 0x{1:X}, past 0xFFFFFF")]
    LocationOverflow(String, u64),

    #[error("Unterminated character literal: `{0}`")]
    UnterminatedLiteral(String),

    #[error("Unknown operation: `{0}`")]
    UnknownOperation(String),

    #[error("Malformed {0} line {1}: `{2}`")]
    MalformedArtifact(&'static str, usize, String),

    #[error("Invalid layout: {0}")]
    Config(String),

    #[error("Failed to parse layout file: {0}")]
    ConfigParse(String, #[source] serde_yaml::Error),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read line")]
    FileRead(#[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Note,
}

impl Error {
    /// Severity of a recoverable error when it is reported as a diagnostic.
    pub fn level(&self) -> Level {
        match self {
            Error::AddressOverflow(..)
            | Error::UnterminatedLiteral(_)
            | Error::UnknownOperation(_) => Level::Warn,
            Error::PreviousDefinition(_) => Level::Note,
            _ => Level::Error,
        }
    }

    /// Print a fatal error together with its cause.
    pub fn print(&self) {
        ceprintln!("<red,bold>error</>: {}", self);
        let mut source = StdError::source(self);
        while let Some(cause) = source {
            ceprintln!("      <blue>=</> caused by: {}", cause);
            source = cause.source();
        }
    }
}

/// A recoverable error attached to the 0-based index of the line it was
/// raised on.
#[derive(Debug)]
pub struct Diag {
    pub level: Level,
    pub error: Error,
    pub line: usize,
}

impl Diag {
    pub fn new(error: Error, line: usize) -> Self {
        Diag {
            level: error.level(),
            error,
            line,
        }
    }

    /// Re-anchor the diagnostic, e.g. from a stage-local index onto the
    /// source file.
    pub fn remap(mut self, map: impl Fn(usize) -> usize) -> Self {
        self.line = map(self.line);
        self
    }

    /// Print with diagnostic information showing file location and line content.
    /// `raw` is the text of the line, when it is still at hand.
    pub fn print(&self, file: &str, raw: Option<&str>) {
        match self.level {
            Level::Error => ceprintln!("<red,bold>error</>: {}", self.error),
            Level::Warn => ceprintln!("<yellow,bold>warn</>: {}", self.error),
            Level::Note => ceprintln!("<green,bold>note</>: {}", self.error),
        }
        let line_num = self.line + 1;
        ceprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        if let Some(raw) = raw {
            ceprintln!("      <blue>|</>");
            ceprintln!(" <blue>{:>4} |</> {}", line_num, raw);
            ceprintln!("      <blue>|</>");
        }
    }
}

pub fn has_error(diags: &[Diag]) -> bool {
    diags.iter().any(|diag| diag.level == Level::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(Error::UndefinedSymbol("X".into()).level(), Level::Error);
        assert_eq!(Error::UnknownOperation("FOO".into()).level(), Level::Warn);
        assert_eq!(Error::PreviousDefinition("X".into()).level(), Level::Note);
        assert_eq!(
            Error::LocationOverflow("RESB".into(), 0x1000000).level(),
            Level::Error
        );
    }

    #[test]
    fn has_error_ignores_warnings() {
        let warn = Diag::new(Error::UnterminatedLiteral("C'AB".into()), 0);
        assert!(!has_error(&[warn]));
        let err = Diag::new(Error::MissingOperand("LDA".into()), 3);
        assert!(has_error(&[err]));
    }

    #[test]
    fn remap() {
        let diag = Diag::new(Error::DuplicateSymbol("A".into()), 2).remap(|idx| idx * 10);
        assert_eq!(diag.line, 20);
    }
}
