use arch::TEXT_RECORD_MAX;
use serde::Deserialize;

use crate::error::Error;

/// Column layout of the fixed-format source and the record packing limit.
/// Columns are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    pub label_end: usize,
    pub operation_start: usize,
    pub operation_end: usize,
    pub operand_start: usize,
    pub operand_end: usize,
    pub max_text_bytes: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            label_end: 8,
            operation_start: 10,
            operation_end: 15,
            operand_start: 18,
            operand_end: 35,
            max_text_bytes: TEXT_RECORD_MAX,
        }
    }
}

impl Layout {
    pub fn load(path: &str) -> Result<Self, Error> {
        let text =
            std::fs::read_to_string(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        Self::from_yaml(&text).map_err(|err| match err {
            Error::ConfigParse(_, e) => Error::ConfigParse(path.to_string(), e),
            other => other,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        let layout: Layout =
            serde_yaml::from_str(text).map_err(|e| Error::ConfigParse("<inline>".into(), e))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let ordered = 1 <= self.label_end
            && self.label_end < self.operation_start
            && self.operation_start <= self.operation_end
            && self.operation_end < self.operand_start
            && self.operand_start <= self.operand_end;
        if !ordered {
            return Err(Error::Config(format!(
                "fields must not overlap: label 1-{}, operation {}-{}, operand {}-{}",
                self.label_end,
                self.operation_start,
                self.operation_end,
                self.operand_start,
                self.operand_end
            )));
        }
        if !(1..=TEXT_RECORD_MAX).contains(&self.max_text_bytes) {
            return Err(Error::Config(format!(
                "max_text_bytes must be within 1..={}, got {}",
                TEXT_RECORD_MAX, self.max_text_bytes
            )));
        }
        Ok(())
    }
}
