use indexmap::IndexMap;
use std::fmt::Write;

use crate::error::Error;

/// Name, load address and size of the assembled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub start: u32,
    pub length: u32,
}

impl Default for Program {
    fn default() -> Self {
        Program {
            name: "UNKNOWN".to_string(),
            start: 0,
            length: 0,
        }
    }
}

/// Symbol → address, iterated in order of first definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable(IndexMap<String, u32>);

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable(IndexMap::new())
    }

    /// Bind `name`, returning the address it was bound to before.
    pub fn insert(&mut self, name: String, addr: u32) -> Option<u32> {
        self.0.insert(name, addr)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the `SYMTAB` artifact: the program line followed by one line
    /// per symbol.
    pub fn artifact(&self, program: &Program) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<6} {:06X} {:06X}",
            program.name, program.start, program.length
        );
        for (name, addr) in self.iter() {
            let _ = writeln!(out, "{:<6} {:06X}", name, addr);
        }
        out
    }

    pub fn from_artifact(text: &str) -> Result<(Program, Self), Error> {
        let malformed = |idx: usize, line: &str| {
            Error::MalformedArtifact("SYMTAB", idx + 1, line.to_string())
        };
        let hex = |s: &str| u32::from_str_radix(s, 16).ok();

        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let program = match lines.next() {
            Some((idx, line)) => match line.split_whitespace().collect::<Vec<_>>()[..] {
                [name, start, length] => Program {
                    name: name.to_string(),
                    start: hex(start).ok_or_else(|| malformed(idx, line))?,
                    length: hex(length).ok_or_else(|| malformed(idx, line))?,
                },
                _ => return Err(malformed(idx, line)),
            },
            None => return Err(malformed(0, "")),
        };

        let mut symtab = SymbolTable::new();
        for (idx, line) in lines {
            match line.split_whitespace().collect::<Vec<_>>()[..] {
                [name, addr] => {
                    let addr = hex(addr).ok_or_else(|| malformed(idx, line))?;
                    symtab.insert(name.to_string(), addr);
                }
                _ => return Err(malformed(idx, line)),
            }
        }
        Ok((program, symtab))
    }
}
