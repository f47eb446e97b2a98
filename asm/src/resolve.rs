use arch::{directive::Directive, INST_BYTES, LOC_MAX, WORD_BYTES};
use std::collections::HashMap;

use crate::{
    error::{Diag, Error},
    line::{CanonicalLine, IntermediateLine, OpKind},
    operand::{parse_address, parse_count, ByteLiteral},
    symtab::{Program, SymbolTable},
};

/// Result of pass one, the whole input of pass two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass1 {
    pub lines: Vec<IntermediateLine>,
    pub symtab: SymbolTable,
    pub program: Program,
}

impl Pass1 {
    /// Render the `INTFILE` artifact.
    pub fn intfile(&self) -> String {
        self.lines.iter().map(|line| format!("{}\n", line)).collect()
    }

    /// Render the `SYMTAB` artifact.
    pub fn symtab_artifact(&self) -> String {
        self.symtab.artifact(&self.program)
    }

    /// Rebuild the pass one result from its two artifacts. Blank lines in
    /// the `INTFILE` are skipped.
    pub fn from_artifacts(intfile: &str, symtab: &str) -> Result<Self, Error> {
        let (program, symtab) = SymbolTable::from_artifact(symtab)?;
        let lines = intfile
            .lines()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(idx, text)| {
                IntermediateLine::parse(text)
                    .ok_or_else(|| Error::MalformedArtifact("INTFILE", idx + 1, text.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Pass1 {
            lines,
            symtab,
            program,
        })
    }
}

/// Pass one state: location counter, symbol table and program metadata.
#[derive(Debug, Default)]
pub struct Resolver {
    locctr: u32,
    started: bool,
    program: Program,
    symtab: SymbolTable,
    // Line index of each symbol's current definition
    defined_at: HashMap<String, usize>,
    lines: Vec<IntermediateLine>,
    diags: Vec<Diag>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run pass one over canonical lines. Diagnostics refer to indices into
    /// `lines`. A second `START` aborts the pass.
    pub fn resolve<I>(lines: I) -> Result<(Pass1, Vec<Diag>), Error>
    where
        I: IntoIterator<Item = CanonicalLine>,
    {
        let mut resolver = Resolver::new();
        for (idx, line) in lines.into_iter().enumerate() {
            if !resolver.step(idx, line)? {
                break;
            }
        }
        Ok(resolver.finish())
    }

    /// Process one line. Returns `false` once `END` has been recorded.
    pub fn step(&mut self, idx: usize, line: CanonicalLine) -> Result<bool, Error> {
        match line.kind() {
            OpKind::Directive(Directive::START) => {
                if self.started {
                    return Err(Error::MultipleStart);
                }
                self.started = true;
                let start = match line.operand.as_deref() {
                    Some(operand) => parse_address(operand).unwrap_or_else(|err| {
                        self.diags.push(Diag::new(err, idx));
                        0
                    }),
                    None => 0,
                };
                self.locctr = start;
                self.program.start = start;
                self.program.name = line.label.clone().unwrap_or_else(|| "UNKNOWN".into());
                self.record(line);
                Ok(true)
            }
            OpKind::Directive(Directive::END) => {
                self.record(line);
                Ok(false)
            }
            kind => {
                if let Some(label) = &line.label {
                    self.bind(label, idx);
                }
                let width = self.width(kind, &line, idx);
                // Locations are six hex digits wide
                let next = u64::from(self.locctr) + u64::from(width);
                if next > u64::from(LOC_MAX) {
                    self.diags.push(Diag::new(
                        Error::LocationOverflow(line.operation.clone(), next),
                        idx,
                    ));
                }
                self.record(line);
                if next <= u64::from(LOC_MAX) {
                    self.locctr = next as u32;
                }
                Ok(true)
            }
        }
    }

    pub fn finish(self) -> (Pass1, Vec<Diag>) {
        let program = Program {
            length: self.locctr.saturating_sub(self.program.start),
            ..self.program
        };
        let pass1 = Pass1 {
            lines: self.lines,
            symtab: self.symtab,
            program,
        };
        (pass1, self.diags)
    }

    fn record(&mut self, line: CanonicalLine) {
        self.lines.push(IntermediateLine {
            loc: self.locctr,
            line,
        });
    }

    fn bind(&mut self, label: &str, idx: usize) {
        if self.symtab.insert(label.to_string(), self.locctr).is_some() {
            self.diags
                .push(Diag::new(Error::DuplicateSymbol(label.to_string()), idx));
            if let Some(prev) = self.defined_at.get(label) {
                self.diags
                    .push(Diag::new(Error::PreviousDefinition(label.to_string()), *prev));
            }
        }
        self.defined_at.insert(label.to_string(), idx);
    }

    /// Bytes the line occupies.
    fn width(&mut self, kind: OpKind, line: &CanonicalLine, idx: usize) -> u32 {
        let operand = line.operand.as_deref();
        let mut count = |scale: u32| match operand {
            Some(operand) => match parse_count(operand) {
                Ok(n) => n.saturating_mul(scale),
                Err(err) => {
                    self.diags.push(Diag::new(err, idx));
                    0
                }
            },
            None => {
                self.diags
                    .push(Diag::new(Error::MissingOperand(line.operation.clone()), idx));
                0
            }
        };
        match kind {
            OpKind::Directive(Directive::WORD) => WORD_BYTES,
            OpKind::Directive(Directive::RESW) => count(WORD_BYTES),
            OpKind::Directive(Directive::RESB) => count(1),
            // A malformed literal takes no space; pass two reports it
            OpKind::Directive(Directive::BYTE) => operand
                .and_then(ByteLiteral::parse)
                .map_or(0, |lit| lit.len() as u32),
            _ => INST_BYTES,
        }
    }
}
