use arch::{directive::Directive, op::Mnemonic, ADDR_MAX, INDEX_BIT};

use crate::{
    config::Layout,
    error::{Diag, Error},
    line::{CanonicalLine, IntermediateLine, OpKind},
    object::{Header, ObjectModule, TextRecord},
    operand::{parse_word, ByteLiteral, Target},
    resolve::Pass1,
    symtab::SymbolTable,
};

/// Location, generated code and source of one assembled line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLine {
    pub loc: u32,
    pub code: Vec<u8>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass2 {
    pub module: ObjectModule,
    pub listing: Vec<ListingLine>,
}

/// Pass two state: the text record being filled and the finished ones.
pub struct Emitter<'a> {
    symtab: &'a SymbolTable,
    header: Header,
    max_bytes: usize,
    open: Option<TextRecord>,
    records: Vec<TextRecord>,
    entry: u32,
    listing: Vec<ListingLine>,
    diags: Vec<Diag>,
}

impl<'a> Emitter<'a> {
    pub fn new(pass1: &'a Pass1, layout: &Layout) -> Self {
        Emitter {
            symtab: &pass1.symtab,
            header: Header {
                name: pass1.program.name.clone(),
                start: pass1.program.start,
                length: pass1.program.length,
            },
            max_bytes: layout.max_text_bytes,
            open: None,
            records: vec![],
            entry: pass1.program.start,
            listing: vec![],
            diags: vec![],
        }
    }

    /// Run pass two. Diagnostics refer to indices into `pass1.lines`.
    pub fn emit(pass1: &Pass1, layout: &Layout) -> (Pass2, Vec<Diag>) {
        let mut emitter = Emitter::new(pass1, layout);
        for (idx, line) in pass1.lines.iter().enumerate() {
            if !emitter.step(idx, line) {
                break;
            }
        }
        emitter.finish()
    }

    /// Process one line. Returns `false` after `END`.
    pub fn step(&mut self, idx: usize, item: &IntermediateLine) -> bool {
        let line = &item.line;
        match line.kind() {
            OpKind::Directive(Directive::START) => {
                self.list(item, vec![]);
                true
            }
            OpKind::Directive(Directive::END) => {
                if let Some(addr) = line.operand.as_deref().and_then(|s| self.symtab.get(s)) {
                    self.entry = addr;
                }
                self.flush();
                self.list(item, vec![]);
                false
            }
            OpKind::Directive(directive) if directive.is_reservation() => {
                self.flush();
                self.list(item, vec![]);
                true
            }
            _ => {
                let (code, errors) = object_code(line, self.symtab);
                self.diags
                    .extend(errors.into_iter().map(|err| Diag::new(err, idx)));
                self.append(item.loc, &code);
                self.list(item, code);
                true
            }
        }
    }

    pub fn finish(mut self) -> (Pass2, Vec<Diag>) {
        self.flush();
        let module = ObjectModule {
            header: self.header,
            texts: self.records,
            entry: self.entry,
        };
        let pass2 = Pass2 {
            module,
            listing: self.listing,
        };
        (pass2, self.diags)
    }

    fn list(&mut self, item: &IntermediateLine, code: Vec<u8>) {
        self.listing.push(ListingLine {
            loc: item.loc,
            code,
            source: item.line.to_string(),
        });
    }

    fn flush(&mut self) {
        if let Some(record) = self.open.take() {
            if !record.code.is_empty() {
                self.records.push(record);
            }
        }
    }

    /// Pack `code` located at `loc` into text records.
    fn append(&mut self, loc: u32, code: &[u8]) {
        if code.is_empty() {
            return;
        }
        // Records hold contiguous bytes only
        let breaks = self.open.as_ref().is_some_and(|open| {
            open.end() != loc || open.code.len() + code.len() > self.max_bytes
        });
        if breaks {
            self.flush();
        }
        let mut loc = loc;
        // Code longer than one record spills into the following ones
        for chunk in code.chunks(self.max_bytes) {
            let record = self.open.get_or_insert_with(|| TextRecord::new(loc));
            record.code.extend_from_slice(chunk);
            if record.code.len() >= self.max_bytes {
                self.flush();
            }
            loc = loc.wrapping_add(chunk.len() as u32);
        }
    }
}

/// Object code of a single line. Lines without code (directives, unknown
/// operations, malformed operands) yield an empty vector.
pub fn object_code(line: &CanonicalLine, symtab: &SymbolTable) -> (Vec<u8>, Vec<Error>) {
    let operand = line.operand.as_deref();
    match line.kind() {
        OpKind::Directive(Directive::WORD) => match operand.map(parse_word) {
            Some(Ok(word)) => (word.to_vec(), vec![]),
            Some(Err(err)) => (vec![], vec![err]),
            None => (vec![], vec![Error::MissingOperand(line.operation.clone())]),
        },
        OpKind::Directive(Directive::BYTE) => match operand.and_then(ByteLiteral::parse) {
            Some(lit) => (lit.to_bytes(), vec![]),
            None => (
                vec![],
                vec![Error::InvalidByteOperand(
                    operand.unwrap_or_default().to_string(),
                )],
            ),
        },
        OpKind::Directive(_) => (vec![], vec![]),
        OpKind::Instruction(op) => {
            let mut errors = vec![];
            let addr = address(op, operand, symtab, &mut errors);
            let [hi, lo] = addr.to_be_bytes();
            (vec![op.opcode(), hi, lo], errors)
        }
        OpKind::Unknown => (vec![], vec![Error::UnknownOperation(line.operation.clone())]),
    }
}

/// Contents of the 16-bit address field.
fn address(op: Mnemonic, operand: Option<&str>, symtab: &SymbolTable, errors: &mut Vec<Error>) -> u16 {
    if !op.takes_operand() {
        return 0;
    }
    let Some(operand) = operand else {
        errors.push(Error::MissingOperand(op.to_string()));
        return 0;
    };
    let target = Target::parse(operand);
    let addr = match symtab.get(target.symbol) {
        Some(addr) => addr,
        None => {
            errors.push(Error::UndefinedSymbol(target.symbol.to_string()));
            return 0;
        }
    };
    let addr = if addr > ADDR_MAX as u32 {
        errors.push(Error::AddressOverflow(target.symbol.to_string(), addr));
        (addr & ADDR_MAX as u32) as u16
    } else {
        addr as u16
    };
    if target.indexed {
        addr | INDEX_BIT
    } else {
        addr
    }
}
