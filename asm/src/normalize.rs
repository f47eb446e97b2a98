use crate::{
    config::Layout,
    error::{Diag, Error},
    line::CanonicalLine,
};

/// Where the operand scanner stands relative to a `C'...'` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Outside,
    InsideLiteral,
}

/// Uppercase an operand except for the interior of character literals.
///
/// The opener `C'` (or `c'`) is always rendered `C'` and the next `'` closes
/// the literal. The returned state is `InsideLiteral` when the last literal
/// was never closed; the rest of the line is then kept verbatim.
pub fn fold_operand(operand: &str) -> (String, Scan) {
    let mut folded = String::with_capacity(operand.len());
    let mut state = Scan::Outside;
    let mut chars = operand.chars().peekable();
    while let Some(c) = chars.next() {
        state = match state {
            Scan::Outside if matches!(c, 'C' | 'c') && chars.peek() == Some(&'\'') => {
                chars.next();
                folded.push_str("C'");
                Scan::InsideLiteral
            }
            Scan::Outside => {
                folded.push(c.to_ascii_uppercase());
                Scan::Outside
            }
            Scan::InsideLiteral => {
                folded.push(c);
                if c == '\'' {
                    Scan::Outside
                } else {
                    Scan::InsideLiteral
                }
            }
        };
    }
    (folded, state)
}

/// Normalize one raw source line. Blank lines and `.` comments yield `None`.
pub fn normalize(raw: &str, layout: &Layout) -> (Option<CanonicalLine>, Vec<Error>) {
    let raw = raw.trim_end_matches(['\r', '\n']);
    if raw.trim().is_empty() || raw.starts_with('.') {
        return (None, vec![]);
    }

    // Anything past the operand field is comment
    let cols: Vec<char> = raw.chars().take(layout.operand_end).collect();
    let field = |from: usize, to: usize| -> String {
        let to = to.min(cols.len());
        match cols.get(from - 1..to) {
            Some(slice) => slice.iter().collect::<String>().trim().to_string(),
            None => String::new(),
        }
    };

    let label = field(1, layout.label_end);
    let (operation, operand) = match field(layout.operation_start, layout.operation_end) {
        op if !op.is_empty() => (op, field(layout.operand_start, layout.operand_end)),
        // Short or shifted line: whatever follows the label is the operation
        _ => (
            field(layout.operation_start, layout.operand_end),
            String::new(),
        ),
    };
    if label.is_empty() && operation.is_empty() {
        return (None, vec![]);
    }

    let (operand, state) = fold_operand(&operand);
    let mut errors = vec![];
    if state == Scan::InsideLiteral {
        errors.push(Error::UnterminatedLiteral(operand.clone()));
    }

    let line = CanonicalLine::new(
        &label.to_ascii_uppercase(),
        &operation.to_ascii_uppercase(),
        &operand,
    );
    (Some(line), errors)
}

/// Normalize a whole source. Every canonical line is paired with the 0-based
/// index of the raw line it came from; diagnostics carry raw indices too.
pub fn normalize_all<'a, I>(lines: I, layout: &Layout) -> (Vec<(usize, CanonicalLine)>, Vec<Diag>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut canonical = vec![];
    let mut diags = vec![];
    for (idx, raw) in lines.into_iter().enumerate() {
        let (line, errors) = normalize(raw, layout);
        diags.extend(errors.into_iter().map(|err| Diag::new(err, idx)));
        if let Some(line) = line {
            canonical.push((idx, line));
        }
    }
    (canonical, diags)
}
