pub mod config;
pub mod emit;
pub mod error;
pub mod line;
pub mod normalize;
pub mod object;
pub mod operand;
pub mod resolve;
pub mod symtab;
pub mod util;

pub use config::Layout;
pub use emit::{Emitter, ListingLine, Pass2};
pub use error::{has_error, Diag, Error, Level};
pub use line::{CanonicalLine, IntermediateLine, OpKind};
pub use normalize::{normalize, normalize_all};
pub use object::{Header, ObjectModule, TextRecord};
pub use resolve::{Pass1, Resolver};
pub use symtab::{Program, SymbolTable};

/// Everything produced by one run of the three stages.
#[derive(Debug)]
pub struct Assembly {
    /// Canonical lines with the 0-based index of their source line
    pub lines: Vec<(usize, CanonicalLine)>,
    pub pass1: Pass1,
    pub pass2: Pass2,
    /// Diagnostics of all stages, anchored on source line indices
    pub diags: Vec<Diag>,
}

/// Normalize, resolve and emit `source`. Fails only on fatal errors.
pub fn assemble(source: &str, layout: &Layout) -> Result<Assembly, Error> {
    let (lines, mut diags) = normalize_all(source.lines(), layout);
    let origin = |idx: usize| lines.get(idx).map_or(idx, |(raw, _)| *raw);

    let (pass1, found) = Resolver::resolve(lines.iter().map(|(_, line)| line.clone()))?;
    diags.extend(found.into_iter().map(|diag| diag.remap(origin)));

    // Intermediate lines are a prefix of the canonical ones
    let (pass2, found) = Emitter::emit(&pass1, layout);
    diags.extend(found.into_iter().map(|diag| diag.remap(origin)));

    Ok(Assembly {
        lines,
        pass1,
        pass2,
        diags,
    })
}
