use color_print::cprintln;
use sicasm::{
    error::{has_error, Diag, Error},
    util::print_dump,
    CanonicalLine, Emitter, Layout, Pass1, Resolver,
};
use std::io::{Read, Write};
use std::path::Path;
use std::process::ExitCode;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Source layout file (YAML)
    #[clap(short, long, global = true)]
    config: Option<String>,

    /// Only print diagnostics
    #[clap(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Rewrite fixed-column source into canonical lines
    Normalize {
        /// Source file, `-` for stdin
        input: String,

        /// Output file, `-` for stdout
        #[clap(short, long, default_value = "-")]
        output: String,
    },

    /// Assign addresses and write the intermediate file and symbol table
    Pass1 {
        /// Canonical source, `-` for stdin
        #[clap(default_value = "-")]
        input: String,

        #[clap(long, default_value = "INTFILE")]
        intfile: String,

        #[clap(long, default_value = "SYMTAB")]
        symtab: String,
    },

    /// Generate the object module from the intermediate file and symbol table
    Pass2 {
        #[clap(long, default_value = "INTFILE")]
        intfile: String,

        #[clap(long, default_value = "SYMTAB")]
        symtab: String,

        /// Object file, `-` for stdout
        #[clap(short, long, default_value = "-")]
        output: String,

        /// Print the assembly listing
        #[clap(short, long)]
        dump: bool,
    },

    /// Run every stage on a source file
    Build {
        /// Source file, `-` for stdin
        #[clap(default_value = "main.asm")]
        input: String,

        /// Object file, defaults to `<program name>.obj`
        #[clap(short, long)]
        output: Option<String>,

        /// Print the assembly listing
        #[clap(short, long)]
        dump: bool,

        /// Also write INTFILE and SYMTAB next to the object file
        #[clap(short, long)]
        keep_artifacts: bool,
    },
}

fn main() -> ExitCode {
    use clap::Parser;

    let args: Args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            err.print();
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run finished without error diagnostics.
fn run(args: Args) -> Result<bool, Error> {
    let layout = match &args.config {
        Some(path) => Layout::load(path)?,
        None => Layout::default(),
    };

    match args.command {
        Command::Normalize { input, output } => {
            let log = Log::new(args.quiet || output == "-");
            log.banner();
            log.stage(1, "Normalize");
            log.read(&input);
            let text = read_text(&input)?;
            let raw: Vec<&str> = text.lines().collect();
            let (lines, diags) = sicasm::normalize_all(raw.iter().copied(), &layout);
            report(&diags, &input, &raw);

            let out: String = lines.iter().map(|(_, line)| format!("{}\n", line)).collect();
            log.write(&output);
            write_text(&output, &out)?;
            Ok(!has_error(&diags))
        }

        Command::Pass1 {
            input,
            intfile,
            symtab,
        } => {
            let log = Log::new(args.quiet);
            log.banner();
            log.stage(1, "Resolve Symbols");
            log.read(&input);
            let text = read_text(&input)?;
            let raw: Vec<&str> = text.lines().collect();
            let (origins, lines): (Vec<usize>, Vec<CanonicalLine>) = raw
                .iter()
                .enumerate()
                .filter_map(|(idx, text)| CanonicalLine::parse(text).map(|line| (idx, line)))
                .unzip();
            let (pass1, diags) = Resolver::resolve(lines)?;
            let diags = remap(diags, &origins);
            report(&diags, &input, &raw);

            log.write(&intfile);
            write_text(&intfile, &pass1.intfile())?;
            log.write(&symtab);
            write_text(&symtab, &pass1.symtab_artifact())?;
            Ok(!has_error(&diags))
        }

        Command::Pass2 {
            intfile,
            symtab,
            output,
            dump,
        } => {
            let log = Log::new(args.quiet || output == "-");
            log.banner();
            log.stage(1, "Load Intermediate Files");
            log.read(&intfile);
            let int_text = read_text(&intfile)?;
            log.read(&symtab);
            let sym_text = read_text(&symtab)?;
            let pass1 = Pass1::from_artifacts(&int_text, &sym_text)?;

            log.stage(2, "Generate Object Module");
            let (pass2, diags) = Emitter::emit(&pass1, &layout);
            let raw: Vec<&str> = int_text.lines().collect();
            let origins: Vec<usize> = raw
                .iter()
                .enumerate()
                .filter(|(_, text)| !text.trim().is_empty())
                .map(|(idx, _)| idx)
                .collect();
            let diags = remap(diags, &origins);
            report(&diags, &intfile, &raw);

            log.write(&output);
            write_text(&output, &pass2.module.to_string())?;
            if dump {
                print_dump(&intfile, &pass2.listing);
            }
            Ok(!has_error(&diags))
        }

        Command::Build {
            input,
            output,
            dump,
            keep_artifacts,
        } => {
            let log = Log::new(args.quiet || output.as_deref() == Some("-"));
            log.banner();
            log.stage(1, "Read Source");
            log.read(&input);
            let text = read_text(&input)?;

            log.stage(2, "Normalize, Resolve Symbols & Generate Object Module");
            let assembly = sicasm::assemble(&text, &layout)?;
            let raw: Vec<&str> = text.lines().collect();
            report(&assembly.diags, &input, &raw);

            let output = output.unwrap_or_else(|| {
                let name = format!("{}.obj", assembly.pass1.program.name);
                match Path::new(&input).parent() {
                    Some(dir) if input != "-" => dir.join(name).to_string_lossy().into_owned(),
                    _ => name,
                }
            });
            log.stage(3, "Write Files");
            log.write(&output);
            write_text(&output, &assembly.pass2.module.to_string())?;

            if keep_artifacts {
                let dir = Path::new(&output).parent().unwrap_or_else(|| Path::new(""));
                for (name, body) in [
                    ("INTFILE", assembly.pass1.intfile()),
                    ("SYMTAB", assembly.pass1.symtab_artifact()),
                ] {
                    let path = dir.join(name).to_string_lossy().into_owned();
                    log.write(&path);
                    write_text(&path, &body)?;
                }
            }
            if dump {
                print_dump(&input, &assembly.pass2.listing);
            }
            Ok(!has_error(&assembly.diags))
        }
    }
}

// ----------------------------------------------------------------------------
// Progress

struct Log {
    quiet: bool,
}

impl Log {
    fn new(quiet: bool) -> Self {
        Log { quiet }
    }

    fn banner(&self) {
        if !self.quiet {
            cprintln!("<s>SIC Assembler</> {}", env!("CARGO_PKG_VERSION"));
        }
    }

    fn stage(&self, no: usize, title: &str) {
        if !self.quiet {
            println!("{}. {}", no, title);
        }
    }

    fn read(&self, path: &str) {
        if !self.quiet {
            cprintln!("  <g>read</>  {}", path);
        }
    }

    fn write(&self, path: &str) {
        if !self.quiet {
            cprintln!("  <c>write</> {}", path);
        }
    }
}

// ----------------------------------------------------------------------------
// Files and diagnostics

fn read_text(path: &str) -> Result<String, Error> {
    let mut text = String::new();
    if path == "-" {
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(Error::FileRead)?;
    } else {
        let mut file =
            std::fs::File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
        file.read_to_string(&mut text).map_err(Error::FileRead)?;
    }
    Ok(text)
}

fn write_text(path: &str, text: &str) -> Result<(), Error> {
    if path == "-" {
        std::io::stdout()
            .write_all(text.as_bytes())
            .map_err(|e| Error::FileWrite("<stdout>".to_string(), e))
    } else {
        let mut file =
            std::fs::File::create(path).map_err(|e| Error::FileCreate(path.to_string(), e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| Error::FileWrite(path.to_string(), e))
    }
}

fn remap(diags: Vec<Diag>, origins: &[usize]) -> Vec<Diag> {
    diags
        .into_iter()
        .map(|diag| diag.remap(|idx| origins.get(idx).copied().unwrap_or(idx)))
        .collect()
}

/// Print diagnostics anchored on 0-based indices into `raw`.
fn report(diags: &[Diag], file: &str, raw: &[&str]) {
    for diag in diags {
        diag.print(file, raw.get(diag.line).copied());
    }
}
