use sicasm::{assemble, has_error, Emitter, Error, Layout, Resolver};

const COPY: &str = "\
. Reads records from an input device into a buffer and echoes them
copy     start   1000
first    stl     retadr
cloop    jsub    rdrec
         lda     length
         comp    zero
         jeq     endfil
         j       cloop
endfil   lda     eof
         sta     buffer
         rsub
eof      byte    c'EOF'
zero     word    0
retadr   resw    1
length   resw    1
buffer   resb    4096
.
rdrec    ldx     zero
rloop    td      input
         jeq     rloop
         rd      input
         stch    buffer,x
         tix     maxlen
         jlt     rloop
         rsub
input    byte    x'f1'
maxlen   word    4096
         end     first
";

#[test]
fn smallest_program() {
    let lines = [
        "ALPHA    START   0",
        "FIRST    LDA     VAL",
        "VAL      WORD    5",
        "         END     FIRST",
    ];
    let assembly = assemble(&lines.join("\n"), &Layout::default()).unwrap();
    assert!(assembly.diags.is_empty());

    let symtab = &assembly.pass1.symtab;
    assert_eq!(symtab.get("FIRST"), Some(0));
    assert_eq!(symtab.get("VAL"), Some(3));
    assert_eq!(assembly.pass1.program.length, 6);
    assert_eq!(
        assembly.pass2.module.to_string(),
        "HALPHA 000000000006\nT00000006000003000005\nE000000\n"
    );
}

#[test]
fn copy_program() {
    let assembly = assemble(COPY, &Layout::default()).unwrap();
    assert!(assembly.diags.is_empty(), "{:?}", assembly.diags);

    let program = &assembly.pass1.program;
    assert_eq!(program.name, "COPY");
    assert_eq!(program.start, 0x1000);
    assert_eq!(program.length, 0x1043);
    assert_eq!(assembly.pass1.symtab.get("BUFFER"), Some(0x1027));
    assert_eq!(assembly.pass1.symtab.get("RDREC"), Some(0x2027));

    assert_eq!(
        assembly.pass2.module.to_string(),
        "\
HCOPY  001000001043
T0010001E14102148202700102428101E3010123C100300101B0C10274C0000454F46
T00101E03000000
T0020271C04101EE0203F30202AD8203F5490272C204038202A4C0000F1001000
E001000
"
    );
}

#[test]
fn entry_falls_back_to_start() {
    let src = "p        start   100\nhere     rsub\n         end     nowhere\n";
    let assembly = assemble(src, &Layout::default()).unwrap();
    assert_eq!(assembly.pass2.module.entry, 0x100);
    assert!(assembly.diags.is_empty());
}

#[test]
fn duplicate_start_aborts() {
    let src = "a        start   0\nb        start   10\n         end\n";
    assert!(matches!(
        assemble(src, &Layout::default()),
        Err(Error::MultipleStart)
    ));
}

#[test]
fn diagnostics_point_at_source_lines() {
    let src = "\
p        start   0
. comment
         lda     missing
x        rsub
x        rsub
         end
";
    let assembly = assemble(src, &Layout::default()).unwrap();
    assert!(has_error(&assembly.diags));
    let lines: Vec<_> = assembly.diags.iter().map(|d| d.line).collect();
    // duplicate + note from pass one, undefined symbol from pass two
    assert_eq!(lines, vec![4, 3, 2]);
    assert!(matches!(
        &assembly.diags[2].error,
        Error::UndefinedSymbol(name) if name == "MISSING"
    ));
}

#[test]
fn listing_covers_every_line() {
    let assembly = assemble(COPY, &Layout::default()).unwrap();
    let listing = &assembly.pass2.listing;
    assert_eq!(listing.len(), assembly.pass1.lines.len());
    assert_eq!(listing[1].code, vec![0x14, 0x10, 0x21]);
    assert!(listing.iter().any(|l| l.source.contains("BUFFER,X")));
}

#[test]
fn stages_compose() {
    let (lines, _) = sicasm::normalize_all(COPY.lines(), &Layout::default());
    let (pass1, _) = Resolver::resolve(lines.into_iter().map(|(_, line)| line)).unwrap();
    let (pass2, diags) = Emitter::emit(&pass1, &Layout::default());
    assert!(diags.is_empty());
    assert_eq!(
        pass2.module,
        assemble(COPY, &Layout::default()).unwrap().pass2.module
    );
}
