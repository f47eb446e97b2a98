use sicasm::{assemble, Emitter, Error, Layout, Pass1};
use std::fs;
use std::path::PathBuf;

const SOURCE: &str = "\
sum      start   4000
first    ldx     zero
         lda     zero
loop     add     table,x
         tix     count
         jlt     loop
         sta     total
         rsub
table    resw    100
count    word    300
zero     word    0
total    resw    1
         end     first
";

fn workdir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sicasm-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn artifacts_through_files() {
    let layout = Layout::default();
    let assembly = assemble(SOURCE, &layout).unwrap();
    assert!(assembly.diags.is_empty());

    let dir = workdir("roundtrip");
    let intfile = dir.join("INTFILE");
    let symtab = dir.join("SYMTAB");
    fs::write(&intfile, assembly.pass1.intfile()).unwrap();
    fs::write(&symtab, assembly.pass1.symtab_artifact()).unwrap();

    let pass1 = Pass1::from_artifacts(
        &fs::read_to_string(&intfile).unwrap(),
        &fs::read_to_string(&symtab).unwrap(),
    )
    .unwrap();
    assert_eq!(pass1, assembly.pass1);

    let (pass2, diags) = Emitter::emit(&pass1, &layout);
    assert!(diags.is_empty());
    assert_eq!(pass2.module, assembly.pass2.module);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn artifact_text() {
    let assembly = assemble(SOURCE, &Layout::default()).unwrap();
    let intfile = assembly.pass1.intfile();
    let lines: Vec<&str> = intfile.lines().collect();
    assert_eq!(lines[0], "004000 SUM      START   4000");
    assert_eq!(lines[3], "004006 LOOP     ADD     TABLE,X");
    assert_eq!(lines[7], "004012          RSUB");
    assert_eq!(lines.last(), Some(&"00414A          END     FIRST"));

    let symtab = assembly.pass1.symtab_artifact();
    let mut rows = symtab.lines();
    assert_eq!(rows.next(), Some("SUM    004000 00014A"));
    assert_eq!(rows.next(), Some("FIRST  004000"));
    assert_eq!(rows.last(), Some("TOTAL  004147"));
}

#[test]
fn object_with_indexing() {
    let assembly = assemble(SOURCE, &Layout::default()).unwrap();
    assert_eq!(
        assembly.pass2.module.to_string(),
        "\
HSUM   00400000014A
T0040001504414400414418C0152C41413840060C41474C0000
T0041410600012C000000
E004000
"
    );
}

#[test]
fn malformed_intfile() {
    let symtab = "P      000000 000003\n";
    let err = Pass1::from_artifacts("000000 P START 0\nnot a line\n", symtab).unwrap_err();
    assert!(matches!(err, Error::MalformedArtifact("INTFILE", 2, _)));
}

#[test]
fn missing_layout_file() {
    let err = Layout::load("/nonexistent/sicasm/layout.yaml").unwrap_err();
    assert!(matches!(err, Error::FileOpen(..)));
}

#[test]
fn layout_from_file() {
    let dir = workdir("layout");
    let path = dir.join("layout.yaml");
    fs::write(&path, "max_text_bytes: 12\n").unwrap();
    let layout = Layout::load(path.to_str().unwrap()).unwrap();
    assert_eq!(layout.max_text_bytes, 12);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn oversized_reservation_keeps_artifacts_readable() {
    let layout = Layout::default();
    for count in ["16777216", "4294967295"] {
        let src = format!(
            "p        start   0\nbig      resb    {}\nw        word    5\n         end\n",
            count
        );
        let assembly = assemble(&src, &layout).unwrap();
        assert_eq!(assembly.diags.len(), 1, "{count}");
        assert!(matches!(
            assembly.diags[0].error,
            Error::LocationOverflow(..)
        ));
        assert_eq!(assembly.diags[0].line, 1);

        let pass1 = &assembly.pass1;
        assert_eq!(pass1.symtab.get("W"), Some(0));
        let reread = Pass1::from_artifacts(&pass1.intfile(), &pass1.symtab_artifact()).unwrap();
        assert_eq!(&reread, pass1);

        let (pass2, _) = Emitter::emit(&reread, &layout);
        assert_eq!(pass2.module, assembly.pass2.module);
        assert_eq!(
            pass2.module.to_string(),
            "HP     000000000003\nT00000003000005\nE000000\n"
        );
    }
}
