use color_print::cformat;

use crate::{emit::ListingLine, object::hex};

/// Object code column of the listing; long data is shortened to its first
/// and last two bytes.
pub fn code_column(code: &[u8]) -> String {
    if code.len() > 4 {
        format!("{}..{}", hex(&code[..2]), hex(&code[code.len() - 2..]))
    } else {
        hex(code)
    }
}

pub fn print_dump(path: &str, listing: &[ListingLine]) {
    println!(
        "{}+------[{}]{}",
        "-".repeat(19),
        path,
        "-".repeat(45usize.saturating_sub(path.len()))
    );
    for (idx, line) in listing.iter().enumerate() {
        let code = code_column(&line.code);
        let body = cformat!(
            "[<c>{:06X}</>] <y>{:<10}</>| {:>4}: {}",
            line.loc,
            code,
            idx + 1,
            line.source
        );
        println!("{}", body);
    }
    println!("-------------------+-----------------------------------------------------");
}
