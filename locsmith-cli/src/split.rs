use std::path::PathBuf;

use locsmith::{CodePage, ColumnSpec, split_columns};

/// Run the split command: extract the id column and every language column
/// of one table into per-column files.
pub fn run_split_command(input: PathBuf, out_dir: PathBuf, encoding: String) {
    let code_page = match CodePage::for_label(&encoding) {
        Ok(code_page) => code_page,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // All specs share the physical source file, so they all read it in the
    // same declared code page.
    let mut specs = vec![ColumnSpec::id().with_code_page(code_page)];
    specs.extend(
        ColumnSpec::standard_set()
            .into_iter()
            .map(|spec| spec.with_code_page(code_page)),
    );

    if let Err(e) = split_columns(&input, &out_dir, &specs) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    println!(
        "Split {} into {} column files in {}",
        input.display(),
        specs.len(),
        out_dir.display()
    );
}
