use std::path::PathBuf;

use locsmith::{ColumnSpec, merge_columns};

/// Run the merge command: interleave the id column and every language
/// column file back into one table, each column in its own code page.
pub fn run_merge_command(dir: PathBuf, output: PathBuf) {
    let id_spec = ColumnSpec::id();
    let specs = ColumnSpec::standard_set();

    if let Err(e) = merge_columns(&dir, &id_spec, &specs, &output) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    println!("Merged {} into {}", dir.display(), output.display());
}
