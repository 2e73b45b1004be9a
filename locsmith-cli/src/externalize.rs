use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use locsmith::{CodePage, ExternalizeOptions, externalize};

/// Run the externalize command: index published keys, assign keys to the
/// event tree's literal text, back up, patch, and export.
pub fn run_externalize_command(
    events: PathBuf,
    tables: Vec<PathBuf>,
    export: PathBuf,
    exclude: Vec<String>,
    no_backup: bool,
    encoding: String,
    report_path: Option<PathBuf>,
) {
    let code_page = match CodePage::for_label(&encoding) {
        Ok(code_page) => code_page,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut options = ExternalizeOptions::new(events, export)
        .with_exclusions(exclude)
        .with_backup(!no_backup)
        .with_code_page(code_page);
    for table_dir in tables {
        options = options.with_table_dir(table_dir);
    }

    // Patching a large tree takes a while; show progress like any other
    // long-running command.
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap(),
    );
    progress_bar.set_message("Externalizing event text...");

    let report = match externalize(&options) {
        Ok(report) => report,
        Err(e) => {
            progress_bar.finish_with_message("❌ Externalization failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    progress_bar.finish_with_message(format!(
        "✅ Assigned {} keys across {} events; patched {} of {} files",
        report.table.len(),
        report.records,
        report.patch.files_changed,
        report.patch.files_visited
    ));

    if let Some(backup) = &report.backup {
        println!("Backup written to {}", backup.display());
    }
    println!("Keys file:  {}", report.export.keys.display());
    println!("Texts file: {}", report.export.texts.display());

    if let Some(path) = report_path {
        if let Err(e) = report.cache_to_file(&path) {
            eprintln!("Error writing report to {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("Report written to {}", path.display());
    }
}
