mod externalize;
mod merge;
mod split;

use clap::{Parser, Subcommand};
use locsmith::backup_tree;
use std::path::PathBuf;

use crate::externalize::run_externalize_command;
use crate::merge::run_merge_command;
use crate::split::run_split_command;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a multi-language table into per-language column files.
    Split {
        /// The table file to split
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the column files are written to
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Code page the source table is read in
        #[arg(short, long, default_value = "windows-1252")]
        encoding: String,
    },

    /// Merge per-language column files back into one table.
    Merge {
        /// Directory holding the id and language column files
        #[arg(short, long)]
        dir: PathBuf,

        /// The merged table file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Externalize literal event text into keys and an export table.
    Externalize {
        /// Root of the event script tree to scan and patch
        #[arg(short, long)]
        events: PathBuf,

        /// Directory of already-published tables (repeatable)
        #[arg(short, long)]
        tables: Vec<PathBuf>,

        /// Directory the export table is written to
        #[arg(short = 'x', long)]
        export: PathBuf,

        /// Table file name to skip while indexing (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Skip the pre-patch backup of the event tree
        #[arg(long)]
        no_backup: bool,

        /// Code page the event files are read and rewritten in
        #[arg(long, default_value = "windows-1252")]
        encoding: String,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Snapshot a directory tree into a numbered sibling backup.
    Backup {
        /// Directory to snapshot
        #[arg(short, long)]
        dir: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    match args.commands {
        Commands::Split {
            input,
            out_dir,
            encoding,
        } => run_split_command(input, out_dir, encoding),
        Commands::Merge { dir, output } => run_merge_command(dir, output),
        Commands::Externalize {
            events,
            tables,
            export,
            exclude,
            no_backup,
            encoding,
            report,
        } => run_externalize_command(events, tables, export, exclude, no_backup, encoding, report),
        Commands::Backup { dir } => match backup_tree(&dir, &dir) {
            Ok(target) => println!("Backed up {} to {}", dir.display(), target.display()),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }
}
