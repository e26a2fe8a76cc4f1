#![deny(missing_debug_implementations, missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
//! `DirSift` - Minimal recursive file finder with attribute and name filters.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::Parser;
use clap_cargo::style::CLAP_STYLING;
use dirsift::error::{Error, Result};
use dirsift::filter::{EntryFilter, FileKind, FilterBuilder};
use dirsift::walker::Walker;

/// CLI arguments for `DirSift`
#[derive(Parser, Debug)]
#[command(author, version, about, styles = CLAP_STYLING)]
struct Cli {
    /// Match directories
    #[arg(short = 'd', long)]
    directory: bool,

    /// Match regular files
    #[arg(short = 'f', long)]
    file: bool,

    /// Match symbolic links
    #[arg(short = 'l', long)]
    symlink: bool,

    /// Match named pipes
    #[arg(short = 'p', long)]
    pipe: bool,

    /// Match sockets
    #[arg(short = 's', long)]
    socket: bool,

    /// Match entries with the owner-executable bit set
    #[arg(short = 'e', long)]
    executable: bool,

    /// Match entries with the set-uid bit set
    #[arg(short = 'x', long)]
    setuid: bool,

    /// Case-insensitive pattern matching
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Include hidden entries
    #[arg(short = 'H', long)]
    hidden: bool,

    /// Descend at most DEPTH directory levels (unlimited if absent)
    #[arg(short = 'r', long, value_name = "DEPTH")]
    max_depth: Option<usize>,

    /// Match entries owned by this user
    #[arg(short = 'u', long, value_name = "USER")]
    owner: Option<String>,

    /// Match entries belonging to this group
    #[arg(short = 'g', long, value_name = "GROUP")]
    group: Option<String>,

    /// Regular expression applied to entry base names
    #[arg(default_value = ".*")]
    pattern: String,

    /// Directory to search from (default: current directory)
    dir: Option<String>,
}

/// Resolve a user name to its uid
fn lookup_user(name: &str) -> Result<u32> {
    uzers::get_user_by_name(name).map(|user| user.uid()).ok_or_else(|| Error::unknown_user(name))
}

/// Resolve a group name to its gid
fn lookup_group(name: &str) -> Result<u32> {
    uzers::get_group_by_name(name).map(|group| group.gid()).ok_or_else(|| Error::unknown_group(name))
}

/// Turn the parsed flags into a validated filter
fn build_filter(cli: &Cli) -> Result<EntryFilter> {
    let mut builder = FilterBuilder::new().ignore_case(cli.ignore_case);
    if cli.directory {
        builder = builder.file_type(FileKind::Directory)?;
    }
    if cli.file {
        builder = builder.file_type(FileKind::Regular)?;
    }
    if cli.symlink {
        builder = builder.file_type(FileKind::Symlink)?;
    }
    if cli.pipe {
        builder = builder.file_type(FileKind::Fifo)?;
    }
    if cli.socket {
        builder = builder.file_type(FileKind::Socket)?;
    }
    if cli.executable {
        builder = builder.executable()?;
    }
    if cli.setuid {
        builder = builder.setuid()?;
    }
    if let Some(name) = &cli.owner {
        builder = builder.owner(lookup_user(name)?);
    }
    if let Some(name) = &cli.group {
        builder = builder.group(lookup_group(name)?);
    }
    builder.build(&cli.pattern)
}

/// Validate the start directory and stream matches to stdout
fn run(cli: &Cli) -> Result<()> {
    let filter = build_filter(cli)?;
    let start = cli.dir.as_deref().unwrap_or("");

    if !start.is_empty() {
        let root = Path::new(start);
        if !root.exists() {
            return Err(Error::start_dir(&format!("directory not found: {start}")));
        }
        if !root.is_dir() {
            return Err(Error::start_dir(&format!("not a directory: {start}")));
        }
    }

    let walker = Walker::new(filter, cli.hidden, cli.max_depth);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    walker.run(start, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
