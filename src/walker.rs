//! Depth-first directory traversal

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::filter::{EntryFilter, FileAttrs};
use crate::path::PathStack;

/// Recursive directory walker.
///
/// Descends depth-first from a start directory, streaming every entry that
/// passes the filter to the output sink in discovery order. Each entry is
/// resolved through its full path rather than the process working directory,
/// so the walk leaves no process-global state behind.
#[derive(Debug)]
pub struct Walker {
    filter:         EntryFilter,
    include_hidden: bool,
    max_depth:      Option<usize>,
}

impl Walker {
    /// Create a walker.
    ///
    /// `max_depth` is the number of directory levels to descend below the
    /// start directory; `None` means unlimited, `Some(0)` stays in the start
    /// directory itself.
    #[must_use]
    pub const fn new(filter: EntryFilter, include_hidden: bool, max_depth: Option<usize>) -> Self {
        Self { filter, include_hidden, max_depth }
    }

    /// Walk the tree rooted at `start` and write matches to `out`.
    ///
    /// An empty `start` means the current directory. Matches are written as
    /// `{accumulated prefix}{base name}`, one per line, where the prefix is
    /// the normalized, separator-terminated form of `start`.
    ///
    /// # Errors
    /// Returns an error if `start` exceeds the path buffer or if writing to
    /// `out` fails. Unreadable subtrees and failed metadata lookups are
    /// reported or skipped, never fatal.
    pub fn run<W: Write>(&self, start: &str, out: &mut W) -> Result<()> {
        let mut prefix = PathStack::from_start(start)?;
        let root = if prefix.as_str().is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(prefix.as_str())
        };
        self.walk(&root, self.max_depth, &mut prefix, out)?;
        Ok(())
    }

    /// One directory level: list, classify, emit, and descend.
    fn walk<W: Write>(
        &self,
        dir: &Path,
        depth: Option<usize>,
        prefix: &mut PathStack,
        out: &mut W,
    ) -> io::Result<()> {
        // An unreadable directory is treated as empty; the walk goes on with
        // the remaining tree.
        let Ok(entries) = fs::read_dir(dir) else {
            return Ok(());
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();

            // read_dir never yields `.` or `..`
            if !self.include_hidden && name.starts_with('.') {
                continue;
            }

            let attrs = || {
                entry
                    .metadata()
                    .map(|meta| FileAttrs { mode: meta.mode(), uid: meta.uid(), gid: meta.gid() })
            };
            match self.filter.matches(&name, attrs) {
                Ok(true) => writeln!(out, "{}{name}", prefix.as_str())?,
                Ok(false) => {},
                Err(err) => eprintln!("{}{name}: {err}", prefix.as_str()),
            }

            if depth != Some(0) && entry.file_type().is_ok_and(|kind| kind.is_dir()) {
                match prefix.push(&name) {
                    Ok(()) => {
                        self.walk(&entry.path(), depth.map(|left| left - 1), prefix, out)?;
                        prefix.pop();
                    },
                    Err(err) => eprintln!("{}{name}: {err}", prefix.as_str()),
                }
            }
        }
        Ok(())
    }
}
