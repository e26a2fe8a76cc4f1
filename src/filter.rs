//! Entry classification against attribute and name constraints

use std::io;

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Metadata triple consulted by attribute constraints
#[derive(Debug, Clone, Copy)]
pub struct FileAttrs {
    /// Raw `st_mode` bits (type and permissions)
    pub mode: u32,
    /// Owning user id
    pub uid:  u32,
    /// Owning group id
    pub gid:  u32,
}

/// File types an entry can be constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Directory
    Directory,
    /// Regular file
    Regular,
    /// Symbolic link
    Symlink,
    /// Named pipe
    Fifo,
    /// Unix domain socket
    Socket,
}

impl FileKind {
    /// The `S_IFMT` value identifying this type in `st_mode`
    const fn type_bits(self) -> u32 {
        match self {
            Self::Directory => libc::S_IFDIR as u32,
            Self::Regular => libc::S_IFREG as u32,
            Self::Symlink => libc::S_IFLNK as u32,
            Self::Fifo => libc::S_IFIFO as u32,
            Self::Socket => libc::S_IFSOCK as u32,
        }
    }
}

/// Validating builder for [`EntryFilter`].
///
/// Each constraint is checked as it is added, so a contradictory combination
/// is rejected before any traversal starts.
#[derive(Debug, Default)]
pub struct FilterBuilder {
    mode:        u32,
    mode_mask:   u32,
    owner:       Option<u32>,
    group:       Option<u32>,
    ignore_case: bool,
}

impl FilterBuilder {
    /// Create a builder with no constraints
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the entry to be of the given file type.
    ///
    /// # Errors
    /// Returns [`Error::TypeConflict`] if a different type was already
    /// required. Requiring the same type twice is accepted.
    pub fn file_type(self, kind: FileKind) -> Result<Self> {
        self.merge_mode(libc::S_IFMT as u32, kind.type_bits())
    }

    /// Require the owner-executable permission bit.
    ///
    /// # Errors
    /// Returns [`Error::TypeConflict`] on a contradictory re-use of the bit.
    pub fn executable(self) -> Result<Self> {
        self.merge_mode(libc::S_IXUSR as u32, libc::S_IXUSR as u32)
    }

    /// Require the set-uid permission bit.
    ///
    /// # Errors
    /// Returns [`Error::TypeConflict`] on a contradictory re-use of the bit.
    pub fn setuid(self) -> Result<Self> {
        self.merge_mode(libc::S_ISUID as u32, libc::S_ISUID as u32)
    }

    /// Require the entry to be owned by the given user id
    #[must_use]
    pub fn owner(mut self, uid: u32) -> Self {
        self.owner = Some(uid);
        self
    }

    /// Require the entry to belong to the given group id
    #[must_use]
    pub fn group(mut self, gid: u32) -> Self {
        self.group = Some(gid);
        self
    }

    /// Make the name pattern case-insensitive
    #[must_use]
    pub fn ignore_case(mut self, yes: bool) -> Self {
        self.ignore_case = yes;
        self
    }

    /// Compile the name pattern and freeze the filter.
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] if `pattern` is not a valid regular
    /// expression.
    pub fn build(self, pattern: &str) -> Result<EntryFilter> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(self.ignore_case).build()?;
        Ok(EntryFilter {
            mode: self.mode,
            mode_mask: self.mode_mask,
            owner: self.owner,
            group: self.group,
            pattern,
        })
    }

    /// Fold a mask/value pair into the accumulated mode constraint.
    ///
    /// Claiming already-claimed bits with a different value is a conflict;
    /// re-stating the same value is not.
    fn merge_mode(mut self, mask: u32, value: u32) -> Result<Self> {
        let value = value & mask;
        if self.mode_mask & mask != 0 && (self.mode & mask) != value {
            return Err(Error::TypeConflict);
        }
        self.mode_mask |= mask;
        self.mode = (self.mode & !mask) | value;
        Ok(self)
    }
}

/// Immutable per-entry test over file attributes and the base name.
///
/// Built once before traversal; evaluation never mutates it.
#[derive(Debug)]
pub struct EntryFilter {
    mode:      u32,
    mode_mask: u32,
    owner:     Option<u32>,
    group:     Option<u32>,
    pattern:   Regex,
}

impl EntryFilter {
    /// True when any mode, owner, or group constraint is active.
    ///
    /// With only a name pattern configured the filter never touches entry
    /// metadata, so a plain name search does one readdir per directory and
    /// no stat calls.
    #[must_use]
    pub const fn needs_metadata(&self) -> bool {
        self.mode_mask != 0 || self.owner.is_some() || self.group.is_some()
    }

    /// Evaluate the filter for one entry.
    ///
    /// `attrs` is only invoked when attribute constraints are active. The
    /// attribute check runs before the name check.
    ///
    /// # Errors
    /// Propagates the provider's error when attribute metadata cannot be
    /// retrieved; callers report it and treat the entry as non-matching.
    pub fn matches<F>(&self, name: &str, attrs: F) -> io::Result<bool>
    where
        F: FnOnce() -> io::Result<FileAttrs>,
    {
        if self.needs_metadata() && !self.attrs_match(&attrs()?) {
            return Ok(false);
        }
        Ok(self.pattern.is_match(name))
    }

    fn attrs_match(&self, attrs: &FileAttrs) -> bool {
        self.owner.is_none_or(|uid| attrs.uid == uid)
            && self.group.is_none_or(|gid| attrs.gid == gid)
            && (attrs.mode & self.mode_mask) == self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular(mode: u32) -> FileAttrs {
        FileAttrs { mode: libc::S_IFREG as u32 | mode, uid: 1000, gid: 1000 }
    }

    #[test]
    fn test_name_only_filter_never_stats() {
        let filter = FilterBuilder::new().build(r".*\.txt").unwrap();
        assert!(!filter.needs_metadata());
        assert!(filter.matches("a.txt", || unreachable!()).unwrap());
        assert!(!filter.matches("a.rs", || unreachable!()).unwrap());
    }

    #[test]
    fn test_pattern_is_unanchored() {
        let filter = FilterBuilder::new().build("txt").unwrap();
        assert!(filter.matches("a.txt.bak", || unreachable!()).unwrap());
    }

    #[test]
    fn test_case_sensitivity() {
        let strict = FilterBuilder::new().build("A.TXT").unwrap();
        assert!(!strict.matches("a.txt", || unreachable!()).unwrap());

        let folded = FilterBuilder::new().ignore_case(true).build("A.TXT").unwrap();
        assert!(folded.matches("a.txt", || unreachable!()).unwrap());
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        assert!(matches!(FilterBuilder::new().build("[oops"), Err(Error::Pattern(_))));
    }

    #[test]
    fn test_type_constraint_selects_on_mode() {
        let filter = FilterBuilder::new().file_type(FileKind::Regular).unwrap().build(".*").unwrap();
        assert!(filter.matches("f", || Ok(regular(0o644))).unwrap());

        let dir = FileAttrs { mode: libc::S_IFDIR as u32 | 0o755, uid: 1000, gid: 1000 };
        assert!(!filter.matches("d", || Ok(dir)).unwrap());
    }

    #[test]
    fn test_type_and_permission_constraints_combine() {
        let filter = FilterBuilder::new()
            .file_type(FileKind::Regular)
            .unwrap()
            .executable()
            .unwrap()
            .build(".*")
            .unwrap();

        assert!(filter.matches("f", || Ok(regular(0o755))).unwrap());
        assert!(!filter.matches("f", || Ok(regular(0o644))).unwrap());
    }

    #[test]
    fn test_setuid_constraint() {
        let filter = FilterBuilder::new().setuid().unwrap().build(".*").unwrap();
        assert!(filter.matches("f", || Ok(regular(0o4755))).unwrap());
        assert!(!filter.matches("f", || Ok(regular(0o755))).unwrap());
    }

    #[test]
    fn test_conflicting_types_are_rejected() {
        let builder = FilterBuilder::new().file_type(FileKind::Directory).unwrap();
        assert!(matches!(builder.file_type(FileKind::Regular), Err(Error::TypeConflict)));
    }

    #[test]
    fn test_repeated_identical_type_is_accepted() {
        let builder = FilterBuilder::new().file_type(FileKind::Directory).unwrap();
        assert!(builder.file_type(FileKind::Directory).is_ok());
    }

    #[test]
    fn test_owner_and_group_equality() {
        let filter = FilterBuilder::new().owner(1000).group(1000).build(".*").unwrap();
        assert!(filter.matches("f", || Ok(regular(0o644))).unwrap());

        let other = FileAttrs { uid: 1001, ..regular(0o644) };
        assert!(!filter.matches("f", || Ok(other)).unwrap());

        let other = FileAttrs { gid: 1001, ..regular(0o644) };
        assert!(!filter.matches("f", || Ok(other)).unwrap());
    }

    #[test]
    fn test_metadata_failure_propagates() {
        let filter = FilterBuilder::new().owner(1000).build(".*").unwrap();
        let denied = || Err(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(filter.matches("f", denied).is_err());
    }
}
