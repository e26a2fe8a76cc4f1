//! Bounded display-prefix tracking for the walker

use arrayvec::ArrayString;

use crate::error::{Error, Result};

/// Maximum accumulated path length in bytes
pub const MAX_PATH_LENGTH: usize = 4096;

const _: () = assert!(MAX_PATH_LENGTH > 0);

/// Separator-terminated path of the directory the walker is logically inside,
/// relative to where the search started.
///
/// The buffer is empty while the walker is at the start directory and grows by
/// one `name/` suffix per descent. It is a display prefix only; the walker
/// resolves real filesystem positions separately.
///
/// # Design
/// - Fixed capacity (`MAX_PATH_LENGTH`); overflow is an error, never silent
/// - Callers only see `push`/`pop`/`as_str`, no offsets or cursors
#[derive(Debug, Clone, Default)]
pub struct PathStack {
    buf: ArrayString<MAX_PATH_LENGTH>,
}

impl PathStack {
    /// Create an empty stack, denoting the start directory itself
    #[must_use]
    pub fn new() -> Self {
        Self { buf: ArrayString::new() }
    }

    /// Build the initial stack from a user-supplied start string.
    ///
    /// An empty string means "current directory" and yields an empty stack.
    /// Anything else is terminated with a separator and normalized once:
    /// `./` segments are dropped and separator runs collapsed, so `./a//b`
    /// displays as `a/b/`. All other segments, `..` included, are kept in
    /// order. Normalizing an already-normalized string changes nothing.
    ///
    /// # Errors
    /// Returns [`Error::PathTooLong`] if `start` does not fit the buffer.
    pub fn from_start(start: &str) -> Result<Self> {
        if start.is_empty() {
            return Ok(Self::new());
        }

        let mut raw = ArrayString::<MAX_PATH_LENGTH>::new();
        raw.try_push_str(start).map_err(|_| Error::PathTooLong)?;
        if !raw.ends_with('/') {
            raw.try_push('/').map_err(|_| Error::PathTooLong)?;
        }
        Ok(Self { buf: Self::normalized(&raw) })
    }

    /// Append one directory name and a trailing separator.
    ///
    /// `name` must be a single path segment without separators.
    ///
    /// # Errors
    /// Returns [`Error::PathTooLong`] if the segment does not fit; the buffer
    /// is left unchanged in that case.
    pub fn push(&mut self, name: &str) -> Result<()> {
        debug_assert!(!name.contains('/'), "push takes a single segment");

        if self.buf.remaining_capacity() < name.len() + 1 {
            return Err(Error::PathTooLong);
        }
        let _ = self.buf.try_push_str(name);
        let _ = self.buf.try_push('/');
        Ok(())
    }

    /// Remove the most recently pushed segment, restoring the buffer to its
    /// exact pre-push content.
    ///
    /// Calling `pop` without a matching `push` is a logic error; the walker
    /// pairs every descent with exactly one `pop`.
    pub fn pop(&mut self) {
        debug_assert!(self.buf.ends_with('/'), "pop without a matching push");

        let trimmed = &self.buf[..self.buf.len() - 1];
        let keep = trimmed.rfind('/').map_or(0, |at| at + 1);
        self.buf.truncate(keep);
    }

    /// The current display prefix
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Drop `./` segments at the start or after a separator and collapse
    /// separator runs. Only removes bytes, so the result always fits.
    fn normalized(raw: &str) -> ArrayString<MAX_PATH_LENGTH> {
        let mut out = ArrayString::new();
        let mut prev: Option<char> = None;
        let mut rest = raw.chars().peekable();

        while let Some(c) = rest.next() {
            if c == '/' && prev == Some('/') {
                continue;
            }
            if c == '.' && matches!(prev, None | Some('/')) && rest.peek() == Some(&'/') {
                rest.next();
                prev = Some('/');
                continue;
            }
            let _ = out.try_push(c);
            prev = Some(c);
        }
        out
    }
}
