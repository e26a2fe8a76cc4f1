//! `DirSift` - Minimal recursive file finder with attribute and name filters.

#![deny(missing_debug_implementations, missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod error;
pub mod filter;
pub mod path;
pub mod walker;
