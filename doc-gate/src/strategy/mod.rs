//! Validation source strategies.
//!
//! Only the filesystem strategy exists. The per-document check in `check` is
//! source-agnostic, so another source only needs to produce `(path, content)`
//! pairs.

pub mod fs;
