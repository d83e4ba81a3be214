//! Filesystem helpers.

pub mod atomic;

pub(crate) use atomic::replace_file;
pub use atomic::{atomic_write, atomic_write_file};
