//! Filesystem operations on paths already admitted by
//! [`validate_and_resolve_path`](crate::security::validate_and_resolve_path).
//!
//! Nothing here checks containment again; callers pass guarded paths.

pub mod dirs;
pub mod read;

pub use dirs::ensure_parent_dir_exists;
pub use read::{read_file_limited, read_text_limited, FileContents, ReadEncoding, MAX_FILE_SIZE};
