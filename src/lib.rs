//! Guarded filesystem access and the connectivity schema harness.
//!
//! [`security`] admits caller-supplied paths only when they lie strictly
//! below a directory listed in `FLOW_ALLOWED_PATHS`; [`guarded_fs`] performs
//! size-capped reads and parent directory creation on admitted paths.
//! [`harness`] validates the JSON fixtures under `spec/connectivity` against
//! their declared schemas. The two halves share nothing but the error,
//! config and logging modules.

pub mod config;
pub mod errors;
pub mod guarded_fs;
pub mod harness;
pub mod logging;
pub mod security;

pub use config::{get_allowed_paths, ALLOWED_PATHS_ENV};
pub use errors::{GuardError, GuardResult, HarnessError, HarnessResult};
pub use guarded_fs::{ensure_parent_dir_exists, read_file_limited, FileContents, ReadEncoding, MAX_FILE_SIZE};
pub use security::validate_and_resolve_path;
