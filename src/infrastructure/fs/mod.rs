//! Filesystem infrastructure module
//!
//! Recursive directory copy plus the small file helpers that go with it.

mod copy;
mod file;

pub use copy::{copy_directory, copy_file, copy_symlink, EntryKind, Ownership, DIR_MODE};
pub use file::{
    append, append_template, create_if_not_exists, exists, get_directories, is_dir, write_template,
};
