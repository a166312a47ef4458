//! Picks a fresh output directory when the user did not name one.

use std::path::{Path, PathBuf};

/// Returns `base` if it does not exist yet, otherwise the first free `base (N)`.
///
/// Nothing is created; the caller still has to create the directory and must not
/// expect it to stay free if other processes write to the same parent.
pub fn choose_output_dir<P: AsRef<Path>>(base: P) -> PathBuf {
    let base = base.as_ref();
    if !base.exists() {
        return base.to_path_buf();
    }

    let mut n: u32 = 1;
    loop {
        let candidate = PathBuf::from(format!("{} ({n})", base.display()));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
