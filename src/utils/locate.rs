//! Fuzzy file discovery.
//!
//! Finds a file whose name is within a small edit distance of a target name.
//! The launcher uses it to locate the program's executable after an update,
//! tolerating minor naming drift between releases (`MyApp.exe` vs
//! `MyApp2.exe`).
//!
//! # Search Order
//!
//! The walk is depth-first. In every directory all files are checked before
//! any subdirectory is entered, and siblings are visited in file-name order,
//! so the shallowest plausible match wins:
//!
//! ```text
//! root/
//! ├── readme.txt        (1) checked
//! ├── MyApp.exe         (2) checked -> match, search stops
//! └── bin/
//!     └── MyApp.exe     never reached
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Case-sensitive Levenshtein distance between two names.
///
/// Insertions, deletions and substitutions each cost 1. Distances are
/// counted in Unicode scalar values, so `"é"` vs `"e"` is one edit.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Whether `name` is within `threshold` edits of `target`.
#[must_use]
pub fn is_approx_match(name: &str, target: &str, threshold: usize) -> bool {
    edit_distance(name, target) <= threshold
}

/// Recursively searches `root` for a file whose name approximately matches
/// `target_name`.
///
/// Returns the first match in search order, or `None`. Directories that
/// cannot be read (including a missing `root`) are logged and skipped; this
/// function never fails.
///
/// # Examples
///
/// ```rust,no_run
/// use autoupdater_cli::utils::locate::find_file;
/// use std::path::Path;
///
/// if let Some(exe) = find_file(Path::new("app"), "MyApp.exe", 8) {
///     println!("Launching {}", exe.display());
/// }
/// ```
#[must_use]
pub fn find_file(root: &Path, target_name: &str, threshold: usize) -> Option<PathBuf> {
    // Files sort before directories, then by name; walkdir descends into a
    // directory as soon as it is yielded, which gives files-first order.
    let walker = WalkDir::new(root).min_depth(1).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("An error occurred when attempting to find file: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if is_approx_match(&name, target_name, threshold) {
            debug!(
                "Matched '{}' for '{}' (distance {})",
                entry.path().display(),
                target_name,
                edit_distance(&name, target_name)
            );
            return Some(entry.into_path());
        }
    }

    debug!("No file matching '{}' under {}", target_name, root.display());
    None
}
