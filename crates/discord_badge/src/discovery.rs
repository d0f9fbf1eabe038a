//! Locates the Discord executable beneath the install directory.
//!
//! Discord keeps each installed version in its own `app-<version>` child
//! directory; the overlay wants the newest one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Prefix of versioned install entries, e.g. `app-1.0.9`.
const VERSION_PREFIX: &str = "app-";

/// Executable expected inside the selected entry.
const EXECUTABLE: &str = "Discord.exe";

/// Scans the immediate children of `install_dir` for `app-` entries and
/// returns the absolute path of the executable under the greatest matching
/// name.
///
/// Names are compared as plain strings, not as version numbers, so
/// `app-1.0.9` is selected over `app-1.0.10`. The executable itself is not
/// required to exist at resolution time.
pub fn resolve_executable(install_dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(install_dir)
        .with_context(|| format!("failed to read {}", install_dir.display()))?;

    let mut selected: Option<String> = None;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read {}", install_dir.display()))?;
        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(_) => continue,
        };
        if !name.starts_with(VERSION_PREFIX) {
            continue;
        }
        debug!(entry = %name, "Versioned entry found");
        if selected.as_ref().map_or(true, |current| *current < name) {
            selected = Some(name);
        }
    }

    let selected = match selected {
        Some(name) => name,
        None => anyhow::bail!(
            "no {VERSION_PREFIX} entry under {}",
            install_dir.display()
        ),
    };

    let exe = install_dir.join(selected).join(EXECUTABLE);
    std::path::absolute(&exe).with_context(|| format!("failed to absolutize {}", exe.display()))
}
