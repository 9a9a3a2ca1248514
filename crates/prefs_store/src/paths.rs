use std::path::{Path, PathBuf};

pub const PREFS_DIR: &str = ".runner_console";
pub const PREFS_FILE: &str = "prefs.json";

#[must_use]
pub fn prefs_root(base: &Path) -> PathBuf {
    base.join(PREFS_DIR)
}

#[must_use]
pub fn prefs_file(base: &Path) -> PathBuf {
    prefs_root(base).join(PREFS_FILE)
}
