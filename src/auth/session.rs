use std::fs;
use std::path::Path;

use super::Identity;

/// Restore the session saved by a previous run, if any. A missing or
/// unreadable file is simply no session.
pub fn load_session(path: &Path) -> Option<Identity> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

pub fn save_session(path: &Path, session: &Identity) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let toml_string = toml::to_string_pretty(session).unwrap_or_else(|_| String::new());
    fs::write(path, toml_string)
}

pub fn clear_session(path: &Path) {
    let _ = fs::remove_file(path);
}
