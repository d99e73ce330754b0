use std::env;
use std::fs;
use std::path::{Path, PathBuf};

// @module: Lightweight .env loading so startup can rely on env vars

/// How many parent directories to inspect when looking for a `.env` file
const ENV_SEARCH_DEPTH: usize = 5;

/// Walk up from `start` looking for a `.env` file, bounded by
/// [`ENV_SEARCH_DEPTH`] levels
pub fn find_env_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    for _ in 0..ENV_SEARCH_DEPTH {
        let candidate = current.join(".env");
        if candidate.is_file() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }
    None
}

/// Parse a `.env` file and export its variables into the process
/// environment. Existing variables are never overridden, comments and
/// malformed lines are skipped.
pub fn load_env_file(path: &Path) -> std::io::Result<()> {
    let content = fs::read_to_string(path)?;
    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() || env::var_os(key).is_some() {
            continue;
        }
        let value = value
            .trim()
            .trim_matches('"')
            .trim_matches('\'');
        // SAFETY: runs during startup, before anything reads these variables
        unsafe { env::set_var(key, value) };
    }
    Ok(())
}

/// Best-effort automatic `.env` loading from the current directory upward.
/// Absence of a `.env` file is not an error.
pub fn load_env_auto() {
    let Ok(cwd) = env::current_dir() else {
        return;
    };
    if let Some(path) = find_env_file(&cwd) {
        let _ = load_env_file(&path);
    }
}
