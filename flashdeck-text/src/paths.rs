use directories::ProjectDirs;
use flashdeck_core::CoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub fn data_root() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("com", "flashdeck", "Flashdeck") {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

pub fn users_root(root: &Path) -> PathBuf {
    root.join("users")
}

pub fn user_dir(root: &Path, user: &str) -> Result<PathBuf, CoreError> {
    crate::validate_file_stem(user)?;
    Ok(users_root(root).join(user))
}

/// Creates the deck directory for `user`. Succeeds if it already exists.
pub fn create_user(root: &Path, user: &str) -> Result<PathBuf, CoreError> {
    let dir = user_dir(root, user)?;
    fs::create_dir_all(&dir)
        .map_err(|e| CoreError::StorageUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

pub fn list_users(root: &Path) -> Result<Vec<String>, CoreError> {
    let dir = users_root(root);
    let entries = match fs::read_dir(&dir) {
        Ok(e) => e,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(_) => return Err(CoreError::Storage("read users dir")),
    };
    let mut users: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| !n.starts_with('.'))
        .collect();
    users.sort();
    Ok(users)
}
