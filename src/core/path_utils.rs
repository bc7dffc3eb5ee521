/*
 * Path helpers: locating the application's local configuration directory
 * (where the remembered dialog directory and log file live), and working out
 * which directory to remember from a selected path string. Selected paths
 * come back from the shell in Windows form, so separators are handled
 * explicitly rather than through `std::path`, which would treat `\` as an
 * ordinary character on other hosts.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Returns the local (non-roaming) configuration directory for `app_name`,
 * creating it if needed. `None` if the platform offers no such directory or
 * it cannot be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if !config_path.exists() {
        if let Err(e) = fs::create_dir_all(config_path) {
            log::error!(
                "PathUtils: Failed to create app config directory {:?}: {}",
                config_path,
                e
            );
            return None;
        }
        log::debug!("PathUtils: Created app config directory: {:?}", config_path);
    }
    Some(config_path.to_path_buf())
}

fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

/*
 * The directory containing `path`, keeping the root separator for paths
 * directly under a drive or share root ("C:\a.txt" -> "C:\"). `None` when
 * the path has no directory part.
 */
pub fn parent_directory(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches(is_separator);
    let separator_index = trimmed.rfind(is_separator)?;
    let parent = &trimmed[..separator_index];
    if parent.is_empty() {
        return Some(trimmed[..=separator_index].to_string());
    }
    if parent.ends_with(':') {
        return Some(trimmed[..=separator_index].to_string());
    }
    Some(parent.to_string())
}

/// The directory to start in next time, given what the user just picked.
pub fn directory_to_remember(picked_folder: bool, selected_path: &str) -> Option<String> {
    if picked_folder {
        let trimmed = selected_path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    } else {
        parent_directory(selected_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_base_app_config_local_dir_creates_and_reuses() {
        // Arrange
        let unique_app_name = format!("TestApp_ShellDialogs_{}", rand::random::<u128>());

        // Act
        let first = get_base_app_config_local_dir(&unique_app_name);
        let second = get_base_app_config_local_dir(&unique_app_name);

        // Assert
        let Some(path) = first else {
            // Headless CI hosts may have no home directory; nothing to check.
            return;
        };
        assert!(path.is_dir(), "Directory should exist at {:?}", path);
        assert_eq!(second.as_ref(), Some(&path));
        assert!(
            path.to_string_lossy()
                .to_lowercase()
                .contains(&unique_app_name.to_lowercase())
        );

        if let Err(e) = fs::remove_dir_all(&path) {
            eprintln!("Test cleanup error (dir: {}): {}", path.display(), e);
        }
    }

    #[test]
    fn test_parent_directory_windows_paths() {
        assert_eq!(
            parent_directory(r"C:\Users\me\notes.txt").as_deref(),
            Some(r"C:\Users\me")
        );
        assert_eq!(parent_directory(r"C:\notes.txt").as_deref(), Some(r"C:\"));
        assert_eq!(
            parent_directory(r"\\server\share\file.bin").as_deref(),
            Some(r"\\server\share")
        );
        assert_eq!(parent_directory(r"C:\Users\me\").as_deref(), Some(r"C:\Users"));
    }

    #[test]
    fn test_parent_directory_without_separator() {
        assert_eq!(parent_directory("notes.txt"), None);
        assert_eq!(parent_directory(""), None);
    }

    #[test]
    fn test_parent_directory_forward_slashes() {
        assert_eq!(parent_directory("/home/me/a.txt").as_deref(), Some("/home/me"));
        assert_eq!(parent_directory("/a.txt").as_deref(), Some("/"));
    }

    #[test]
    fn test_directory_to_remember() {
        assert_eq!(
            directory_to_remember(true, r"D:\Projects").as_deref(),
            Some(r"D:\Projects")
        );
        assert_eq!(
            directory_to_remember(false, r"D:\Projects\a.rs").as_deref(),
            Some(r"D:\Projects")
        );
        assert_eq!(directory_to_remember(true, "  "), None);
    }
}
