use {
    anyhow::{anyhow, Result},
    std::{
        path::{Path, PathBuf},
        process::Command,
    },
};

pub fn get_git_root_path() -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| anyhow!("failed to get git root path, error: {e}"))?;
    if !output.status.success() {
        return Err(anyhow!(
            "failed to get git root path: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

/// Output of `git describe --tags --long`, e.g. `v1.2.3-4-gabc1234`.
pub fn describe(root: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--long"])
        .current_dir(root)
        .output()
        .map_err(|e| anyhow!("failed to run `git describe`, error: {e}"))?;
    if !output.status.success() {
        return Err(anyhow!(
            "`git describe` failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
pub mod testing {
    use super::*;

    pub fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(["-c", "user.name=packrun", "-c", "user.email=packrun@localhost"])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {args:?}: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{testing::git, *},
        pretty_assertions::assert_eq,
        serial_test::serial,
        std::fs,
    };

    #[test]
    #[serial]
    fn test_get_git_root_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        scopeguard::defer! {
            std::env::set_current_dir(&original_dir).unwrap();
        }

        std::env::set_current_dir(temp_dir.path()).unwrap();
        Command::new("git").args(["init"]).output().unwrap();

        let root_path = get_git_root_path().unwrap();

        let canonicalized_root_path = fs::canonicalize(root_path).unwrap();
        let canonicalized_temp_dir_path = fs::canonicalize(temp_dir.path()).unwrap();

        assert_eq!(canonicalized_root_path, canonicalized_temp_dir_path);
    }

    #[test]
    fn test_describe() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        git(root, &["init"]);
        git(root, &["commit", "--allow-empty", "-m", "first"]);

        assert!(describe(root).is_err());

        git(root, &["tag", "v1.2.3"]);
        git(root, &["commit", "--allow-empty", "-m", "second"]);

        let described = describe(root).unwrap();
        assert!(described.starts_with("v1.2.3-1-g"), "{described}");
    }
}
