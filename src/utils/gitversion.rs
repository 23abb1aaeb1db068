use {
    crate::types::version::{GitVersionOutput, VersionInfo},
    anyhow::{anyhow, Context, Result},
    log::{debug, warn},
    semver::{Prerelease, Version},
    std::{io::ErrorKind, path::Path, process::Command},
};

pub const DEFAULT_GITVERSION: &str = "gitversion";

/// Computes the version fields for the repository at `root`.
///
/// Asks `tool` first. Falls back to `git describe` only when `tool` is not
/// installed; any other failure of `tool` is an error.
pub fn detect_version(root: &Path, tool: &str) -> Result<VersionInfo> {
    match Command::new(tool)
        .args(["/output", "json"])
        .current_dir(root)
        .output()
    {
        Ok(output) => {
            if !output.status.success() {
                return Err(anyhow!(
                    "`{tool}` exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stdout).trim()
                ));
            }
            parse_gitversion_json(&output.stdout)
                .with_context(|| format!("failed to read `{tool}` output"))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("`{tool}` not found, deriving version from `git describe`");
            let described = super::git::describe(root)?;
            from_describe(&described)
        }
        Err(e) => Err(anyhow!("failed to run `{tool}`, error: {e}")),
    }
}

pub fn parse_gitversion_json(json: &[u8]) -> Result<VersionInfo> {
    let output: GitVersionOutput = serde_json::from_slice(json)?;
    Ok(output.into())
}

/// Derives version fields from `<tag>-<commits>-g<sha>`.
///
/// A commit that is not tagged gets the next patch version with a
/// `ci.<commits>` prerelease.
pub fn from_describe(described: &str) -> Result<VersionInfo> {
    let malformed = || anyhow!("unexpected `git describe` output: {described}");

    let (rest, sha) = described.rsplit_once("-g").ok_or_else(malformed)?;
    let (tag, commits) = rest.rsplit_once('-').ok_or_else(malformed)?;
    let commits = commits.parse::<u64>().map_err(|_| malformed())?;

    let mut version = Version::parse(tag.trim_start_matches('v'))
        .with_context(|| format!("tag `{tag}` is not a semantic version"))?;
    debug!("described {described} as {version} plus {commits} commit(s)");

    if commits > 0 {
        if version.pre.is_empty() {
            version.patch = version.patch.saturating_add(1);
            version.pre = Prerelease::new(&format!("ci.{commits}"))?;
        } else {
            version.pre = Prerelease::new(&format!("{}.ci.{commits}", version.pre))?;
        }
    }
    version.build = semver::BuildMetadata::EMPTY;

    let assembly_version = format!("{}.{}.{}.0", version.major, version.minor, version.patch);
    Ok(VersionInfo {
        sem_ver: version.to_string(),
        file_version: assembly_version.clone(),
        assembly_version,
        informational_version: format!("{version}+Sha.{sha}"),
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::utils::git::testing::git,
        pretty_assertions::assert_eq,
    };

    #[test]
    fn test_parse_gitversion_json() {
        let json = br#"{
            "Major": 1,
            "FullSemVer": "1.2.4-beta.3",
            "AssemblySemVer": "1.2.0.0",
            "AssemblySemFileVer": "1.2.4.0",
            "InformationalVersion": "1.2.4-beta.3+Branch.main.Sha.abc"
        }"#;
        assert_eq!(
            parse_gitversion_json(json).unwrap(),
            VersionInfo {
                sem_ver: "1.2.4-beta.3".to_string(),
                assembly_version: "1.2.0.0".to_string(),
                file_version: "1.2.4.0".to_string(),
                informational_version: "1.2.4-beta.3+Branch.main.Sha.abc".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_gitversion_json_without_file_version() {
        let json = br#"{
            "FullSemVer": "0.1.0",
            "AssemblySemVer": "0.1.0.0",
            "InformationalVersion": "0.1.0+Sha.abc"
        }"#;
        let version = parse_gitversion_json(json).unwrap();
        assert_eq!(version.file_version, "0.1.0.0");

        assert!(parse_gitversion_json(b"{\"FullSemVer\": \"0.1.0\"}").is_err());
    }

    #[test]
    fn test_from_describe_on_tag() {
        assert_eq!(
            from_describe("v1.2.3-0-gabc1234").unwrap(),
            VersionInfo {
                sem_ver: "1.2.3".to_string(),
                assembly_version: "1.2.3.0".to_string(),
                file_version: "1.2.3.0".to_string(),
                informational_version: "1.2.3+Sha.abc1234".to_string(),
            }
        );
    }

    #[test]
    fn test_from_describe_after_tag() {
        let version = from_describe("1.2.3-4-gabc1234").unwrap();
        assert_eq!(version.sem_ver, "1.2.4-ci.4");
        assert_eq!(version.assembly_version, "1.2.4.0");
        assert_eq!(version.informational_version, "1.2.4-ci.4+Sha.abc1234");

        let version = from_describe("v2.0.0-rc.1-2-gdef5678").unwrap();
        assert_eq!(version.sem_ver, "2.0.0-rc.1.ci.2");
        assert_eq!(version.assembly_version, "2.0.0.0");
    }

    #[test]
    fn test_from_describe_malformed() {
        assert_eq!(
            from_describe("abc1234").unwrap_err().to_string(),
            "unexpected `git describe` output: abc1234"
        );
        assert_eq!(
            from_describe("release-x-gabc").unwrap_err().to_string(),
            "unexpected `git describe` output: release-x-gabc"
        );
        assert_eq!(
            from_describe("release-0-gabc").unwrap_err().to_string(),
            "tag `release` is not a semantic version"
        );
    }

    #[test]
    fn test_detect_version_falls_back_to_describe() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        git(root, &["init"]);
        git(root, &["commit", "--allow-empty", "-m", "first"]);
        git(root, &["tag", "v0.3.0"]);

        let version = detect_version(root, "packrun-no-such-gitversion").unwrap();
        assert_eq!(version.sem_ver, "0.3.0");
        assert_eq!(version.assembly_version, "0.3.0.0");
    }

    #[test]
    fn test_detect_version_tool_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        // `git /output json` exits non-zero, which must not trigger the fallback
        let err = detect_version(temp_dir.path(), "git").unwrap_err();
        assert!(err.to_string().starts_with("`git` exited with"), "{err}");
    }
}
