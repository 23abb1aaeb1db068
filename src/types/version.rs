use serde::Deserialize;

/// Version fields stamped into build and pack outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Full semantic version, e.g. `1.2.4-ci.3`.
    pub sem_ver: String,
    /// Assembly version, e.g. `1.2.4.0`.
    pub assembly_version: String,
    pub file_version: String,
    /// Semantic version with build metadata, e.g. `1.2.4-ci.3+Sha.abc1234`.
    pub informational_version: String,
}

impl VersionInfo {
    /// MSBuild properties carrying the version fields.
    pub fn msbuild_properties(&self) -> Vec<String> {
        vec![
            format!("-p:AssemblyVersion={}", self.assembly_version),
            format!("-p:FileVersion={}", self.file_version),
            format!("-p:InformationalVersion={}", self.informational_version),
            format!("-p:Version={}", self.sem_ver),
        ]
    }
}

/// Subset of the JSON printed by `gitversion /output json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitVersionOutput {
    pub full_sem_ver: String,
    pub assembly_sem_ver: String,
    #[serde(default)]
    pub assembly_sem_file_ver: Option<String>,
    pub informational_version: String,
}

impl From<GitVersionOutput> for VersionInfo {
    fn from(output: GitVersionOutput) -> Self {
        let file_version = output
            .assembly_sem_file_ver
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| output.assembly_sem_ver.clone());
        Self {
            sem_ver: output.full_sem_ver,
            assembly_version: output.assembly_sem_ver,
            file_version,
            informational_version: output.informational_version,
        }
    }
}
