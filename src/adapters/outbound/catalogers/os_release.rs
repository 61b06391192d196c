use super::read_source_file;
use crate::ports::outbound::DistroDetector;
use crate::sbom_generation::domain::{LinuxDistribution, Source};
use crate::shared::Result;
use std::collections::HashMap;

/// Release files in lookup order, as described by os-release(5)
const RELEASE_FILES: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// OsReleaseDetector adapter identifying the distribution from os-release
pub struct OsReleaseDetector;

impl OsReleaseDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsReleaseDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DistroDetector for OsReleaseDetector {
    fn detect(&self, source: &Source) -> Result<Option<LinuxDistribution>> {
        for path in RELEASE_FILES {
            if let Some(content) = read_source_file(source, path)? {
                if let Some(distro) = parse_os_release(&content) {
                    return Ok(Some(distro));
                }
                tracing::debug!(path, "release file has no ID field");
            }
        }
        Ok(None)
    }
}

fn parse_os_release(content: &str) -> Option<LinuxDistribution> {
    let values: HashMap<&str, String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), unquote(value.trim())))
        .collect();

    let id = values.get("ID").filter(|id| !id.is_empty())?.clone();
    Some(LinuxDistribution {
        id,
        version_id: values.get("VERSION_ID").cloned(),
        pretty_name: values.get("PRETTY_NAME").cloned(),
    })
}

fn unquote(value: &str) -> String {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        value[1..value.len() - 1].replace("\\\"", "\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{Scope, SourceMetadata, SourceScheme};
    use crate::sbom_generation::services::PathFilter;
    use std::fs;
    use tempfile::TempDir;

    fn source(root: &TempDir, exclusions: Vec<String>) -> Source {
        Source::new(
            SourceMetadata {
                scheme: SourceScheme::Directory,
                user_input: "dir:rootfs".to_string(),
                location: root.path().display().to_string(),
                platform: None,
                scope: Scope::Squashed,
            },
            root.path().to_path_buf(),
            PathFilter::new(exclusions).unwrap(),
        )
    }

    #[test]
    fn test_parse_debian() {
        let distro = parse_os_release(
            "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\n\
             NAME=\"Debian GNU/Linux\"\n\
             VERSION_ID=\"12\"\n\
             # comment\n\
             ID=debian\n",
        )
        .unwrap();
        assert_eq!(distro.id, "debian");
        assert_eq!(distro.version_id.as_deref(), Some("12"));
        assert_eq!(
            distro.pretty_name.as_deref(),
            Some("Debian GNU/Linux 12 (bookworm)")
        );
    }

    #[test]
    fn test_missing_id() {
        assert!(parse_os_release("NAME=Unknown\n").is_none());
        assert!(parse_os_release("ID=\"\"\n").is_none());
    }

    #[test]
    fn test_detect_falls_back_to_usr_lib() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("usr/lib")).unwrap();
        fs::write(
            root.path().join("usr/lib/os-release"),
            "ID=alpine\nVERSION_ID=3.19.1\n",
        )
        .unwrap();

        let distro = OsReleaseDetector::new()
            .detect(&source(&root, vec![]))
            .unwrap()
            .unwrap();
        assert_eq!(distro.id, "alpine");
    }

    #[test]
    fn test_detect_respects_exclusions() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("etc")).unwrap();
        fs::write(root.path().join("etc/os-release"), "ID=alpine\n").unwrap();

        let detected = OsReleaseDetector::new()
            .detect(&source(&root, vec!["/etc".to_string()]))
            .unwrap();
        assert!(detected.is_none());
    }
}
