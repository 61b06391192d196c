use super::{paragraphs, read_source_file};
use crate::ports::outbound::{CatalogResult, Cataloger};
use crate::sbom_generation::domain::{
    ArtifactId, Package, PackageType, Relationship, RelationshipKind, Source,
};
use crate::shared::Result;
use anyhow::Context;
use std::collections::HashMap;

const STATUS_FILE: &str = "/var/lib/dpkg/status";
/// Distroless images ship one status file per package here instead
const STATUS_DIR: &str = "/var/lib/dpkg/status.d";

/// DpkgCataloger adapter for Debian-based root filesystems
pub struct DpkgCataloger;

impl DpkgCataloger {
    pub fn new() -> Self {
        Self
    }

    fn status_files(source: &Source) -> Vec<String> {
        let mut files = vec![STATUS_FILE.to_string()];
        let Some(dir) = source.resolve(STATUS_DIR) else {
            return files;
        };
        let Ok(entries) = std::fs::read_dir(dir) else {
            return files;
        };

        let mut extra: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.ends_with(".md5sums"))
            .map(|name| format!("{}/{}", STATUS_DIR, name))
            .collect();
        extra.sort();
        files.extend(extra);
        files
    }
}

impl Default for DpkgCataloger {
    fn default() -> Self {
        Self::new()
    }
}

struct DpkgEntry {
    package: Package,
    depends: Vec<String>,
}

impl Cataloger for DpkgCataloger {
    fn name(&self) -> &str {
        "dpkg-db-cataloger"
    }

    fn catalog(&self, source: &Source) -> Result<CatalogResult> {
        let mut entries = Vec::new();
        for path in Self::status_files(source) {
            if let Some(content) = read_source_file(source, &path)? {
                entries.extend(
                    parse_status(&content, &path)
                        .with_context(|| format!("Failed to parse {}", path))?,
                );
            }
        }

        let by_name: HashMap<&str, ArtifactId> = entries
            .iter()
            .map(|e| (e.package.name(), e.package.id()))
            .collect();

        let mut relationships = Vec::new();
        for entry in &entries {
            relationships.push(Relationship::new(
                entry.package.id(),
                ArtifactId::file(entry.package.location()),
                RelationshipKind::EvidentBy,
            ));
            for dependency in &entry.depends {
                if let Some(dependency_id) = by_name.get(dependency.as_str()) {
                    relationships.push(Relationship::new(
                        dependency_id.clone(),
                        entry.package.id(),
                        RelationshipKind::DependencyOf,
                    ));
                }
            }
        }

        let packages = entries.into_iter().map(|e| e.package).collect();
        Ok((packages, relationships))
    }
}

fn parse_status(content: &str, location: &str) -> Result<Vec<DpkgEntry>> {
    let mut entries = Vec::new();

    for record in paragraphs(content) {
        let fields = parse_fields(&record);
        let (Some(name), Some(version)) = (fields.get("Package"), fields.get("Version")) else {
            continue;
        };
        // Removed packages keep their conffiles registered
        if fields
            .get("Status")
            .is_some_and(|status| !status.ends_with(" installed"))
        {
            continue;
        }

        let mut depends = Vec::new();
        for key in ["Pre-Depends", "Depends"] {
            if let Some(value) = fields.get(key) {
                depends.extend(dependency_names(value));
            }
        }

        entries.push(DpkgEntry {
            package: Package::new(
                name.clone(),
                version.clone(),
                PackageType::Deb,
                location.to_string(),
            )?,
            depends,
        });
    }

    Ok(entries)
}

/// Parses `Key: value` lines, folding continuation lines into the previous key
fn parse_fields(record: &[&str]) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut last_key: Option<String> = None;

    for line in record {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(value) = last_key.as_ref().and_then(|k| fields.get_mut(k)) {
                value.push('\n');
                value.push_str(line.trim());
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_string();
            fields.insert(key.clone(), value.trim().to_string());
            last_key = Some(key);
        }
    }
    fields
}

/// `libc6 (>= 2.36), debconf | debconf-2.0, perl:any` -> every named package
fn dependency_names(value: &str) -> Vec<String> {
    value
        .split([',', '|'])
        .filter_map(|alternative| {
            let name = alternative.split_whitespace().next()?;
            let name = name.split(':').next().unwrap_or(name);
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{Scope, SourceMetadata, SourceScheme};
    use crate::sbom_generation::services::PathFilter;
    use std::fs;
    use tempfile::TempDir;

    const STATUS: &str = "\
Package: libc6
Status: install ok installed
Version: 2.36-9+deb12u4
Description: GNU C Library
 Contains the standard libraries.

Package: bash
Status: install ok installed
Pre-Depends: libc6 (>= 2.36), libtinfo6 (>= 6)
Depends: base-files (>= 2.1.12), debianutils (>= 5.6-0.1)
Version: 5.2.15-2+b2

Package: old-tool
Status: deinstall ok config-files
Version: 1.0
";

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

    fn rootfs_with_status(content: &str) -> TempDir {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("var/lib/dpkg")).unwrap();
        fs::write(root.path().join("var/lib/dpkg/status"), content).unwrap();
        root
    }

    #[test]
    fn test_catalog_status_file() {
        let root = rootfs_with_status(STATUS);
        let (packages, relationships) = DpkgCataloger::new()
            .catalog(&source(&root, vec![]))
            .unwrap();

        let names: Vec<_> = packages.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["libc6", "bash"]);
        assert_eq!(packages[1].version(), "5.2.15-2+b2");
        assert_eq!(packages[1].location(), STATUS_FILE);

        let evidence = relationships
            .iter()
            .filter(|r| r.kind() == RelationshipKind::EvidentBy)
            .count();
        assert_eq!(evidence, 2);

        let dependency: Vec<_> = relationships
            .iter()
            .filter(|r| r.kind() == RelationshipKind::DependencyOf)
            .collect();
        assert_eq!(dependency.len(), 1);
        assert_eq!(dependency[0].from(), &packages[0].id());
        assert_eq!(dependency[0].to(), &packages[1].id());
    }

    #[test]
    fn test_no_dpkg_database() {
        let root = TempDir::new().unwrap();
        let (packages, relationships) = DpkgCataloger::new()
            .catalog(&source(&root, vec![]))
            .unwrap();
        assert!(packages.is_empty());
        assert!(relationships.is_empty());
    }

    #[test]
    fn test_excluded_database_is_skipped() {
        let root = rootfs_with_status(STATUS);
        let (packages, _) = DpkgCataloger::new()
            .catalog(&source(&root, vec!["/var/lib/dpkg".to_string()]))
            .unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_distroless_status_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("var/lib/dpkg/status.d");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("base"), "Package: base-files\nVersion: 12.4\n").unwrap();
        fs::write(dir.join("base.md5sums"), "abc  etc/debian_version\n").unwrap();

        let (packages, _) = DpkgCataloger::new()
            .catalog(&source(&root, vec![]))
            .unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].location(), "/var/lib/dpkg/status.d/base");
    }

    #[test]
    fn test_dependency_names() {
        assert_eq!(
            dependency_names("libc6 (>= 2.36), debconf (>= 0.5) | debconf-2.0, perl:any"),
            vec!["libc6", "debconf", "debconf-2.0", "perl"]
        );
    }

    #[test]
    fn test_invalid_package_is_an_error() {
        let root = rootfs_with_status("Package: bad name\nVersion: 1\n");
        let err = DpkgCataloger::new()
            .catalog(&source(&root, vec![]))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse /var/lib/dpkg/status"));
    }
}
