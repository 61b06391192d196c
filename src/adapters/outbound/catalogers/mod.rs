/// Cataloger adapters reading package databases and release files from a source
mod apk;
mod dpkg;
mod os_release;

pub use apk::ApkCataloger;
pub use dpkg::DpkgCataloger;
pub use os_release::OsReleaseDetector;

use crate::sbom_generation::domain::Source;
use crate::shared::security::read_contained_file;
use crate::shared::Result;

/// Reads an in-source file, honouring exclusions and root containment.
///
/// `Ok(None)` means the file is absent, excluded or escapes the source root.
fn read_source_file(source: &Source, source_path: &str) -> Result<Option<String>> {
    match source.resolve(source_path) {
        Some(host_path) => read_contained_file(source.root(), &host_path),
        None => Ok(None),
    }
}

/// Splits a package database into blank-line separated records
fn paragraphs(content: &str) -> Vec<Vec<&str>> {
    let mut records = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        records.push(current);
    }
    records
}
