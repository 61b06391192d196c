use super::{paragraphs, read_source_file};
use crate::ports::outbound::{CatalogResult, Cataloger};
use crate::sbom_generation::domain::{
    ArtifactId, Package, PackageType, Relationship, RelationshipKind, Source,
};
use crate::shared::Result;
use anyhow::Context;
use std::collections::HashMap;

const INSTALLED_DB: &str = "/lib/apk/db/installed";

/// ApkCataloger adapter for Alpine-based root filesystems
pub struct ApkCataloger;

impl ApkCataloger {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ApkCataloger {
    fn default() -> Self {
        Self::new()
    }
}

struct ApkEntry {
    package: Package,
    provides: Vec<String>,
    depends: Vec<String>,
}

impl Cataloger for ApkCataloger {
    fn name(&self) -> &str {
        "apk-db-cataloger"
    }

    fn catalog(&self, source: &Source) -> Result<CatalogResult> {
        let Some(content) = read_source_file(source, INSTALLED_DB)? else {
            return Ok((Vec::new(), Vec::new()));
        };
        let entries = parse_installed(&content)
            .with_context(|| format!("Failed to parse {}", INSTALLED_DB))?;

        // Dependencies may name a package or anything it provides (so:, cmd:)
        let mut providers: HashMap<&str, ArtifactId> = HashMap::new();
        for entry in &entries {
            providers.insert(entry.package.name(), entry.package.id());
            for provided in &entry.provides {
                providers.insert(provided.as_str(), entry.package.id());
            }
        }

        let mut relationships = Vec::new();
        for entry in &entries {
            relationships.push(Relationship::new(
                entry.package.id(),
                ArtifactId::file(INSTALLED_DB),
                RelationshipKind::EvidentBy,
            ));
            let mut seen = Vec::new();
            for dependency in &entry.depends {
                let Some(provider) = providers.get(dependency.as_str()) else {
                    continue;
                };
                if *provider == entry.package.id() || seen.contains(provider) {
                    continue;
                }
                seen.push(provider.clone());
                relationships.push(Relationship::new(
                    provider.clone(),
                    entry.package.id(),
                    RelationshipKind::DependencyOf,
                ));
            }
        }

        let packages = entries.into_iter().map(|e| e.package).collect();
        Ok((packages, relationships))
    }
}

fn parse_installed(content: &str) -> Result<Vec<ApkEntry>> {
    let mut entries = Vec::new();

    for record in paragraphs(content) {
        let mut name = None;
        let mut version = None;
        let mut provides = Vec::new();
        let mut depends = Vec::new();

        for line in record {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            match key {
                "P" => name = Some(value.to_string()),
                "V" => version = Some(value.to_string()),
                "p" => provides.extend(value.split_whitespace().map(strip_constraint)),
                "D" => depends.extend(
                    value
                        .split_whitespace()
                        .filter(|d| !d.starts_with('!'))
                        .map(strip_constraint),
                ),
                _ => {}
            }
        }

        if let (Some(name), Some(version)) = (name, version) {
            entries.push(ApkEntry {
                package: Package::new(
                    name,
                    version,
                    PackageType::Apk,
                    INSTALLED_DB.to_string(),
                )?,
                provides,
                depends,
            });
        }
    }

    Ok(entries)
}

/// `so:libc.musl-x86_64.so.1=1` -> `so:libc.musl-x86_64.so.1`, `busybox>=1.36` -> `busybox`
fn strip_constraint(token: &str) -> String {
    token
        .split(['<', '>', '=', '~'])
        .next()
        .unwrap_or(token)
        .to_string()
}
