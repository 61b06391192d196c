use crate::shared::Result;
use anyhow::Context;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::sync::atomic::{AtomicBool, Ordering};

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// Prefixes an exclusion glob must start with
const ALLOWED_PREFIXES: [&str; 4] = ["/", "./", "*/", "**/"];

/// PathFilter - Excludes in-source paths using glob expressions
///
/// Patterns are full globs (`*`, `?`, `[...]`, `{a,b}`, `**`) where `*` never
/// crosses a `/`. A path is excluded when a glob matches the path itself or
/// one of its parent directories, so `/usr/share` hides everything below it.
#[derive(Debug)]
pub struct PathFilter {
    globs: GlobSet,
    originals: Vec<String>,
    matched: Vec<AtomicBool>,
}

impl PathFilter {
    /// Creates a new PathFilter from raw glob strings
    ///
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS)
    /// - Invalid pattern format (length, prefix, glob syntax)
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        if patterns.len() > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many exclusion patterns: {} (maximum: {})",
                patterns.len(),
                MAX_EXCLUDE_PATTERNS
            );
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            validate_pattern(pattern)?;
            let glob = GlobBuilder::new(rooted(pattern))
                .literal_separator(true)
                .build()
                .with_context(|| format!("Invalid exclusion pattern '{}'", pattern))?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .context("Failed to compile exclusion patterns")?;

        Ok(Self {
            globs,
            matched: patterns.iter().map(|_| AtomicBool::new(false)).collect(),
            originals: patterns,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Checks whether an absolute in-source path is excluded
    pub fn is_excluded(&self, path: &str) -> bool {
        if self.globs.is_empty() {
            return false;
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        // Any pattern matching an ancestor directory excludes the whole subtree
        (1..=segments.len()).any(|depth| {
            let hits = self.globs.matches(segments[..depth].join("/"));
            for &index in &hits {
                self.matched[index].store(true, Ordering::Relaxed);
            }
            !hits.is_empty()
        })
    }

    /// Returns the patterns that have not excluded anything so far
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.originals
            .iter()
            .zip(&self.matched)
            .filter(|(_, matched)| !matched.load(Ordering::Relaxed))
            .map(|(original, _)| original.clone())
            .collect()
    }
}

/// "/etc" and "./etc" are both rooted at the source root; paths are matched
/// without their leading slash
fn rooted(pattern: &str) -> &str {
    pattern
        .strip_prefix("./")
        .or_else(|| pattern.strip_prefix('/'))
        .unwrap_or(pattern)
}

/// Validates a glob string
fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    if !ALLOWED_PREFIXES.iter().any(|p| pattern.starts_with(p)) {
        anyhow::bail!(
            "Exclusion pattern '{}' must begin with one of {:?} to be rooted in the image",
            pattern,
            ALLOWED_PREFIXES
        );
    }

    if pattern.contains("..") {
        anyhow::bail!(
            "Exclusion pattern '{}' must not contain parent directory references",
            pattern
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> PathFilter {
        PathFilter::new(patterns.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let f = filter(&[]);
        assert!(f.is_empty());
        assert!(!f.is_excluded("/var/lib/dpkg/status"));
    }

    #[test]
    fn test_exact_path() {
        let f = filter(&["/etc/os-release"]);
        assert!(f.is_excluded("/etc/os-release"));
        assert!(!f.is_excluded("/usr/lib/os-release"));
    }

    #[test]
    fn test_directory_excludes_subtree() {
        let f = filter(&["/lib"]);
        assert!(f.is_excluded("/lib/apk/db/installed"));
        assert!(!f.is_excluded("/usr/lib/os-release"));
    }

    #[test]
    fn test_dot_slash_is_rooted() {
        let f = filter(&["./var/lib"]);
        assert!(f.is_excluded("/var/lib/dpkg/status"));
    }

    #[test]
    fn test_double_star_any_depth() {
        let f = filter(&["**/*.db"]);
        assert!(f.is_excluded("/var/lib/rpm/Packages.db"));
        assert!(f.is_excluded("/cache.db"));
        assert!(!f.is_excluded("/var/lib/dpkg/status"));
    }

    #[test]
    fn test_single_star_one_segment() {
        let f = filter(&["*/os-release"]);
        assert!(f.is_excluded("/etc/os-release"));
        assert!(!f.is_excluded("/usr/lib/os-release"));
    }

    #[test]
    fn test_prefix_and_middle_wildcards() {
        let f = filter(&["/var/lib/dp*", "/etc/*-rel*se"]);
        assert!(f.is_excluded("/var/lib/dpkg/status"));
        assert!(f.is_excluded("/etc/os-release"));
        assert!(!f.is_excluded("/etc/hostname"));
    }

    #[test]
    fn test_single_character_wildcard() {
        let f = filter(&["/etc/os-releas?"]);
        assert!(f.is_excluded("/etc/os-release"));
        assert!(!f.is_excluded("/etc/os-releases"));
    }

    #[test]
    fn test_character_class_and_alternation() {
        let f = filter(&["/lib/apk/db/[i]nstalled", "/var/lib/{dpkg,rpm}"]);
        assert!(f.is_excluded("/lib/apk/db/installed"));
        assert!(f.is_excluded("/var/lib/dpkg/status"));
        assert!(f.is_excluded("/var/lib/rpm/Packages"));
        assert!(!f.is_excluded("/var/lib/apt/lists"));
    }

    #[test]
    fn test_rejects_invalid_glob_syntax() {
        let err = PathFilter::new(vec!["/etc/[os-release".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Invalid exclusion pattern"));
    }

    #[test]
    fn test_unmatched_patterns() {
        let f = filter(&["/lib", "/nonexistent"]);
        assert!(f.is_excluded("/lib/apk/db/installed"));
        assert_eq!(f.unmatched_patterns(), vec!["/nonexistent".to_string()]);
    }

    #[test]
    fn test_rejects_unrooted_pattern() {
        let result = PathFilter::new(vec!["lib".to_string()]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("must begin with one of"));
    }

    #[test]
    fn test_rejects_empty_pattern() {
        assert!(PathFilter::new(vec![String::new()]).is_err());
    }

    #[test]
    fn test_rejects_parent_reference() {
        assert!(PathFilter::new(vec!["/etc/../root".to_string()]).is_err());
    }

    #[test]
    fn test_too_many_patterns() {
        let patterns = (0..=MAX_EXCLUDE_PATTERNS)
            .map(|i| format!("/p{}", i))
            .collect();
        let err = PathFilter::new(patterns).unwrap_err().to_string();
        assert!(err.contains("Too many exclusion patterns"));
    }
}
