use crate::shared::{Result, SbomError};

const DEFAULT_TAG: &str = "latest";

/// Normalises a user-supplied image reference.
///
/// References without a tag or digest get `:latest` appended; tagged and
/// digest-pinned references are returned unchanged.
pub fn clean_image_reference(user_input: &str) -> Result<String> {
    let invalid = |reason: &str| SbomError::InvalidImageReference {
        reference: user_input.to_string(),
        reason: reason.to_string(),
    };

    if user_input.is_empty() {
        return Err(invalid("reference is empty").into());
    }
    if user_input.chars().any(|c| c.is_whitespace()) {
        return Err(invalid("reference contains whitespace").into());
    }

    let (name, digest) = match user_input.split_once('@') {
        Some((name, digest)) => (name, Some(digest)),
        None => (user_input, None),
    };

    if let Some(digest) = digest {
        validate_digest(digest).map_err(|reason| invalid(&reason))?;
    }

    let (repository, tag) = split_tag(name);
    validate_repository(repository).map_err(|reason| invalid(&reason))?;
    if let Some(tag) = tag {
        validate_tag(tag).map_err(|reason| invalid(&reason))?;
    }

    if digest.is_some() || tag.is_some() {
        return Ok(user_input.to_string());
    }

    Ok(format!("{}:{}", user_input, DEFAULT_TAG))
}

/// Splits `registry:5000/repo:tag` into repository and tag, ignoring registry ports
fn split_tag(name: &str) -> (&str, Option<&str>) {
    let last_component_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match name[last_component_start..].rfind(':') {
        Some(i) => {
            let split = last_component_start + i;
            (&name[..split], Some(&name[split + 1..]))
        }
        None => (name, None),
    }
}

fn validate_repository(repository: &str) -> std::result::Result<(), String> {
    if repository.is_empty() {
        return Err("repository name is empty".to_string());
    }

    let mut components = repository.split('/').peekable();
    let mut first = true;
    while let Some(component) = components.next() {
        if component.is_empty() {
            return Err("repository contains an empty path component".to_string());
        }
        // The first component may be a registry host ("localhost:5000", "Registry.io")
        let is_registry = first
            && components.peek().is_some()
            && (component.contains('.') || component.contains(':') || component == "localhost");
        first = false;
        if is_registry {
            continue;
        }
        let valid = component
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._-".contains(c));
        if !valid {
            return Err(format!(
                "repository component '{}' must be lowercase alphanumeric, '.', '_' or '-'",
                component
            ));
        }
    }
    Ok(())
}

fn validate_tag(tag: &str) -> std::result::Result<(), String> {
    if tag.is_empty() || tag.len() > 128 {
        return Err("tag must be between 1 and 128 characters".to_string());
    }
    if !tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._-".contains(c))
    {
        return Err(format!("tag '{}' contains invalid characters", tag));
    }
    Ok(())
}

fn validate_digest(digest: &str) -> std::result::Result<(), String> {
    let (algorithm, hex) = digest
        .split_once(':')
        .ok_or_else(|| format!("digest '{}' must be of the form <algorithm>:<hex>", digest))?;
    if algorithm.is_empty() || hex.len() < 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("digest '{}' is malformed", digest));
    }
    Ok(())
}
