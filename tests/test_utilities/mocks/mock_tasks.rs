use image_sbom::prelude::*;
use image_sbom::sbom_generation::domain::{ArtifactId, RelationshipKind};
use std::time::Duration;

/// Task that sleeps for `delay` and then reports `count` relationships,
/// numbered `<name>-0`, `<name>-1`, ... in discovery order
pub fn relationship_task(name: &str, count: usize, delay: Duration) -> SharedTask {
    let prefix = name.to_string();
    task_fn(name, move |_, _| {
        std::thread::sleep(delay);
        Ok((0..count)
            .map(|i| {
                Relationship::new(
                    ArtifactId::new(format!("{}-{}", prefix, i)),
                    ArtifactId::new("source"),
                    RelationshipKind::Contains,
                )
            })
            .collect())
    })
}

/// Task that sleeps for `delay` and then fails
pub fn failing_task(name: &str, delay: Duration) -> SharedTask {
    task_fn(name, move |_, _| {
        std::thread::sleep(delay);
        anyhow::bail!("database is corrupt")
    })
}
