//! Runs cataloging tasks concurrently and merges their relationships.

use crate::application::events::{Event, EventBus};
use crate::application::tasks::SharedTask;
use crate::sbom_generation::domain::{ArtifactCollector, Relationship, Source};
use crate::shared::{Result, SbomError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

/// Spawns every task of a run onto the blocking pool.
///
/// Tasks are CPU/IO bound file parsers, so each runs on its own blocking
/// thread. A supervisor collects their results as they complete:
///
/// - relationships of a successful task are forwarded in that task's order
/// - the first failure is kept as the run's outcome, later ones are logged
/// - the merged stream closes exactly once, after every task has finished
#[derive(Debug, Clone)]
pub struct TaskRunner {
    bus: EventBus,
}

impl TaskRunner {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn spawn(
        &self,
        tasks: Vec<SharedTask>,
        artifacts: Arc<ArtifactCollector>,
        source: Arc<Source>,
    ) -> TaskRun {
        let (tx, rx) = mpsc::unbounded_channel();
        let bus = self.bus.clone();

        let outcome = tokio::spawn(async move {
            let mut running = JoinSet::new();
            for task in tasks {
                let artifacts = artifacts.clone();
                let source = source.clone();
                let bus = bus.clone();
                running.spawn_blocking(move || {
                    let name = task.name().to_string();
                    bus.publish(Event::TaskStarted { task: name.clone() });
                    let result = task.run(&artifacts, &source);
                    (name, result)
                });
            }
            drop(artifacts);

            let mut first_error: Option<anyhow::Error> = None;
            while let Some(joined) = running.join_next().await {
                let failure = match joined {
                    Ok((name, Ok(relationships))) => {
                        tracing::debug!(
                            task = %name,
                            relationships = relationships.len(),
                            "task finished"
                        );
                        bus.publish(Event::TaskFinished {
                            task: name,
                            relationships: relationships.len(),
                        });
                        for relationship in relationships {
                            // The receiver may have gone away; results are still collected
                            let _ = tx.send(relationship);
                        }
                        continue;
                    }
                    Ok((name, Err(e))) => {
                        bus.publish(Event::TaskFailed {
                            task: name.clone(),
                            error: format!("{:#}", e),
                        });
                        e.context(SbomError::Cataloging { task: name })
                    }
                    Err(e) => anyhow::anyhow!("cataloging task stopped unexpectedly: {}", e),
                };

                match first_error {
                    None => first_error = Some(failure),
                    Some(_) => tracing::warn!(error = %format!("{:#}", failure), "additional task failure"),
                }
            }

            drop(tx);
            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        });

        TaskRun {
            relationships: rx,
            outcome,
        }
    }
}

/// Handle to an in-flight run
#[derive(Debug)]
pub struct TaskRun {
    relationships: mpsc::UnboundedReceiver<Relationship>,
    outcome: JoinHandle<Result<()>>,
}

impl TaskRun {
    /// Next relationship of the merged stream; `None` once every task finished
    pub async fn next_relationship(&mut self) -> Option<Relationship> {
        self.relationships.recv().await
    }

    /// Waits for all tasks and returns every relationship, or the first error
    pub async fn finish(mut self) -> Result<Vec<Relationship>> {
        let mut relationships = Vec::new();
        while let Some(relationship) = self.relationships.recv().await {
            relationships.push(relationship);
        }

        self.outcome
            .await
            .map_err(|e| anyhow::anyhow!("task supervisor stopped unexpectedly: {}", e))??;
        Ok(relationships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tasks::task_fn;
    use crate::sbom_generation::domain::{
        ArtifactId, RelationshipKind, Scope, SourceMetadata, SourceScheme,
    };
    use crate::sbom_generation::services::PathFilter;
    use std::path::PathBuf;
    use std::time::Duration;

    fn source() -> Arc<Source> {
        Arc::new(Source::new(
            SourceMetadata {
                scheme: SourceScheme::Directory,
                user_input: "dir:/rootfs".to_string(),
                location: "/rootfs".to_string(),
                platform: None,
                scope: Scope::Squashed,
            },
            PathBuf::from("/rootfs"),
            PathFilter::new(vec![]).unwrap(),
        ))
    }

    fn edge(from: &str, to: &str) -> Relationship {
        Relationship::new(
            ArtifactId::new(from),
            ArtifactId::new(to),
            RelationshipKind::DependencyOf,
        )
    }

    fn producing(name: &str, edges: Vec<Relationship>) -> SharedTask {
        task_fn(name, move |_, _| Ok(edges.clone()))
    }

    fn run(tasks: Vec<SharedTask>) -> TaskRun {
        TaskRunner::new(EventBus::new()).spawn(tasks, Arc::new(ArtifactCollector::new()), source())
    }

    #[tokio::test]
    async fn test_all_relationships_are_merged() {
        let tasks = vec![
            producing("a", vec![edge("a", "1"), edge("a", "2")]),
            producing("b", vec![]),
            producing("c", vec![edge("c", "1")]),
        ];

        let relationships = run(tasks).finish().await.unwrap();
        assert_eq!(relationships.len(), 3);
    }

    #[tokio::test]
    async fn test_per_task_order_is_preserved() {
        let first: Vec<_> = (0..50).map(|i| edge("first", &i.to_string())).collect();
        let second: Vec<_> = (0..50).map(|i| edge("second", &i.to_string())).collect();
        let tasks = vec![
            producing("first", first.clone()),
            producing("second", second.clone()),
        ];

        let relationships = run(tasks).finish().await.unwrap();
        let only = |prefix: &str| -> Vec<Relationship> {
            relationships
                .iter()
                .filter(|r| r.from().as_str() == prefix)
                .cloned()
                .collect()
        };
        assert_eq!(only("first"), first);
        assert_eq!(only("second"), second);
    }

    #[tokio::test]
    async fn test_failure_is_terminal_outcome() {
        let tasks = vec![
            producing("ok", vec![edge("ok", "1")]),
            task_fn("broken", |_, _| anyhow::bail!("unreadable database")),
        ];

        let err = run(tasks).finish().await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Cataloging task 'broken' failed"));
        assert!(message.contains("unreadable database"));
        assert!(matches!(
            err.downcast_ref::<SbomError>(),
            Some(SbomError::Cataloging { task }) if task == "broken"
        ));
    }

    #[tokio::test]
    async fn test_stream_closes_after_slowest_task() {
        let tasks = vec![
            producing("fast", vec![edge("fast", "1")]),
            task_fn("slow", |_, _| {
                std::thread::sleep(Duration::from_millis(50));
                Ok(vec![edge("slow", "1")])
            }),
        ];

        let mut handle = run(tasks);
        let mut seen = Vec::new();
        while let Some(relationship) = handle.next_relationship().await {
            seen.push(relationship.from().as_str().to_string());
        }
        seen.sort();
        assert_eq!(seen, vec!["fast", "slow"]);
        assert!(handle.finish().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_task_is_an_error() {
        let tasks = vec![task_fn("panics", |_, _| panic!("task blew up"))];
        let err = run(tasks).finish().await.unwrap_err();
        assert!(err.to_string().contains("stopped unexpectedly"));
    }

    #[tokio::test]
    async fn test_no_tasks_completes_empty() {
        assert!(run(vec![]).finish().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_progress_events_are_published() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let tasks = vec![
            producing("a", vec![edge("a", "1")]),
            task_fn("b", |_, _| anyhow::bail!("nope")),
        ];

        let _ = TaskRunner::new(bus)
            .spawn(tasks, Arc::new(ArtifactCollector::new()), source())
            .finish()
            .await;

        let mut names = Vec::new();
        while let Some(event) = sub.try_recv() {
            names.push(event.name());
        }
        assert_eq!(names.iter().filter(|n| **n == "task-started").count(), 2);
        assert!(names.contains(&"task-finished"));
        assert!(names.contains(&"task-failed"));
    }
}
