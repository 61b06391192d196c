use image_sbom::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock Presenter for testing that captures handled events and the final status
#[derive(Default, Clone)]
pub struct MockPresenter {
    pub events: Arc<Mutex<Vec<String>>>,
    pub teardowns: Arc<Mutex<Vec<RunStatus>>>,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn get_teardowns(&self) -> Vec<RunStatus> {
        self.teardowns.lock().unwrap().clone()
    }
}

impl Presenter for MockPresenter {
    fn handle(&mut self, event: &Event) -> Result<()> {
        self.events.lock().unwrap().push(event.name().to_string());
        Ok(())
    }

    fn teardown(&mut self, status: RunStatus) -> Result<()> {
        self.teardowns.lock().unwrap().push(status);
        Ok(())
    }
}
