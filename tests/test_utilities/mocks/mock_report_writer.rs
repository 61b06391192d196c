use image_sbom::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock ReportWriter for testing that captures every SBOM it is asked to write
#[derive(Default, Clone)]
pub struct MockReportWriter {
    pub reports: Arc<Mutex<Vec<Sbom>>>,
    failure: Option<String>,
}

impl MockReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reports: Arc::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn get_reports(&self) -> Vec<Sbom> {
        self.reports.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

impl ReportWriter for MockReportWriter {
    fn write(&self, sbom: &Sbom) -> Result<()> {
        self.reports.lock().unwrap().push(sbom.clone());
        match &self.failure {
            Some(message) => anyhow::bail!("{}", message),
            None => Ok(()),
        }
    }
}
