use crate::ports::outbound::{OutputPresenter, ReportWriter, SbomFormatter};
use crate::sbom_generation::domain::Sbom;
use crate::shared::Result;

/// FormattedReportWriter adapter: formats the SBOM, then hands it to a presenter
pub struct FormattedReportWriter {
    formatter: Box<dyn SbomFormatter>,
    presenter: Box<dyn OutputPresenter>,
}

impl FormattedReportWriter {
    pub fn new(formatter: Box<dyn SbomFormatter>, presenter: Box<dyn OutputPresenter>) -> Self {
        Self {
            formatter,
            presenter,
        }
    }
}

impl ReportWriter for FormattedReportWriter {
    fn write(&self, sbom: &Sbom) -> Result<()> {
        let content = self.formatter.format(sbom)?;
        self.presenter.present(&content)
    }
}
