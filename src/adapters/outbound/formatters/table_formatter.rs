use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::Sbom;
use crate::shared::Result;
use owo_colors::OwoColorize;
use std::fmt::Write;

const HEADERS: [&str; 3] = ["NAME", "VERSION", "TYPE"];

/// Column separator
const GAP: &str = "  ";

/// TableFormatter adapter for a human-readable package listing
///
/// Packages are listed sorted by name, then version.
pub struct TableFormatter {
    colored: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self { colored: false }
    }

    /// Highlights the header row when the output is a color terminal
    pub fn colored(colored: bool) -> Self {
        Self { colored }
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for TableFormatter {
    fn format(&self, sbom: &Sbom) -> Result<String> {
        let packages = &sbom.artifacts.packages;
        if packages.is_empty() {
            return Ok("No packages discovered\n".to_string());
        }

        let rows: Vec<[String; 3]> = packages
            .iter()
            .map(|p| {
                [
                    p.name().to_string(),
                    p.version().to_string(),
                    p.package_type().to_string(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let mut output = String::new();
        let header = render_row(&HEADERS.map(str::to_string), &widths);
        if self.colored {
            writeln!(output, "{}", header.bold())?;
        } else {
            writeln!(output, "{}", header)?;
        }
        for row in &rows {
            writeln!(output, "{}", render_row(row, &widths))?;
        }

        if let Some(distro) = &sbom.artifacts.distro {
            writeln!(output)?;
            writeln!(output, "Distribution: {}", distro)?;
        }
        Ok(output)
    }
}

fn render_row(cells: &[String; 3], widths: &[usize; 3]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{:<width$}{}", cell, GAP, width = *width));
        }
    }
    line
}
