/// Data Transfer Objects shared between the CLI and the application core
mod output_format;

pub use output_format::OutputFormat;
