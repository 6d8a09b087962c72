pub mod snapshot;

pub use snapshot::export_snapshot;

use chrono::Local;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Yaml,
}

impl ExportFormat {
    pub fn next(self) -> Self {
        match self {
            ExportFormat::Json => ExportFormat::Csv,
            ExportFormat::Csv => ExportFormat::Yaml,
            ExportFormat::Yaml => ExportFormat::Json,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ExportFormat::Json => ExportFormat::Yaml,
            ExportFormat::Csv => ExportFormat::Json,
            ExportFormat::Yaml => ExportFormat::Csv,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

pub type CsvWriter<T> = fn(&mut dyn Write, &[T]) -> io::Result<()>;

/// Writes serializable entries to `<output_dir>/snapshots/<prefix>-<timestamp>.<ext>`.
pub fn export_to_file<T: Serialize>(
    data: &[T],
    format: ExportFormat,
    file_prefix: &str,
    output_dir: Option<&Path>,
    write_csv_fn: Option<CsvWriter<T>>,
) -> io::Result<PathBuf> {
    let base_dir = output_dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    let snapshots_dir = base_dir.join("snapshots");
    std::fs::create_dir_all(&snapshots_dir)?;

    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let filename = format!("{file_prefix}-{ts}.{}", format.extension());
    let path = snapshots_dir.join(filename);
    let mut file = File::create(&path)?;

    match format {
        ExportFormat::Csv => {
            let Some(write_fn) = write_csv_fn else {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "CSV writer not provided",
                ));
            };
            write_fn(&mut file, data)?;
        }
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(data).map_err(io::Error::other)?;
            file.write_all(json.as_bytes())?;
        }
        ExportFormat::Yaml => {
            let yaml = serde_yaml::to_string(data).map_err(io::Error::other)?;
            file.write_all(yaml.as_bytes())?;
        }
    }

    Ok(path)
}
