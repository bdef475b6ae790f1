use std::io::Read;
use std::path::{Path, PathBuf};
use chrono::Local;
use tracing::{debug, info};

use crate::{error::Result, utils::slugify};

/// A prediction CSV held as its header row plus raw string cells
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PredictionTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        info!("Read {} prediction rows from {}", table.rows.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of `name`, in row order
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row.get(index).map(String::as_str).unwrap_or("")))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Write the validated table to `{dir}/{prefix}_{team}_{timestamp}.csv`
pub fn write_submission_file(
    table: &PredictionTable,
    dir: &Path,
    prefix: &str,
    team_name: &str,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let file_name = format!(
        "{}_{}_{}.csv",
        prefix,
        slugify(team_name),
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(file_name);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    debug!("Wrote submission file {}", path.display());
    Ok(path)
}
