use std::collections::HashSet;
use tracing::debug;

use crate::{
    config::ValidationConfig,
    error::{Result, SubmitError},
    predictions::table::PredictionTable,
};

/// Pre-submission check of a prediction file; only pass/fail matters to the caller
pub trait PredictionValidator {
    fn validate(&self, table: &PredictionTable) -> Result<()>;
}

/// Structural checks: required columns, blanks, duplicate ids and score ranges
pub struct SchemaValidator {
    config: ValidationConfig,
}

impl SchemaValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    fn collect_problems(&self, table: &PredictionTable) -> Vec<String> {
        let mut problems = Vec::new();

        if table.is_empty() {
            problems.push("The prediction file contains no rows".to_string());
        }

        for column in &self.config.required_columns {
            match table.column(column) {
                None => problems.push(format!("Missing required column '{}'", column)),
                Some(cells) => {
                    let blanks: Vec<usize> = cells
                        .enumerate()
                        .filter(|(_, cell)| is_missing(cell))
                        .map(|(i, _)| i + 1)
                        .collect();
                    if !blanks.is_empty() {
                        problems.push(format!(
                            "Column '{}' has missing values in rows {}",
                            column,
                            summarize_rows(&blanks)
                        ));
                    }
                }
            }
        }

        if let Some(ids) = table.column(&self.config.id_column) {
            let mut seen = HashSet::new();
            let mut duplicates = Vec::new();
            for id in ids.filter(|id| !is_missing(id)) {
                if !seen.insert(id) && !duplicates.contains(&id) {
                    duplicates.push(id);
                }
            }
            if !duplicates.is_empty() {
                problems.push(format!(
                    "Column '{}' has duplicate values: {}",
                    self.config.id_column,
                    duplicates.join(", ")
                ));
            }
        }

        for column in &self.config.score_columns {
            let Some(cells) = table.column(column) else {
                continue;
            };
            let mut bad = Vec::new();
            for (i, cell) in cells.enumerate() {
                if is_missing(cell) {
                    continue;
                }
                if !self.score_in_range(cell) {
                    bad.push(i + 1);
                }
            }
            if !bad.is_empty() {
                problems.push(format!(
                    "Column '{}' must hold numbers{} (rows {})",
                    column,
                    self.range_description(),
                    summarize_rows(&bad)
                ));
            }
        }

        problems
    }

    fn score_in_range(&self, cell: &str) -> bool {
        match cell.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                self.config.score_min.map_or(true, |min| value >= min)
                    && self.config.score_max.map_or(true, |max| value <= max)
            }
            _ => false,
        }
    }

    fn range_description(&self) -> String {
        match (self.config.score_min, self.config.score_max) {
            (Some(min), Some(max)) => format!(" between {} and {}", min, max),
            (Some(min), None) => format!(" of at least {}", min),
            (None, Some(max)) => format!(" of at most {}", max),
            (None, None) => String::new(),
        }
    }
}

impl PredictionValidator for SchemaValidator {
    fn validate(&self, table: &PredictionTable) -> Result<()> {
        let problems = self.collect_problems(table);
        debug!("Validation found {} problems", problems.len());
        if problems.is_empty() {
            Ok(())
        } else {
            Err(SubmitError::Validation(problems))
        }
    }
}

fn is_missing(cell: &str) -> bool {
    matches!(cell.trim(), "" | "NA" | "NaN" | "null")
}

/// 1-based data row numbers, truncated after the first few
fn summarize_rows(rows: &[usize]) -> String {
    const SHOWN: usize = 5;
    let listed: Vec<String> = rows.iter().take(SHOWN).map(|r| r.to_string()).collect();
    if rows.len() > SHOWN {
        format!("{} and {} more", listed.join(", "), rows.len() - SHOWN)
    } else {
        listed.join(", ")
    }
}
