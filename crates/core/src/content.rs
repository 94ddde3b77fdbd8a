//! Loading content collections from JSON.

use thiserror::Error;

use crate::model::{ExperienceRecord, ProjectRecord, parse_date};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{collection} entry {index}: invalid date {value:?}")]
    InvalidDate {
        collection: &'static str,
        index: usize,
        value: String,
    },
}

/// Parse a JSON array of experience records.
///
/// Start and end dates must parse; an empty end date counts as ongoing.
pub fn parse_experiences(data: &[u8]) -> Result<Vec<ExperienceRecord>, ContentError> {
    let records: Vec<ExperienceRecord> = serde_json::from_slice(data)?;
    for (index, record) in records.iter().enumerate() {
        check_date("experience", index, &record.start_date)?;
        if let Some(end) = record.end_date.as_deref().filter(|d| !d.trim().is_empty()) {
            check_date("experience", index, end)?;
        }
    }
    log::debug!("loaded {} experience records", records.len());
    Ok(records)
}

/// Parse a JSON array of project records.
pub fn parse_projects(data: &[u8]) -> Result<Vec<ProjectRecord>, ContentError> {
    let projects: Vec<ProjectRecord> = serde_json::from_slice(data)?;
    for (index, project) in projects.iter().enumerate() {
        check_date("projects", index, &project.date)?;
    }
    log::debug!("loaded {} project records", projects.len());
    Ok(projects)
}

fn check_date(collection: &'static str, index: usize, value: &str) -> Result<(), ContentError> {
    match parse_date(value) {
        Some(_) => Ok(()),
        None => Err(ContentError::InvalidDate {
            collection,
            index,
            value: value.to_string(),
        }),
    }
}
