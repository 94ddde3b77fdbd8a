use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// One career entry as supplied by the content source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub company: String,
    pub position: String,
    /// `YYYY-MM`, `YYYY-MM-DD`, or an RFC 3339 timestamp.
    pub start_date: String,
    /// `None` for the current position.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Free-text (Markdown) description.
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub milestones: Option<Vec<Milestone>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub description: String,
}

impl ExperienceRecord {
    pub fn new(
        company: impl Into<String>,
        position: impl Into<String>,
        start_date: impl Into<String>,
        end_date: Option<&str>,
    ) -> Self {
        Self {
            id: None,
            company: company.into(),
            position: position.into(),
            start_date: start_date.into(),
            end_date: end_date.map(str::to_string),
            body: String::new(),
            technologies: None,
            milestones: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_date.as_deref().is_none_or(|d| d.trim().is_empty())
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_date(&self.start_date)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end_date.as_deref().and_then(parse_date)
    }

    pub fn milestones(&self) -> &[Milestone] {
        self.milestones.as_deref().unwrap_or_default()
    }

    pub fn technologies(&self) -> &[String] {
        self.technologies.as_deref().unwrap_or_default()
    }
}

/// Parse a content date. Month-only dates resolve to the first of the month.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_month_only_dates() {
        assert_eq!(parse_date("2021-03"), NaiveDate::from_ymd_opt(2021, 3, 1));
    }

    #[test]
    fn parses_full_and_rfc3339_dates() {
        assert_eq!(
            parse_date("2021-03-15"),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
        assert_eq!(
            parse_date("2021-03-15T10:00:00Z"),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("2021-13"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{
            "id": "acme",
            "company": "Acme",
            "position": "Engineer",
            "startDate": "2020-01",
            "milestones": [{"title": "Launch", "description": "Shipped v1"}]
        }"#;
        let record: ExperienceRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_ongoing());
        assert_eq!(record.milestones().len(), 1);
        assert!(record.technologies().is_empty());
        assert_eq!(record.start(), NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn blank_end_date_counts_as_ongoing() {
        let record = ExperienceRecord::new("Acme", "Engineer", "2020-01", Some(""));
        assert!(record.is_ongoing());
        let done = ExperienceRecord::new("Acme", "Engineer", "2020-01", Some("2021-01"));
        assert!(!done.is_ongoing());
    }
}
