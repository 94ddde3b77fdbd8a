use serde::{Deserialize, Serialize};

/// A portfolio project shown in the carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub image: String,
    pub date: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub company: String,
    /// Inferred from the content folder when absent.
    #[serde(default)]
    pub company_slug: Option<String>,
}

impl ProjectRecord {
    pub fn new(title: impl Into<String>, company: impl Into<String>, date: &str) -> Self {
        Self {
            id: None,
            title: title.into(),
            image: String::new(),
            date: date.to_string(),
            technologies: Vec::new(),
            company: company.into(),
            company_slug: None,
        }
    }

    /// Slug of the owning company, derived from its name when not set.
    pub fn company_slug(&self) -> String {
        match &self.company_slug {
            Some(slug) => slug.clone(),
            None => slugify(&self.company),
        }
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_slug_from_company() {
        let project = ProjectRecord::new("Dashboard", "Acme Labs, Inc.", "2023-02-01");
        assert_eq!(project.company_slug(), "acme-labs-inc");
    }

    #[test]
    fn explicit_slug_wins() {
        let mut project = ProjectRecord::new("Dashboard", "Acme Labs", "2023-02-01");
        project.company_slug = Some("acme".into());
        assert_eq!(project.company_slug(), "acme");
    }
}
