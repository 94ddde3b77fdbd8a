//! Company filter for the projects carousel.

use serde::{Deserialize, Serialize};

use crate::model::ProjectRecord;

/// Pseudo-company that selects every project.
pub const ALL_COMPANIES: &str = "Todos";

/// Which way the carousel slides when the selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    Left,
    Right,
}

/// Distinct companies in first-seen order.
pub fn companies(projects: &[ProjectRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for project in projects {
        if !seen.iter().any(|c| c == &project.company) {
            seen.push(project.company.clone());
        }
    }
    seen
}

/// Tab selection over a fixed company list, with `ALL_COMPANIES` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFilter {
    tabs: Vec<String>,
    selected: String,
    previous: String,
}

impl CompanyFilter {
    pub fn new(companies: Vec<String>) -> Self {
        let mut tabs = Vec::with_capacity(companies.len() + 1);
        tabs.push(ALL_COMPANIES.to_string());
        tabs.extend(companies.into_iter().filter(|c| c != ALL_COMPANIES));
        Self {
            tabs,
            selected: ALL_COMPANIES.to_string(),
            previous: ALL_COMPANIES.to_string(),
        }
    }

    pub fn for_projects(projects: &[ProjectRecord]) -> Self {
        Self::new(companies(projects))
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn select(&mut self, company: &str) {
        self.previous = std::mem::replace(&mut self.selected, company.to_string());
    }

    pub fn apply<'a>(&self, projects: &'a [ProjectRecord]) -> Vec<&'a ProjectRecord> {
        projects
            .iter()
            .filter(|p| self.selected == ALL_COMPANIES || p.company == self.selected)
            .collect()
    }

    /// Right when the new tab sits after the previous one, left otherwise.
    /// Unknown companies rank before every tab.
    pub fn slide_direction(&self) -> SlideDirection {
        let rank = |company: &str| self.tabs.iter().position(|t| t == company);
        if rank(&self.selected) > rank(&self.previous) {
            SlideDirection::Right
        } else {
            SlideDirection::Left
        }
    }
}

/// What the carousel shows for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectsView<'a> {
    pub tabs: &'a [String],
    pub selected: &'a str,
    pub direction: SlideDirection,
    pub projects: Vec<&'a ProjectRecord>,
}

/// A project collection together with its company filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCarousel {
    projects: Vec<ProjectRecord>,
    filter: CompanyFilter,
}

impl ProjectCarousel {
    pub fn new(projects: Vec<ProjectRecord>) -> Self {
        let filter = CompanyFilter::for_projects(&projects);
        Self { projects, filter }
    }

    pub fn filter(&self) -> &CompanyFilter {
        &self.filter
    }

    pub fn select(&mut self, company: &str) -> ProjectsView<'_> {
        self.filter.select(company);
        self.view()
    }

    pub fn view(&self) -> ProjectsView<'_> {
        ProjectsView {
            tabs: self.filter.tabs(),
            selected: self.filter.selected(),
            direction: self.filter.slide_direction(),
            projects: self.filter.apply(&self.projects),
        }
    }
}
