use folio_protocol::Group;

/// Decides which companies belong on the primary rail.
pub trait CompanyMatcher {
    fn is_primary(&self, company: &str) -> bool;

    fn group_of(&self, company: &str) -> Group {
        if self.is_primary(company) {
            Group::Primary
        } else {
            Group::Other
        }
    }
}

impl<F> CompanyMatcher for F
where
    F: Fn(&str) -> bool,
{
    fn is_primary(&self, company: &str) -> bool {
        self(company)
    }
}

/// Case-insensitive substring match against a configured marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatcher {
    marker: String,
}

impl MarkerMatcher {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.trim().to_lowercase(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl CompanyMatcher for MarkerMatcher {
    fn is_primary(&self, company: &str) -> bool {
        // An empty marker would match every company.
        !self.marker.is_empty() && company.to_lowercase().contains(&self.marker)
    }
}
