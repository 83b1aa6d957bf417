use std::fmt;

/// Label shown for the "no site selected" entry of the site dropdown.
pub const NO_SITE_LABEL: &str = "NONE";

/// Current site selection. `NoSite` suppresses every job-list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    NoSite,
    Site(String),
}

impl SiteSelection {
    pub fn site(&self) -> Option<&str> {
        match self {
            SiteSelection::NoSite => None,
            SiteSelection::Site(name) => Some(name),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SiteSelection::NoSite)
    }

    /// Parses a dropdown label; the sentinel label maps to `NoSite`.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == NO_SITE_LABEL {
            SiteSelection::NoSite
        } else {
            SiteSelection::Site(trimmed.to_string())
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::NoSite => f.write_str(NO_SITE_LABEL),
            SiteSelection::Site(name) => f.write_str(name),
        }
    }
}

/// Resolves the host-provided default site against the available ones.
///
/// Returns the selection to start on and, when the requested site is unknown,
/// the message to surface to the user.
pub fn validate_default_site(
    requested: Option<&str>,
    available: &[String],
) -> (SiteSelection, Option<String>) {
    match requested.map(SiteSelection::from_label) {
        None | Some(SiteSelection::NoSite) => (SiteSelection::NoSite, None),
        Some(SiteSelection::Site(name)) => {
            if available.iter().any(|site| *site == name) {
                (SiteSelection::Site(name), None)
            } else {
                let message = format!(
                    "Site {name} is not available at this time! Available sites: {}",
                    available.join(",")
                );
                (SiteSelection::NoSite, Some(message))
            }
        }
    }
}
