use serde::{Deserialize, Serialize};

use super::coordinate::{LatLon, Ring};

/// Whether deliveries are allowed or refused inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Include,
    Exclude,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Include => "include",
            Action::Exclude => "exclude",
        }
    }

    /// Lenient parse used for form fields and CLI flags; unknown values fall back to include.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "exclude" | "excluded" | "deny" => Action::Exclude,
            _ => Action::Include,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a region covers. A region is a bare marker around its reference
/// point, or exactly one include ring, or exactly one exclude ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Coverage {
    Point { action: Action },
    IncludeArea { ring: Ring },
    ExcludeArea { ring: Ring },
}

impl Coverage {
    /// Build the coverage for a freshly geocoded place.
    pub fn new(action: Action, ring: Option<Ring>) -> Self {
        match (action, ring) {
            (action, None) => Coverage::Point { action },
            (Action::Include, Some(ring)) => Coverage::IncludeArea { ring },
            (Action::Exclude, Some(ring)) => Coverage::ExcludeArea { ring },
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Coverage::Point { action } => *action,
            Coverage::IncludeArea { .. } => Action::Include,
            Coverage::ExcludeArea { .. } => Action::Exclude,
        }
    }

    pub fn ring(&self) -> Option<&Ring> {
        match self {
            Coverage::Point { .. } => None,
            Coverage::IncludeArea { ring } | Coverage::ExcludeArea { ring } => Some(ring),
        }
    }

    pub fn is_point_only(&self) -> bool {
        matches!(self, Coverage::Point { .. })
    }
}

/// A delivery region that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRegion {
    pub name: String,
    pub reference_point: LatLon,
    pub coverage: Coverage,
}

/// A delivery region persisted by the backend for one catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub reference_point: LatLon,
    pub coverage: Coverage,
}

impl Region {
    pub fn action(&self) -> Action {
        self.coverage.action()
    }

    /// Number of ring vertices, 0 for point-only regions.
    pub fn vertex_count(&self) -> usize {
        self.coverage.ring().map(|r| r.len()).unwrap_or(0)
    }
}
