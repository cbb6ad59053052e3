use serde::Serialize;

use super::region::{Coverage, Region};

/// Display row for the region list page.
#[derive(Debug, Clone, Serialize)]
pub struct RegionRow {
    pub id: String,
    pub name: String,
    pub action: String,
    pub kind: String,
    pub vertices: usize,
    pub point: String,
}

impl From<&Region> for RegionRow {
    fn from(region: &Region) -> Self {
        let kind = match &region.coverage {
            Coverage::Point { .. } => "point",
            Coverage::IncludeArea { .. } | Coverage::ExcludeArea { .. } => "area",
        };
        Self {
            id: region.id.clone(),
            name: region.name.clone(),
            action: region.action().to_string(),
            kind: kind.to_string(),
            vertices: region.vertex_count(),
            point: region.reference_point.to_string(),
        }
    }
}
