use askama::Template;
use crate::handlers::helpers::TemplateGlobals;
use dz::models::RegionRow;

#[derive(Template)]
#[template(path = "regions.html")]
pub struct RegionsPageTemplate {
    pub globals: TemplateGlobals,
    pub catalog_id: Option<String>,
    pub regions: Vec<RegionRow>,
    /// Id of the region the map is focused on, empty when none.
    pub focused_id: String,
    pub last_address: Option<String>,
    /// Camera command and region shapes for the map script, as JSON.
    pub camera_json: String,
    pub shapes_json: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::helpers::shapes_json;
    use dz::models::{Action, Coverage, LatLon, Region};

    fn page(regions: Vec<Region>) -> String {
        RegionsPageTemplate {
            globals: TemplateGlobals::default(),
            catalog_id: Some("cat-1".into()),
            regions: regions.iter().map(RegionRow::from).collect(),
            focused_id: String::new(),
            last_address: None,
            camera_json: r#"{"type":"center","point":{"lat":1.0,"lon":2.0},"zoom":12}"#.into(),
            shapes_json: shapes_json(&regions),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_suggestion_replies_are_fenced_by_request_number() {
        let html = page(vec![]);
        assert!(html.contains("const seq = ++latestRequest;"));
        assert!(html.contains("seq !== latestRequest"));
    }

    #[test]
    fn test_region_ids_cannot_end_the_map_script() {
        let html = page(vec![Region {
            id: "</script><img src=x>".into(),
            name: "Evil".into(),
            reference_point: LatLon::new(1.0, 2.0),
            coverage: Coverage::Point { action: Action::Include },
        }]);
        let script = html.split("<script>").nth(1).unwrap();
        let script = script.split("</script>").next().unwrap();
        assert!(script.contains("\\u003c/script\\u003e"));
    }
}
