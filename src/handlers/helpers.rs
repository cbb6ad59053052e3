use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

use dz::models::{AppState, LatLon, Region};
use dz::services::CameraCommand;
use dz::utils::hostname_from_url;

#[derive(Default)]
pub struct TemplateGlobals {
    pub api_hostname: String,
    pub geocoder_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

pub fn build_template_globals(state: &AppState) -> TemplateGlobals {
    let flash_messages = state.take_flash_messages();
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        api_hostname: hostname_from_url(&state.api_base_url),
        geocoder_hostname: hostname_from_url(&state.geocoder_base_url),
        flash_messages,
        has_flash_messages,
    }
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Shape data handed to the map script.
#[derive(Serialize)]
struct MapShape<'a> {
    id: &'a str,
    action: &'static str,
    point: LatLon,
    ring: &'a [LatLon],
}

/// JSON that is safe to place inside a `<script>` element. `<`, `>` and `&`
/// only occur inside strings, where the `\u` escapes decode to the same text.
fn script_json<T: Serialize>(value: &T, fallback: &str) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026"),
        Err(e) => {
            tracing::error!(%e, "Failed to serialize map data");
            fallback.to_string()
        }
    }
}

pub fn shapes_json(regions: &[Region]) -> String {
    let shapes: Vec<MapShape> = regions
        .iter()
        .filter(|r| r.reference_point.is_valid())
        .map(|r| MapShape {
            id: &r.id,
            action: r.action().as_str(),
            point: r.reference_point,
            ring: r.coverage.ring().map(|ring| ring.as_slice()).unwrap_or(&[]),
        })
        .collect();
    script_json(&shapes, "[]")
}

pub fn camera_json(camera: &CameraCommand) -> String {
    script_json(camera, "null")
}
