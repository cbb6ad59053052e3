use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;

use dz::models::{Action, AppState, Region, RegionRow, Suggestion};
use dz::services::{CameraCommand, CameraLog, RegionCreationFlow, RegionStore};

use crate::templates::RegionsPageTemplate;

use super::helpers::{build_template_globals, camera_json, render_template, shapes_json};

#[derive(Deserialize)]
pub struct RegionsQuery {
    catalog: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateRegionForm {
    query: String,
    #[serde(default)]
    action: String,
}

#[derive(Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    q: String,
}

/// Which camera move the page should make.
enum Focus {
    Initial,
    All,
    Region(String),
}

/// Catalog from the session; flashes and returns `None` when none is selected.
fn selected_catalog(state: &AppState) -> Option<String> {
    let session = state.session_snapshot()?;
    match session.resolve_catalog(None) {
        Ok(id) => Some(id),
        Err(e) => {
            state.push_flash(e.user_message());
            None
        }
    }
}

async fn render_regions_page(
    state: &AppState,
    catalog_id: Option<String>,
    focus: Focus,
) -> Response {
    let mut regions: Vec<Region> = Vec::new();
    if let Some(id) = &catalog_id {
        match RegionStore::load(id.clone(), state.backend.as_ref()).await {
            Ok(store) => regions = store.regions().to_vec(),
            Err(e) => {
                tracing::warn!(%e, catalog_id = %id, "Failed to load regions");
                state.push_flash(e.user_message());
            }
        }
    }

    let mut map = CameraLog::new();
    let mut focused_id = String::new();
    let camera = match focus {
        Focus::Initial => Some(state.viewport.fit_to_all_or_default(&regions, &mut map)),
        Focus::All => state.viewport.fit_to_all(&regions, &mut map),
        Focus::Region(id) => match regions.iter().find(|r| r.id == id) {
            Some(region) => {
                focused_id = id;
                state.viewport.fit_to_region(region, &mut map)
            }
            None => {
                state.push_flash("That delivery zone no longer exists.");
                None
            }
        },
    };
    let camera: CameraCommand = match camera {
        Some(c) => c,
        None => state.viewport.fit_to_all_or_default(&regions, &mut map),
    };

    let last_address = state
        .session_snapshot()
        .and_then(|s| s.last_address().map(|a| a.label.clone()));

    render_template(RegionsPageTemplate {
        globals: build_template_globals(state),
        catalog_id,
        regions: regions.iter().map(RegionRow::from).collect(),
        focused_id,
        last_address,
        camera_json: camera_json(&camera),
        shapes_json: shapes_json(&regions),
    })
}

pub async fn root_get() -> impl IntoResponse {
    Redirect::to("/regions")
}

pub async fn regions_get(
    State(state): State<AppState>,
    Query(q): Query<RegionsQuery>,
) -> impl IntoResponse {
    let explicit = q
        .catalog
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    if let Some(id) = &explicit {
        let id = id.clone();
        state.update_session(move |s| s.select_catalog(&id)).await;
    }
    let catalog_id = explicit.or_else(|| {
        state
            .session_snapshot()
            .and_then(|s| s.selected_catalog().map(str::to_string))
    });
    render_regions_page(&state, catalog_id, Focus::Initial).await
}

pub async fn regions_all_get(State(state): State<AppState>) -> impl IntoResponse {
    let catalog_id = selected_catalog(&state);
    if catalog_id.is_none() {
        return Redirect::to("/regions").into_response();
    }
    render_regions_page(&state, catalog_id, Focus::All).await
}

pub async fn region_focus_get(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> impl IntoResponse {
    let catalog_id = selected_catalog(&state);
    if catalog_id.is_none() {
        return Redirect::to("/regions").into_response();
    }
    render_regions_page(&state, catalog_id, Focus::Region(region_id)).await
}

pub async fn regions_create_post(
    State(state): State<AppState>,
    Form(form): Form<CreateRegionForm>,
) -> impl IntoResponse {
    let Some(catalog_id) = selected_catalog(&state) else {
        return Redirect::to("/regions").into_response();
    };
    let action = Action::from_str_lossy(&form.action);

    let mut store = RegionStore::new(catalog_id);
    let mut map = CameraLog::new();
    let mut flow =
        RegionCreationFlow::new(state.geocoder.as_ref(), state.backend.as_ref(), &state.viewport);
    let outcome = flow.submit(&mut store, &form.query, action, &mut map).await;

    match outcome {
        Ok(committed) => {
            let label = committed.pending.name.clone();
            let point = committed.pending.reference_point;
            state.update_session(move |s| s.set_last_address(&label, point)).await;
            state.push_flash(format!(
                "Added {} zone: {}",
                committed.pending.coverage.action(),
                committed.pending.name
            ));
            match committed.region {
                Some(region) => {
                    let target = format!("/regions/{}/focus", urlencoding::encode(&region.id));
                    Redirect::to(&target).into_response()
                }
                None => Redirect::to("/regions").into_response(),
            }
        }
        Err(e) => {
            state.push_flash(e.user_message());
            Redirect::to("/regions").into_response()
        }
    }
}

pub async fn region_delete_post(
    State(state): State<AppState>,
    Path(region_id): Path<String>,
) -> impl IntoResponse {
    let Some(catalog_id) = selected_catalog(&state) else {
        return Redirect::to("/regions").into_response();
    };
    let mut store = RegionStore::new(catalog_id);
    match store.remove(state.backend.as_ref(), &region_id).await {
        Ok(()) => state.push_flash("Delivery zone removed."),
        Err(e) => state.push_flash(e.user_message()),
    }
    Redirect::to("/regions").into_response()
}

/// Type-ahead candidates for the search box. Debouncing happens in the browser.
pub async fn suggestions_get(
    State(state): State<AppState>,
    Query(q): Query<SuggestionsQuery>,
) -> Response {
    let query = q.q.trim();
    if query.is_empty() {
        return Json(Vec::<Suggestion>::new()).into_response();
    }
    match state.geocoder.suggest(query).await {
        Ok(places) => Json(places.iter().map(Suggestion::from).collect::<Vec<_>>()).into_response(),
        Err(e) if e.is_no_result() => Json(Vec::<Suggestion>::new()).into_response(),
        Err(e) => {
            tracing::warn!(%e, "Suggestion search failed");
            let body = Json(serde_json::json!({ "error": e.user_message() }));
            (StatusCode::BAD_GATEWAY, body).into_response()
        }
    }
}
