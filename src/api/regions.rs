use serde_json::Value;

use crate::error::RegionError;
use crate::models::{NewRegion, Region, RegionRecord};
use super::client::{api_call, unwrap_data};

fn locations_endpoint(catalog_id: &str) -> String {
    format!("/catalogs/{}/locations", urlencoding::encode(catalog_id))
}

/// Decode a list payload into regions. Records that cannot be converted are
/// skipped with a warning rather than failing the whole list.
pub fn parse_region_list(payload: Value) -> Result<Vec<Region>, RegionError> {
    let data = unwrap_data(payload);
    let records: Vec<Value> = match data {
        Value::Array(arr) => arr,
        Value::Null => Vec::new(),
        other => {
            return Err(RegionError::Decode(format!(
                "expected a list of locations, got {}",
                other
            )))
        }
    };

    let mut regions = Vec::with_capacity(records.len());
    for raw in records {
        let record: RegionRecord = match serde_json::from_value(raw) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%e, "Skipping unreadable location record");
                continue;
            }
        };
        match Region::try_from(record) {
            Ok(region) => regions.push(region),
            Err(e) => tracing::warn!(%e, "Skipping invalid location"),
        }
    }
    Ok(regions)
}

/// Load every delivery location of a catalog.
pub async fn load_regions(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    catalog_id: &str,
) -> Result<Vec<Region>, RegionError> {
    let endpoint = locations_endpoint(catalog_id);
    let payload = api_call(client, api_base_url, api_token, "GET", &endpoint, None, None).await?;
    let regions = parse_region_list(payload)?;
    tracing::debug!(catalog_id, count = regions.len(), "Loaded locations");
    Ok(regions)
}

/// Persist a new location. Returns the stored record when the backend echoes
/// it back, `None` otherwise.
///
/// Once the POST succeeded the location exists, so a reply that is not a
/// readable record (an acknowledgement message, a partial record) is logged
/// and reported as `None`; the caller re-reads the list to find it.
pub async fn create_region(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    catalog_id: &str,
    region: &NewRegion,
) -> Result<Option<Region>, RegionError> {
    let body = serde_json::to_value(RegionRecord::from(region))
        .map_err(|e| RegionError::Decode(e.to_string()))?;
    let endpoint = locations_endpoint(catalog_id);
    let payload = api_call(client, api_base_url, api_token, "POST", &endpoint, Some(body), None)
        .await
        .map_err(persistence_error)?;

    let data = match unwrap_data(payload) {
        Value::Null => return Ok(None),
        data => data,
    };
    let created = serde_json::from_value::<RegionRecord>(data)
        .map_err(|e| RegionError::Decode(e.to_string()))
        .and_then(Region::try_from);
    match created {
        Ok(region) => Ok(Some(region)),
        Err(e) => {
            tracing::warn!(
                %e,
                catalog_id,
                "Location created but the reply is not a location record"
            );
            Ok(None)
        }
    }
}

/// Delete a location. A 404 counts as success: the location is already gone.
pub async fn delete_region(
    client: &reqwest::Client,
    api_base_url: &str,
    api_token: &str,
    catalog_id: &str,
    region_id: &str,
) -> Result<(), RegionError> {
    let endpoint = format!("{}/{}", locations_endpoint(catalog_id), urlencoding::encode(region_id));
    match api_call(client, api_base_url, api_token, "DELETE", &endpoint, None, None).await {
        Ok(_) => Ok(()),
        Err(RegionError::Api { status: 404, .. }) => {
            tracing::info!(catalog_id, region_id, "Location already deleted");
            Ok(())
        }
        Err(e) => Err(persistence_error(e)),
    }
}

/// Backend rejections of a write are surfaced as persistence failures;
/// transport errors keep their own kind.
fn persistence_error(e: RegionError) -> RegionError {
    match e {
        RegionError::Api { status, body } => {
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("detail")
                        .or_else(|| v.get("message"))
                        .and_then(|d| d.as_str())
                        .map(|s| s.to_string())
                })
                .unwrap_or_else(|| format!("HTTP {}", status));
            RegionError::Persistence(detail)
        }
        other => other,
    }
}
