//! Trip catalog service.
//!
//! Public reads are anonymous. Writes use the backend's nested
//! attributes convention: child rows are submitted under
//! `<child>_attributes`, with `id` present for updates, absent for
//! creates, and a `_destroy: true` marker for deletions. Blank new
//! rows are filtered client-side before submission.

use serde_json::{Value, json};

use crate::error::{ApiError, Result};
use crate::http::{ApiClient, HttpMethod, RequestOptions, build_query_string};
use crate::models::{Page, Trip, TripCategory};
use crate::normalize::{decode, decode_collection, extract_object, extract_pagination};

// =========================================================
// Filters
// =========================================================

#[derive(Debug, Clone, Default)]
pub struct TripFilters {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<TripCategory>,
    /// Only honored by the server when auth is attached; inactive
    /// trips are admin-only. Setting this flag makes the request
    /// authenticated.
    pub include_inactive: bool,
}

impl TripFilters {
    fn query_string(&self) -> String {
        build_query_string([
            ("page", self.page.map(|p| p.to_string())),
            ("per_page", self.per_page.map(|p| p.to_string())),
            (
                "category",
                self.category.map(|c| {
                    match c {
                        TripCategory::Domestic => "domestic",
                        TripCategory::International => "international",
                    }
                    .to_string()
                }),
            ),
            (
                "include_inactive",
                self.include_inactive.then(|| "true".to_string()),
            ),
        ])
    }
}

// =========================================================
// Editable rows (nested attributes)
// =========================================================

/// One editable highlight row as the admin form tracks it.
#[derive(Debug, Clone, Default)]
pub struct HighlightRow {
    /// Present for rows that already exist server-side.
    pub id: Option<i64>,
    pub text: String,
    /// Existing row flagged for deletion.
    pub remove: bool,
}

/// One editable inclusion row; `included` distinguishes the two lists.
#[derive(Debug, Clone, Default)]
pub struct InclusionRow {
    pub id: Option<i64>,
    pub item: String,
    pub included: bool,
    pub remove: bool,
}

/// One editable itinerary day.
#[derive(Debug, Clone, Default)]
pub struct ItineraryRow {
    pub id: Option<i64>,
    pub day: u32,
    pub title: String,
    pub description: Option<String>,
    pub remove: bool,
}

/// Everything the admin form submits for a create or update.
#[derive(Debug, Clone, Default)]
pub struct TripDraft {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: TripCategory,
    pub featured: bool,
    pub active: bool,
    pub highlights: Vec<HighlightRow>,
    pub inclusions: Vec<InclusionRow>,
    pub itinerary: Vec<ItineraryRow>,
}

/// Shape highlight rows into `highlights_attributes`.
///
/// Blank new rows are dropped; existing rows flagged for removal become
/// `{id, _destroy: true}` markers; blank edits of existing rows are
/// kept (the server decides whether to reject them).
pub fn highlight_attributes(rows: &[HighlightRow]) -> Vec<Value> {
    rows.iter()
        .filter_map(|row| {
            if row.remove {
                let id = row.id?;
                return Some(json!({ "id": id, "_destroy": true }));
            }
            if row.id.is_none() && row.text.trim().is_empty() {
                return None;
            }
            let mut entry = json!({ "text": row.text });
            if let Some(id) = row.id {
                entry["id"] = json!(id);
            }
            Some(entry)
        })
        .collect()
}

pub fn inclusion_attributes(rows: &[InclusionRow]) -> Vec<Value> {
    rows.iter()
        .filter_map(|row| {
            if row.remove {
                let id = row.id?;
                return Some(json!({ "id": id, "_destroy": true }));
            }
            if row.id.is_none() && row.item.trim().is_empty() {
                return None;
            }
            let kind = if row.included { "included" } else { "excluded" };
            let mut entry = json!({ "item": row.item, "kind": kind });
            if let Some(id) = row.id {
                entry["id"] = json!(id);
            }
            Some(entry)
        })
        .collect()
}

pub fn itinerary_attributes(rows: &[ItineraryRow]) -> Vec<Value> {
    rows.iter()
        .filter_map(|row| {
            if row.remove {
                let id = row.id?;
                return Some(json!({ "id": id, "_destroy": true }));
            }
            if row.id.is_none() && row.title.trim().is_empty() {
                return None;
            }
            let mut entry = json!({ "day": row.day, "title": row.title });
            if let Some(description) = &row.description {
                entry["description"] = json!(description);
            }
            if let Some(id) = row.id {
                entry["id"] = json!(id);
            }
            Some(entry)
        })
        .collect()
}

fn draft_body(draft: &TripDraft) -> Value {
    let mut body = json!({
        "title": draft.title,
        "price": draft.price,
        "category": draft.category,
        "featured": draft.featured,
        "active": draft.active,
        "highlights_attributes": highlight_attributes(&draft.highlights),
        "inclusions_attributes": inclusion_attributes(&draft.inclusions),
        "itinerary_attributes": itinerary_attributes(&draft.itinerary),
    });
    if let Some(description) = &draft.description {
        body["description"] = json!(description);
    }
    body
}

// =========================================================
// Service
// =========================================================

#[derive(Clone)]
pub struct TripService {
    client: ApiClient,
}

impl TripService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List trips. Anonymous unless `include_inactive` is requested.
    pub async fn get_trips(&self, filters: &TripFilters) -> Result<Page<Trip>> {
        let qs = filters.query_string();
        let endpoint = if qs.is_empty() {
            "/trips".to_string()
        } else {
            format!("/trips?{qs}")
        };

        let opts = if filters.include_inactive {
            RequestOptions::get()
        } else {
            RequestOptions::get().anonymous()
        };

        let raw = self.client.request(&endpoint, opts).await?;
        let items: Vec<Trip> = decode_collection(&raw, "trips")?;
        let pagination = extract_pagination(&raw, items.len());
        Ok(Page { items, pagination })
    }

    pub async fn get_trip(&self, trip_id: i64) -> Result<Trip> {
        let raw = self
            .client
            .request(&format!("/trips/{trip_id}"), RequestOptions::get().anonymous())
            .await?;
        decode(extract_object(&raw, "trip"))
    }

    pub async fn create_trip(&self, draft: &TripDraft) -> Result<Trip> {
        if draft.title.trim().is_empty() {
            return Err(ApiError::invalid("trip title must not be blank"));
        }
        let raw = self
            .client
            .request(
                "/trips",
                RequestOptions::json(HttpMethod::Post, draft_body(draft)),
            )
            .await?;
        decode(extract_object(&raw, "trip"))
    }

    pub async fn update_trip(&self, trip_id: i64, draft: &TripDraft) -> Result<Trip> {
        let raw = self
            .client
            .request(
                &format!("/trips/{trip_id}"),
                RequestOptions::json(HttpMethod::Put, draft_body(draft)),
            )
            .await?;
        decode(extract_object(&raw, "trip"))
    }

    pub async fn delete_trip(&self, trip_id: i64) -> Result<()> {
        self.client
            .request(
                &format!("/trips/{trip_id}"),
                RequestOptions::method(HttpMethod::Delete),
            )
            .await?;
        Ok(())
    }

    /// Flip the featured flag. Single-purpose admin call.
    pub async fn toggle_featured(&self, trip_id: i64) -> Result<()> {
        self.client
            .request(
                &format!("/trips/{trip_id}/toggle_featured"),
                RequestOptions::method(HttpMethod::Post),
            )
            .await?;
        Ok(())
    }

    /// Bump the view counter. Anonymous, fire-and-forget; callers may
    /// ignore the result.
    pub async fn increment_view(&self, trip_id: i64) -> Result<()> {
        self.client
            .request(
                &format!("/trips/{trip_id}/increment_view"),
                RequestOptions::method(HttpMethod::Post).anonymous(),
            )
            .await?;
        Ok(())
    }
}
