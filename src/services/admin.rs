//! Admin back-office service: user management, dashboard aggregates,
//! analytics.
//!
//! Every call here requires an elevated role, but the service issues
//! them regardless of the local role cache: the server is the
//! enforcement point, the route guards are only a UX convenience.

use serde_json::json;

use crate::error::Result;
use crate::http::{ApiClient, HttpMethod, RequestOptions, build_query_string};
use crate::models::{AnalyticsPoint, DashboardStats, Page, User, UserRole};
use crate::normalize::{decode, decode_collection, extract_object, extract_pagination};

#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

/// Badge counts shown on the admin navigation after admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BadgeCounts {
    pub pending_bookings: u64,
    pub unread_contacts: u64,
}

#[derive(Clone)]
pub struct AdminService {
    client: ApiClient,
}

impl AdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_users(&self, filters: &UserFilters) -> Result<Page<User>> {
        let qs = build_query_string([
            ("page", filters.page.map(|p| p.to_string())),
            ("per_page", filters.per_page.map(|p| p.to_string())),
            (
                "role",
                filters.role.and_then(|r| {
                    serde_json::to_value(r)
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_owned))
                }),
            ),
            ("search", filters.search.clone()),
        ]);
        let endpoint = if qs.is_empty() {
            "/admin/users".to_string()
        } else {
            format!("/admin/users?{qs}")
        };
        let raw = self.client.request(&endpoint, RequestOptions::get()).await?;
        let items: Vec<User> = decode_collection(&raw, "users")?;
        let pagination = extract_pagination(&raw, items.len());
        Ok(Page { items, pagination })
    }

    pub async fn update_user_role(&self, user_id: i64, role: UserRole) -> Result<User> {
        let raw = self
            .client
            .request(
                &format!("/admin/users/{user_id}/role"),
                RequestOptions::json(HttpMethod::Patch, json!({ "role": role })),
            )
            .await?;
        decode(extract_object(&raw, "user"))
    }

    pub async fn set_user_active(&self, user_id: i64, active: bool) -> Result<User> {
        let raw = self
            .client
            .request(
                &format!("/admin/users/{user_id}/active"),
                RequestOptions::json(HttpMethod::Patch, json!({ "active": active })),
            )
            .await?;
        decode(extract_object(&raw, "user"))
    }

    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        let raw = self
            .client
            .request("/admin/dashboard", RequestOptions::get())
            .await?;
        decode(extract_object(&raw, "stats"))
    }

    /// Analytics series for a named range (`7d`, `30d`, `12m`).
    pub async fn get_analytics(&self, range: &str) -> Result<Vec<AnalyticsPoint>> {
        let qs = build_query_string([("range", Some(range.to_string()))]);
        let raw = self
            .client
            .request(&format!("/admin/analytics?{qs}"), RequestOptions::get())
            .await?;
        decode_collection(&raw, "analytics")
    }

    /// Supplementary nav badges, derived from the dashboard aggregate.
    pub async fn badge_counts(&self) -> Result<BadgeCounts> {
        let stats = self.get_dashboard_stats().await?;
        Ok(BadgeCounts {
            pending_bookings: stats.pending_bookings,
            unread_contacts: stats.unread_contacts,
        })
    }
}
