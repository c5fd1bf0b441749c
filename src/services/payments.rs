//! Payment records (back office).

use serde_json::json;

use crate::error::{ApiError, Result};
use crate::http::{ApiClient, HttpMethod, RequestOptions, build_query_string};
use crate::models::{Page, PaymentRecord, PaymentStatus};
use crate::normalize::{decode, decode_collection, extract_object, extract_pagination};

#[derive(Debug, Clone, Default)]
pub struct PaymentFilters {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<PaymentStatus>,
}

#[derive(Clone)]
pub struct PaymentService {
    client: ApiClient,
}

impl PaymentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_payments(&self, filters: &PaymentFilters) -> Result<Page<PaymentRecord>> {
        let qs = build_query_string([
            ("page", filters.page.map(|p| p.to_string())),
            ("per_page", filters.per_page.map(|p| p.to_string())),
            (
                "status",
                filters.status.and_then(|s| {
                    serde_json::to_value(s)
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_owned))
                }),
            ),
        ]);
        let endpoint = if qs.is_empty() {
            "/payments".to_string()
        } else {
            format!("/payments?{qs}")
        };
        let raw = self.client.request(&endpoint, RequestOptions::get()).await?;
        let items: Vec<PaymentRecord> = decode_collection(&raw, "payments")?;
        let pagination = extract_pagination(&raw, items.len());
        Ok(Page { items, pagination })
    }

    pub async fn record_payment(
        &self,
        booking_id: i64,
        amount: f64,
        method: Option<&str>,
    ) -> Result<PaymentRecord> {
        if amount <= 0.0 {
            return Err(ApiError::invalid("payment amount must be positive"));
        }
        let mut body = json!({ "booking_id": booking_id, "amount": amount });
        if let Some(method) = method {
            if !method.trim().is_empty() {
                body["method"] = json!(method);
            }
        }
        let raw = self
            .client
            .request("/payments", RequestOptions::json(HttpMethod::Post, body))
            .await?;
        decode(extract_object(&raw, "payment"))
    }
}
