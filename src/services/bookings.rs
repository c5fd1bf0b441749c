//! Booking service.
//!
//! Lifecycle and payment state are orthogonal axes; each mutation sets
//! one of them. Guest-vs-account intent is explicit here: the server
//! still decides account association from the auth header, but the
//! caller states which mode it wants instead of relying on whatever
//! token happens to be lying around.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::error::{ApiError, Result};
use crate::http::{ApiClient, HttpMethod, RequestOptions, build_query_string};
use crate::models::{Booking, Page, PaymentStatus};
use crate::normalize::{decode, decode_collection, extract_object, extract_pagination};

// =========================================================
// Creation payload
// =========================================================

/// Who the reservation is for.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingIdentity {
    /// Book against the logged-in account. Requires a session; the
    /// bearer token is what associates the booking server-side.
    Account,
    /// Book as a guest. No auth header is sent even if a token exists,
    /// so the server never associates the booking with an account.
    Guest {
        name: String,
        email: String,
        phone: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub trip_id: i64,
    pub identity: BookingIdentity,
    pub travelers: u32,
    pub travel_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl BookingRequest {
    fn body(&self) -> Value {
        let mut body = json!({
            "trip_id": self.trip_id,
            "travelers": self.travelers,
        });
        if let Some(date) = self.travel_date {
            body["travel_date"] = json!(date.format("%Y-%m-%d").to_string());
        }
        if let Some(notes) = &self.notes {
            if !notes.trim().is_empty() {
                body["notes"] = json!(notes);
            }
        }
        if let BookingIdentity::Guest { name, email, phone } = &self.identity {
            body["customer_name"] = json!(name);
            body["customer_email"] = json!(email);
            if let Some(phone) = phone {
                if !phone.trim().is_empty() {
                    body["customer_phone"] = json!(phone);
                }
            }
        }
        body
    }
}

// =========================================================
// Service
// =========================================================

#[derive(Clone)]
pub struct BookingService {
    client: ApiClient,
}

impl BookingService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create a reservation. The returned booking carries the
    /// server-generated reference in both identity modes.
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking> {
        let opts = match &request.identity {
            BookingIdentity::Account => {
                if !self.client.session().is_authenticated() {
                    return Err(ApiError::invalid(
                        "account booking requested without a session",
                    ));
                }
                RequestOptions::json(HttpMethod::Post, request.body())
            }
            BookingIdentity::Guest { .. } => {
                RequestOptions::json(HttpMethod::Post, request.body()).anonymous()
            }
        };

        let raw = self.client.request("/bookings", opts).await?;
        decode(extract_object(&raw, "booking"))
    }

    /// Bookings of the logged-in user.
    pub async fn get_my_bookings(&self) -> Result<Page<Booking>> {
        let raw = self
            .client
            .request("/bookings/my", RequestOptions::get())
            .await?;
        let items: Vec<Booking> = decode_collection(&raw, "bookings")?;
        let pagination = extract_pagination(&raw, items.len());
        Ok(Page { items, pagination })
    }

    pub async fn get_booking(&self, booking_id: i64) -> Result<Booking> {
        let raw = self
            .client
            .request(&format!("/bookings/{booking_id}"), RequestOptions::get())
            .await?;
        decode(extract_object(&raw, "booking"))
    }

    /// Guest retrieval by reference + email. Anonymous: the reference
    /// is the only handle a guest has.
    pub async fn lookup_by_reference(&self, reference: &str, email: &str) -> Result<Booking> {
        let qs = build_query_string([
            ("reference", Some(reference.to_string())),
            ("email", Some(email.to_string())),
        ]);
        let raw = self
            .client
            .request(
                &format!("/bookings/lookup?{qs}"),
                RequestOptions::get().anonymous(),
            )
            .await?;
        decode(extract_object(&raw, "booking"))
    }

    /// Admin listing with filters.
    pub async fn get_bookings(&self, page: Option<u32>, per_page: Option<u32>) -> Result<Page<Booking>> {
        let qs = build_query_string([
            ("page", page.map(|p| p.to_string())),
            ("per_page", per_page.map(|p| p.to_string())),
        ]);
        let endpoint = if qs.is_empty() {
            "/bookings".to_string()
        } else {
            format!("/bookings?{qs}")
        };
        let raw = self.client.request(&endpoint, RequestOptions::get()).await?;
        let items: Vec<Booking> = decode_collection(&raw, "bookings")?;
        let pagination = extract_pagination(&raw, items.len());
        Ok(Page { items, pagination })
    }

    // --- Lifecycle mutations (admin) ---

    pub async fn confirm_booking(&self, booking_id: i64) -> Result<Booking> {
        self.lifecycle(booking_id, "confirm").await
    }

    pub async fn cancel_booking(&self, booking_id: i64) -> Result<Booking> {
        self.lifecycle(booking_id, "cancel").await
    }

    pub async fn complete_booking(&self, booking_id: i64) -> Result<Booking> {
        self.lifecycle(booking_id, "complete").await
    }

    async fn lifecycle(&self, booking_id: i64, action: &str) -> Result<Booking> {
        let raw = self
            .client
            .request(
                &format!("/bookings/{booking_id}/{action}"),
                RequestOptions::method(HttpMethod::Patch),
            )
            .await?;
        decode(extract_object(&raw, "booking"))
    }

    /// Payment axis mutation, independent of lifecycle state.
    pub async fn update_payment_status(
        &self,
        booking_id: i64,
        payment_status: PaymentStatus,
    ) -> Result<Booking> {
        let raw = self
            .client
            .request(
                &format!("/bookings/{booking_id}/payment_status"),
                RequestOptions::json(
                    HttpMethod::Patch,
                    json!({ "payment_status": payment_status }),
                ),
            )
            .await?;
        decode(extract_object(&raw, "booking"))
    }
}
