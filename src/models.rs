//! Canonical domain types.
//!
//! Every struct here is the *normalized* representation: snake_case
//! field names, one canonical spelling per logical field. Raw payloads
//! are folded into this shape by [`crate::normalize`] before decoding,
//! so no serde aliases are needed. Fields the backend omits on some
//! endpoints carry `#[serde(default)]`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =========================================================
// Enumerations
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
    SuperAdmin,
}

impl UserRole {
    /// Whether this role grants access to the admin area.
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TripCategory {
    #[default]
    Domestic,
    International,
}

/// Booking lifecycle state. Server-authoritative; the client mirrors it
/// for display and for transition hints only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Transitions the server accepts. `cancel` is legal from any
    /// non-terminal state.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        match (self, next) {
            (BookingStatus::Pending, BookingStatus::Confirmed) => true,
            (BookingStatus::Confirmed, BookingStatus::Completed) => true,
            (_, BookingStatus::Cancelled) => !self.is_terminal(),
            _ => false,
        }
    }
}

/// Payment state, independent of the booking lifecycle axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
    Refunded,
}

// =========================================================
// Identity
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

// =========================================================
// Trips
// =========================================================

/// Inclusions of a travel package, split in two lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Inclusions {
    #[serde(default)]
    pub included: Vec<String>,
    #[serde(default)]
    pub excluded: Vec<String>,
}

/// One ordered day of a trip itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    #[serde(default)]
    pub id: Option<i64>,
    pub day: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: TripCategory,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub inclusions: Inclusions,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =========================================================
// Bookings
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    /// Server-generated, human-shareable identifier. The only handle a
    /// guest without an account has on their reservation.
    #[serde(default)]
    pub booking_reference: String,
    pub trip_id: i64,
    /// Absent for guest bookings.
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default = "default_one")]
    pub travelers: u32,
    #[serde(default)]
    pub travel_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_one() -> u32 {
    1
}

// =========================================================
// Favorites & reviews
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(default)]
    pub id: Option<i64>,
    pub trip_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Some listings embed the trip record, some return bare links.
    #[serde(default)]
    pub trip: Option<Trip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub trip_id: i64,
    #[serde(default)]
    pub booking_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    /// Gates customer-facing visibility.
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =========================================================
// Back-office records
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub booking_id: i64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_bookings: u64,
    #[serde(default)]
    pub pending_bookings: u64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_trips: u64,
    #[serde(default)]
    pub unread_contacts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsPoint {
    pub label: String,
    #[serde(default)]
    pub bookings: u64,
    #[serde(default)]
    pub revenue: f64,
}

// =========================================================
// Pagination
// =========================================================

/// Canonical pagination block. The backend spells the total as either
/// `total_count` or `total`; normalization resolves it to `total_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total_count: 0,
            page: 1,
            per_page: 0,
        }
    }
}

/// One page of a listed resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
