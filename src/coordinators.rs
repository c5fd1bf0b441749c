//! Cross-page coordinators layered on the resource services.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::error::{ApiError, Result};
use crate::models::Booking;
use crate::services::bookings::{BookingIdentity, BookingRequest, BookingService};
use crate::services::favorites::FavoriteService;

// =========================================================
// Favorite toggling
// =========================================================

/// Result of a toggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The trip is now favorited.
    Added,
    /// The trip is no longer favorited.
    Removed,
    /// A toggle for this trip was already in flight; nothing was sent.
    Busy,
}

/// Idempotent toggle over the check/add/remove primitives.
///
/// There is no native toggle endpoint, so this is a check-then-act
/// sequence with a window between the read and the write. Overlapping
/// toggles for the same trip from this client are serialized by a
/// pending-operation set keyed by trip id: the second attempt returns
/// [`ToggleOutcome::Busy`] instead of racing. Other clients (or other
/// tabs) can still interleave; the server's state wins.
#[derive(Clone)]
pub struct FavoriteToggler {
    favorites: FavoriteService,
    pending: Rc<RefCell<HashSet<i64>>>,
}

impl FavoriteToggler {
    pub fn new(favorites: FavoriteService) -> Self {
        Self {
            favorites,
            pending: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    pub async fn toggle(&self, trip_id: i64) -> Result<ToggleOutcome> {
        // Claim the trip id before suspending; drop the borrow first.
        {
            let mut pending = self.pending.borrow_mut();
            if !pending.insert(trip_id) {
                return Ok(ToggleOutcome::Busy);
            }
        }

        let outcome = self.run(trip_id).await;
        self.pending.borrow_mut().remove(&trip_id);
        outcome
    }

    async fn run(&self, trip_id: i64) -> Result<ToggleOutcome> {
        if self.favorites.check_favorite(trip_id).await? {
            self.favorites.remove_favorite(trip_id).await?;
            Ok(ToggleOutcome::Removed)
        } else {
            self.favorites.add_favorite(trip_id).await?;
            Ok(ToggleOutcome::Added)
        }
    }
}

// =========================================================
// Booking creation flow
// =========================================================

/// Multi-step booking creation shared by the trip page and the
/// checkout page: validate locally, submit, hand back the normalized
/// booking with its server-generated reference.
#[derive(Clone)]
pub struct BookingFlow {
    bookings: BookingService,
}

impl BookingFlow {
    pub fn new(bookings: BookingService) -> Self {
        Self { bookings }
    }

    /// Local validation, so forms can reject before any network call.
    pub fn validate(request: &BookingRequest) -> Result<()> {
        if request.travelers == 0 {
            return Err(ApiError::invalid("at least one traveler is required"));
        }
        if let BookingIdentity::Guest { name, email, .. } = &request.identity {
            if name.trim().is_empty() {
                return Err(ApiError::invalid("guest name is required"));
            }
            if !email.contains('@') {
                return Err(ApiError::invalid("a valid guest email is required"));
            }
        }
        Ok(())
    }

    pub async fn submit(&self, request: &BookingRequest) -> Result<Booking> {
        Self::validate(request)?;
        self.bookings.create_booking(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::{MockTransport, test_client};
    use serde_json::json;
    use std::rc::Rc;

    fn toggler() -> (FavoriteToggler, Rc<MockTransport>) {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        (FavoriteToggler::new(FavoriteService::new(client)), transport)
    }

    #[tokio::test]
    async fn toggle_converges_from_not_favorited() {
        let (toggler, transport) = toggler();

        // 1. Check answers "not favorited"
        transport.push_json(200, json!({ "favorited": false }));
        // 2. Add succeeds
        transport.push_json(201, json!({ "favorite": { "trip_id": 7 } }));

        assert_eq!(toggler.toggle(7).await.unwrap(), ToggleOutcome::Added);
        assert!(transport.sent(0).url.contains("/favorites/check?trip_id=7"));
        assert!(transport.sent(1).url.ends_with("/favorites"));
    }

    #[tokio::test]
    async fn toggle_converges_from_favorited() {
        let (toggler, transport) = toggler();

        transport.push_json(200, json!({ "favorited": true }));
        transport.push_raw(204, "");

        assert_eq!(toggler.toggle(7).await.unwrap(), ToggleOutcome::Removed);
        assert!(transport.sent(1).url.ends_with("/favorites/7"));
    }

    #[tokio::test]
    async fn a_failed_toggle_releases_the_pending_claim() {
        let (toggler, transport) = toggler();

        transport.push_network_error("offline");
        toggler.toggle(7).await.unwrap_err();

        // The claim is gone: a retry reaches the wire again.
        transport.push_json(200, json!({ "favorited": false }));
        transport.push_json(201, json!({}));
        assert_eq!(toggler.toggle(7).await.unwrap(), ToggleOutcome::Added);
    }

    #[tokio::test]
    async fn pending_claim_is_per_trip() {
        let (toggler, transport) = toggler();

        // Simulate an in-flight toggle for trip 7 by holding its claim.
        toggler.pending.borrow_mut().insert(7);

        assert_eq!(toggler.toggle(7).await.unwrap(), ToggleOutcome::Busy);
        assert_eq!(transport.request_count(), 0);

        // A different trip is unaffected.
        transport.push_json(200, json!({ "favorited": false }));
        transport.push_json(201, json!({}));
        assert_eq!(toggler.toggle(8).await.unwrap(), ToggleOutcome::Added);
    }

    #[tokio::test]
    async fn booking_flow_validates_before_submitting() {
        let (client, transport, _) = test_client();
        let flow = BookingFlow::new(BookingService::new(client));

        let request = BookingRequest {
            trip_id: 7,
            identity: BookingIdentity::Guest {
                name: String::new(),
                email: "ada@example.com".into(),
                phone: None,
            },
            travelers: 2,
            travel_date: None,
            notes: None,
        };

        flow.submit(&request).await.unwrap_err();
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn booking_flow_returns_the_reference() {
        let (client, transport, _) = test_client();
        let flow = BookingFlow::new(BookingService::new(client));

        transport.push_json(
            201,
            json!({ "booking": {
                "id": 1, "booking_reference": "WF-2026-0099",
                "trip_id": 7, "status": "pending", "payment_status": "unpaid",
            }}),
        );

        let request = BookingRequest {
            trip_id: 7,
            identity: BookingIdentity::Guest {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: None,
            },
            travelers: 1,
            travel_date: None,
            notes: None,
        };

        let booking = flow.submit(&request).await.unwrap();
        assert_eq!(booking.booking_reference, "WF-2026-0099");
    }
}
