//! Client-side session & resource-access layer for the Wayfare travel
//! storefront.
//!
//! The crate owns everything between the UI and the REST backend:
//! - [`http`]: request building, bearer attachment, tolerant response
//!   and error parsing, over a pluggable transport;
//! - [`session`]: the persisted auth token + cached user snapshot;
//! - [`services`]: one typed façade per backend resource, normalizing
//!   the backend's inconsistent envelopes and key spellings;
//! - [`guard`]: mount-time admission checks for protected subtrees;
//! - [`coordinators`]: compound flows (favorite toggling, booking
//!   creation) shared by multiple pages.
//!
//! UI rendering, theming and the routing tree live elsewhere; this
//! layer hands them typed results and redirect decisions.

pub mod config;
pub mod coordinators;
pub mod error;
pub mod guard;
pub mod http;
pub mod models;
pub mod normalize;
pub mod services;
pub mod session;
pub mod storage;

use std::rc::Rc;

pub use config::ApiConfig;
pub use error::{ApiError, ErrorKind, Result};
pub use http::{ApiClient, HttpTransport};
pub use session::SessionStore;

use coordinators::{BookingFlow, FavoriteToggler};
use http::UnauthorizedHook;
use services::admin::AdminService;
use services::auth::AuthService;
use services::bookings::BookingService;
use services::contacts::ContactService;
use services::favorites::FavoriteService;
use services::newsletter::NewsletterService;
use services::payments::PaymentService;
use services::reviews::ReviewService;
use services::trips::TripService;
use services::uploads::UploadService;
use storage::StorageAdapter;

/// Everything wired together: one client, one session, one service per
/// resource. Cheap to clone and hand to any page.
#[derive(Clone)]
pub struct Wayfare {
    pub session: SessionStore,
    pub auth: AuthService,
    pub trips: TripService,
    pub bookings: BookingService,
    pub favorites: FavoriteService,
    pub reviews: ReviewService,
    pub contacts: ContactService,
    pub newsletter: NewsletterService,
    pub payments: PaymentService,
    pub admin: AdminService,
    pub uploads: UploadService,
    pub favorite_toggler: FavoriteToggler,
    pub booking_flow: BookingFlow,
}

impl Wayfare {
    /// Wire the layer over explicit storage and transport. The 401
    /// hook is installed by default: an expired session is evicted
    /// centrally instead of by every caller (guards still own the
    /// redirect).
    pub fn new(
        config: ApiConfig,
        storage: Rc<dyn StorageAdapter>,
        transport: Rc<dyn HttpTransport>,
    ) -> Self {
        let session = SessionStore::new(storage);
        let evicted = session.clone();
        let hook: UnauthorizedHook = Rc::new(move || evicted.clear());
        let client =
            ApiClient::new(config, session.clone(), transport).with_unauthorized_hook(hook);
        Self::from_client(client, session)
    }

    /// Wire over an existing client (tests, custom hooks).
    pub fn from_client(client: ApiClient, session: SessionStore) -> Self {
        let favorites = FavoriteService::new(client.clone());
        let bookings = BookingService::new(client.clone());
        Self {
            session,
            auth: AuthService::new(client.clone()),
            trips: TripService::new(client.clone()),
            favorite_toggler: FavoriteToggler::new(favorites.clone()),
            booking_flow: BookingFlow::new(bookings.clone()),
            bookings,
            favorites,
            reviews: ReviewService::new(client.clone()),
            contacts: ContactService::new(client.clone()),
            newsletter: NewsletterService::new(client.clone()),
            payments: PaymentService::new(client.clone()),
            admin: AdminService::new(client.clone()),
            uploads: UploadService::new(client),
        }
    }

    /// Browser wiring: LocalStorage + fetch.
    #[cfg(target_arch = "wasm32")]
    pub fn browser(config: ApiConfig) -> Self {
        Self::new(
            config,
            Rc::new(storage::LocalStorageAdapter),
            Rc::new(http::FetchTransport::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockTransport;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn app_over(transport: Rc<MockTransport>) -> Wayfare {
        Wayfare::new(
            ApiConfig::new("http://api.test/v1"),
            Rc::new(MemoryStorage::new()),
            transport,
        )
    }

    #[tokio::test]
    async fn the_wired_layer_evicts_the_session_on_401() {
        let transport = MockTransport::new();
        let app = app_over(transport.clone());
        app.session.set_token("expired");

        transport.push_json(401, json!({ "message": "Token expired" }));
        let err = app.bookings.get_my_bookings().await.unwrap_err();

        assert_eq!(err.status, Some(401));
        // Centralized eviction: no caller had to clear anything.
        assert!(!app.session.is_authenticated());
    }

    #[tokio::test]
    async fn a_failed_login_keeps_the_existing_session() {
        let transport = MockTransport::new();
        let app = app_over(transport.clone());
        app.session.set_token("still-good");

        // Login is anonymous, so its 401 says nothing about the
        // stored session.
        transport.push_json(401, json!({ "message": "Invalid credentials" }));
        let err = app.auth.login("root@example.com", "typo").await.unwrap_err();

        assert_eq!(err.status, Some(401));
        assert!(app.session.is_authenticated());
    }

    #[tokio::test]
    async fn login_then_guarded_admin_visit() {
        let transport = MockTransport::new();
        let app = app_over(transport.clone());

        // 1. Login as an admin
        transport.push_json(
            200,
            json!({ "data": { "token": "tok", "user": { "id": 1, "role": "admin" } } }),
        );
        let outcome = app.auth.login("root@example.com", "pw").await.unwrap();
        assert!(outcome.user.role.is_admin());
        assert!(app.session.is_admin());

        // 2. Admin guard admits after the refresh confirms the role
        transport.push_json(200, json!({ "user": { "id": 1, "role": "admin" } }));
        let guard = crate::guard::RouteGuard::admin(app.auth.clone());
        assert!(guard.check().await.is_ready());
    }
}
