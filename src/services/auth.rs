//! Authentication flows.
//!
//! State machine: `Anonymous -> Authenticating -> Authenticated`, back
//! to `Anonymous` on logout or when a caller reacts to a 401. The
//! session store never auto-evicts; eviction is either the caller's
//! job or the client's installed 401 hook.

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ApiError, Result};
use crate::http::{ApiClient, HttpMethod, RequestOptions};
use crate::models::User;
use crate::normalize::{decode, extract_object};

/// Registration payload. Registering does *not* establish a session;
/// the caller must follow up with an explicit `login`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// What a successful login yields, for role-based redirection.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Create an account. Public endpoint; no session is established.
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        let body = serde_json::to_value(registration)
            .map_err(|e| ApiError::invalid(format!("unserializable registration: {e}")))?;
        self.client
            .request(
                "/auth/register",
                RequestOptions::json(HttpMethod::Post, body).anonymous(),
            )
            .await?;
        Ok(())
    }

    /// Authenticate and persist the session.
    ///
    /// The response nests `token`/`user` either under `data` or flat;
    /// both are tried. On success both values land in the session
    /// store and are returned for redirection.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let raw = self
            .client
            .request(
                "/auth/login",
                RequestOptions::json(
                    HttpMethod::Post,
                    json!({ "email": email, "password": password }),
                )
                .anonymous(),
            )
            .await?;

        let token = probe_token(&raw)
            .ok_or_else(|| ApiError::decode("login response carried no token"))?;
        let user: User = decode(extract_object(&raw, "user"))?;

        let session = self.client.session();
        session.set_token(&token);
        session.set_user(&user);

        Ok(LoginOutcome { token, user })
    }

    /// Best-effort server-side invalidation, then unconditional local
    /// clearing. The server call is the one error this layer swallows.
    pub async fn logout(&self) {
        if let Err(e) = self
            .client
            .request("/auth/logout", RequestOptions::method(HttpMethod::Post))
            .await
        {
            tracing::warn!("server-side logout failed, clearing locally anyway: {e}");
        }
        self.client.session().clear();
    }

    /// Refetch the authoritative user record and refresh the cached
    /// copy (picks up role and verification changes).
    pub async fn get_current_user(&self) -> Result<User> {
        let raw = self.client.request("/auth/me", RequestOptions::get()).await?;
        let user: User = decode(extract_object(&raw, "user"))?;
        self.client.session().set_user(&user);
        Ok(user)
    }

    /// Change the password of the logged-in user. The current token
    /// stays valid; no local session state changes.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        self.client
            .request(
                "/auth/password",
                RequestOptions::json(
                    HttpMethod::Put,
                    json!({
                        "current_password": current_password,
                        "new_password": new_password,
                    }),
                ),
            )
            .await?;
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        self.client
            .request(
                "/auth/forgot_password",
                RequestOptions::json(HttpMethod::Post, json!({ "email": email })).anonymous(),
            )
            .await?;
        Ok(())
    }

    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<()> {
        self.client
            .request(
                "/auth/reset_password",
                RequestOptions::json(
                    HttpMethod::Post,
                    json!({ "token": reset_token, "new_password": new_password }),
                )
                .anonymous(),
            )
            .await?;
        Ok(())
    }

    pub async fn verify_email(&self, verification_token: &str) -> Result<()> {
        self.client
            .request(
                "/auth/verify_email",
                RequestOptions::json(HttpMethod::Post, json!({ "token": verification_token }))
                    .anonymous(),
            )
            .await?;
        Ok(())
    }
}

/// Token location varies: `data.token` or flat `token`.
fn probe_token(raw: &Value) -> Option<String> {
    raw.get("data")
        .and_then(|d| d.get("token"))
        .or_else(|| raw.get("token"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpBody;
    use crate::http::tests::test_client;
    use crate::models::UserRole;
    use serde_json::json;

    fn user_json(role: &str) -> Value {
        json!({
            "id": 7,
            "name": "Ada",
            "email": "ada@example.com",
            "role": role,
        })
    }

    #[tokio::test]
    async fn login_persists_token_and_user_from_nested_response() {
        let (client, transport, session) = test_client();
        let auth = AuthService::new(client);

        transport.push_json(
            200,
            json!({ "data": { "token": "tok-9", "user": user_json("admin") } }),
        );

        // 1. Login
        let outcome = auth.login("ada@example.com", "pw").await.unwrap();
        assert_eq!(outcome.token, "tok-9");
        assert_eq!(outcome.user.role, UserRole::Admin);

        // 2. Request went out anonymously
        let sent = transport.sent(0);
        assert_eq!(sent.header("Authorization"), None);
        assert!(sent.url.ends_with("/auth/login"));

        // 3. Session reflects the outcome
        assert!(session.is_authenticated());
        assert!(session.is_admin());
        assert_eq!(session.token().as_deref(), Some("tok-9"));
    }

    #[tokio::test]
    async fn login_accepts_the_flat_response_shape() {
        let (client, transport, session) = test_client();
        let auth = AuthService::new(client);

        transport.push_json(200, json!({ "token": "tok-1", "user": user_json("customer") }));

        let outcome = auth.login("ada@example.com", "pw").await.unwrap();
        assert_eq!(outcome.token, "tok-1");
        assert!(session.is_authenticated());
        assert!(!session.is_admin());
    }

    #[tokio::test]
    async fn login_without_a_token_is_a_decode_error() {
        let (client, transport, session) = test_client();
        let auth = AuthService::new(client);

        transport.push_json(200, json!({ "user": user_json("customer") }));
        auth.login("ada@example.com", "pw").await.unwrap_err();
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn register_does_not_establish_a_session() {
        let (client, transport, session) = test_client();
        let auth = AuthService::new(client);

        transport.push_json(201, json!({ "user": user_json("customer") }));
        auth.register(&Registration {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
            phone: None,
        })
        .await
        .unwrap();

        assert_eq!(transport.sent(0).header("Authorization"), None);
        assert!(!session.is_authenticated());

        // Optional phone is omitted, not sent as null.
        let HttpBody::Json(body) = transport.sent(0).body else {
            panic!("expected JSON body");
        };
        assert!(body.get("phone").is_none());
    }

    #[tokio::test]
    async fn logout_clears_locally_even_when_the_server_call_fails() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let auth = AuthService::new(client);

        transport.push_network_error("connection refused");
        auth.logout().await;

        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
    }

    #[tokio::test]
    async fn get_current_user_refreshes_the_cached_snapshot() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let auth = AuthService::new(client);

        // Cached role is customer; the server has since promoted them.
        transport.push_json(200, json!({ "user": user_json("customer") }));
        auth.get_current_user().await.unwrap();
        assert!(!session.is_admin());

        transport.push_json(200, json!({ "user": user_json("super_admin") }));
        let user = auth.get_current_user().await.unwrap();
        assert_eq!(user.role, UserRole::SuperAdmin);
        assert!(session.is_admin());
    }

    #[tokio::test]
    async fn change_password_keeps_the_current_token() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let auth = AuthService::new(client);

        transport.push_raw(204, "");
        auth.change_password("old", "new").await.unwrap();

        assert_eq!(transport.sent(0).header("Authorization"), Some("Bearer tok"));
        assert_eq!(session.token().as_deref(), Some("tok"));
    }
}
