//! Newsletter subscription service. Both operations are anonymous.

use serde_json::json;

use crate::error::{ApiError, Result};
use crate::http::{ApiClient, HttpMethod, RequestOptions};

#[derive(Clone)]
pub struct NewsletterService {
    client: ApiClient,
}

impl NewsletterService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn subscribe(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::invalid("email must not be blank"));
        }
        self.client
            .request(
                "/newsletter/subscriptions",
                RequestOptions::json(HttpMethod::Post, json!({ "email": email })).anonymous(),
            )
            .await?;
        Ok(())
    }

    pub async fn unsubscribe(&self, email: &str) -> Result<()> {
        self.client
            .request(
                "/newsletter/subscriptions",
                RequestOptions::json(HttpMethod::Delete, json!({ "email": email.trim() }))
                    .anonymous(),
            )
            .await?;
        Ok(())
    }
}
