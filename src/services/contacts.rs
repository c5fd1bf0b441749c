//! Contact-form service. Submission is anonymous; listing and marking
//! read are back-office calls.

use serde_json::json;

use crate::error::Result;
use crate::http::{ApiClient, HttpMethod, RequestOptions, build_query_string};
use crate::models::{ContactMessage, Page};
use crate::normalize::{decode_collection, extract_pagination};

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Clone)]
pub struct ContactService {
    client: ApiClient,
}

impl ContactService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn submit_contact(&self, form: &ContactForm) -> Result<()> {
        let mut body = json!({
            "name": form.name,
            "email": form.email,
            "message": form.message,
        });
        if let Some(subject) = &form.subject {
            if !subject.trim().is_empty() {
                body["subject"] = json!(subject);
            }
        }
        self.client
            .request(
                "/contacts",
                RequestOptions::json(HttpMethod::Post, body).anonymous(),
            )
            .await?;
        Ok(())
    }

    pub async fn get_contacts(&self, page: Option<u32>) -> Result<Page<ContactMessage>> {
        let qs = build_query_string([("page", page.map(|p| p.to_string()))]);
        let endpoint = if qs.is_empty() {
            "/contacts".to_string()
        } else {
            format!("/contacts?{qs}")
        };
        let raw = self.client.request(&endpoint, RequestOptions::get()).await?;
        let items: Vec<ContactMessage> = decode_collection(&raw, "contacts")?;
        let pagination = extract_pagination(&raw, items.len());
        Ok(Page { items, pagination })
    }

    pub async fn mark_read(&self, contact_id: i64) -> Result<()> {
        self.client
            .request(
                &format!("/contacts/{contact_id}/read"),
                RequestOptions::method(HttpMethod::Patch),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::test_client;
    use serde_json::json;

    #[tokio::test]
    async fn submission_is_anonymous_and_omits_blank_subject() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let contacts = ContactService::new(client);

        contacts
            .submit_contact(&ContactForm {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                subject: Some("  ".into()),
                message: "Hello".into(),
            })
            .await
            .unwrap();

        let sent = transport.sent(0);
        assert_eq!(sent.header("Authorization"), None);
        let crate::http::HttpBody::Json(body) = sent.body else { panic!("expected JSON body") };
        assert!(body.get("subject").is_none());
    }

    #[tokio::test]
    async fn listing_normalizes_read_flags() {
        let (client, transport, session) = test_client();
        session.set_token("admin-tok");
        let contacts = ContactService::new(client);

        transport.push_json(
            200,
            json!({
                "data": { "contacts": [
                    { "id": 1, "name": "Ada", "email": "a@x.com", "message": "hi", "read": false },
                ]},
                "pagination": { "total_count": 12, "page": 1, "per_page": 10 },
            }),
        );

        let page = contacts.get_contacts(Some(1)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(!page.items[0].read);
        assert_eq!(page.pagination.total_count, 12);
    }
}
