//! Favorites service.
//!
//! Membership is binary: a trip is favorited or it is not. There is no
//! native toggle endpoint; the compound toggle lives in
//! [`crate::coordinators::FavoriteToggler`], built on the primitives
//! here.

use serde_json::{Value, json};

use crate::error::Result;
use crate::http::{ApiClient, HttpMethod, RequestOptions};
use crate::models::Favorite;
use crate::normalize::{canonicalize, decode_collection};

#[derive(Clone)]
pub struct FavoriteService {
    client: ApiClient,
}

impl FavoriteService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_favorites(&self) -> Result<Vec<Favorite>> {
        let raw = self.client.request("/favorites", RequestOptions::get()).await?;
        decode_collection(&raw, "favorites")
    }

    /// Whether the logged-in user has favorited this trip. The flag is
    /// spelled `favorited` or `is_favorited` depending on the endpoint
    /// revision; both are probed, absent reads as false.
    pub async fn check_favorite(&self, trip_id: i64) -> Result<bool> {
        let raw = self
            .client
            .request(
                &format!("/favorites/check?trip_id={trip_id}"),
                RequestOptions::get(),
            )
            .await?;
        Ok(probe_favorited(&canonicalize(&raw)))
    }

    pub async fn add_favorite(&self, trip_id: i64) -> Result<()> {
        self.client
            .request(
                "/favorites",
                RequestOptions::json(HttpMethod::Post, json!({ "trip_id": trip_id })),
            )
            .await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, trip_id: i64) -> Result<()> {
        self.client
            .request(
                &format!("/favorites/{trip_id}"),
                RequestOptions::method(HttpMethod::Delete),
            )
            .await?;
        Ok(())
    }
}

fn probe_favorited(canonical: &Value) -> bool {
    let probes = [
        canonical.get("favorited"),
        canonical.get("is_favorited"),
        canonical.get("data").and_then(|d| d.get("favorited")),
        canonical.get("data").and_then(|d| d.get("is_favorited")),
    ];
    probes
        .into_iter()
        .flatten()
        .find_map(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpBody;
    use crate::http::tests::test_client;
    use serde_json::json;

    #[tokio::test]
    async fn check_favorite_tolerates_every_observed_spelling() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let favorites = FavoriteService::new(client);

        transport.push_json(200, json!({ "favorited": true }));
        transport.push_json(200, json!({ "isFavorited": true }));
        transport.push_json(200, json!({ "data": { "is_favorited": true } }));
        transport.push_json(200, json!({}));

        assert!(favorites.check_favorite(1).await.unwrap());
        assert!(favorites.check_favorite(1).await.unwrap());
        assert!(favorites.check_favorite(1).await.unwrap());
        assert!(!favorites.check_favorite(1).await.unwrap());
    }

    #[tokio::test]
    async fn add_and_remove_use_their_endpoints() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let favorites = FavoriteService::new(client);

        favorites.add_favorite(9).await.unwrap();
        favorites.remove_favorite(9).await.unwrap();

        let add = transport.sent(0);
        assert!(add.url.ends_with("/favorites"));
        let HttpBody::Json(body) = add.body else { panic!("expected JSON body") };
        assert_eq!(body, json!({ "trip_id": 9 }));

        let remove = transport.sent(1);
        assert_eq!(remove.method, HttpMethod::Delete);
        assert!(remove.url.ends_with("/favorites/9"));
    }

    #[tokio::test]
    async fn listings_may_embed_the_trip() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let favorites = FavoriteService::new(client);

        transport.push_json(
            200,
            json!({ "favorites": [
                { "id": 1, "tripId": 7, "trip": { "id": 7, "title": "Coastal Loop" } },
                { "trip_id": 8 },
            ]}),
        );

        let list = favorites.get_favorites().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].trip_id, 7);
        assert_eq!(list[0].trip.as_ref().unwrap().title, "Coastal Loop");
        assert_eq!(list[1].trip, None);
    }
}
