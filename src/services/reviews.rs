//! Review service. One review per completed booking is a server-side
//! invariant; this layer only surfaces the rejection message.

use serde_json::json;

use crate::error::{ApiError, Result};
use crate::http::{ApiClient, HttpMethod, RequestOptions};
use crate::models::Review;
use crate::normalize::{decode, decode_collection, extract_object};

#[derive(Debug, Clone)]
pub struct NewReview {
    pub trip_id: i64,
    pub booking_id: i64,
    /// 1..=5.
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Clone)]
pub struct ReviewService {
    client: ApiClient,
}

impl ReviewService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_review(&self, review: &NewReview) -> Result<Review> {
        if !(1..=5).contains(&review.rating) {
            return Err(ApiError::invalid("rating must be between 1 and 5"));
        }
        let mut body = json!({
            "trip_id": review.trip_id,
            "booking_id": review.booking_id,
            "rating": review.rating,
        });
        if let Some(comment) = &review.comment {
            if !comment.trim().is_empty() {
                body["comment"] = json!(comment);
            }
        }
        let raw = self
            .client
            .request("/reviews", RequestOptions::json(HttpMethod::Post, body))
            .await?;
        decode(extract_object(&raw, "review"))
    }

    /// Published reviews of a trip. Public read.
    pub async fn get_trip_reviews(&self, trip_id: i64) -> Result<Vec<Review>> {
        let raw = self
            .client
            .request(
                &format!("/trips/{trip_id}/reviews"),
                RequestOptions::get().anonymous(),
            )
            .await?;
        decode_collection(&raw, "reviews")
    }

    pub async fn get_my_reviews(&self) -> Result<Vec<Review>> {
        let raw = self
            .client
            .request("/reviews/my", RequestOptions::get())
            .await?;
        decode_collection(&raw, "reviews")
    }

    /// Admin: flip the publication flag gating customer visibility.
    pub async fn set_published(&self, review_id: i64, published: bool) -> Result<Review> {
        let raw = self
            .client
            .request(
                &format!("/reviews/{review_id}"),
                RequestOptions::json(HttpMethod::Patch, json!({ "published": published })),
            )
            .await?;
        decode(extract_object(&raw, "review"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::test_client;
    use serde_json::json;

    #[tokio::test]
    async fn duplicate_review_rejection_is_surfaced_verbatim() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let reviews = ReviewService::new(client);

        transport.push_json(
            422,
            json!({ "message": "You have already reviewed this booking" }),
        );

        let err = reviews
            .create_review(&NewReview {
                trip_id: 7,
                booking_id: 42,
                rating: 5,
                comment: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(422));
        assert_eq!(err.message, "You have already reviewed this booking");
    }

    #[tokio::test]
    async fn out_of_range_rating_never_reaches_the_wire() {
        let (client, transport, _) = test_client();
        let reviews = ReviewService::new(client);

        let err = reviews
            .create_review(&NewReview { trip_id: 7, booking_id: 42, rating: 6, comment: None })
            .await
            .unwrap_err();
        assert_eq!(err.status, None);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn trip_reviews_are_a_public_read() {
        let (client, transport, session) = test_client();
        session.set_token("tok");
        let reviews = ReviewService::new(client);

        transport.push_json(
            200,
            json!({ "reviews": [{ "id": 1, "tripId": 7, "rating": 4, "published": true }] }),
        );

        let list = reviews.get_trip_reviews(7).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].trip_id, 7);
        assert_eq!(transport.sent(0).header("Authorization"), None);
    }
}
