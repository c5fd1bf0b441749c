//! Resource services: one typed façade per backend resource.
//!
//! Each service wraps [`crate::http::ApiClient`], shapes camelCase
//! caller options into the snake_case request bodies the server
//! expects (omitting absent optional fields), and normalizes response
//! shapes via [`crate::normalize`].

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod contacts;
pub mod favorites;
pub mod newsletter;
pub mod payments;
pub mod reviews;
pub mod trips;
pub mod uploads;
