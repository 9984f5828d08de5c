//! # Twitter Adapter
//!
//! Implements the `SocialApi` and `ApiFactory` traits against the Twitter v1.1 REST API.
//! Request signing lives in [`oauth`]; response shapes in [`types`].

mod client;
mod oauth;
mod types;

pub use client::TwitterFactory;
