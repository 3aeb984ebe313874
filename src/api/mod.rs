//! Platform API module.
//!
//! This module provides:
//! - Session credentials (cookie, CSRF token, bearer token)
//! - The TweetDetail fallback client
//! - Request parameter types

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{csrf_token_from_cookies, Credentials, DEFAULT_BEARER_TOKEN};
pub use client::{TweetDetailApi, TWEET_DETAIL_PATH};
