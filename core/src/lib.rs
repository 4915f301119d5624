//! Client binding layer for the runway content API.
//!
//! # Overview
//! Covers three resources: analytics events, homepages and moodboards. Each
//! manager maps one method onto one HTTP call, classifies the status code,
//! and decodes the JSON body into a typed record.
//!
//! # Design
//! - Every operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`); the composed method sends through
//!   a `Transport`. Build and parse never touch the network.
//! - Status handling lives in one place, `policy::StatusPolicy`. A 404 on a
//!   read is an empty result, a 403 on a moodboard mutation is
//!   `ApiError::AccessDenied`, and anything unexpected is reported once
//!   through the injected `Logger`.
//! - No retries, caching or batching. One call in, one request out.

pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod homepage;
pub mod http;
pub mod logger;
pub mod moodboard;
pub mod policy;
pub mod query;
pub mod transport;
pub mod types;

pub use analytics::AnalyticsManager;
pub use client::ContentClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use homepage::HomepageManager;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use logger::{Logger, NullLogger, SharedLogger, TracingLogger};
pub use moodboard::MoodboardManager;
pub use query::{Query, QueryValue};
pub use transport::{Transport, UreqTransport};
pub use types::{
    AnalyticsEvent, Homepage, HomepageSection, Look, LookKind, Moodboard, MoodboardPage, MoodboardWrite,
    RequestContext,
};
