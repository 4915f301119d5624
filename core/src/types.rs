//! Domain DTOs for the content API.
//!
//! # Design
//! These types mirror the server's JSON but are defined independently of the
//! mock-server crate; integration tests catch schema drift. Server-owned
//! fields (slug, share token, timestamps) are optional so the same type can
//! be built locally before `create` and decoded afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Which kind of item a look reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookKind {
    Media,
    Streetstyle,
}

impl LookKind {
    /// The moodboard sub-resource segment for this kind.
    pub fn path_segment(&self) -> &'static str {
        match self {
            LookKind::Media => "medias",
            LookKind::Streetstyle => "streetstyles",
        }
    }
}

/// `"media"` selects media looks; every other tag selects streetstyles.
impl From<&str> for LookKind {
    fn from(tag: &str) -> Self {
        if tag == "media" {
            LookKind::Media
        } else {
            LookKind::Streetstyle
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Look {
    #[serde(rename = "type")]
    pub kind: LookKind,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moodboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub looks: Vec<Look>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The writable subset of a moodboard sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodboardWrite<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub looks: &'a [Look],
}

impl Moodboard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn write_payload(&self) -> MoodboardWrite<'_> {
        MoodboardWrite {
            name: &self.name,
            description: self.description.as_deref(),
            looks: &self.looks,
        }
    }
}

/// One page of moodboards together with the server's total match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodboardPage {
    pub items: Vec<Moodboard>,
    /// Value of `X-Total-Count`; 0 when the page is empty or the call failed.
    pub total: u64,
}

/// Homepage sections the API can render.
///
/// This is the content API's own list of section keys; anything else is
/// rejected before a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomepageSection {
    Homepage,
    Designers,
    Models,
    Streetstyle,
    Accessories,
}

impl HomepageSection {
    pub const ALL: [HomepageSection; 5] = [
        HomepageSection::Homepage,
        HomepageSection::Designers,
        HomepageSection::Models,
        HomepageSection::Streetstyle,
        HomepageSection::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HomepageSection::Homepage => "homepage",
            HomepageSection::Designers => "designers",
            HomepageSection::Models => "models",
            HomepageSection::Streetstyle => "streetstyle",
            HomepageSection::Accessories => "accessories",
        }
    }
}

impl fmt::Display for HomepageSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomepageSection {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomepageSection::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ApiError::InvalidArgument("Invalid homepage section argument".to_string()))
    }
}

/// A rendered homepage. Layout blocks are kept as raw JSON; any field this
/// type does not name lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Homepage {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Photo and page tracking events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsEvent {
    Page,
    PhotoList,
    PhotoView,
    PhotoZoom,
    MoodboardAdd,
    RequestAdd,
}

impl AnalyticsEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsEvent::Page => "page",
            AnalyticsEvent::PhotoList => "photo_list",
            AnalyticsEvent::PhotoView => "photo_view",
            AnalyticsEvent::PhotoZoom => "photo_zoom",
            AnalyticsEvent::MoodboardAdd => "moodboard_add",
            AnalyticsEvent::RequestAdd => "request_add",
        }
    }
}

impl fmt::Display for AnalyticsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The incoming end-user request being tracked, as seen by the caller's web
/// layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
}
