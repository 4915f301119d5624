//! In-memory stand-in for the runway content API.
//!
//! Serves the analytics, homepage and moodboard routes with the same paths,
//! status codes and headers as the real service so the client can be tested
//! over HTTP. Seeded with a few homepages and one moodboard owned by another
//! user, which answers 403 to every ownership-sensitive call.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const FOREIGN_MOODBOARD: &str = "someone-elses-board";

const PHOTO_EVENTS: [&str; 6] = [
    "page",
    "photo_list",
    "photo_view",
    "photo_zoom",
    "moodboard_add",
    "request_add",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Look {
    #[serde(rename = "type")]
    pub kind: String,
    pub slug: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Moodboard {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub token: String,
    pub looks: Vec<Look>,
}

#[derive(Deserialize)]
pub struct MoodboardInput {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub looks: Vec<Look>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Homepage {
    pub slug: String,
    pub name: String,
    pub section: String,
    pub language: String,
    pub blocks: Vec<serde_json::Value>,
}

/// One analytics hit as the server received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedEvent {
    pub path: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub query: Vec<(String, String)>,
}

#[derive(Clone, Debug)]
struct StoredMoodboard {
    owner: &'static str,
    board: Moodboard,
}

#[derive(Clone, Default)]
pub struct AppState {
    moodboards: Arc<RwLock<Vec<StoredMoodboard>>>,
    homepages: Arc<Vec<Homepage>>,
    events: Arc<RwLock<Vec<TrackedEvent>>>,
}

impl AppState {
    pub fn seeded() -> Self {
        let homepages = vec![
            homepage("home-en", "homepage", "en"),
            homepage("home-fr", "homepage", "fr"),
            homepage("models-en", "models", "en"),
        ];
        let foreign = StoredMoodboard {
            owner: "someone-else",
            board: Moodboard {
                slug: FOREIGN_MOODBOARD.to_string(),
                name: "Private".to_string(),
                description: None,
                token: Uuid::new_v4().simple().to_string(),
                looks: Vec::new(),
            },
        };
        Self {
            moodboards: Arc::new(RwLock::new(vec![foreign])),
            homepages: Arc::new(homepages),
            events: Arc::default(),
        }
    }

    /// Every analytics hit recorded so far, oldest first. Empty while a
    /// handler holds the write lock.
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events
            .try_read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

fn homepage(slug: &str, section: &str, language: &str) -> Homepage {
    Homepage {
        slug: slug.to_string(),
        name: format!("{section} ({language})"),
        section: section.to_string(),
        language: language.to_string(),
        blocks: vec![serde_json::json!({"kind": "hero", "title": "Fall Winter"})],
    }
}

pub fn app() -> Router {
    app_with_state(AppState::seeded())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/api/analytics/media/{slug}", post(track_media))
        .route("/api/analytics/streetstyle/{slug}", post(track_streetstyle))
        .route("/api/analytics/page/{route}", post(track_page))
        .route("/api/analytics/photos/{route}/{event}", post(track_photos))
        .route("/api/homepages/show/{section}", get(homepage_by_section))
        .route("/api/homepages/{slug}", get(homepage_by_slug))
        .route("/api/moodboards", post(create_moodboard))
        .route("/api/moodboards/", get(list_moodboards))
        .route("/api/moodboards/shared/{token}", get(shared_moodboard))
        .route("/api/moodboards/pdf/{token}", get(moodboard_pdf))
        .route(
            "/api/moodboards/{slug}",
            get(get_moodboard).put(update_moodboard).delete(delete_moodboard),
        )
        .route("/api/moodboards/{slug}/{kind}/{look}", put(add_look).delete(remove_look))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::seeded()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

async fn record(state: &AppState, path: String, headers: &HeaderMap, query: HashMap<String, String>) {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let mut query: Vec<(String, String)> = query.into_iter().collect();
    query.sort();
    let event = TrackedEvent {
        path,
        client_ip: header_value("x-client-ip"),
        user_agent: header_value("x-user-agent"),
        accept_language: header_value("x-accept-language"),
        query,
    };
    tracing::debug!(path = %event.path, "tracked analytics event");
    state.events.write().await.push(event);
}

async fn track_media(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> StatusCode {
    record(&state, format!("/api/analytics/media/{slug}"), &headers, query).await;
    StatusCode::CREATED
}

async fn track_streetstyle(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> StatusCode {
    record(&state, format!("/api/analytics/streetstyle/{slug}"), &headers, query).await;
    StatusCode::CREATED
}

async fn track_page(
    State(state): State<AppState>,
    Path(route): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> StatusCode {
    record(&state, format!("/api/analytics/page/{route}"), &headers, query).await;
    StatusCode::NO_CONTENT
}

async fn track_photos(
    State(state): State<AppState>,
    Path((route, event)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !PHOTO_EVENTS.contains(&event.as_str()) {
        return (StatusCode::BAD_REQUEST, format!("unknown event {event}")).into_response();
    }
    record(&state, format!("/api/analytics/photos/{route}/{event}"), &headers, query).await;
    StatusCode::NO_CONTENT.into_response()
}

// ---------------------------------------------------------------------------
// Homepages
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LanguageQuery {
    language: Option<String>,
}

async fn homepage_by_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Homepage>, StatusCode> {
    let language = query.language.unwrap_or_else(|| "en".to_string());
    state
        .homepages
        .iter()
        .find(|h| h.section == section && h.language == language)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn homepage_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Homepage>, StatusCode> {
    state
        .homepages
        .iter()
        .find(|h| h.slug == slug)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

// ---------------------------------------------------------------------------
// Moodboards
// ---------------------------------------------------------------------------

/// Requests without credentials act as this user.
const CURRENT_USER: &str = "current-user";

#[derive(Deserialize)]
struct ListQuery {
    from: Option<usize>,
    size: Option<usize>,
    name: Option<String>,
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", slug.trim_matches('-'), &suffix[..8])
}

/// Run `f` on the caller's own moodboard: 404 when missing, 403 when owned by
/// someone else.
async fn with_owned<R>(
    state: &AppState,
    slug: &str,
    f: impl FnOnce(&mut Vec<StoredMoodboard>, usize) -> R,
) -> Result<R, StatusCode> {
    let mut boards = state.moodboards.write().await;
    let index = boards
        .iter()
        .position(|stored| stored.board.slug == slug)
        .ok_or(StatusCode::NOT_FOUND)?;
    if boards[index].owner != CURRENT_USER {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(f(&mut boards, index))
}

async fn list_moodboards(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, StatusCode> {
    let boards = state.moodboards.read().await;
    let matching: Vec<Moodboard> = boards
        .iter()
        .filter(|stored| stored.owner == CURRENT_USER)
        .filter(|stored| match &query.name {
            Some(name) => stored.board.name.to_lowercase().contains(&name.to_lowercase()),
            None => true,
        })
        .map(|stored| stored.board.clone())
        .collect();
    let total = matching.len();
    let page: Vec<Moodboard> = matching
        .into_iter()
        .skip(query.from.unwrap_or(0))
        .take(query.size.unwrap_or(DEFAULT_PAGE_SIZE))
        .collect();
    Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(page)).into_response())
}

async fn create_moodboard(
    State(state): State<AppState>,
    Json(input): Json<MoodboardInput>,
) -> Result<(StatusCode, Json<Moodboard>), (StatusCode, String)> {
    if input.name.trim().is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "name must not be blank".to_string()));
    }
    let board = Moodboard {
        slug: slugify(&input.name),
        name: input.name,
        description: input.description,
        token: Uuid::new_v4().simple().to_string(),
        looks: input.looks,
    };
    state.moodboards.write().await.push(StoredMoodboard {
        owner: CURRENT_USER,
        board: board.clone(),
    });
    Ok((StatusCode::CREATED, Json(board)))
}

async fn get_moodboard(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Moodboard>, StatusCode> {
    with_owned(&state, &slug, |boards, index| Json(boards[index].board.clone())).await
}

async fn update_moodboard(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<MoodboardInput>,
) -> Result<Json<Moodboard>, StatusCode> {
    if input.name.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    with_owned(&state, &slug, |boards, index| {
        let board = &mut boards[index].board;
        board.name = input.name;
        board.description = input.description;
        board.looks = input.looks;
        Json(board.clone())
    })
    .await
}

async fn delete_moodboard(State(state): State<AppState>, Path(slug): Path<String>) -> StatusCode {
    match with_owned(&state, &slug, |boards, index| {
        boards.remove(index);
    })
    .await
    {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(status) => status,
    }
}

fn look_kind(segment: &str) -> Option<&'static str> {
    match segment {
        "medias" => Some("media"),
        "streetstyles" => Some("streetstyle"),
        _ => None,
    }
}

async fn add_look(
    State(state): State<AppState>,
    Path((slug, kind, look)): Path<(String, String, String)>,
) -> Result<Json<Moodboard>, StatusCode> {
    let kind = look_kind(&kind).ok_or(StatusCode::NOT_FOUND)?;
    with_owned(&state, &slug, |boards, index| {
        let board = &mut boards[index].board;
        let entry = Look {
            kind: kind.to_string(),
            slug: look,
        };
        if !board.looks.contains(&entry) {
            board.looks.push(entry);
        }
        Json(board.clone())
    })
    .await
}

async fn remove_look(
    State(state): State<AppState>,
    Path((slug, kind, look)): Path<(String, String, String)>,
) -> Result<Json<Moodboard>, StatusCode> {
    let kind = look_kind(&kind).ok_or(StatusCode::NOT_FOUND)?;
    with_owned(&state, &slug, |boards, index| {
        let board = &mut boards[index].board;
        let before = board.looks.len();
        board.looks.retain(|l| !(l.kind == kind && l.slug == look));
        (before != board.looks.len()).then(|| Json(board.clone()))
    })
    .await?
    .ok_or(StatusCode::NOT_FOUND)
}

async fn find_by_token(state: &AppState, token: &str) -> Result<Moodboard, StatusCode> {
    let boards = state.moodboards.read().await;
    boards
        .iter()
        .find(|stored| stored.board.token == token)
        .map(|stored| stored.board.clone())
        .ok_or(StatusCode::NOT_FOUND)
}

async fn shared_moodboard(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Moodboard>, StatusCode> {
    find_by_token(&state, &token).await.map(Json)
}

async fn moodboard_pdf(State(state): State<AppState>, Path(token): Path<String>) -> Result<Response, StatusCode> {
    let board = find_by_token(&state, &token).await?;
    let mut pdf = format!("%PDF-1.4\n% {}\n", board.name).into_bytes();
    for look in &board.looks {
        pdf.extend_from_slice(format!("% {} {}\n", look.kind, look.slug).as_bytes());
    }
    pdf.extend_from_slice(b"%%EOF\n");
    Ok(([(header::CONTENT_TYPE, "application/pdf")], pdf).into_response())
}
