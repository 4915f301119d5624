//! Moodboard CRUD and look membership.
//!
//! # Design
//! Moodboards are owned by end users, so every ownership-sensitive call turns
//! a 403 into `ApiError::AccessDenied` instead of logging it. `create` and
//! `update` promise an entity and therefore raise on any other failure;
//! the remaining calls report failure through `None` or `false`.
//!
//! `list` returns the page and the server's total count together rather than
//! stashing the count on the manager.

use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::logger::{self, SharedLogger};
use crate::policy::{StatusPolicy, CREATED, NO_CONTENT, OK};
use crate::query::Query;
use crate::transport::Transport;
use crate::types::{LookKind, Moodboard, MoodboardPage};

pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

const LIST: StatusPolicy = StatusPolicy::expecting(&[OK]);
const SHARED: StatusPolicy = StatusPolicy::expecting(&[OK]);
const OWNED: StatusPolicy = StatusPolicy::expecting(&[OK]).forbidden_is_error();
const CREATE: StatusPolicy = StatusPolicy::expecting(&[CREATED])
    .absent_is_unexpected()
    .forbidden_is_error()
    .failure_is_error();
const UPDATE: StatusPolicy = StatusPolicy::expecting(&[OK])
    .absent_is_error()
    .forbidden_is_error()
    .failure_is_error();
const DELETE: StatusPolicy = StatusPolicy::expecting(&[NO_CONTENT]).forbidden_is_error();

pub struct MoodboardManager<T> {
    transport: T,
    logger: SharedLogger,
}

impl<T> MoodboardManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            logger: logger::null(),
        }
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// Shared by `list` and `count`; the query goes through untouched.
    pub fn build_list(&self, query: &Query) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, "/api/moodboards/").with_query(query.pairs())
    }

    pub fn build_get(&self, slug: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("/api/moodboards/{slug}"))
    }

    pub fn build_get_by_token(&self, token: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("/api/moodboards/shared/{token}"))
    }

    pub fn build_get_pdf_by_token(&self, token: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("/api/moodboards/pdf/{token}"))
    }

    pub fn build_create(&self, moodboard: &Moodboard) -> ApiResult<HttpRequest> {
        HttpRequest::new(HttpMethod::Post, "/api/moodboards").with_json(&moodboard.write_payload())
    }

    pub fn build_update(&self, slug: &str, moodboard: &Moodboard) -> ApiResult<HttpRequest> {
        HttpRequest::new(HttpMethod::Put, format!("/api/moodboards/{slug}")).with_json(&moodboard.write_payload())
    }

    pub fn build_delete(&self, slug: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, format!("/api/moodboards/{slug}"))
    }

    pub fn build_add_look(&self, slug: &str, kind: LookKind, look_slug: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Put, look_path(slug, kind, look_slug))
    }

    pub fn build_remove_look(&self, slug: &str, kind: LookKind, look_slug: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, look_path(slug, kind, look_slug))
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_list(&self, response: HttpResponse) -> ApiResult<MoodboardPage> {
        let Some(response) = LIST.resolve("MoodboardManager::list", response, self.logger.as_ref())? else {
            return Ok(MoodboardPage::default());
        };
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(MoodboardPage::default());
        }

        let data: Option<Vec<Value>> = response.json()?;
        let items = data
            .unwrap_or_default()
            .into_iter()
            .map(|datum| serde_json::from_value(datum).map_err(|e| ApiError::DeserializationError(e.to_string())))
            .collect::<ApiResult<Vec<Moodboard>>>()?;
        let total = if items.is_empty() { 0 } else { total_count(&response) };

        Ok(MoodboardPage { items, total })
    }

    /// Reads `X-Total-Count` whatever the status; nothing is logged.
    pub fn parse_count(&self, response: HttpResponse) -> ApiResult<u64> {
        Ok(total_count(&response))
    }

    pub fn parse_get(&self, response: HttpResponse) -> ApiResult<Option<Moodboard>> {
        OWNED
            .resolve("MoodboardManager::get", response, self.logger.as_ref())?
            .map(|response| response.json())
            .transpose()
    }

    pub fn parse_get_by_token(&self, response: HttpResponse) -> ApiResult<Option<Moodboard>> {
        SHARED
            .resolve("MoodboardManager::getByToken", response, self.logger.as_ref())?
            .map(|response| response.json())
            .transpose()
    }

    /// The raw PDF bytes, untouched.
    pub fn parse_get_pdf_by_token(&self, response: HttpResponse) -> ApiResult<Option<Vec<u8>>> {
        Ok(SHARED
            .resolve("MoodboardManager::getPdfByToken", response, self.logger.as_ref())?
            .map(|response| response.body))
    }

    /// Anything but 201 or 403 is logged and raised as `BadRequest`, 404
    /// included.
    pub fn parse_create(&self, response: HttpResponse) -> ApiResult<Moodboard> {
        let status = response.status;
        CREATE
            .resolve("MoodboardManager::create", response, self.logger.as_ref())?
            .ok_or(ApiError::BadRequest { status })?
            .json()
    }

    pub fn parse_update(&self, response: HttpResponse) -> ApiResult<Moodboard> {
        match UPDATE.resolve("MoodboardManager::update", response, self.logger.as_ref())? {
            Some(response) => response.json(),
            None => Err(ApiError::NotFound),
        }
    }

    pub fn parse_delete(&self, response: HttpResponse) -> ApiResult<bool> {
        Ok(DELETE
            .resolve("MoodboardManager::delete", response, self.logger.as_ref())?
            .is_some())
    }

    pub fn parse_add_look(&self, response: HttpResponse) -> ApiResult<bool> {
        Ok(OWNED
            .resolve("MoodboardManager::addLook", response, self.logger.as_ref())?
            .is_some())
    }

    pub fn parse_remove_look(&self, response: HttpResponse) -> ApiResult<bool> {
        Ok(OWNED
            .resolve("MoodboardManager::removeLook", response, self.logger.as_ref())?
            .is_some())
    }
}

impl<T: Transport> MoodboardManager<T> {
    pub fn list(&self, query: &Query) -> ApiResult<MoodboardPage> {
        let response = self.transport.send(self.build_list(query))?;
        self.parse_list(response)
    }

    pub fn count(&self, query: &Query) -> ApiResult<u64> {
        let response = self.transport.send(self.build_list(query))?;
        self.parse_count(response)
    }

    pub fn get(&self, slug: &str) -> ApiResult<Option<Moodboard>> {
        let response = self.transport.send(self.build_get(slug))?;
        self.parse_get(response)
    }

    pub fn get_by_token(&self, token: &str) -> ApiResult<Option<Moodboard>> {
        let response = self.transport.send(self.build_get_by_token(token))?;
        self.parse_get_by_token(response)
    }

    pub fn get_pdf_by_token(&self, token: &str) -> ApiResult<Option<Vec<u8>>> {
        let response = self.transport.send(self.build_get_pdf_by_token(token))?;
        self.parse_get_pdf_by_token(response)
    }

    pub fn create(&self, moodboard: &Moodboard) -> ApiResult<Moodboard> {
        let response = self.transport.send(self.build_create(moodboard)?)?;
        self.parse_create(response)
    }

    pub fn update(&self, slug: &str, moodboard: &Moodboard) -> ApiResult<Moodboard> {
        let response = self.transport.send(self.build_update(slug, moodboard)?)?;
        self.parse_update(response)
    }

    pub fn delete(&self, slug: &str) -> ApiResult<bool> {
        let response = self.transport.send(self.build_delete(slug))?;
        self.parse_delete(response)
    }

    pub fn add_look(&self, slug: &str, kind: impl Into<LookKind>, look_slug: &str) -> ApiResult<bool> {
        let response = self
            .transport
            .send(self.build_add_look(slug, kind.into(), look_slug))?;
        self.parse_add_look(response)
    }

    pub fn remove_look(&self, slug: &str, kind: impl Into<LookKind>, look_slug: &str) -> ApiResult<bool> {
        let response = self
            .transport
            .send(self.build_remove_look(slug, kind.into(), look_slug))?;
        self.parse_remove_look(response)
    }
}

fn look_path(slug: &str, kind: LookKind, look_slug: &str) -> String {
    format!("/api/moodboards/{slug}/{}/{look_slug}", kind.path_segment())
}

/// A missing or unparsable header counts as zero.
fn total_count(response: &HttpResponse) -> u64 {
    response
        .header(TOTAL_COUNT_HEADER)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::logger::recording::RecordingLogger;
    use crate::transport::stub::StubTransport;
    use crate::types::Look;

    const SPRING: &str = r#"{"slug":"spring","name":"Spring","token":"tok-1","looks":[{"type":"media","slug":"dior-1"}]}"#;

    fn setup(response: HttpResponse) -> (MoodboardManager<StubTransport>, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        let manager = MoodboardManager::new(StubTransport::replying(response)).with_logger(logger.clone());
        (manager, logger)
    }

    fn boards(n: usize) -> String {
        let items: Vec<String> = (0..n)
            .map(|i| format!(r#"{{"slug":"board-{i}","name":"Board {i}"}}"#))
            .collect();
        format!("[{}]", items.join(","))
    }

    // --- list / count ---

    #[test]
    fn list_returns_items_and_total() {
        let (manager, _) = setup(HttpResponse::new(200, boards(5)).with_header("X-Total-Count", "42"));
        let query = Query::new().with("from", 0).with("size", 5).with("sort", "created_at:desc");
        let page = manager.list(&query).unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[4].slug.as_deref(), Some("board-4"));
        assert_eq!(page.total, 42);

        let request = manager.transport.last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/api/moodboards/");
        assert_eq!(request.query, query.pairs());
    }

    #[test]
    fn list_empty_result_has_zero_total() {
        let (manager, _) = setup(HttpResponse::new(200, "[]").with_header("X-Total-Count", "42"));
        let page = manager.list(&Query::new()).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn list_tolerates_empty_and_null_bodies() {
        for body in ["", "null"] {
            let (manager, _) = setup(HttpResponse::new(200, body));
            assert_eq!(manager.list(&Query::new()).unwrap(), MoodboardPage::default());
        }
    }

    #[test]
    fn list_failure_is_empty_and_logged() {
        let (manager, logger) = setup(HttpResponse::new(500, "oops").with_header("X-Total-Count", "3"));
        let page = manager.list(&Query::new()).unwrap();
        assert_eq!(page, MoodboardPage::default());
        assert_eq!(logger.entries().len(), 1);
    }

    #[test]
    fn list_rejects_malformed_item() {
        let (manager, _) = setup(HttpResponse::new(200, r#"[{"slug":"no-name"}]"#));
        let err = manager.list(&Query::new()).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn count_reads_header_only() {
        let (manager, _) = setup(HttpResponse::new(200, boards(2)).with_header("x-total-count", "17"));
        assert_eq!(manager.count(&Query::new().with("status", "shared")).unwrap(), 17);

        let (manager, _) = setup(HttpResponse::new(200, "[]"));
        assert_eq!(manager.count(&Query::new()).unwrap(), 0);
    }

    #[test]
    fn count_ignores_status() {
        for status in [206, 404, 500] {
            let (manager, logger) = setup(HttpResponse::new(status, "").with_header("X-Total-Count", "42"));
            assert_eq!(manager.count(&Query::new()).unwrap(), 42);
            assert!(logger.entries().is_empty());
        }
    }

    // --- reads ---

    #[test]
    fn get_decodes_moodboard() {
        let (manager, _) = setup(HttpResponse::new(200, SPRING));
        let moodboard = manager.get("spring").unwrap().unwrap();
        assert_eq!(moodboard.name, "Spring");
        assert_eq!(moodboard.looks[0].kind, LookKind::Media);
        assert_eq!(manager.transport.last_request().path, "/api/moodboards/spring");
    }

    #[test]
    fn get_forbidden_raises_without_log() {
        let (manager, logger) = setup(HttpResponse::new(403, "not yours"));
        let err = manager.get("spring").unwrap_err();
        assert!(matches!(err, ApiError::AccessDenied));
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn get_not_found_is_none_without_log() {
        let (manager, logger) = setup(HttpResponse::new(404, ""));
        assert!(manager.get("spring").unwrap().is_none());
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn get_by_token_uses_shared_path() {
        let (manager, logger) = setup(HttpResponse::new(404, ""));
        assert!(manager.get_by_token("tok-1").unwrap().is_none());
        assert_eq!(manager.transport.last_request().path, "/api/moodboards/shared/tok-1");
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn get_by_token_unexpected_status_is_logged() {
        let (manager, logger) = setup(HttpResponse::new(502, "bad gateway"));
        assert!(manager.get_by_token("tok-1").unwrap().is_none());
        assert_eq!(logger.entries()[0].operation, "MoodboardManager::getByToken");
    }

    #[test]
    fn pdf_bytes_pass_through() {
        let pdf = b"%PDF-1.4\n\xe2\xe3\xcf\xd3".to_vec();
        let (manager, _) = setup(HttpResponse::new(200, pdf.clone()));
        assert_eq!(manager.get_pdf_by_token("tok-1").unwrap(), Some(pdf));
        assert_eq!(manager.transport.last_request().path, "/api/moodboards/pdf/tok-1");
    }

    // --- writes ---

    #[test]
    fn create_returns_decoded_moodboard() {
        let input = Moodboard {
            description: Some("Pastels".to_string()),
            looks: vec![Look {
                kind: LookKind::Streetstyle,
                slug: "paris-7".to_string(),
            }],
            ..Moodboard::new("Spring")
        };
        let created = r#"{"slug":"spring","name":"Spring","description":"Pastels","token":"tok-9","looks":[{"type":"streetstyle","slug":"paris-7"}]}"#;
        let (manager, logger) = setup(HttpResponse::new(201, created));
        let moodboard = manager.create(&input).unwrap();
        assert_eq!(moodboard.slug.as_deref(), Some("spring"));
        assert_eq!(moodboard.name, input.name);
        assert_eq!(moodboard.description, input.description);
        assert_eq!(moodboard.looks, input.looks);
        assert!(logger.entries().is_empty());

        let request = manager.transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/api/moodboards");
        let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Spring");
        assert!(body.get("slug").is_none());
    }

    #[test]
    fn create_server_error_raises_bad_request_and_logs_once() {
        let (manager, logger) = setup(HttpResponse::new(500, "db down"));
        let err = manager.create(&Moodboard::new("Spring")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { status: 500 }));
        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, "MoodboardManager::create");
        assert_eq!(entries[0].status, 500);
        assert_eq!(entries[0].body, "db down");
    }

    #[test]
    fn create_not_found_is_a_logged_bad_request() {
        let (manager, logger) = setup(HttpResponse::new(404, "no route"));
        let err = manager.create(&Moodboard::new("Spring")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { status: 404 }));
        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, "MoodboardManager::create");
        assert_eq!(entries[0].status, 404);
    }

    #[test]
    fn update_outcomes() {
        let (manager, _) = setup(HttpResponse::new(200, SPRING));
        let updated = manager.update("spring", &Moodboard::new("Spring")).unwrap();
        assert_eq!(updated.token.as_deref(), Some("tok-1"));
        assert_eq!(manager.transport.last_request().method, HttpMethod::Put);

        let (manager, logger) = setup(HttpResponse::new(404, ""));
        let err = manager.update("spring", &Moodboard::new("Spring")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert!(logger.entries().is_empty());

        let (manager, logger) = setup(HttpResponse::new(422, "name too long"));
        let err = manager.update("spring", &Moodboard::new("Spring")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { status: 422 }));
        assert_eq!(logger.entries().len(), 1);
    }

    #[test]
    fn delete_outcomes() {
        let (manager, _) = setup(HttpResponse::new(204, ""));
        assert!(manager.delete("spring").unwrap());
        let request = manager.transport.last_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.path, "/api/moodboards/spring");

        let (manager, logger) = setup(HttpResponse::new(404, ""));
        assert!(!manager.delete("spring").unwrap());
        assert!(logger.entries().is_empty());

        let (manager, logger) = setup(HttpResponse::new(200, ""));
        assert!(!manager.delete("spring").unwrap());
        assert_eq!(logger.entries().len(), 1);
    }

    #[test]
    fn add_look_picks_sub_resource_from_type() {
        let (manager, _) = setup(HttpResponse::new(200, ""));
        assert!(manager.add_look("spring", "media", "dior-1").unwrap());
        let request = manager.transport.last_request();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.path, "/api/moodboards/spring/medias/dior-1");

        let (manager, _) = setup(HttpResponse::new(200, ""));
        assert!(manager.add_look("spring", "streetstyle", "paris-7").unwrap());
        assert_eq!(
            manager.transport.last_request().path,
            "/api/moodboards/spring/streetstyles/paris-7"
        );
    }

    #[test]
    fn remove_look_uses_delete() {
        let (manager, _) = setup(HttpResponse::new(200, ""));
        assert!(manager.remove_look("spring", LookKind::Media, "dior-1").unwrap());
        let request = manager.transport.last_request();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.path, "/api/moodboards/spring/medias/dior-1");
    }

    #[test]
    fn add_look_failure_is_false_and_logged() {
        let (manager, logger) = setup(HttpResponse::new(409, "already there"));
        assert!(!manager.add_look("spring", "media", "dior-1").unwrap());
        assert_eq!(logger.entries()[0].operation, "MoodboardManager::addLook");
    }

    #[test]
    fn every_mutation_raises_access_denied_on_403() {
        let forbidden = || HttpResponse::new(403, "not yours");
        let input = Moodboard::new("Spring");

        let (m, logger) = setup(forbidden());
        assert!(matches!(m.create(&input), Err(ApiError::AccessDenied)));
        assert!(logger.entries().is_empty());

        let (m, logger) = setup(forbidden());
        assert!(matches!(m.update("spring", &input), Err(ApiError::AccessDenied)));
        assert!(logger.entries().is_empty());

        let (m, logger) = setup(forbidden());
        assert!(matches!(m.delete("spring"), Err(ApiError::AccessDenied)));
        assert!(logger.entries().is_empty());

        let (m, logger) = setup(forbidden());
        assert!(matches!(m.add_look("spring", "media", "dior-1"), Err(ApiError::AccessDenied)));
        assert!(logger.entries().is_empty());

        let (m, logger) = setup(forbidden());
        assert!(matches!(
            m.remove_look("spring", "streetstyle", "paris-7"),
            Err(ApiError::AccessDenied)
        ));
        assert!(logger.entries().is_empty());
    }
}
