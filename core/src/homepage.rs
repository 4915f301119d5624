//! Read-only homepage lookups.

use crate::error::ApiResult;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::logger::{self, SharedLogger};
use crate::policy::{StatusPolicy, OK};
use crate::query::Query;
use crate::transport::Transport;
use crate::types::{Homepage, HomepageSection};

const READ: StatusPolicy = StatusPolicy::expecting(&[OK]);

pub struct HomepageManager<T> {
    transport: T,
    logger: SharedLogger,
}

impl<T> HomepageManager<T> {
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

    /// Fails with `InvalidArgument` for a section outside `HomepageSection`.
    pub fn build_get_by_section(&self, section: &str, language: Option<&str>) -> ApiResult<HttpRequest> {
        let section: HomepageSection = section.parse()?;
        Ok(
            HttpRequest::new(HttpMethod::Get, format!("/api/homepages/show/{section}"))
                .with_query(language_query(language)),
        )
    }

    pub fn build_get(&self, slug: &str, language: Option<&str>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("/api/homepages/{slug}")).with_query(language_query(language))
    }

    pub fn parse_get_by_section(&self, response: HttpResponse) -> ApiResult<Option<Homepage>> {
        self.parse("HomepageManager::getBySection", response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> ApiResult<Option<Homepage>> {
        self.parse("HomepageManager::get", response)
    }

    fn parse(&self, operation: &str, response: HttpResponse) -> ApiResult<Option<Homepage>> {
        READ.resolve(operation, response, self.logger.as_ref())?
            .map(|response| response.json())
            .transpose()
    }
}

impl<T: Transport> HomepageManager<T> {
    pub fn get_by_section(&self, section: &str, language: Option<&str>) -> ApiResult<Option<Homepage>> {
        let request = self.build_get_by_section(section, language)?;
        let response = self.transport.send(request)?;
        self.parse_get_by_section(response)
    }

    pub fn get(&self, slug: &str, language: Option<&str>) -> ApiResult<Option<Homepage>> {
        let response = self.transport.send(self.build_get(slug, language))?;
        self.parse_get(response)
    }
}

fn language_query(language: Option<&str>) -> Vec<(String, String)> {
    Query::new().with_opt("language", language).pairs()
}
