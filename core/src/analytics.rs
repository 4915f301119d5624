//! Fire-and-forget analytics events.
//!
//! Every call is one POST. The server acknowledges with 201 or 204; any other
//! answer is reported as `false`, and logged unless it was a plain 404.

use crate::error::ApiResult;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::logger::{self, SharedLogger};
use crate::policy::{StatusPolicy, CREATED, NO_CONTENT};
use crate::query::Query;
use crate::transport::Transport;
use crate::types::{AnalyticsEvent, RequestContext};

const EVENT: StatusPolicy = StatusPolicy::expecting(&[CREATED, NO_CONTENT]);

pub struct AnalyticsManager<T> {
    transport: T,
    logger: SharedLogger,
}

impl<T> AnalyticsManager<T> {
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

    pub fn build_media(&self, slug: &str, query: &Query, client_ip: Option<&str>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, format!("/api/analytics/media/{slug}"))
            .with_header("X-Client-IP", client_ip)
            .with_query(query.pairs())
    }

    pub fn build_streetstyle(&self, slug: &str, query: &Query, client_ip: Option<&str>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, format!("/api/analytics/streetstyle/{slug}"))
            .with_header("X-Client-IP", client_ip)
            .with_query(query.pairs())
    }

    /// An explicit `client_ip` wins over the one carried by `ctx`.
    pub fn build_page(
        &self,
        ctx: &RequestContext,
        route: &str,
        query: &Query,
        client_ip: Option<&str>,
    ) -> HttpRequest {
        with_context(
            HttpRequest::new(HttpMethod::Post, format!("/api/analytics/page/{route}")),
            ctx,
            client_ip,
        )
        .with_query(query.pairs())
    }

    pub fn build_photos(
        &self,
        ctx: &RequestContext,
        route: &str,
        event: AnalyticsEvent,
        query: &Query,
        client_ip: Option<&str>,
    ) -> HttpRequest {
        with_context(
            HttpRequest::new(HttpMethod::Post, format!("/api/analytics/photos/{route}/{event}")),
            ctx,
            client_ip,
        )
        .with_query(query.pairs())
    }

    /// `true` when the server recorded the event.
    pub fn parse_event(&self, operation: &str, response: HttpResponse) -> ApiResult<bool> {
        Ok(EVENT.resolve(operation, response, self.logger.as_ref())?.is_some())
    }
}

impl<T: Transport> AnalyticsManager<T> {
    pub fn media(&self, slug: &str, query: &Query, client_ip: Option<&str>) -> ApiResult<bool> {
        let response = self.transport.send(self.build_media(slug, query, client_ip))?;
        self.parse_event("AnalyticsManager::media", response)
    }

    pub fn streetstyle(&self, slug: &str, query: &Query, client_ip: Option<&str>) -> ApiResult<bool> {
        let response = self
            .transport
            .send(self.build_streetstyle(slug, query, client_ip))?;
        self.parse_event("AnalyticsManager::streetstyle", response)
    }

    pub fn page(
        &self,
        ctx: &RequestContext,
        route: &str,
        query: &Query,
        client_ip: Option<&str>,
    ) -> ApiResult<bool> {
        let response = self
            .transport
            .send(self.build_page(ctx, route, query, client_ip))?;
        self.parse_event("AnalyticsManager::page", response)
    }

    pub fn photos(
        &self,
        ctx: &RequestContext,
        route: &str,
        event: AnalyticsEvent,
        query: &Query,
        client_ip: Option<&str>,
    ) -> ApiResult<bool> {
        let response = self
            .transport
            .send(self.build_photos(ctx, route, event, query, client_ip))?;
        self.parse_event("AnalyticsManager::photos", response)
    }
}

fn with_context(request: HttpRequest, ctx: &RequestContext, client_ip: Option<&str>) -> HttpRequest {
    request
        .with_header("X-Client-IP", client_ip.or(ctx.client_ip.as_deref()))
        .with_header("X-User-Agent", ctx.user_agent.as_deref())
        .with_header("X-accept-language", ctx.accept_language.as_deref())
}
