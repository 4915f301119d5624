//! Status-code classification shared by every manager.
//!
//! Each operation declares its success codes and which of the non-success
//! outcomes it raises. `resolve` applies that policy to a response so the
//! managers never re-derive the 403/404/other switch themselves.

use crate::error::{ApiError, ApiResult};
use crate::http::HttpResponse;
use crate::logger::Logger;

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const NO_CONTENT: u16 = 204;
pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;

/// What a status code means for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Absent,
    Forbidden,
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    success: &'static [u16],
    absent_is_unexpected: bool,
    absent_is_error: bool,
    forbidden_is_error: bool,
    failure_is_error: bool,
}

impl StatusPolicy {
    /// Treat `success` as success, 404 as benign absence, and everything else
    /// (403 included) as a logged, tolerated failure.
    pub const fn expecting(success: &'static [u16]) -> Self {
        Self {
            success,
            absent_is_unexpected: false,
            absent_is_error: false,
            forbidden_is_error: false,
            failure_is_error: false,
        }
    }

    /// 404 gets no special meaning and is handled like any other
    /// unexpected status.
    pub const fn absent_is_unexpected(mut self) -> Self {
        self.absent_is_unexpected = true;
        self
    }

    /// 404 raises `ApiError::NotFound` instead of yielding `None`.
    pub const fn absent_is_error(mut self) -> Self {
        self.absent_is_error = true;
        self
    }

    /// 403 raises `ApiError::AccessDenied` without logging.
    pub const fn forbidden_is_error(mut self) -> Self {
        self.forbidden_is_error = true;
        self
    }

    /// Unexpected statuses are logged and then raise `ApiError::BadRequest`.
    pub const fn failure_is_error(mut self) -> Self {
        self.failure_is_error = true;
        self
    }

    pub fn classify(&self, status: u16) -> Outcome {
        if self.success.contains(&status) {
            Outcome::Success
        } else if status == NOT_FOUND && !self.absent_is_unexpected {
            Outcome::Absent
        } else if status == FORBIDDEN && self.forbidden_is_error {
            Outcome::Forbidden
        } else {
            Outcome::Unexpected
        }
    }

    /// `Some(response)` on success; `None` for a tolerated non-success.
    /// Unexpected statuses produce exactly one log entry.
    pub fn resolve(
        &self,
        operation: &str,
        response: HttpResponse,
        logger: &dyn Logger,
    ) -> ApiResult<Option<HttpResponse>> {
        match self.classify(response.status) {
            Outcome::Success => Ok(Some(response)),
            Outcome::Absent if self.absent_is_error => Err(ApiError::NotFound),
            Outcome::Absent => Ok(None),
            Outcome::Forbidden => Err(ApiError::AccessDenied),
            Outcome::Unexpected => {
                logger.unexpected_status(operation, response.status, &response.text());
                if self.failure_is_error {
                    Err(ApiError::BadRequest {
                        status: response.status,
                    })
                } else {
                    Ok(None)
                }
            }
        }
    }
}
