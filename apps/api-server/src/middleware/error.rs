//! Error handling - RFC 7807 compliant responses.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use blog_core::error::{DomainError, RepoError};
use blog_shared::ErrorResponse;
use std::fmt;

use crate::observability::RequestId;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(_) => ErrorResponse::internal_error(),
        }
    }

    /// Problem response carrying the request path and ID.
    pub fn contextual_response(&self, req: &HttpRequest) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(with_request_context(self.problem(), req))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(self.problem())
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

fn with_request_context(problem: ErrorResponse, req: &HttpRequest) -> ErrorResponse {
    let problem = problem.with_instance(req.path());
    match req.extensions().get::<RequestId>() {
        Some(request_id) => problem.with_request_id(request_id.as_str()),
        None => problem,
    }
}

/// Problem response for extractor failures, which happen before a handler runs.
fn extractor_problem(
    req: &HttpRequest,
    status: StatusCode,
    problem: ErrorResponse,
) -> actix_web::Error {
    let response = HttpResponse::build(status).json(with_request_context(problem, req));
    actix_web::error::InternalError::from_response("extractor rejected request", response).into()
}

/// Malformed JSON bodies become 400 problem responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req| {
        tracing::debug!(error = %err, "Rejected request body");
        extractor_problem(
            req,
            StatusCode::BAD_REQUEST,
            ErrorResponse::bad_request(err.to_string()),
        )
    })
}

/// Unparseable post ids cannot name a stored post, so they are reported as 404.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, req| {
        tracing::debug!(error = %err, "Rejected path parameter");
        extractor_problem(
            req,
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found(format!("No post at {}", req.path())),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::domain::PostId;

    #[test]
    fn test_repo_not_found_maps_to_404() {
        let err = AppError::from(RepoError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_query_errors_are_masked() {
        let err = AppError::from(RepoError::Query("relation posts does not exist".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.problem().detail, None);
    }

    #[test]
    fn test_domain_not_found_names_the_post() {
        let id = PostId::generate();
        let err = AppError::from(RepoError::NotFound.into_domain(id));
        match err {
            AppError::NotFound(detail) => assert!(detail.contains(&id.to_string())),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = AppError::from(DomainError::Validation("missing title".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
