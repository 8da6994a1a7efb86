//! Translate domain errors into HTTP responses.
//!
//! The domain [`Error`] stays free of actix types; this module owns the
//! status mapping, the JSON body and the extractor hooks that turn malformed
//! request bodies or query strings into `invalid_request` payloads.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

const REDACTED_MESSAGE: &str = "Internal server error";

/// HTTP status for each error code.
pub const fn http_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::DuplicatePhone | ErrorCode::InvalidProductCode => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to the client. Internal failures keep only their trace id.
fn public_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(message = error.message(), trace_id = ?error.trace_id(), "internal error");
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        http_status(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let body = public_view(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = body.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(body)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}

fn rejected_input(kind: &str, message: String) -> actix_web::Error {
    warn!(kind, %message, "request input rejected");
    Error::invalid_request(message).into()
}

/// Rejection hook for JSON bodies that fail to parse or deserialise.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected_input("json", format!("invalid request body: {err}"))
}

/// Rejection hook for query strings that fail to deserialise.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected_input("query", format!("invalid query string: {err}"))
}

/// Extractor configuration routing body and query failures through
/// [`Error`].
pub fn extractor_configs() -> (web::JsonConfig, web::QueryConfig) {
    (
        web::JsonConfig::default().error_handler(json_error_handler),
        web::QueryConfig::default().error_handler(query_error_handler),
    )
}
