//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies carry enumerated fields as plain strings; these helpers
//! parse them into domain vocabularies and report failures as
//! `invalid_request` errors with field context. Extractor configuration lives
//! here too so malformed JSON, paths and queries share one error shape.

use std::str::FromStr;

use actix_web::{HttpRequest, web};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::{Error, UnknownVariant};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidValue,
    InvalidTimestamp,
    MalformedBody,
    MalformedPath,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedPath => "malformed_path",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Error for a field whose value the domain rejected.
pub(crate) fn invalid_field(field: FieldName, message: impl std::fmt::Display) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

/// Parse a vocabulary member such as a role or content type.
pub(crate) fn parse_vocabulary<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    T::from_str(value).map_err(|err| {
        Error::invalid_request(format!("{}: {err}", field.as_str())).with_details(json!({
            "field": field.as_str(),
            "value": value,
            "code": ErrorCode::InvalidValue.as_str(),
        }))
    })
}

pub(crate) fn parse_optional_vocabulary<T>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.map(|raw| parse_vocabulary(raw, field)).transpose()
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            Error::invalid_request(format!("{} must be an RFC 3339 timestamp", field.as_str()))
                .with_details(json!({
                    "field": field.as_str(),
                    "value": value,
                    "code": ErrorCode::InvalidTimestamp.as_str(),
                }))
        })
}

fn extractor_error(code: ErrorCode, message: String) -> actix_web::Error {
    Error::invalid_request(message)
        .with_details(json!({ "code": code.as_str() }))
        .into()
}

/// JSON body extractor settings reporting malformed payloads as `400`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        extractor_error(ErrorCode::MalformedBody, err.to_string())
    })
}

/// Path extractor settings reporting non-numeric ids as `400`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        extractor_error(ErrorCode::MalformedPath, err.to_string())
    })
}

/// Query string extractor settings reporting bad parameters as `400`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        extractor_error(ErrorCode::MalformedQuery, err.to_string())
    })
}
