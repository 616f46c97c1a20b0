//! Template-driven message formatter.
//!
//! # Responsibilities
//! - Parse `{placeholder}` templates once, at construction
//! - Reject unknown placeholders before any request is logged
//! - Render request/response/reason into a single message
//!
//! # Placeholders
//! - `request`, `response`: full HTTP messages
//! - `ts`, `date_iso_8601`, `date_common_log`: current time
//! - `host`, `method`, `uri`, `target`, `version`, `hostname`
//! - `code`, `phrase`, `error`
//! - `req_headers`, `res_headers`, `req_body`, `res_body`
//! - `req_header_<name>`, `res_header_<name>`
//!
//! Response-derived placeholders render `NULL` when there is no response,
//! `error` renders `NULL` when there is no reason.

use std::error::Error;

use bytes::Bytes;
use chrono::{Local, Utc};
use http::header::HOST;
use http::{HeaderMap, HeaderName, Request, Response, Version};
use thiserror::Error;

use crate::format::{FormatError, Formatter};

/// Apache common log format.
pub const CLF: &str =
    "{hostname} {req_header_User-Agent} - [{date_common_log}] \"{method} {target} HTTP/{version}\" {code} {res_header_Content-Length}";

/// Full request and response dump.
pub const DEBUG: &str = ">>>>>>>>\n{request}\n<<<<<<<<\n{response}\n--------\n{error}";

/// Request line and status.
pub const SHORT: &str = "[{ts}] \"{method} {target} HTTP/{version}\" {code}";

const NULL: &str = "NULL";

/// Errors raised while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder `{{{0}}}`")]
    UnknownPlaceholder(String),

    #[error("invalid header name in placeholder `{{{0}}}`")]
    InvalidHeaderName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Placeholder {
    Request,
    Response,
    Timestamp,
    DateCommonLog,
    Host,
    Method,
    Uri,
    Target,
    Version,
    Hostname,
    Code,
    Phrase,
    Error,
    RequestHeaders,
    ResponseHeaders,
    RequestBody,
    ResponseBody,
    RequestHeader(HeaderName),
    ResponseHeader(HeaderName),
}

impl Placeholder {
    fn parse(name: &str) -> Result<Self, TemplateError> {
        let placeholder = match name {
            "request" => Placeholder::Request,
            "response" => Placeholder::Response,
            "ts" | "date_iso_8601" => Placeholder::Timestamp,
            "date_common_log" => Placeholder::DateCommonLog,
            "host" => Placeholder::Host,
            "method" => Placeholder::Method,
            "uri" | "url" => Placeholder::Uri,
            "target" => Placeholder::Target,
            "version" => Placeholder::Version,
            "hostname" => Placeholder::Hostname,
            "code" => Placeholder::Code,
            "phrase" => Placeholder::Phrase,
            "error" => Placeholder::Error,
            "req_headers" => Placeholder::RequestHeaders,
            "res_headers" => Placeholder::ResponseHeaders,
            "req_body" => Placeholder::RequestBody,
            "res_body" => Placeholder::ResponseBody,
            _ => {
                if let Some(header) = name.strip_prefix("req_header_") {
                    Placeholder::RequestHeader(header_name(name, header)?)
                } else if let Some(header) = name.strip_prefix("res_header_") {
                    Placeholder::ResponseHeader(header_name(name, header)?)
                } else {
                    return Err(TemplateError::UnknownPlaceholder(name.to_string()));
                }
            }
        };
        Ok(placeholder)
    }
}

fn header_name(placeholder: &str, header: &str) -> Result<HeaderName, TemplateError> {
    HeaderName::from_bytes(header.as_bytes())
        .map_err(|_| TemplateError::InvalidHeaderName(placeholder.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// Formatter driven by a `{placeholder}` template.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    template: String,
    segments: Vec<Segment>,
    hostname: String,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::clf()
    }
}

impl MessageFormatter {
    /// Parse a template. Unknown placeholders are rejected here.
    pub fn new(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();
        let segments = parse(&template)?;
        let hostname = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .unwrap_or_default();

        Ok(Self {
            template,
            segments,
            hostname,
        })
    }

    /// Resolve a preset name (`clf`, `debug`, `short`) or parse a template.
    pub fn named(name_or_template: &str) -> Result<Self, TemplateError> {
        match name_or_template.trim().to_ascii_lowercase().as_str() {
            "clf" => Self::new(CLF),
            "debug" => Self::new(DEBUG),
            "short" => Self::new(SHORT),
            _ => Self::new(name_or_template),
        }
    }

    pub fn clf() -> Self {
        Self::new(CLF).expect("CLF template is valid")
    }

    pub fn debug() -> Self {
        Self::new(DEBUG).expect("DEBUG template is valid")
    }

    pub fn short() -> Self {
        Self::new(SHORT).expect("SHORT template is valid")
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn render(
        &self,
        request: &Request<Bytes>,
        response: Option<&Response<Bytes>>,
        reason: Option<&(dyn Error + 'static)>,
    ) -> String {
        let mut out = String::with_capacity(self.template.len() + 64);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => {
                    out.push_str(&self.field(field, request, response, reason))
                }
            }
        }
        out
    }

    fn field(
        &self,
        field: &Placeholder,
        request: &Request<Bytes>,
        response: Option<&Response<Bytes>>,
        reason: Option<&(dyn Error + 'static)>,
    ) -> String {
        match field {
            Placeholder::Request => request_message(request),
            Placeholder::Response => response.map_or_else(|| NULL.to_string(), response_message),
            Placeholder::Timestamp => Utc::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
            Placeholder::DateCommonLog => Local::now().format("%d/%b/%Y:%H:%M:%S %z").to_string(),
            Placeholder::Host => request_host(request),
            Placeholder::Method => request.method().to_string(),
            Placeholder::Uri => request.uri().to_string(),
            Placeholder::Target => request_target(request),
            Placeholder::Version => version(request.version()).to_string(),
            Placeholder::Hostname => self.hostname.clone(),
            Placeholder::Code => response.map_or_else(
                || NULL.to_string(),
                |r| r.status().as_u16().to_string(),
            ),
            Placeholder::Phrase => response
                .and_then(|r| r.status().canonical_reason())
                .unwrap_or(NULL)
                .to_string(),
            Placeholder::Error => reason.map_or_else(|| NULL.to_string(), |e| e.to_string()),
            Placeholder::RequestHeaders => {
                format!("{}\r\n{}", request_line(request), headers(request.headers()))
            }
            Placeholder::ResponseHeaders => response.map_or_else(
                || NULL.to_string(),
                |r| format!("{}\r\n{}", status_line(r), headers(r.headers())),
            ),
            Placeholder::RequestBody => String::from_utf8_lossy(request.body()).into_owned(),
            Placeholder::ResponseBody => response.map_or_else(
                || NULL.to_string(),
                |r| String::from_utf8_lossy(r.body()).into_owned(),
            ),
            Placeholder::RequestHeader(name) => header_line(request.headers(), name),
            Placeholder::ResponseHeader(name) => response.map_or_else(
                || NULL.to_string(),
                |r| header_line(r.headers(), name),
            ),
        }
    }
}

impl Formatter for MessageFormatter {
    fn format(
        &self,
        request: &Request<Bytes>,
        response: Option<&Response<Bytes>>,
        reason: Option<&(dyn Error + 'static)>,
    ) -> Result<String, FormatError> {
        Ok(self.render(request, response, reason))
    }
}

/// Split a template into literals and placeholders. Braces that do not
/// enclose a placeholder-shaped name are kept as literal text.
fn parse(template: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            literal.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let name = after[..close].trim();
        if is_placeholder_name(name) {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(Placeholder::parse(name)?));
            rest = &after[close + 1..];
        } else {
            literal.push('{');
            rest = after;
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
}

fn version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn request_target(request: &Request<Bytes>) -> String {
    request
        .uri()
        .path_and_query()
        .map_or_else(|| "/".to_string(), |pq| pq.as_str().to_string())
}

fn request_host(request: &Request<Bytes>) -> String {
    request
        .headers()
        .get(HOST)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .or_else(|| request.uri().host().map(str::to_string))
        .unwrap_or_default()
}

fn request_line(request: &Request<Bytes>) -> String {
    format!(
        "{} {} HTTP/{}",
        request.method(),
        request_target(request),
        version(request.version())
    )
}

fn status_line(response: &Response<Bytes>) -> String {
    let status = response.status();
    format!(
        "HTTP/{} {} {}",
        version(response.version()),
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
}

fn headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())))
        .collect::<Vec<_>>()
        .join("\r\n")
}

fn header_line(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get_all(name)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

fn request_message(request: &Request<Bytes>) -> String {
    let mut head = request_line(request);
    if !request.headers().contains_key(HOST) {
        if let Some(authority) = request.uri().authority() {
            head.push_str(&format!("\r\nhost: {}", authority));
        }
    }
    if !request.headers().is_empty() {
        head.push_str("\r\n");
        head.push_str(&headers(request.headers()));
    }
    format!("{}\r\n\r\n{}", head, String::from_utf8_lossy(request.body()))
}

fn response_message(response: &Response<Bytes>) -> String {
    let mut head = status_line(response);
    if !response.headers().is_empty() {
        head.push_str("\r\n");
        head.push_str(&headers(response.headers()));
    }
    format!("{}\r\n\r\n{}", head, String::from_utf8_lossy(response.body()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn request() -> Request<Bytes> {
        Request::builder()
            .method("GET")
            .uri("http://example.com/")
            .header("user-agent", "ua")
            .body(Bytes::from_static(b"ping"))
            .unwrap()
    }

    fn response(code: u16) -> Response<Bytes> {
        Response::builder()
            .status(code)
            .header("content-length", "9")
            .body(Bytes::from_static(b"test data"))
            .unwrap()
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = MessageFormatter::new("{method} {nope}").unwrap_err();
        assert_eq!(err, TemplateError::UnknownPlaceholder("nope".into()));
    }

    #[test]
    fn test_invalid_header_placeholder_rejected() {
        let err = MessageFormatter::new("{req_header_}").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidHeaderName(_)));
    }

    #[test]
    fn test_non_placeholder_braces_are_literal() {
        let formatter = MessageFormatter::new("{\"m\": \"{method}\"} {").unwrap();
        let message = formatter.format(&request(), None, None).unwrap();
        assert_eq!(message, "{\"m\": \"GET\"} {");
    }

    #[test]
    fn test_clf_with_response() {
        let message = MessageFormatter::clf()
            .format(&request(), Some(&response(200)), None)
            .unwrap();

        assert!(message.contains(" ua - ["), "{}", message);
        assert!(message.ends_with("\"GET / HTTP/1.1\" 200 9"), "{}", message);
    }

    #[test]
    fn test_clf_without_response_renders_null() {
        let message = MessageFormatter::clf().format(&request(), None, None).unwrap();
        assert!(message.ends_with("\"GET / HTTP/1.1\" NULL NULL"), "{}", message);
    }

    #[test]
    fn test_error_and_phrase() {
        let formatter = MessageFormatter::new("{code} {phrase}: {error}").unwrap();
        let reason = std::io::Error::new(std::io::ErrorKind::Other, "boom");

        let message = formatter
            .format(&request(), Some(&response(404)), Some(&reason))
            .unwrap();
        assert_eq!(message, "404 Not Found: boom");

        let message = formatter.format(&request(), None, None).unwrap();
        assert_eq!(message, "NULL NULL: NULL");
    }

    #[test]
    fn test_bodies_and_headers() {
        let formatter = MessageFormatter::new("{req_body}|{res_body}|{res_header_X-Missing}|{host}").unwrap();
        let message = formatter
            .format(&request(), Some(&response(201)), None)
            .unwrap();
        assert_eq!(message, "ping|test data||example.com");
    }

    #[test]
    fn test_debug_template_dumps_messages() {
        let mut response = response(500);
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        let message = MessageFormatter::debug()
            .format(&request(), Some(&response), None)
            .unwrap();

        assert!(message.starts_with(">>>>>>>>\nGET / HTTP/1.1\r\nhost: example.com\r\nuser-agent: ua"));
        assert!(message.contains("HTTP/1.1 500 Internal Server Error\r\ncontent-length: 9\r\n\r\ntest data"));
        assert!(message.ends_with("--------\nNULL"));
    }

    #[test]
    fn test_named_presets() {
        assert_eq!(MessageFormatter::named("SHORT").unwrap().template(), SHORT);
        assert_eq!(MessageFormatter::named("{method}").unwrap().template(), "{method}");
        assert!(MessageFormatter::named("{bogus}").is_err());
    }
}
