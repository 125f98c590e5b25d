//! RFC 8484 front: GET `?dns=`, POST `application/dns-message` and
//! `application/dns-json` passthrough.

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Query, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use doh_ecs_application::ports::UpstreamResponse;
use doh_ecs_domain::{decode_base64url, DohMethod, DohRequest, DomainError, JsonQuery};
use http_body_util::LengthLimitError;
use std::error::Error as _;
use std::net::SocketAddr;
use tracing::{debug, instrument};

use crate::errors::ApiError;
use crate::state::AppState;

/// Largest DNS message, and so the largest accepted POST body.
pub const MAX_DNS_MESSAGE_SIZE: usize = 65535;

const DNS_MESSAGE: &str = "application/dns-message";
const DNS_JSON: &str = "application/dns-json";

/// Recomputed by the server rather than relayed.
const HOP_BY_HOP: [&str; 4] = [
    "connection",
    "transfer-encoding",
    "keep-alive",
    "content-length",
];

#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
pub async fn handle_doh(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    if !state.routing.allows(request.uri().path()) {
        debug!("Path outside configured prefix");
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let client_ip = client_ip(&state.client_ip_header, &request);
    let wants_json = has_media_type(request.headers(), header::ACCEPT, DNS_JSON);
    let carries_message = has_media_type(request.headers(), header::CONTENT_TYPE, DNS_MESSAGE);

    match request.method().clone() {
        Method::GET if wants_json => {
            let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
                .map_err(|e| DomainError::InvalidQuery(e.body_text()))?;
            let response = state
                .forward_json
                .execute(&JsonQuery::new(params, client_ip))
                .await?;
            Ok(relay(response))
        }
        Method::GET => {
            let Some(dns) = dns_param(&request) else {
                return Ok(StatusCode::NOT_FOUND.into_response());
            };
            let message = decode_base64url(&dns)?;
            let response = state
                .forward_message
                .execute(&DohRequest::new(message, client_ip, DohMethod::Get))
                .await?;
            Ok(relay(response))
        }
        Method::POST if carries_message => {
            let message = match to_bytes(request.into_body(), MAX_DNS_MESSAGE_SIZE).await {
                Ok(body) => body.to_vec(),
                Err(e) if is_length_limit(&e) => {
                    return Ok(StatusCode::PAYLOAD_TOO_LARGE.into_response())
                }
                Err(e) => {
                    return Err(DomainError::InvalidQuery(format!(
                        "failed to read request body: {}",
                        e
                    ))
                    .into())
                }
            };
            let response = state
                .forward_message
                .execute(&DohRequest::new(message, client_ip, DohMethod::Post))
                .await?;
            Ok(relay(response))
        }
        _ => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

/// The first address in the configured header, else the socket peer.
fn client_ip(header_name: &str, request: &Request) -> Option<String> {
    request
        .headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source = err.source();
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

fn dns_param(request: &Request) -> Option<String> {
    let Query(params) = Query::<Vec<(String, String)>>::try_from_uri(request.uri()).ok()?;
    params
        .into_iter()
        .find(|(k, _)| k == "dns")
        .map(|(_, v)| v)
}

fn has_media_type(headers: &HeaderMap, name: HeaderName, media_type: &str) -> bool {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|v| v.split(';').next())
        .any(|v| v.trim().eq_ignore_ascii_case(media_type))
}

fn relay(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let headers = response.headers_mut();
    for (name, value) in upstream.headers {
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) else {
            continue;
        };
        if HOP_BY_HOP.contains(&name.as_str()) {
            continue;
        }
        headers.append(name, value);
    }

    response
}
