use crate::error::{ErrorBody, ScoutError, ScoutResult};
use bytes::Bytes;
use http::{StatusCode, header};
use pingora::prelude::Session;
use pingora_http::ResponseHeader;
use serde::Serialize;

/// A successful answer, before it is written to the wire.
pub(crate) enum Reply {
    Json(Vec<u8>),
    Text(&'static str),
    NotModified,
    Download { file_name: String, bytes: Bytes },
}

impl Reply {
    pub(crate) fn json<T: Serialize>(value: &T) -> ScoutResult<Self> {
        serde_json::to_vec(value)
            .map(Reply::Json)
            .map_err(|e| ScoutError::io("could not encode response", std::io::Error::other(e)))
    }

    pub(crate) async fn write(self, session: &mut Session) -> pingora::Result<StatusCode> {
        match self {
            Reply::Json(body) => {
                send(session, StatusCode::OK, "application/json", None, body.into()).await
            }
            Reply::Text(text) => {
                send(session, StatusCode::OK, "text/plain", None, Bytes::from_static(text.as_bytes())).await
            }
            Reply::NotModified => {
                let mut resp = ResponseHeader::build(StatusCode::NOT_MODIFIED, None)?;
                resp.insert_header(header::CONTENT_LENGTH, "0")?;
                session.write_response_header(Box::new(resp), true).await?;
                Ok(StatusCode::NOT_MODIFIED)
            }
            Reply::Download { file_name, bytes } => {
                let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));
                send(
                    session,
                    StatusCode::OK,
                    "application/octet-stream",
                    Some(disposition),
                    bytes,
                )
                .await
            }
        }
    }
}

pub(crate) async fn send_error(session: &mut Session, err: &ScoutError) -> pingora::Result<StatusCode> {
    let status = err.status_code();
    let body = serde_json::to_vec(&err.to_body())
        .map_err(|_| pingora::Error::new(pingora::Custom("json serialization failed")))?;
    send(session, status, "application/json", None, body.into()).await
}

pub(crate) async fn send_not_found(session: &mut Session, path: &str) -> pingora::Result<StatusCode> {
    let body = ErrorBody {
        message: format!("unknown endpoint {path}"),
        code: StatusCode::NOT_FOUND.as_u16(),
    };
    let body = serde_json::to_vec(&body)
        .map_err(|_| pingora::Error::new(pingora::Custom("json serialization failed")))?;
    send(session, StatusCode::NOT_FOUND, "application/json", None, body.into()).await
}

pub(crate) async fn send_method_not_allowed(
    session: &mut Session,
    allow: &'static str,
) -> pingora::Result<StatusCode> {
    let mut resp = ResponseHeader::build(StatusCode::METHOD_NOT_ALLOWED, None)?;
    resp.insert_header(header::ALLOW, allow)?;
    resp.insert_header(header::CONTENT_LENGTH, "0")?;
    session.write_response_header(Box::new(resp), true).await?;
    Ok(StatusCode::METHOD_NOT_ALLOWED)
}

async fn send(
    session: &mut Session,
    status: StatusCode,
    content_type: &'static str,
    disposition: Option<String>,
    body: Bytes,
) -> pingora::Result<StatusCode> {
    let mut resp = ResponseHeader::build(status, None)?;
    resp.insert_header(header::CONTENT_TYPE, content_type)?;
    resp.insert_header(header::CONTENT_LENGTH, body.len().to_string())?;
    if let Some(d) = disposition {
        resp.insert_header(header::CONTENT_DISPOSITION, d)?;
    }

    session.write_response_header(Box::new(resp), false).await?;
    session.write_response_body(Some(body), true).await?;
    Ok(status)
}
