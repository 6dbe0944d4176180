//! Module containing utilities for round-tripping HTTP requests.
//!
//! Note that this helper is implemented as a macro. This is needed in order to
//! ensure that we preserve the module path in the log event from the original
//! callsite instead of all HTTP requests appearing as they are made from this
//! module.

use {
    reqwest::{Method, RequestBuilder, StatusCode, Url},
    serde::de::DeserializeOwned,
    std::str,
};

/// Roundtrip an HTTP request. This will `TRACE` log the request and responses.
///
/// This is a thin macro wrapper around [`roundtrip_internal`] that ensures that
/// logs are attributed from the callsite and not from this module.
macro_rules! roundtrip {
    (<$t:ty>; $request:expr) => {
        $crate::util::http::roundtrip_internal::<$t>(
            $request,
            |method, url, body, message| {
                if let Some(body) = body {
                    tracing::trace!(%method, %url, %body, "{message}");
                } else {
                    tracing::trace!(%method, %url, "{message}");
                }
            },
            |status, body, message| {
                tracing::trace!(%status, %body, "{message}");
            },
        )
    };
    ($request:expr) => {
        $crate::util::http::roundtrip!(<_>; $request)
    };
}
pub(crate) use roundtrip;

#[doc(hidden)]
pub async fn roundtrip_internal<T>(
    request: RequestBuilder,
    log_request: impl FnOnce(&Method, &Url, Option<&str>, &str),
    log_response: impl FnOnce(StatusCode, &str, &str),
) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let (client, request) = request.build_split();
    let request = request?;

    let body = request
        .body()
        .and_then(|body| str::from_utf8(body.as_bytes()?).ok());

    log_request(
        request.method(),
        request.url(),
        body,
        "sending HTTP request",
    );
    let response = client.execute(request).await?;

    let status = response.status();
    let body = response.text().await?;
    log_response(status, &body, "received HTTP response");

    if !status.is_success() {
        return Err(Error::Status(status, body));
    }
    // Some endpoints answer with an empty body.
    let body = if body.trim().is_empty() { "null" } else { &body };
    Ok(serde_json::from_str(body)?)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error occurred when parsing the JSON body from the HTTP response
    /// into the expected result type.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A general HTTP error when sending a request or receiving a response.
    ///
    /// This is a protocol-level error, and can indicate a networking issue or
    /// a misbehaving HTTP server.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The response had a non-2xx status code.
    #[error("HTTP {0}: {1}")]
    Status(StatusCode, String),
}
