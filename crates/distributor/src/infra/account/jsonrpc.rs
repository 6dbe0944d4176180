//! Minimal JSON-RPC 2.0 client used for both the Starknet node and the
//! wallet endpoint.

use {
    crate::util::http::{self, roundtrip},
    reqwest::Url,
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    std::sync::atomic::{AtomicU64, Ordering},
};

#[derive(Debug)]
pub struct Client {
    client: reqwest::Client,
    url: Url,
    id: AtomicU64,
}

impl Client {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self {
            client,
            url,
            id: AtomicU64::new(0),
        }
    }

    pub async fn call<P, T>(&self, method: &'static str, params: P) -> Result<T, Error>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let request = Request {
            jsonrpc: "2.0",
            id: self.id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let response: Response<T> =
            roundtrip!(<Response<T>>; self.client.post(self.url.clone()).json(&request)).await?;
        match response {
            Response {
                error: Some(error), ..
            } => Err(Error::Rpc {
                code: error.code,
                message: error.message,
            }),
            Response {
                result: Some(result),
                ..
            } => Ok(result),
            Response { .. } => Err(Error::MissingResult),
        }
    }
}

#[derive(Serialize)]
struct Request<P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: P,
}

#[derive(Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] http::Error),
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("JSON-RPC response has neither a result nor an error")]
    MissingResult,
}
