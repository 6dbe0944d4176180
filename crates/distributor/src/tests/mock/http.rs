//! In-process HTTP server standing in for the node, the wallet and the
//! record API. Requests must arrive in the order of the expectations.

use {
    crate::infra::account::jsonrpc,
    axum::{
        extract::{Json, Path, State},
        http::StatusCode,
    },
    reqwest::Url,
    serde_json::{Value, json},
    std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    },
};

#[derive(Debug, Clone)]
pub enum Expectation {
    /// A JSON-RPC request posted to the root path.
    Rpc {
        method: &'static str,
        params: Value,
        result: Result<Value, (i64, String)>,
    },
    /// A REST request.
    Post {
        path: &'static str,
        req: Value,
        status: StatusCode,
        res: Value,
    },
}

#[derive(Debug, Clone)]
struct Expectations(Arc<Mutex<VecDeque<Expectation>>>);

/// Starts a mock server and returns its base URL.
pub async fn setup(expectations: Vec<Expectation>) -> Url {
    let app = axum::Router::new()
        .route("/", axum::routing::post(root))
        .route("/{*path}", axum::routing::post(nested))
        .with_state(Expectations(Arc::new(Mutex::new(expectations.into()))));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/").parse().unwrap()
}

/// Starts a mock JSON-RPC server and returns a client for it.
pub async fn jsonrpc(expectations: Vec<Expectation>) -> jsonrpc::Client {
    jsonrpc::Client::new(reqwest::Client::new(), setup(expectations).await)
}

async fn root(
    State(state): State<Expectations>,
    Json(req): Json<Value>,
) -> (StatusCode, Json<Value>) {
    respond(&state, "", req)
}

async fn nested(
    State(state): State<Expectations>,
    Path(path): Path<String>,
    Json(req): Json<Value>,
) -> (StatusCode, Json<Value>) {
    respond(&state, &path, req)
}

fn respond(state: &Expectations, path: &str, req: Value) -> (StatusCode, Json<Value>) {
    let expectation = state
        .0
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("unexpected request to /{path}: {req}"));

    match expectation {
        Expectation::Rpc {
            method,
            params,
            result,
        } => {
            assert_eq!(path, "", "JSON-RPC request has unexpected path");
            assert_eq!(req["method"], method, "unexpected JSON-RPC method");
            assert_eq!(req["params"], params, "unexpected params for {method}");
            let body = match result {
                Ok(result) => json!({ "jsonrpc": "2.0", "id": req["id"], "result": result }),
                Err((code, message)) => json!({
                    "jsonrpc": "2.0",
                    "id": req["id"],
                    "error": { "code": code, "message": message },
                }),
            };
            (StatusCode::OK, Json(body))
        }
        Expectation::Post {
            path: expected_path,
            req: expected_req,
            status,
            res,
        } => {
            assert_eq!(path, expected_path, "POST request has unexpected path");
            assert_eq!(req, expected_req, "POST request has unexpected body");
            (status, Json(res))
        }
    }
}
