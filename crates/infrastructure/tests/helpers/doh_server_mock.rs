#![allow(dead_code)]
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::any;
use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

/// Plain-HTTP stand-in for a DoH resolver.
///
/// `/dns-query` and `/resolve` answer 200, `/teapot` answers 418 and
/// `/slow` answers after two seconds.
pub struct MockDohServer {
    addr: SocketAddr,
    recorded: Recorded,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDohServer {
    pub async fn start() -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route("/dns-query", any(answer))
            .route("/resolve", any(answer_json))
            .route("/teapot", any(teapot))
            .route("/slow", any(slow))
            .with_state(recorded.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            addr,
            recorded,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded.lock().unwrap().clone()
    }
}

impl Drop for MockDohServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn record(recorded: &Recorded, method: Method, uri: &Uri, headers: &HeaderMap, body: Bytes) {
    let value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        accept: value(header::ACCEPT),
        content_type: value(header::CONTENT_TYPE),
        body: body.to_vec(),
    });
}

async fn answer(
    State(recorded): State<Recorded>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    record(&recorded, method, &uri, &headers, body);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/dns-message"),
            (header::CACHE_CONTROL, "max-age=300"),
        ],
        vec![0xab, 0xcd],
    )
}

async fn answer_json(
    State(recorded): State<Recorded>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    record(&recorded, method, &uri, &headers, body);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/dns-json")],
        r#"{"Status":0}"#,
    )
}

async fn teapot() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "short and stout")
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(2)).await;
    StatusCode::OK
}
