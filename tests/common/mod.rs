use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// What the stub saw for one request
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct ReceivedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

struct StubState {
    status: u16,
    body: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

/// Stand-in for the chat-completions API replying with a canned status and body
pub struct StubApi {
    pub url: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    handle: ServerHandle,
}

#[allow(dead_code)]
impl StubApi {
    pub async fn start(status: u16, body: impl Into<String>) -> StubApi {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = web::Data::new(StubState {
            status,
            body: body.into(),
            received: received.clone(),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .route(COMPLETIONS_PATH, web::post().to(completions))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub server");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        StubApi {
            url: format!("http://{}{}", addr, COMPLETIONS_PATH),
            received,
            handle,
        }
    }

    /// Stub answering 200 with a single choice carrying `content`
    pub async fn replying(content: &str) -> StubApi {
        let body = serde_json::json!({
            "id": "chatcmpl-stub",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        });
        StubApi::start(200, body.to_string()).await
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn completions(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<StubState>,
) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.received.lock().unwrap().push(ReceivedRequest {
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: body.to_vec(),
    });

    HttpResponse::build(StatusCode::from_u16(state.status).unwrap())
        .content_type("application/json")
        .body(state.body.clone())
}

/// Raw listener that promises a longer body than it sends, then hangs up
#[allow(dead_code)]
pub struct TruncatingApi {
    pub url: String,
    task: tokio::task::JoinHandle<()>,
}

#[allow(dead_code)]
impl TruncatingApi {
    pub async fn start(status: u16) -> TruncatingApi {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind truncating server");
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            // Drain the whole request so closing sends FIN rather than RST
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                if let Some(expected) = request_len(&request) {
                    if request.len() >= expected {
                        break;
                    }
                }
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }

            let partial = r#"{"choices":[{"message":"#;
            let head = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                partial.len() + 512
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(partial.as_bytes()).await;
            let _ = socket.flush().await;
            let _ = socket.shutdown().await;
        });

        TruncatingApi {
            url: format!("http://{}{}", addr, COMPLETIONS_PATH),
            task,
        }
    }

    pub async fn stop(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

/// Header length plus Content-Length, once the headers are complete
#[allow(dead_code)]
fn request_len(buf: &[u8]) -> Option<usize> {
    let end = buf.windows(4).position(|w| w == b"\r\n\r\n")? + 4;
    let head = String::from_utf8_lossy(&buf[..end]);
    let body_len = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    Some(end + body_len)
}
