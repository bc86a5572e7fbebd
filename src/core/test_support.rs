// ─── Test HTTP server ───
// Serves canned responses on 127.0.0.1 so reqwest code runs against real sockets.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(Vec<u8>),
    Status(u16),
    /// Announces `total` bytes, then sends `chunk` bytes every `every` until done.
    Trickle {
        total: usize,
        chunk: usize,
        every: Duration,
    },
}

impl Reply {
    pub(crate) fn json(value: serde_json::Value) -> Self {
        Reply::Body(value.to_string().into_bytes())
    }
}

/// Start a server for `routes`, keyed by request target (`/path`, or the
/// absolute URL when the client talks to it as a proxy). Returns `http://host:port`.
pub(crate) async fn serve(routes: HashMap<String, Reply>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(respond(stream, Arc::clone(&routes)));
        }
    });

    format!("http://{addr}")
}

async fn respond(mut stream: TcpStream, routes: Arc<HashMap<String, Reply>>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&head);
    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();

    match routes.get(&target) {
        Some(Reply::Body(body)) => {
            if write_head(&mut stream, 200, body.len()).await {
                let _ = stream.write_all(body).await;
            }
        }
        Some(Reply::Status(code)) => {
            write_head(&mut stream, *code, 0).await;
        }
        Some(Reply::Trickle {
            total,
            chunk,
            every,
        }) => {
            if !write_head(&mut stream, 200, *total).await {
                return;
            }
            let mut sent = 0;
            while sent < *total {
                let n = (*chunk).min(total - sent);
                if stream.write_all(&vec![1u8; n]).await.is_err() || stream.flush().await.is_err() {
                    return;
                }
                sent += n;
                tokio::time::sleep(*every).await;
            }
        }
        None => {
            write_head(&mut stream, 404, 0).await;
        }
    }

    let _ = stream.shutdown().await;
}

async fn write_head(stream: &mut TcpStream, status: u16, len: usize) -> bool {
    let head = format!(
        "HTTP/1.1 {status} Canned\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(head.as_bytes()).await.is_ok()
}
