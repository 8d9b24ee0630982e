//! Shared mock backends for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aio_labs::http::{Fetcher, ReqwestClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a simple mock backend that returns a fixed 200 response.
#[allow(dead_code)]
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    start_programmable_backend(move |_path| async move { (200, response.to_string()) }).await
}

/// Start a programmable mock backend.
///
/// The handler receives the request path and returns the status and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let _ = serve(socket, f.as_ref()).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn serve<F, Fut>(mut socket: TcpStream, f: &F) -> std::io::Result<()>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = (u16, String)>,
{
    let path = read_request_path(&mut socket).await?;
    let (status, body) = f(path).await;
    let status_text = match status {
        200 => "200 OK",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    let response_str = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    socket.write_all(response_str.as_bytes()).await?;
    socket.shutdown().await?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    Ok(())
}

/// Read until the end of the request head and return the path.
async fn read_request_path(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&head);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    Ok(path)
}

/// Fetcher over a reqwest client that ignores proxy environment variables.
pub fn local_fetcher() -> Fetcher<ReqwestClient> {
    let connect_timeout = Duration::from_secs(1);
    let client = reqwest::Client::builder()
        .no_proxy()
        .connect_timeout(connect_timeout)
        .build()
        .unwrap();
    Fetcher::new(ReqwestClient::with_client(client, Duration::from_secs(10)).with_connect_timeout(connect_timeout))
}
