//! Uploading against a local stand-in for the mclo.gs API.

use dms_core::RequestError;
use dms_logs::{
    upload::{LogUploader, UploadError},
    LogStream,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};

/// Answers exactly one request, then hands back what was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        _ = socket.shutdown().await;
        _ = tx.send(request);
    });

    (format!("http://{addr}/1/log"), rx)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    key.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn uploader(endpoint: String) -> LogUploader {
    LogUploader::new()
        .with_endpoint(endpoint)
        .with_client(reqwest::Client::new())
}

#[tokio::test]
async fn uploads_joined_buffer() {
    let (endpoint, request) = serve_once(
        "200 OK",
        r#"{"success":true,"id":"abc123","url":"https://mclo.gs/abc123","raw":"https://api.mclo.gs/1/raw/abc123"}"#,
    )
    .await;

    let mut stream = LogStream::new();
    stream.append("a");
    stream.append("b");

    let log = uploader(endpoint)
        .upload(stream.current_entries())
        .await
        .unwrap();
    assert_eq!(log.url, "https://mclo.gs/abc123");

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /1/log "));
    assert!(request
        .to_lowercase()
        .contains("content-type: application/x-www-form-urlencoded; charset=utf-8"));
    assert!(request.ends_with("\r\n\r\ncontent=a%0Ab"));
}

#[tokio::test]
async fn service_error_is_surfaced() {
    let (endpoint, _request) = serve_once(
        "400 Bad Request",
        r#"{"success":false,"error":"Required POST argument 'content' is empty."}"#,
    )
    .await;

    let mut stream = LogStream::new();
    stream.append("");

    let err = uploader(endpoint)
        .upload(stream.current_entries())
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Service(ref n) if n.contains("is empty")));
}

#[tokio::test]
async fn unreadable_error_page_reports_status() {
    let (endpoint, _request) = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;

    let mut stream = LogStream::new();
    stream.append("[Server thread/INFO]: Stopping server");

    let err = uploader(endpoint)
        .upload(stream.current_entries())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UploadError::Request(RequestError::DownloadError { code, .. }) if code.as_u16() == 502
    ));
}

#[tokio::test]
async fn empty_buffer_is_not_sent() {
    let stream = LogStream::new();
    let err = LogUploader::new()
        .with_endpoint("http://127.0.0.1:9/never")
        .upload(stream.current_entries())
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::EmptyLog));
}
