use std::time::Duration;

use registry_load_test::cli::{Api, TargetArgs};
use registry_load_test::config::{v3_profile, TargetConfig, EDC_BPN_HEADER};
use registry_load_test::error::TransportError;
use registry_load_test::transport::{HttpTransport, RegistryTransport};
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use url::Url;

const BPN: &str = "BPNL00000003AYRE";

/// What the registry saw of one request
#[derive(Debug)]
struct Received {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Received {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<Received> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Ok(Received {
        request_line,
        headers,
        body,
    })
}

/// A registry on a local port that answers every request with `status`
async fn registry(status: StatusCode) -> (Url, mpsc::UnboundedReceiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let Ok(received) = read_request(&mut stream).await else {
                    return;
                };
                let _ = tx.send(received);
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown"),
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), rx)
}

#[tokio::test]
async fn create_sends_method_path_headers_and_body() {
    let (host, mut received) = registry(StatusCode::CREATED).await;
    let http = HttpTransport::new(&host, None).unwrap();
    let profile = v3_profile("/api/v3", Some(BPN.to_string()));

    let body = br#"{"id":"11111111-1111-1111-1111-111111111111"}"#.to_vec();
    let status = http.send(&profile.create_request(body.clone())).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let request = received.recv().await.unwrap();
    assert_eq!(request.request_line, "POST /api/v3/shell-descriptors HTTP/1.1");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header(EDC_BPN_HEADER), Some(BPN));
    assert!(request
        .header("user-agent")
        .unwrap()
        .starts_with("registry-load-test/"));
    assert_eq!(request.body, body);
}

#[tokio::test]
async fn unexpected_status_is_returned_as_is() {
    let (host, mut received) = registry(StatusCode::CONFLICT).await;
    let http = HttpTransport::new(&host, None).unwrap();
    let profile = v3_profile("/api/v3", None);

    let status = http.send(&profile.create_request(b"{}".to_vec())).await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    let request = received.recv().await.unwrap();
    assert_eq!(request.header(EDC_BPN_HEADER), None);
}

#[tokio::test]
async fn read_back_and_lookup_paths_arrive_verbatim() {
    let (host, mut received) = registry(StatusCode::OK).await;
    let http = HttpTransport::new(&host, None).unwrap();
    let profile = v3_profile("/api/v3", None);

    let read_back = profile.read_back_request("11111111-1111-1111-1111-111111111111");
    let lookup = profile.lookup_request(r#"[{"name":"PartId","value":"a b"}]"#);

    for request in [read_back, lookup] {
        let status = http.send(&request).await.unwrap();
        assert_eq!(status, StatusCode::OK);

        let seen = received.recv().await.unwrap();
        assert_eq!(seen.request_line, format!("GET {} HTTP/1.1", request.path));
        assert!(seen.body.is_empty());
    }
}

#[tokio::test]
async fn request_timeout_is_a_timeout_error() {
    // Accepts connections but never answers
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
        }
    });

    let args = TargetArgs {
        host: format!("http://{addr}"),
        request_timeout: Some(1),
        verbose: false,
    };
    let config = TargetConfig::from_args(&args, &Api::Legacy).unwrap();
    let http = HttpTransport::new(&config.host, config.request_timeout).unwrap();

    let request = config.profile.read_back_request("urn:uuid:slow");
    let started = std::time::Instant::now();
    match http.send(&request).await {
        Err(TransportError::Timeout(message)) => {
            assert!(!message.contains("urn:uuid:slow"));
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
}
