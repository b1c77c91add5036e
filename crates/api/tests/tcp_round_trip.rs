use std::time::Duration;

use http::Method;
use indoc::indoc;
use micro_api::field::{Header, Json, KeyQuery, Param, Query};
use micro_api::parser::{JsonParser, StringParser};
use micro_api::{Client, Request, RequestError, ResponseError, request_configuration};
use micro_api_http::protocol::TransportError;
use micro_api_http::transport::TcpTransport;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u64,
    name: String,
}

struct ListUsers {
    base: String,
    page: Query<u32>,
    verbose: KeyQuery,
    token: Header,
}

request_configuration!(ListUsers { page, verbose, token });

impl Request for ListUsers {
    type Configuration = Self;
    type Parser = JsonParser<Vec<User>>;

    fn base(&self) -> &str {
        &self.base
    }

    fn path(&self) -> &str {
        "users"
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn configuration(&self) -> &Self {
        self
    }

    fn parser(&self) -> Self::Parser {
        JsonParser::new()
    }
}

struct CreateUser {
    base: String,
    name: Json<String>,
    age: Json<u8>,
}

request_configuration!(CreateUser { name, age });

impl Request for CreateUser {
    type Configuration = Self;
    type Parser = JsonParser<User>;

    fn base(&self) -> &str {
        &self.base
    }

    fn path(&self) -> &str {
        "users"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn configuration(&self) -> &Self {
        self
    }

    fn parser(&self) -> Self::Parser {
        JsonParser::new()
    }
}

struct Login {
    base: String,
    user: Param<String>,
    password: Param<String>,
}

request_configuration!(Login { user, password });

impl Request for Login {
    type Configuration = Self;
    type Parser = StringParser;

    fn base(&self) -> &str {
        &self.base
    }

    fn path(&self) -> &str {
        "login"
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn configuration(&self) -> &Self {
        self
    }

    fn parser(&self) -> StringParser {
        StringParser
    }
}

fn list_users(base: String) -> ListUsers {
    ListUsers {
        base,
        page: Query::new("page", Some(2)),
        verbose: KeyQuery::new("verbose", true),
        token: Header::new("x-token", Some("secret".to_string())),
    }
}

fn crlf(raw: &str) -> String {
    raw.replace('\n', "\r\n")
}

/// Accepts one connection, answers with `response` and hands back the raw request.
async fn serve_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            received.extend_from_slice(&buf[..n]);

            if let Some(head_end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&received[..head_end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length: "))
                    .map_or(0, |value| value.trim().parse::<usize>().unwrap());
                if received.len() >= head_end + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8(received).unwrap()
    });

    (base, handle)
}

#[tokio::test]
async fn get_with_query_and_headers() {
    let (base, server) = serve_once(crlf(indoc! {r#"
        HTTP/1.1 200 OK
        Content-Type: application/json
        Content-Length: 24

        [{"id":1,"name":"zava"}]"#}))
    .await;

    let client = Client::new(TcpTransport::new());
    let result = client.send(&list_users(base)).await;
    assert!(!matches!(result, Err(RequestError::Unknown)));
    let users = result.unwrap();

    assert_eq!(users, vec![User { id: 1, name: "zava".to_string() }]);

    let received = server.await.unwrap();
    assert!(received.starts_with("GET /api/users?page=2&verbose HTTP/1.1\r\n"));
    assert!(received.contains("x-token: secret\r\n"));
    assert!(received.contains("accept: application/json\r\n"));
    assert!(!received.contains("content-length"));
}

#[tokio::test]
async fn post_with_json_body() {
    let (base, server) = serve_once(crlf(indoc! {r#"
        HTTP/1.1 201 Created
        Content-Type: application/json
        Transfer-Encoding: chunked

        a
        {"id":7,"n
        a
        ame":"ann"
        1
        }
        0

        "#}))
    .await;

    let request = CreateUser { base, name: Json::new("name", Some("ann".to_string())), age: Json::new("age", Some(30)) };
    let result = Client::new(TcpTransport::new()).perform(&request).await;
    assert!(!matches!(result, Err(RequestError::Unknown)));
    let response = result.unwrap();

    assert_eq!(response.status(), http::StatusCode::CREATED);
    assert_eq!(response.value(), &User { id: 7, name: "ann".to_string() });

    let received = server.await.unwrap();
    assert!(received.starts_with("POST /api/users HTTP/1.1\r\n"));
    assert!(received.contains("content-type: application/json\r\n"));
    assert!(received.ends_with("\r\n\r\n{\"name\":\"ann\",\"age\":30}"));
}

#[tokio::test]
async fn post_with_form_body() {
    let (base, server) = serve_once(crlf(indoc! {"
        HTTP/1.1 200 OK
        Content-Length: 7

        welcome"}))
    .await;

    let request = Login {
        base,
        user: Param::new("user", Some("ann".to_string())),
        password: Param::new("password", Some("p&ss word".to_string())),
    };
    let result = Client::new(TcpTransport::new()).send(&request).await;
    assert!(!matches!(result, Err(RequestError::Unknown)));
    let greeting = result.unwrap();

    assert_eq!(greeting, "welcome");

    let received = server.await.unwrap();
    assert!(received.starts_with("POST /api/login HTTP/1.1\r\n"));
    assert!(received.contains("content-type: application/x-www-form-urlencoded\r\n"));
    assert!(!received.contains("accept:"));
    assert!(received.ends_with("\r\n\r\nuser=ann&password=p%26ss+word"));
}

#[tokio::test]
async fn not_found_is_unacceptable() {
    let (base, _server) = serve_once(crlf(indoc! {"
        HTTP/1.1 404 Not Found
        Content-Length: 9

        not found"}))
    .await;

    let result = Client::new(TcpTransport::new()).send(&list_users(base)).await;

    assert!(!matches!(result, Err(RequestError::Unknown)));
    assert!(matches!(result, Err(RequestError::Response { source: ResponseError::UnacceptableStatusCode(404) })));
}

#[tokio::test]
async fn connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);

    let result = Client::new(TcpTransport::new()).send(&list_users(base)).await;

    assert!(!matches!(result, Err(RequestError::Unknown)));
    assert!(matches!(result, Err(RequestError::Transport { source: TransportError::Connect { .. } })));
}

#[tokio::test]
async fn cancel_while_waiting_for_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    let _server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(stream);
    });

    let client = Client::new(TcpTransport::new());
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = client.perform_with_cancel(&list_users(base), &token).await;

    assert!(!matches!(result, Err(RequestError::Unknown)));
    assert!(matches!(result, Err(RequestError::Cancelled)));
}
