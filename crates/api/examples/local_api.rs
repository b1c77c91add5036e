use http::Method;
use micro_api::field::{Header, Json, Query};
use micro_api::parser::JsonParser;
use micro_api::{Client, Request, request_configuration};
use micro_api_http::transport::TcpTransport;
use serde::Deserialize;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Deserialize)]
struct Repo {
    id: u64,
    name: String,
}

struct ListRepos {
    base: String,
    page: Query<u32>,
    token: Header,
}

request_configuration!(ListRepos { page, token });

impl Request for ListRepos {
    type Configuration = Self;
    type Parser = JsonParser<Vec<Repo>>;

    fn base(&self) -> &str {
        &self.base
    }

    fn path(&self) -> &str {
        "repos"
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

struct CreateRepo {
    base: String,
    name: Json<String>,
    private: Json<bool>,
    wrong: Query<u32>,
}

request_configuration!(CreateRepo { name, private, wrong });

impl Request for CreateRepo {
    type Configuration = Self;
    type Parser = JsonParser<Repo>;

    fn base(&self) -> &str {
        &self.base
    }

    fn path(&self) -> &str {
        "repos"
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

/// Answers every connection with the same json list.
async fn serve(listener: TcpListener) {
    const BODY: &str = r#"[{"id":1,"name":"micro-http"},{"id":2,"name":"micro-api"}]"#;

    loop {
        let (mut stream, remote_addr) = match listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            if let Err(e) = stream.read(&mut buf).await {
                error!(cause = %e, %remote_addr, "failed to read request");
                return;
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{BODY}",
                BODY.len()
            );
            if let Err(e) = stream.write_all(response.as_bytes()).await {
                error!(cause = %e, %remote_addr, "failed to write response");
            }
        });
    }
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind local server");
    let base = format!("http://{}/api", listener.local_addr().expect("local address"));
    tokio::spawn(serve(listener));

    let client = Client::new(TcpTransport::builder().timeout(Duration::from_secs(3)).build());

    let list = ListRepos { base: base.clone(), page: Query::new("page", Some(1)), token: Header::new("x-token", None) };
    match client.send(&list).await {
        Ok(repos) => {
            for repo in repos {
                info!(id = repo.id, name = %repo.name, "repo");
            }
        }
        Err(e) => error!(cause = %e, "list repos failed"),
    }

    // a query parameter next to json body fields never leaves the process
    let create = CreateRepo {
        base,
        name: Json::new("name", Some("demo".to_string())),
        private: Json::new("private", Some(true)),
        wrong: Query::new("page", Some(1)),
    };
    if let Err(e) = client.send(&create).await {
        warn!(cause = %e, "create repo rejected");
    }
}
