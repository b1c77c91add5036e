use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use micro_api::field::{Header, HeaderDict, Json, KeyQuery, Query};
use micro_api::parser::JsonParser;
use micro_api::{build_request, request_configuration, Request};
use serde_json::{json, Value};

struct Search {
    term: Query<String>,
    page: Query<u32>,
    filter: Query<Value>,
    verbose: KeyQuery,
    token: Header,
    extra: HeaderDict,
}

request_configuration!(Search { term, page, filter, verbose, token, extra });

impl Request for Search {
    type Configuration = Self;
    type Parser = JsonParser<Value>;

    fn base(&self) -> &str {
        "http://api.example.com/v1"
    }

    fn path(&self) -> &str {
        "search"
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

struct CreateIssue {
    title: Json<String>,
    body: Json<String>,
    labels: Json<Vec<String>>,
    meta: Json<Value>,
    token: Header,
}

request_configuration!(CreateIssue { title, body, labels, meta, token });

impl Request for CreateIssue {
    type Configuration = Self;
    type Parser = JsonParser<Value>;

    fn base(&self) -> &str {
        "http://api.example.com/v1"
    }

    fn path(&self) -> &str {
        "repos/micro-api/issues"
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

fn benchmark_build_request(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("build_request");

    let search = Search {
        term: Query::new("q", Some("async http client".to_string())),
        page: Query::new("page", Some(3)),
        filter: Query::new("filter", Some(json!({"state": "open", "label": ["bug", "help wanted"]}))),
        verbose: KeyQuery::new("verbose", true),
        token: Header::new("authorization", Some("Bearer abcdef".to_string())),
        extra: [("x-request-id", "42"), ("x-client", "bencher")].into_iter().collect(),
    };
    group.bench_function("get_with_query", |b| {
        b.iter(|| black_box(build_request(black_box(&search)).expect("request should build")));
    });

    let create = CreateIssue {
        title: Json::new("title", Some("decoder panics on empty chunk".to_string())),
        body: Json::new("body", Some("steps to reproduce: {send} an empty chunk".to_string())),
        labels: Json::new("labels", Some(vec!["bug".to_string(), "codec".to_string()])),
        meta: Json::new("meta", Some(json!({"priority": 2, "assignees": ["zava"]}))),
        token: Header::new("authorization", Some("Bearer abcdef".to_string())),
    };
    group.bench_function("post_with_json_body", |b| {
        b.iter(|| black_box(build_request(black_box(&create)).expect("request should build")));
    });

    group.finish();
}

criterion_group!(requests, benchmark_build_request);
criterion_main!(requests);
