#![allow(dead_code)]

use extratolib::http::{HttpResponse, Transport, TransportError};
use reqwest::Url;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::time::Duration;

type TokenFn = Box<dyn Fn(&[(&str, &str)]) -> Result<HttpResponse, TransportError>>;
type StatementFn = Box<dyn Fn(&Url) -> Result<HttpResponse, TransportError>>;

#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub url: String,
    pub basic: (String, String),
    pub form: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct RecordedGet {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl RecordedGet {
    pub fn query(&self, name: &str) -> Option<String> {
        query(&self.url, name)
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }
}

/// In-memory upstream that records every request.
pub struct ScriptedTransport {
    token: TokenFn,
    statement: StatementFn,
    pub posts: RefCell<Vec<RecordedPost>>,
    pub gets: RefCell<Vec<RecordedGet>>,
}

impl ScriptedTransport {
    pub fn new<A, S>(token: A, statement: S) -> Self
    where
        A: Fn(&[(&str, &str)]) -> Result<HttpResponse, TransportError> + 'static,
        S: Fn(&Url) -> Result<HttpResponse, TransportError> + 'static,
    {
        Self {
            token: Box::new(token),
            statement: Box::new(statement),
            posts: RefCell::new(Vec::new()),
            gets: RefCell::new(Vec::new()),
        }
    }

    /// Token always granted; statements answered by `statement`.
    pub fn granting<S>(statement: S) -> Self
    where
        S: Fn(&Url) -> Result<HttpResponse, TransportError> + 'static,
    {
        Self::new(|_| Ok(token_ok("tok-123")), statement)
    }

    pub fn get_count(&self) -> usize {
        self.gets.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn post_form(
        &self,
        url: &str,
        basic: (&str, &str),
        form: &[(&str, &str)],
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.posts.borrow_mut().push(RecordedPost {
            url: url.to_string(),
            basic: (basic.0.to_string(), basic.1.to_string()),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        (self.token)(form)
    }

    fn get(
        &self,
        url: &Url,
        headers: &[(&str, String)],
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.gets.borrow_mut().push(RecordedGet {
            url: url.clone(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        (self.statement)(url)
    }
}

pub fn query(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

pub fn page_of(url: &Url) -> u32 {
    query(url, "numeroPaginaSolicitacao")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0)
}

pub fn token_ok(token: &str) -> HttpResponse {
    HttpResponse::new(
        200,
        json!({"access_token": token, "token_type": "Bearer", "expires_in": 600}).to_string(),
    )
}

pub fn item(date: Value, doc: Value, amount: Value, desc: &str) -> Value {
    json!({
        "dataLancamento": date,
        "numeroDocumento": doc,
        "valorLancamento": amount,
        "textoDescricaoHistorico": desc,
        "indicadorSinalLancamento": "C"
    })
}

/// One page whose items are tagged with the page number in the document field.
pub fn numbered_page(page: u32, per_page: u32) -> Vec<Value> {
    (0..per_page)
        .map(|i| {
            item(
                json!(15112023),
                json!(format!("{page}-{i}")),
                json!(10.5),
                "Pix",
            )
        })
        .collect()
}

pub fn page_response(items: Vec<Value>, meta: Value) -> HttpResponse {
    let mut body = json!({ "listaLancamento": items });
    if let (Some(obj), Some(extra)) = (body.as_object_mut(), meta.as_object()) {
        for (k, v) in extra {
            obj.insert(k.clone(), v.clone());
        }
    }
    HttpResponse::new(200, body.to_string())
}
