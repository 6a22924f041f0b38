//! Транспортный шов: всё сетевое взаимодействие идёт через [`Transport`].

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Сбой на уровне сети (соединение, таймаут, чтение тела).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

pub trait Transport {
    /// POST с `application/x-www-form-urlencoded` телом и HTTP Basic.
    fn post_form(
        &self,
        url: &str,
        basic: (&str, &str),
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;

    /// GET по уже собранному URL (query включён).
    fn get(
        &self,
        url: &Url,
        headers: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_form(
        &self,
        url: &str,
        basic: (&str, &str),
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_form(url, basic, form, timeout)
    }

    fn get(
        &self,
        url: &Url,
        headers: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        (**self).get(url, headers, timeout)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn post_form(
        &self,
        url: &str,
        basic: (&str, &str),
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_form(url, basic, form, timeout)
    }

    fn get(
        &self,
        url: &Url,
        headers: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        (**self).get(url, headers, timeout)
    }
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_form(
        &self,
        url: &str,
        basic: (&str, &str),
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let resp = self
            .client
            .post(url)
            .basic_auth(basic.0, Some(basic.1))
            .form(form)
            .timeout(timeout)
            .send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(HttpResponse { status, body })
    }

    fn get(
        &self,
        url: &Url,
        headers: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut req = self.client.get(url.clone()).timeout(timeout);
        for (name, value) in headers {
            req = req.header(*name, value.as_str());
        }
        let resp = req.send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Первые `max` символов тела для лога.
pub fn preview(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
