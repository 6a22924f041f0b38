//! Клиент выписки: постраничный GET, схема ответа и нормализация строк.

use crate::{
    config::{Config, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE},
    error::{ExtratoError, Result},
    http::{preview, Transport},
    model::{Account, AuthToken, StatementLineItem},
};
use chrono::NaiveDate;
use log::{debug, info};
use reqwest::Url;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

const PAGE_PREVIEW_CHARS: usize = 400;

pub const APP_KEY_HEADER: &str = "X-Developer-Application-Key";
pub const TEST_CUSTOMER_HEADER: &str = "x-br-com-bb-ipa-mciteste";

/* ------------------------------ SCHEMA ---------------------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPage {
    #[serde(default)]
    pub lista_lancamento: Option<Vec<RawLineItem>>,
    #[serde(default)]
    pub quantidade_total_pagina: Option<u32>,
    #[serde(default)]
    pub quantidade_total_registro: Option<u64>,
    #[serde(default)]
    pub numero_pagina_atual: Option<u32>,
}

impl StatementPage {
    /// Явное число страниц, иначе ceil(записей / page_size), иначе одна страница.
    pub fn total_pages(&self, page_size: u32) -> u32 {
        if let Some(pages) = self.quantidade_total_pagina.filter(|p| *p > 0) {
            return pages;
        }
        match self.quantidade_total_registro {
            Some(records) => {
                let size = u64::from(page_size.max(1));
                u32::try_from(records.div_ceil(size)).unwrap_or(u32::MAX)
            }
            None => 1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(deserialize_with = "text_or_number")]
    pub data_lancamento: String,
    #[serde(deserialize_with = "text_or_number")]
    pub numero_documento: String,
    #[serde(deserialize_with = "decimal_from_json")]
    pub valor_lancamento: Decimal,
    #[serde(default, deserialize_with = "text_or_null")]
    pub texto_descricao_historico: String,
}

impl From<RawLineItem> for StatementLineItem {
    fn from(raw: RawLineItem) -> Self {
        StatementLineItem {
            posting_date: format_posting_date(&raw.data_lancamento),
            document_number: raw.numero_documento,
            amount: raw.valor_lancamento,
            description: raw.texto_descricao_historico,
        }
    }
}

fn text_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn text_or_null<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected text, got {other}"))),
    }
}

// Сумма берётся из десятичной записи числа, а не через f64-арифметику.
fn decimal_from_json<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Decimal, D::Error> {
    let text = match Value::deserialize(d)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(de::Error::custom(format!(
                "expected numeric amount, got {other}"
            )))
        }
    };
    Decimal::from_str_exact(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| de::Error::custom(format!("amount {text}: {e}")))
}

/// `DDMMYYYY` -> `DD/MM/YYYY`; всё остальное возвращается без изменений.
pub fn format_posting_date(raw: &str) -> String {
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(d) = NaiveDate::parse_from_str(raw, "%d%m%Y") {
            return d.format("%d/%m/%Y").to_string();
        }
    }
    raw.to_string()
}

/* ------------------------------ CLIENT ---------------------------------- */

pub struct StatementClient<'a, T: Transport> {
    config: &'a Config,
    transport: T,
}

impl<'a, T: Transport> StatementClient<'a, T> {
    pub fn new(config: &'a Config, transport: T) -> Self {
        Self { config, transport }
    }

    /// Все страницы выписки одного счёта в порядке API.
    /// Любая ошибка на любой странице отбрасывает уже собранные строки.
    pub fn fetch_statement(
        &self,
        account: &Account,
        period_start: &str,
        period_end: &str,
        page_size: Option<u32>,
        token: &AuthToken,
    ) -> Result<Vec<StatementLineItem>> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ExtratoError::Config(format!(
                "page size {page_size} outside {MIN_PAGE_SIZE}..={MAX_PAGE_SIZE}"
            )));
        }

        let key = account.key();
        let base = self
            .config
            .statement_url(&account.branch_code, &account.account_number)?;
        let headers = self.headers(account, token);

        let mut items: Vec<StatementLineItem> = Vec::new();
        let mut page: u32 = 1;
        let mut total_pages: u32 = 1;

        while page <= total_pages {
            let url = self.page_url(&base, period_start, period_end, page, page_size);
            info!("GET ({key}) page={page}: {url}");

            let resp = self
                .transport
                .get(&url, &headers, self.config.fetch_timeout)
                .map_err(|e| ExtratoError::Transport {
                    page,
                    message: e.to_string(),
                })?;
            info!(
                "GET ({key}) page={page} -> status={} resp_preview={}",
                resp.status,
                preview(&resp.body, PAGE_PREVIEW_CHARS)
            );

            if resp.status != 200 {
                return Err(ExtratoError::Http {
                    page,
                    status: resp.status,
                    body: resp.body,
                });
            }

            let parsed: StatementPage = serde_json::from_str(&resp.body)
                .map_err(|e| ExtratoError::Shape(format!("page {page}: {e}")))?;

            total_pages = parsed.total_pages(page_size);
            debug!(
                "({key}) page {page}/{total_pages}, api current page {:?}",
                parsed.numero_pagina_atual
            );

            items.extend(
                parsed
                    .lista_lancamento
                    .unwrap_or_default()
                    .into_iter()
                    .map(StatementLineItem::from),
            );
            page += 1;
        }

        Ok(items)
    }

    fn headers(&self, account: &Account, token: &AuthToken) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Authorization", format!("Bearer {}", token.bearer())),
            ("Accept", "application/json".to_string()),
            (APP_KEY_HEADER, self.config.app_key.clone()),
        ];
        // устаревший заголовок, нужен старым ревизиям эндпоинта
        if let Some(mci) = account.test_customer_id.as_deref().filter(|v| !v.is_empty()) {
            headers.push((TEST_CUSTOMER_HEADER, mci.to_string()));
        }
        headers
    }

    fn page_url(
        &self,
        base: &Url,
        period_start: &str,
        period_end: &str,
        page: u32,
        page_size: u32,
    ) -> Url {
        let params = [
            ("gw-dev-app-key", self.config.app_key.clone()),
            ("dataInicioSolicitacao", period_start.to_string()),
            ("dataFimSolicitacao", period_end.to_string()),
            ("numeroPaginaSolicitacao", page.to_string()),
            ("quantidadeRegistroPaginaSolicitacao", page_size.to_string()),
        ];
        let mut url = base.clone();
        url.query_pairs_mut().extend_pairs(&params);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posting_date_reformat() {
        assert_eq!(format_posting_date("15112023"), "15/11/2023");
        assert_eq!(format_posting_date("2023-11-15"), "2023-11-15");
        assert_eq!(format_posting_date("1112023"), "1112023");
        assert_eq!(format_posting_date("99999999"), "99999999");
        assert_eq!(format_posting_date("0"), "0");
    }

    #[test]
    fn total_pages_prefers_explicit_field() {
        let p: StatementPage = serde_json::from_str(
            r#"{"quantidadeTotalPagina":4,"quantidadeTotalRegistro":10}"#,
        )
        .unwrap();
        assert_eq!(p.total_pages(200), 4);
    }

    #[test]
    fn total_pages_from_record_count() {
        let p: StatementPage =
            serde_json::from_str(r#"{"quantidadeTotalRegistro":450}"#).unwrap();
        assert_eq!(p.total_pages(200), 3);

        let p: StatementPage = serde_json::from_str(
            r#"{"quantidadeTotalPagina":0,"quantidadeTotalRegistro":400}"#,
        )
        .unwrap();
        assert_eq!(p.total_pages(200), 2);
    }

    #[test]
    fn total_pages_defaults_to_one() {
        let p: StatementPage = serde_json::from_str(r#"{"listaLancamento":[]}"#).unwrap();
        assert_eq!(p.total_pages(200), 1);
    }

    #[test]
    fn raw_item_accepts_numbers_and_strings() {
        let raw: RawLineItem = serde_json::from_str(
            r#"{"dataLancamento":15112023,"numeroDocumento":"000123",
                "valorLancamento":-150.35,"textoDescricaoHistorico":null}"#,
        )
        .unwrap();
        let item = StatementLineItem::from(raw);
        assert_eq!(item.posting_date, "15/11/2023");
        assert_eq!(item.document_number, "000123");
        assert_eq!(item.amount, Decimal::new(-15035, 2));
        assert_eq!(item.description, "");
    }

    #[test]
    fn raw_item_missing_amount_is_rejected() {
        let res: std::result::Result<RawLineItem, _> = serde_json::from_str(
            r#"{"dataLancamento":15112023,"numeroDocumento":1}"#,
        );
        assert!(res.is_err());
    }
}
