//! Режим mock: фиксированные ответы вместо сети.

use crate::http::{HttpResponse, Transport, TransportError};
use reqwest::Url;
use std::time::Duration;

pub const MOCK_TOKEN: &str = "mock-token";

const MOCK_TOKEN_BODY: &str =
    r#"{"access_token":"mock-token","token_type":"Bearer","expires_in":600}"#;

const MOCK_STATEMENT_BODY: &str = r#"{
  "numeroPaginaAtual": 1,
  "quantidadeRegistroPaginaAtual": 3,
  "numeroPaginaProximo": 0,
  "quantidadeTotalPagina": 1,
  "quantidadeTotalRegistro": 3,
  "listaLancamento": [
    {"dataLancamento": 15112023, "numeroDocumento": 10001, "valorLancamento": 1500.00, "textoDescricaoHistorico": "Saldo Anterior"},
    {"dataLancamento": 16112023, "numeroDocumento": 10002, "valorLancamento": -230.45, "textoDescricaoHistorico": "Pagamento de Boleto"},
    {"dataLancamento": 17112023, "numeroDocumento": 10003, "valorLancamento": 89.9, "textoDescricaoHistorico": "Pix - Recebido"}
  ]
}"#;

/// Транспорт без сети: токен-эндпоинт отдаёт [`MOCK_TOKEN`], выписка — одну страницу из трёх строк.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockBank;

impl Transport for MockBank {
    fn post_form(
        &self,
        _url: &str,
        _basic: (&str, &str),
        _form: &[(&str, &str)],
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(200, MOCK_TOKEN_BODY))
    }

    fn get(
        &self,
        _url: &Url,
        _headers: &[(&str, String)],
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(200, MOCK_STATEMENT_BODY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::StatementPage;

    #[test]
    fn fixture_page_parses() {
        let page: StatementPage = serde_json::from_str(MOCK_STATEMENT_BODY).unwrap();
        assert_eq!(page.total_pages(200), 1);
        assert_eq!(page.lista_lancamento.map(|l| l.len()), Some(3));
    }
}
