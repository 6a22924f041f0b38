mod common;

use common::{item, page_response, ScriptedTransport};
use extratolib::{
    accounts::fixture_accounts,
    batch::{BatchProcessor, SHAPE_FAILURE_DETAIL},
    config::{Config, Credentials},
    error::ExtratoError,
    http::HttpResponse,
    mock::MockBank,
    model::{Account, AccountStatus},
};
use rust_decimal::Decimal;
use serde_json::json;

fn creds() -> Credentials {
    Credentials::new("client", "secret")
}

#[test]
fn failing_account_does_not_stop_the_batch() {
    let t = ScriptedTransport::granting(|url| {
        if url.path().ends_with("/agencia/551/conta/5087") {
            Ok(HttpResponse::new(404, "Not Found"))
        } else {
            Ok(page_response(
                vec![item(json!(15112023), json!(1), json!(12.3), "Pix")],
                json!({"quantidadeTotalPagina": 1}),
            ))
        }
    });
    let cfg = Config::default();
    let accounts = fixture_accounts();

    let run = BatchProcessor::new(&cfg, &t, creds())
        .run(&accounts)
        .expect("run");

    assert_eq!(run.results.len(), accounts.len());
    for (r, a) in run.results.iter().zip(&accounts) {
        assert_eq!(r.account(), a);
    }
    let first = &run.results[0];
    assert_eq!(first.status(), AccountStatus::Failed);
    assert!(first.detail().contains("404"));
    assert!(first.line_items().is_empty());
    assert!(run.results[1..]
        .iter()
        .all(|r| r.status() == AccountStatus::Ok && r.line_items().len() == 1));
    assert_eq!(run.ok_count(), 2);
    assert_eq!(run.failed_count(), 1);
    // токен запрашивается один раз на прогон
    assert_eq!(t.posts.borrow().len(), 1);
}

#[test]
fn authentication_failure_aborts_before_any_fetch() {
    let t = ScriptedTransport::new(
        |_| Ok(HttpResponse::new(401, "invalid_client")),
        |_| Ok(page_response(vec![], json!({}))),
    );
    let cfg = Config::default();

    let err = BatchProcessor::new(&cfg, &t, creds())
        .run(&fixture_accounts())
        .unwrap_err();

    assert!(matches!(err, ExtratoError::Auth(_)));
    assert_eq!(t.posts.borrow().len(), 2);
    assert_eq!(t.get_count(), 0);
}

#[test]
fn unreadable_response_becomes_parse_failure() {
    let t = ScriptedTransport::granting(|url| {
        if url.path().ends_with("/conta/1348") {
            Ok(HttpResponse::new(200, r#"{"listaLancamento": [{"foo": 1}]}"#))
        } else {
            Ok(page_response(vec![], json!({})))
        }
    });
    let cfg = Config::default();

    let run = BatchProcessor::new(&cfg, &t, creds())
        .run(&fixture_accounts())
        .expect("run");

    let statuses: Vec<AccountStatus> = run.results.iter().map(|r| r.status()).collect();
    assert_eq!(
        statuses,
        vec![AccountStatus::Ok, AccountStatus::Failed, AccountStatus::Ok]
    );
    assert_eq!(run.results[1].detail(), SHAPE_FAILURE_DETAIL);
    assert!(run.results[0].line_items().is_empty());
}

#[test]
fn empty_input_yields_empty_run() {
    let t = ScriptedTransport::granting(|_| Ok(page_response(vec![], json!({}))));
    let cfg = Config::default();

    let run = BatchProcessor::new(&cfg, &t, creds()).run(&[]).expect("run");
    assert!(run.results.is_empty());
}

#[test]
fn mock_mode_runs_without_network() {
    let cfg = Config {
        mock: true,
        ..Config::default()
    };
    let accounts = vec![Account::new("551", "5087", None)];

    let run = BatchProcessor::new(&cfg, MockBank, creds())
        .run(&accounts)
        .expect("run");

    let r = &run.results[0];
    assert_eq!(r.status(), AccountStatus::Ok);
    assert_eq!(r.line_items().len(), 3);
    assert_eq!(r.line_items()[0].posting_date, "15/11/2023");
    assert_eq!(r.line_items()[1].amount, Decimal::new(-23045, 2));
}
