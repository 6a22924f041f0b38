//! Доменные модели: счёт, токен, строки выписки и итог пакетного прогона.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub branch_code: String,
    pub account_number: String,
    pub test_customer_id: Option<String>,
}

impl Account {
    pub fn new(
        branch_code: impl Into<String>,
        account_number: impl Into<String>,
        test_customer_id: Option<String>,
    ) -> Self {
        Self {
            branch_code: branch_code.into(),
            account_number: account_number.into(),
            test_customer_id,
        }
    }

    /// Ключ вида `agencia-conta`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.branch_code, self.account_number)
    }
}

/// Bearer-токен одного прогона. Не обновляется.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    bearer: String,
}

impl AuthToken {
    pub fn new(bearer: impl Into<String>) -> Self {
        Self { bearer: bearer.into() }
    }

    pub fn bearer(&self) -> &str {
        &self.bearer
    }
}

// токен не должен попадать в лог целиком
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.bearer.chars().take(6).collect();
        write!(f, "AuthToken({head}…)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementLineItem {
    /// `DD/MM/YYYY`, либо исходное значение, если оно не в формате DDMMYYYY.
    pub posting_date: String,
    pub document_number: String,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountStatus {
    Ok,
    Failed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Ok => "OK",
            AccountStatus::Failed => "FALHA",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const SUCCESS_DETAIL: &str = "Processado com sucesso";
const EMPTY_FAILURE_DETAIL: &str = "Falha sem detalhe";

/// Итог по одному счёту. Конструкторы гарантируют: FALHA => detail не пуст, строк нет.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountResult {
    account: Account,
    status: AccountStatus,
    detail: String,
    line_items: Vec<StatementLineItem>,
}

impl AccountResult {
    pub fn ok(account: Account, line_items: Vec<StatementLineItem>) -> Self {
        Self {
            account,
            status: AccountStatus::Ok,
            detail: SUCCESS_DETAIL.to_string(),
            line_items,
        }
    }

    pub fn failed(account: Account, detail: impl Into<String>) -> Self {
        let mut detail = detail.into();
        if detail.trim().is_empty() {
            detail = EMPTY_FAILURE_DETAIL.to_string();
        }
        Self {
            account,
            status: AccountStatus::Failed,
            detail,
            line_items: Vec::new(),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn line_items(&self) -> &[StatementLineItem] {
        &self.line_items
    }
}

/// Результаты одного запуска в порядке входной таблицы.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRun {
    pub results: Vec<AccountResult>,
}

impl BatchRun {
    pub fn ok_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status() == AccountStatus::Ok)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.ok_count()
    }
}
