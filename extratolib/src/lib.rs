//! extratolib — пакетная выгрузка банковских выписок по REST API в сводную таблицу.

pub mod accounts;
pub mod auth;
pub mod batch;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod model;
pub mod report;
pub mod statement;
pub mod traits;

pub mod formats {
    pub mod accounts_csv;
    pub mod accounts_xlsx;
    pub mod report_xlsx;

    pub const BRANCH_HEADER: &str = "Agencia";
    pub const ACCOUNT_HEADER: &str = "Conta";
    pub const TEST_CUSTOMER_HEADER: &str = "MCITest";
}
