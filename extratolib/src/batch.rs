//! Пакетная обработка: один токен на прогон, ошибки изолируются по счетам.

use crate::{
    auth::Authenticator,
    config::{Config, CredentialSource, Credentials},
    error::{ExtratoError, Result},
    http::Transport,
    model::{Account, AccountResult, AuthToken, BatchRun},
    statement::StatementClient,
};
use log::{error, info, warn};

pub const SHAPE_FAILURE_DETAIL: &str = "Erro de Parse JSON";

pub struct BatchProcessor<'a, T: Transport> {
    config: &'a Config,
    transport: T,
    credentials: Credentials,
}

impl<'a, T: Transport> BatchProcessor<'a, T> {
    pub fn new(config: &'a Config, transport: T, credentials: Credentials) -> Self {
        Self {
            config,
            transport,
            credentials,
        }
    }

    /// Ошибка аутентификации прерывает прогон целиком; ошибки выписки — нет.
    pub fn run(&self, accounts: &[Account]) -> Result<BatchRun> {
        info!("processing {} accounts", accounts.len());
        if self.credentials.source == CredentialSource::SandboxDefault {
            warn!("credential variables not set; using sandbox defaults");
        }

        let token = Authenticator::new(self.config, &self.transport)
            .authenticate(&self.credentials)
            .inspect_err(|e| error!("authentication failed, aborting run: {e}"))?;

        let client = StatementClient::new(self.config, &self.transport);
        let mut run = BatchRun::default();

        for account in accounts {
            let result = self.process_account(&client, account, &token)?;
            run.results.push(result);
        }

        info!(
            "run finished: {} ok, {} failed",
            run.ok_count(),
            run.failed_count()
        );
        Ok(run)
    }

    fn process_account(
        &self,
        client: &StatementClient<'_, &T>,
        account: &Account,
        token: &AuthToken,
    ) -> Result<AccountResult> {
        let key = account.key();
        info!(
            "processing account {key} (MCITest: {})",
            account.test_customer_id.as_deref().unwrap_or("-")
        );

        let fetched = client.fetch_statement(
            account,
            &self.config.period_start,
            &self.config.period_end,
            Some(self.config.page_size),
            token,
        );

        match fetched {
            Ok(items) => {
                info!("account {key}: {} line items", items.len());
                Ok(AccountResult::ok(account.clone(), items))
            }
            Err(ExtratoError::Shape(msg)) => {
                error!("account {key}: unreadable statement response: {msg}");
                Ok(AccountResult::failed(account.clone(), SHAPE_FAILURE_DETAIL))
            }
            Err(e) if e.is_per_account() => {
                error!("account {key}: statement fetch failed: {e}");
                Ok(AccountResult::failed(account.clone(), e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
