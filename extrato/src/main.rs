use clap::{Parser, Subcommand};
use extratolib::{
    accounts,
    batch::BatchProcessor,
    config::{self, Config, Credentials, CLIENT_ID_VAR, CLIENT_SECRET_VAR},
    error::{ExtratoError, Result},
    http::{ReqwestTransport, Transport},
    mock::MockBank,
    report,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

mod logging;

#[derive(Parser, Debug)]
#[command(name = "extrato", version, about = "Consolidated bank statements for a list of accounts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Input table with Agencia/Conta/MCITest columns (xlsx, xls, ods or csv)
    #[arg(short = 'i', long = "input", env = "EXTRATO_INPUT", default_value = config::DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// Output xlsx report
    #[arg(short = 'o', long = "output", env = "EXTRATO_OUTPUT", default_value = config::DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Records per page (50..=200)
    #[arg(long = "page-size", env = "EXTRATO_PAGE_SIZE", default_value_t = config::DEFAULT_PAGE_SIZE,
          value_parser = clap::value_parser!(u32).range(50..=200))]
    page_size: u32,

    /// Period start, DDMMYYYY or 0
    #[arg(long = "data-inicio", env = "EXTRATO_DATA_INICIO", default_value = config::UNBOUNDED_PERIOD)]
    period_start: String,

    /// Period end, DDMMYYYY or 0
    #[arg(long = "data-fim", env = "EXTRATO_DATA_FIM", default_value = config::UNBOUNDED_PERIOD)]
    period_end: String,

    #[arg(long = "app-key", env = "EXTRATO_APP_KEY", default_value = config::DEFAULT_APP_KEY)]
    app_key: String,

    #[arg(long = "auth-url", env = "EXTRATO_AUTH_URL", default_value = config::DEFAULT_AUTH_URL)]
    auth_url: String,

    /// Statement API base, up to /agencia/{agencia}/conta/{conta}
    #[arg(long = "api-url", env = "EXTRATO_API_URL", default_value = config::DEFAULT_API_URL)]
    api_url: String,

    /// Canned responses instead of network calls
    #[arg(long = "mock", env = "EXTRATO_MOCK")]
    mock: bool,

    #[arg(long = "log-file", env = "EXTRATO_LOG_FILE", default_value = "execucao.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show whether the credential variables are set, without printing them
    EnvCheck,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            app_key: self.app_key.clone(),
            auth_url: self.auth_url.clone(),
            api_url: self.api_url.clone(),
            input_file: self.input.clone(),
            output_file: self.output.clone(),
            page_size: self.page_size,
            period_start: self.period_start.trim().to_string(),
            period_end: self.period_end.trim().to_string(),
            mock: self.mock,
            ..Config::default()
        }
    }
}

fn env_check() {
    for name in [CLIENT_ID_VAR, CLIENT_SECRET_VAR] {
        println!("{name}: {}", config::inspect_env_var(name));
    }
}

fn run(cfg: &Config) -> Result<()> {
    cfg.validate()?;
    let accounts = accounts::load_or_seed(&cfg.input_file)?;

    let transport: Box<dyn Transport> = if cfg.mock {
        info!("mock mode: no network calls");
        Box::new(MockBank)
    } else {
        Box::new(
            ReqwestTransport::new()
                .map_err(|e| ExtratoError::Config(format!("http client: {e}")))?,
        )
    };

    let credentials = Credentials::from_env();
    info!("credentials source: {:?}", credentials.source);

    let batch = BatchProcessor::new(cfg, transport, credentials).run(&accounts)?;
    report::write_file(&cfg.output_file, &batch)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Command::EnvCheck) = cli.command {
        env_check();
        return ExitCode::SUCCESS;
    }

    if let Err(e) = logging::init(&cli.log_file) {
        eprintln!("cannot open log file {}: {e}", cli.log_file.display());
        return ExitCode::FAILURE;
    }

    let cfg = cli.config();
    info!("starting statement batch");
    let outcome = run(&cfg);
    info!("process finished");

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
