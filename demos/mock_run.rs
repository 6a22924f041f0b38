use extratolib::{
    accounts::fixture_accounts,
    batch::BatchProcessor,
    config::{Config, Credentials},
    mock::MockBank,
    report,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: прогон по тестовым счетам без сети, отчёт в текущий каталог
    let cfg = Config {
        mock: true,
        ..Config::default()
    };
    let run = BatchProcessor::new(&cfg, MockBank, Credentials::new("demo", "demo"))
        .run(&fixture_accounts())?;
    report::write_file(&cfg.output_file, &run)?;
    println!("{} accounts ok, {} failed", run.ok_count(), run.failed_count());
    Ok(())
}
