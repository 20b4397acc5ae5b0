use std::process::ExitCode;

use splitledger_cli::{App, CliConfig, parse_args};
use splitledger_core::UuidV7Generator;
use splitledger_infra::{FileStateStore, GroupRepository};

fn main() -> ExitCode {
    let config = CliConfig::from_env();
    splitledger_observability::init(config.log_format);
    CliConfig::report_ignored(|key| std::env::var(key).ok());

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: CliConfig) -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    tracing::debug!(data_dir = %config.data_dir.display(), ?command, "running");

    let store = FileStateStore::new(&config.data_dir);
    let repo = GroupRepository::with_prefix(store, config.key_prefix);
    let today = chrono::Local::now().date_naive();
    let app = App::new(repo, Box::new(UuidV7Generator), today);

    let stdout = std::io::stdout();
    app.run(command, &mut stdout.lock())
}
