use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use backvault_core::app::{
    BackupLayout, BackupService, Catalog, DumpExecutor, Resolution, RotationScheduler,
    read_dump, resolve_target_file, restore,
};
use backvault_core::config::{DEFAULT_DUMP_COMMAND, DatabaseConfig, DumpCommand};
use backvault_core::domain::{BackupError, RetentionPolicy, Tier};
use backvault_core::impls::{PgSession, ProcessDumpRunner, StdioPrompter};
use backvault_core::ports::{Prompter, SystemClock};

#[derive(Debug, Parser)]
#[command(name = "backvault", about = "Rotating SQL dump backups and interactive restore")]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct PathArgs {
    /// Root of the hourly/daily/weekly/monthly/yearly tier directories.
    #[arg(long, env = "BACKUP_ROOT", default_value = "backup")]
    backup_root: PathBuf,

    /// Scratch directory the dump tool writes into (also the manual tier).
    #[arg(long, env = "BACKUP_DUMPS_DIR", default_value = "dumps")]
    dumps_dir: PathBuf,

    /// External dump tool command line.
    #[arg(long, env = "BACKUP_DUMP_COMMAND", default_value = DEFAULT_DUMP_COMMAND)]
    dump_command: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a dump into the database from DATABASE_* settings.
    Restore {
        /// Dump file to restore. Without it an interactive menu is shown.
        file: Option<PathBuf>,
    },
    /// Run one manual backup.
    Backup {
        #[arg(long, default_value = "daily")]
        tier: Tier,
    },
    /// Run the rotation scheduler until interrupted.
    Schedule {
        /// Seconds between cadence checks.
        #[arg(long, default_value_t = 30)]
        poll_secs: u64,
    },
    /// Show artifact counts per tier.
    Status {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; real environment variables win.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "backvault failed");
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<(), BackupError> {
    let layout = BackupLayout::new(
        absolute(&cli.paths.backup_root)?,
        absolute(&cli.paths.dumps_dir)?,
    );
    layout.ensure_dirs().await?;

    match cli.command {
        Command::Restore { file } => restore_command(&layout, file.as_deref()).await,
        Command::Backup { tier } => {
            let service = BackupService::new(executor(layout, &cli.paths.dump_command)?);
            let message = service.manual_backup(Some(tier)).await?;
            println!("{message}");
            Ok(())
        }
        Command::Schedule { poll_secs } => {
            let rotation = RotationScheduler::new(executor(layout, &cli.paths.dump_command)?);
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupt received, stopping scheduler");
                }
                let _ = shutdown_tx.send(true);
            });
            rotation
                .run(Duration::from_secs(poll_secs.max(1)), shutdown_rx)
                .await;
            Ok(())
        }
        Command::Status { json } => {
            let service = BackupService::new(executor(layout, &cli.paths.dump_command)?);
            let counts = service.artifact_counts().await?;
            if json {
                let rendered = serde_json::to_string_pretty(&counts)
                    .map_err(|e| BackupError::Config(format!("cannot render status: {e}")))?;
                println!("{rendered}");
            } else {
                for tier in Tier::ALL {
                    println!("{:<8} {:>4}", tier, counts.get(tier));
                }
                println!("{:<8} {:>4}", "total", counts.total());
            }
            Ok(())
        }
    }
}

async fn restore_command(layout: &BackupLayout, file: Option<&Path>) -> Result<(), BackupError> {
    let database = DatabaseConfig::from_env()?;
    let catalog = Catalog::scan(layout).await?;
    let prompter = StdioPrompter;

    let path = match resolve_target_file(file, &catalog, &prompter, &database.describe())? {
        Resolution::Restore(path) => path,
        Resolution::Cancelled => return Ok(()),
    };

    let sql = read_dump(&path).await?;

    let started = Instant::now();
    let mut session = PgSession::connect(&database).await?;
    let outcome = restore(&sql, &mut session, &prompter).await?;

    prompter.say("");
    prompter.say(&format!("Restore finished in {:.1}s", started.elapsed().as_secs_f64()));
    prompter.say(&format!("  executed        : {}", outcome.executed_count));
    prompter.say(&format!("  ignored errors  : {}", outcome.ignored_error_count));
    prompter.say(&format!("  critical errors : {}", outcome.critical_error_count));
    if !outcome.is_clean() {
        prompter.say("Some statements failed; review the warnings above.");
    }
    Ok(())
}

fn executor(layout: BackupLayout, dump_command: &str) -> Result<Arc<DumpExecutor>, BackupError> {
    let runner = ProcessDumpRunner::new(DumpCommand::parse(dump_command)?);
    Ok(Arc::new(DumpExecutor::new(
        layout,
        Arc::new(runner),
        Arc::new(SystemClock),
        RetentionPolicy::default(),
    )))
}

fn absolute(path: &Path) -> Result<PathBuf, BackupError> {
    std::path::absolute(path).map_err(|e| BackupError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
