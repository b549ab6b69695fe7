//! Core application

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::cli::{self, CliConfig, Commands, SystemCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG, SQLITE_DB_FILENAME};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::{AppStorage, DataSubdir};
use crate::data::SqliteService;
use crate::domain::{RowGateway, import_csv};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub database: Arc<SqliteService>,
    pub rows: Arc<RowGateway>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::System {
                command: system_cmd,
            }) => Self::handle_system_command(system_cmd),
            Some(Commands::Import { file }) => {
                let app = Self::init(&cli_config).await?;
                Self::import(app, &file).await
            }
            Some(Commands::Start) | None => {
                let app = Self::init(&cli_config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;

        let db_path = Self::database_path(&config, &storage).await?;
        let database = Arc::new(
            SqliteService::init(&config.database, &db_path)
                .await
                .with_context(|| format!("Failed to open database: {}", db_path.display()))?,
        );

        let rows = Arc::new(RowGateway::new(
            database.clone(),
            config.database.table.clone(),
        ));
        let shutdown = ShutdownService::new(database.clone());

        tracing::info!(
            database = %db_path.display(),
            table = %config.database.table,
            "Database ready"
        );

        Ok(Self {
            shutdown,
            config,
            storage,
            database,
            rows,
        })
    }

    /// Configured database file, or the default inside the data directory
    async fn database_path(config: &AppConfig, storage: &AppStorage) -> Result<PathBuf> {
        let Some(path) = config.database.path.clone() else {
            return Ok(storage.subdir_path(DataSubdir::Sqlite, SQLITE_DB_FILENAME));
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
        Ok(path)
    }

    async fn import(app: Self, file: &Path) -> Result<()> {
        let result = import_csv(app.database.pool(), &app.config.database.table, file).await;
        app.database.close().await;

        let summary =
            result.with_context(|| format!("Failed to import CSV: {}", file.display()))?;
        println!(
            "Imported {} rows into '{}' ({} failed)",
            summary.inserted, app.config.database.table, summary.failed
        );
        Ok(())
    }

    fn handle_system_command(cmd: SystemCommands) -> Result<()> {
        match cmd {
            SystemCommands::Prune { yes } => Self::prune_data(yes),
        }
    }

    fn prune_data(skip_confirm: bool) -> Result<()> {
        let data_dir = AppStorage::resolve_data_dir();

        if !data_dir.exists() {
            println!(
                "Nothing to prune. Data directory does not exist: {}",
                data_dir.display()
            );
            return Ok(());
        }

        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        println!("This will permanently delete the local data directory:");
        println!("  {}", data_dir.display());
        println!();
        println!("Make sure the server is not running.");

        if !skip_confirm {
            print!("\nContinue? [y/N] ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
                println!("Aborted.");
                return Ok(());
            }
        }

        std::fs::remove_dir_all(&data_dir)
            .with_context(|| format!("Failed to delete data directory: {}", data_dir.display()))?;
        println!("Pruned: {}", data_dir.display());
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.shutdown
            .register(app.database.start_checkpoint_task(app.shutdown.subscribe()))
            .await;

        tracing::info!(
            data_dir = %app.storage.data_dir().display(),
            "Background tasks started"
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
