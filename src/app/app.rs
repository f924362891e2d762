// Main tally application implementation.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::{Config, ConfigTrait};
use crate::controller::{
    CountController, HistoryController, IndexController, UpdateController,
};
use crate::counter::TallyStore;
use crate::db::RecordStore;
use crate::http::{Controller, HttpServer, Server};
use crate::workers::{Rollover, RolloverPolicy};

const DEFAULT_DB_PATH: &str = "data/freshtally.db";

/// Encapsulates the entire tally application state.
pub struct App {
    shutdown_token: CancellationToken,
    store: Arc<TallyStore>,
    records: Arc<RecordStore>,
    rollover: Arc<Rollover>,
    server: Arc<dyn Server>,
}

impl App {
    /// Creates a new tally application instance.
    pub fn new(shutdown_token: CancellationToken, cfg: Config) -> Result<Self> {
        let timezone = cfg.timezone();
        let today = Utc::now().with_timezone(&timezone).date_naive();

        let store = Arc::new(TallyStore::new(today));
        let records = Arc::new(match cfg.db_path() {
            Some(path) => Self::open_records(path)?,
            None if cfg.is_test() => RecordStore::open_in_memory()?,
            None => Self::open_records(DEFAULT_DB_PATH)?,
        });

        let policy = if cfg.persist_on_update() {
            RolloverPolicy::ContinuousUpsert
        } else {
            RolloverPolicy::SnapshotInsert
        };
        let rollover = Rollover::new(
            shutdown_token.clone(),
            store.clone(),
            records.clone(),
            timezone,
            cfg.poll_interval(),
            policy,
        );

        let controllers: Vec<Box<dyn Controller>> = vec![
            Box::new(IndexController::new()),
            Box::new(UpdateController::new(
                store.clone(),
                records.clone(),
                cfg.persist_on_update(),
            )),
            Box::new(CountController::new(store.clone())),
            Box::new(HistoryController::new(records.clone(), timezone)),
        ];
        let server: Arc<dyn Server> = HttpServer::new(shutdown_token.clone(), cfg, controllers)?;

        Ok(Self {
            shutdown_token,
            store,
            records,
            rollover,
            server,
        })
    }

    /// Serves the HTTP surface and the rollover worker, handles shutdown.
    pub async fn serve(&self, gsh: Arc<crate::shutdown::GracefulShutdown>) -> Result<()> {
        self.rollover.spawn();

        let server = self.server.clone();
        let app_for_close = self.clone();
        let gsh_clone = gsh.clone();

        tokio::task::spawn(async move {
            if let Err(e) = server.listen_and_serve().await {
                error!(
                    component = "app",
                    scope = "server",
                    event = "serve_failed",
                    error = %e,
                    "server failed to serve"
                );
            }

            app_for_close.close();

            gsh_clone.done();
        });

        info!(component = "app", event = "started", "application lifecycle");

        Ok(())
    }

    fn open_records(path: &str) -> Result<RecordStore> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(RecordStore::open(path)?)
    }

    /// Closes application resources.
    pub fn close(&self) {
        self.shutdown_token.cancel();

        info!(component = "app", event = "stopped", "application lifecycle");
    }
}

impl Clone for App {
    fn clone(&self) -> Self {
        Self {
            shutdown_token: self.shutdown_token.clone(),
            store: self.store.clone(),
            records: self.records.clone(),
            rollover: self.rollover.clone(),
            server: self.server.clone(),
        }
    }
}
