use crate::cli::opts::{Cli, StoreKind};
use flashdeck_core::{CoreError, DeckStore};
use flashdeck_sqlite::SqliteStore;
use flashdeck_text::paths::data_root;
use flashdeck_text::TextStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Resolved settings: CLI flags and `FLASHDECK_*` variables over platform defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreKind,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub user: String,
    pub max_backups: usize,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let data_dir = cli.data_dir.clone().unwrap_or_else(data_root);
        let db_path = cli
            .db_path
            .clone()
            .unwrap_or_else(|| data_dir.join("flashdeck.sqlite3"));
        Self {
            store: cli.store,
            data_dir,
            db_path,
            user: cli.user.clone(),
            max_backups: cli.max_backups,
        }
    }

    pub fn with_user(&self, user: &str) -> Self {
        Self {
            user: user.to_string(),
            ..self.clone()
        }
    }
}

pub async fn open_store(cfg: &AppConfig) -> Result<Arc<dyn DeckStore>, CoreError> {
    debug!(?cfg, "opening store");
    match cfg.store {
        StoreKind::Text => {
            let s = TextStore::open_user(&cfg.data_dir, &cfg.user, cfg.max_backups).await?;
            Ok(Arc::new(s))
        }
        StoreKind::Sqlite => {
            if let Some(parent) = cfg.db_path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let s = SqliteStore::open_file(&cfg.db_path).await?;
            Ok(Arc::new(s))
        }
    }
}
