use async_trait::async_trait;
use flashdeck_core::{validate_deck_name, Card, CoreError, Deck, DeckStore, SyncMode};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;
use tracing::{debug, info, warn};

pub mod paths;

const DECK_EXT: &str = "txt";
const BACKUPS_DIR: &str = ".backups";
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// One plaintext file per deck inside a single (per-user) directory.
///
/// A deck file holds alternating front and back lines. Reading stops at the
/// first blank or missing front line, so trailing blank lines are harmless.
pub struct TextStore {
    dir: PathBuf,
    max_backups: usize,
}

impl TextStore {
    /// Opens an existing deck directory. A missing directory is reported as
    /// `StorageUnavailable` rather than created.
    pub async fn open(dir: PathBuf, max_backups: usize) -> Result<Self, CoreError> {
        let probe = dir.clone();
        let is_dir = blocking(move || Ok(probe.is_dir())).await?;
        if !is_dir {
            return Err(CoreError::StorageUnavailable(format!(
                "no deck directory at {}",
                dir.display()
            )));
        }
        debug!(dir = %dir.display(), "text store opened");
        Ok(Self { dir, max_backups })
    }

    /// Opens the deck directory of `user` under `root`.
    pub async fn open_user(root: &Path, user: &str, max_backups: usize) -> Result<Self, CoreError> {
        let dir = paths::user_dir(root, user)?;
        Self::open(dir, max_backups).await
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn deck_path(&self, name: &str) -> Result<PathBuf, CoreError> {
        validate_file_stem(name)?;
        Ok(self.dir.join(format!("{name}.{DECK_EXT}")))
    }

    fn backups_for(&self, name: &str) -> PathBuf {
        self.dir.join(BACKUPS_DIR).join(name)
    }
}

/// Deck and user names double as file names.
pub fn validate_file_stem(name: &str) -> Result<(), CoreError> {
    validate_deck_name(name)?;
    if name.contains(['/', '\\', '\0']) {
        return Err(CoreError::Invalid("name must not contain path separators"));
    }
    if name.starts_with('.') {
        return Err(CoreError::Invalid("name must not start with '.'"));
    }
    Ok(())
}

pub fn parse_deck(name: &str, text: &str) -> Result<Deck, CoreError> {
    let mut lines = text.lines();
    let mut cards = Vec::new();
    while let Some(front) = lines.next() {
        if front.trim().is_empty() {
            break;
        }
        let back = lines.next().unwrap_or("");
        cards.push(Card::new(front, back));
    }
    Deck::from_cards(name, cards)
}

pub fn render_deck(deck: &Deck) -> String {
    let mut out = String::new();
    for c in deck.cards() {
        out.push_str(&c.front);
        out.push('\n');
        out.push_str(&c.back);
        out.push('\n');
    }
    out
}

async fn blocking<T, F>(f: F) -> Result<T, CoreError>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|_| CoreError::Storage("io task"))?
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), std::io::Error> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

fn write_backup(backups_dir: &Path, contents: &str, keep: usize) -> Result<(), std::io::Error> {
    fs::create_dir_all(backups_dir)?;
    let ts = chrono::Utc::now().format("%Y%m%d-%H%M%S%.6f");
    write_atomic(&backups_dir.join(format!("{ts}.{DECK_EXT}")), contents)?;
    rotate_backups(backups_dir, keep)
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(DECK_EXT))
        .collect();
    // Timestamped names sort oldest first.
    entries.sort();
    if entries.len() > keep {
        for p in &entries[0..entries.len() - keep] {
            let _ = fs::remove_file(p);
        }
    }
    Ok(())
}

fn not_found_as(e: std::io::Error, name: &str, ctx: &'static str) -> CoreError {
    if e.kind() == ErrorKind::NotFound {
        CoreError::DeckNotFound(name.to_string())
    } else {
        CoreError::Storage(ctx)
    }
}

#[async_trait]
impl DeckStore for TextStore {
    fn sync_mode(&self) -> SyncMode {
        SyncMode::Explicit
    }

    async fn create_deck(&self, name: &str) -> Result<(), CoreError> {
        let path = self.deck_path(name)?;
        let owned = name.to_string();
        blocking(move || {
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .map(|_| ())
                .map_err(|e| match e.kind() {
                    ErrorKind::AlreadyExists => CoreError::DuplicateName(owned),
                    ErrorKind::NotFound => CoreError::StorageUnavailable(format!(
                        "no deck directory for {}",
                        path.display()
                    )),
                    _ => CoreError::Storage("create deck file"),
                })
        })
        .await?;
        info!(deck = name, dir = %self.dir.display(), "deck file created");
        Ok(())
    }

    async fn load_deck(&self, name: &str) -> Result<Deck, CoreError> {
        let path = self.deck_path(name)?;
        let owned = name.to_string();
        let text = blocking(move || {
            fs::read_to_string(&path).map_err(|e| not_found_as(e, &owned, "read deck file"))
        })
        .await?;
        parse_deck(name, &text)
    }

    async fn save_deck(&self, deck: &Deck) -> Result<(), CoreError> {
        let path = self.deck_path(deck.name())?;
        let backups = self.backups_for(deck.name());
        let keep = self.max_backups;
        let owned = deck.name().to_string();
        let contents = render_deck(deck);

        blocking(move || {
            let previous =
                fs::read_to_string(&path).map_err(|e| not_found_as(e, &owned, "read deck file"))?;
            if keep > 0 && !previous.is_empty() {
                if let Err(e) = write_backup(&backups, &previous, keep) {
                    warn!(deck = %owned, error = %e, "backup failed");
                }
            }
            write_atomic(&path, &contents).map_err(|_| CoreError::Storage("write deck file"))
        })
        .await?;
        debug!(deck = deck.name(), cards = deck.len(), "deck file written");
        Ok(())
    }

    async fn delete_deck(&self, name: &str) -> Result<(), CoreError> {
        let path = self.deck_path(name)?;
        let backups = self.backups_for(name);
        let owned = name.to_string();
        blocking(move || {
            fs::remove_file(&path).map_err(|e| not_found_as(e, &owned, "remove deck file"))?;
            // The deck is gone once its file is; stale backups only get logged.
            match fs::remove_dir_all(&backups) {
                Err(e) if e.kind() != ErrorKind::NotFound => {
                    warn!(deck = %owned, error = %e, "backup cleanup failed");
                }
                _ => {}
            }
            Ok(())
        })
        .await?;
        info!(deck = name, "deck file removed");
        Ok(())
    }

    async fn list_deck_names(&self) -> Result<Vec<String>, CoreError> {
        let dir = self.dir.clone();
        blocking(move || {
            let mut names: Vec<String> = fs::read_dir(&dir)
                .map_err(|_| CoreError::Storage("read deck dir"))?
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(DECK_EXT))
                .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .filter(|n| !n.starts_with('.'))
                .collect();
            names.sort();
            Ok(names)
        })
        .await
    }
}
