use chrono::{DateTime, Utc};
use flashdeck_core::{
    validate_card_text, validate_deck_name, Card, CoreError, Deck, DeckStore, SyncMode,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, Sqlite, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Decks and cards in two related tables. Every call commits before it
/// returns, so the store runs in write-through mode.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let store = Self::connect(opts, &path.display().to_string()).await?;
        info!(path = %path.display(), "sqlite store opened");
        Ok(store)
    }

    pub async fn open_memory() -> Result<Self, CoreError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|_| CoreError::StorageUnavailable("sqlite::memory:".into()))?
            .foreign_keys(true);
        Self::connect(opts, "sqlite::memory:").await
    }

    // One long-lived connection: the store has a single user, and an
    // in-memory database only lives as long as its connection.
    async fn connect(opts: SqliteConnectOptions, label: &str) -> Result<Self, CoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await
            .map_err(|e| CoreError::StorageUnavailable(format!("{label}: {e}")))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), CoreError> {
        const STMT: &str = r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS decks (
          id          TEXT PRIMARY KEY,
          name        TEXT NOT NULL UNIQUE,
          created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS cards (
          id          TEXT PRIMARY KEY,
          deck_id     TEXT NOT NULL,
          position    INTEGER NOT NULL,
          front       TEXT NOT NULL,
          back        TEXT NOT NULL,
          FOREIGN KEY(deck_id) REFERENCES decks(id) ON DELETE CASCADE,
          UNIQUE(deck_id, front)
        );

        CREATE INDEX IF NOT EXISTS idx_cards_deck_position ON cards (deck_id, position);
        "#;

        // Execute statements one by one for compatibility.
        for chunk in STMT.split(';') {
            let sql = chunk.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|_| CoreError::Storage("sqlite schema"))?;
        }
        Ok(())
    }

    async fn require_deck_id(&self, name: &str) -> Result<String, CoreError> {
        find_deck_id(&self.pool, name)
            .await?
            .ok_or_else(|| CoreError::DeckNotFound(name.to_string()))
    }
}

#[async_trait::async_trait]
impl DeckStore for SqliteStore {
    fn sync_mode(&self) -> SyncMode {
        SyncMode::WriteThrough
    }

    // ===== Decks =====
    async fn create_deck(&self, name: &str) -> Result<(), CoreError> {
        validate_deck_name(name)?;
        // Uniqueness comes from the UNIQUE constraint on decks.name.
        sqlx::query("INSERT INTO decks (id,name,created_at) VALUES (?,?,?)")
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .bind(dt_to_str(Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    CoreError::DuplicateName(name.to_string())
                }
                _ => CoreError::Storage("insert deck"),
            })?;
        info!(deck = name, "deck row created");
        Ok(())
    }

    async fn load_deck(&self, name: &str) -> Result<Deck, CoreError> {
        let deck_id = self.require_deck_id(name).await?;
        let rows = sqlx::query("SELECT front,back FROM cards WHERE deck_id=? ORDER BY position ASC")
            .bind(&deck_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("list cards"))?;
        let cards = rows
            .into_iter()
            .map(|row| Card::new(row.get::<String, _>("front"), row.get::<String, _>("back")));
        Deck::from_cards(name, cards)
    }

    async fn save_deck(&self, deck: &Deck) -> Result<(), CoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| CoreError::Storage("tx"))?;

        let Some(deck_id) = find_deck_id(&mut *tx, deck.name()).await? else {
            tx.rollback().await.ok();
            return Err(CoreError::DeckNotFound(deck.name().to_string()));
        };

        sqlx::query("DELETE FROM cards WHERE deck_id=?")
            .bind(&deck_id)
            .execute(&mut *tx)
            .await
            .map_err(|_| CoreError::Storage("del cards"))?;

        for (position, card) in deck.cards().iter().enumerate() {
            sqlx::query("INSERT INTO cards (id,deck_id,position,front,back) VALUES (?,?,?,?,?)")
                .bind(uuid::Uuid::new_v4().to_string())
                .bind(&deck_id)
                .bind(position as i64)
                .bind(&card.front)
                .bind(&card.back)
                .execute(&mut *tx)
                .await
                .map_err(|_| CoreError::Storage("insert card"))?;
        }

        tx.commit()
            .await
            .map_err(|_| CoreError::Storage("tx commit"))?;
        debug!(deck = deck.name(), cards = deck.len(), "deck rows replaced");
        Ok(())
    }

    async fn delete_deck(&self, name: &str) -> Result<(), CoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| CoreError::Storage("tx"))?;

        // Manual cascade (robust even if PRAGMA foreign_keys is off)
        sqlx::query("DELETE FROM cards WHERE deck_id IN (SELECT id FROM decks WHERE name=?)")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|_| CoreError::Storage("del cards"))?;

        let res = sqlx::query("DELETE FROM decks WHERE name=?")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|_| CoreError::Storage("del deck"))?;
        if res.rows_affected() == 0 {
            tx.rollback().await.ok();
            return Err(CoreError::DeckNotFound(name.to_string()));
        }

        tx.commit()
            .await
            .map_err(|_| CoreError::Storage("tx commit"))?;
        info!(deck = name, "deck row deleted");
        Ok(())
    }

    async fn list_deck_names(&self) -> Result<Vec<String>, CoreError> {
        let rows = sqlx::query("SELECT name FROM decks ORDER BY created_at ASC, rowid ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("list decks"))?;
        Ok(rows.into_iter().map(|row| row.get::<String, _>("name")).collect())
    }

    // ===== Cards =====
    async fn put_card(&self, deck: &str, front: &str, back: &str) -> Result<(), CoreError> {
        validate_card_text(front, back)?;
        let deck_id = self.require_deck_id(deck).await?;
        // A colliding front keeps its row and position; only the back changes.
        sqlx::query(
            r#"
            INSERT INTO cards (id, deck_id, position, front, back)
            VALUES (?, ?, (SELECT COALESCE(MAX(position), -1) + 1 FROM cards WHERE deck_id=?), ?, ?)
            ON CONFLICT(deck_id, front) DO UPDATE SET back=excluded.back
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&deck_id)
        .bind(&deck_id)
        .bind(front)
        .bind(back)
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("upsert card"))?;
        Ok(())
    }

    async fn remove_card(&self, deck: &str, front: &str) -> Result<(), CoreError> {
        let deck_id = self.require_deck_id(deck).await?;
        let res = sqlx::query("DELETE FROM cards WHERE deck_id=? AND front=?")
            .bind(&deck_id)
            .bind(front)
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("del card"))?;
        if res.rows_affected() == 0 {
            return Err(CoreError::CardNotFound(front.to_string()));
        }
        Ok(())
    }

    async fn clear_cards(&self, deck: &str) -> Result<(), CoreError> {
        let deck_id = self.require_deck_id(deck).await?;
        sqlx::query("DELETE FROM cards WHERE deck_id=?")
            .bind(&deck_id)
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("del cards"))?;
        Ok(())
    }

    async fn close(&self) -> Result<(), CoreError> {
        self.pool.close().await;
        debug!("sqlite store closed");
        Ok(())
    }
}

// ===== Helpers =====
async fn find_deck_id<'e, E>(exec: E, name: &str) -> Result<Option<String>, CoreError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT id FROM decks WHERE name=? LIMIT 1")
        .bind(name)
        .fetch_optional(exec)
        .await
        .map_err(|_| CoreError::Storage("read deck"))?;
    Ok(row.map(|r| r.get::<String, _>("id")))
}

fn dt_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
