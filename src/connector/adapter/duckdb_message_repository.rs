use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::MessageRepository;
use crate::domain::{ChatId, ChatSummary, DomainError, Message, Role};

/// Message log stored in a DuckDB file.
///
/// A single `chat_messages` table; `seq` records insertion order so messages
/// with equal timestamps come back in the order they were written.
pub struct DuckdbMessageRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbMessageRepository {
    pub fn new(db_path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::storage(format!("Failed to open DuckDB database: {}", e)))?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DomainError::storage(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE SEQUENCE IF NOT EXISTS chat_messages_seq;
            CREATE TABLE IF NOT EXISTS chat_messages (
                seq BIGINT NOT NULL DEFAULT nextval('chat_messages_seq'),
                id TEXT PRIMARY KEY,
                chat_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                sent_at BIGINT NOT NULL
            );
            "#,
        )
        .map_err(|e| DomainError::storage(format!("Failed to initialize schema: {}", e)))?;

        debug!("DuckDB chat_messages schema initialized");
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for DuckdbMessageRepository {
    async fn save(&self, message: &Message) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        conn.execute(
            r#"
            INSERT INTO chat_messages (id, chat_id, role, content, sent_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO NOTHING
            "#,
            params![
                message.id(),
                message.chat_id().as_str(),
                message.role().as_str(),
                message.content(),
                message.timestamp(),
            ],
        )
        .map_err(|e| DomainError::storage(format!("Failed to save message: {}", e)))?;

        Ok(())
    }

    async fn find_by_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                r#"
                SELECT id, chat_id, role, content, sent_at
                FROM chat_messages
                WHERE chat_id = ?1
                ORDER BY sent_at ASC, seq ASC
                "#,
            )
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![chat_id.as_str()], |row| {
                let role: String = row.get(2)?;
                Ok(Message::reconstitute(
                    row.get(0)?,
                    ChatId::new(row.get::<_, String>(1)?),
                    Role::from_str(&role),
                    row.get(3)?,
                    row.get(4)?,
                ))
            })
            .map_err(|e| DomainError::storage(format!("Failed to query messages: {}", e)))?;

        let mut messages = Vec::new();
        for row in rows {
            messages
                .push(row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?);
        }
        Ok(messages)
    }

    async fn list_chats(&self) -> Result<Vec<ChatSummary>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                r#"
                SELECT chat_id, COUNT(*) AS message_count, MAX(sent_at) AS last_activity
                FROM chat_messages
                GROUP BY chat_id
                ORDER BY last_activity DESC, chat_id ASC
                "#,
            )
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ChatSummary {
                    chat_id: ChatId::new(row.get::<_, String>(0)?),
                    message_count: row.get::<_, i64>(1)? as u64,
                    last_activity: row.get(2)?,
                })
            })
            .map_err(|e| DomainError::storage(format!("Failed to query chats: {}", e)))?;

        let mut chats = Vec::new();
        for row in rows {
            chats.push(
                row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?,
            );
        }
        Ok(chats)
    }
}
