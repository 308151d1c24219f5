use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::components::identity::{ChatId, UserId};
use crate::simulation::bounty::{Bounty, HospitalStay, LifeChatData};
use crate::world::repository::{ChatRepository, StoreError};

const CHAT_SCHEMA_VERSION: i64 = 1;

const CHAT_DB_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chat_meta (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  schema_version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS chats (
  chat_id INTEGER PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS chat_bounties (
  chat_id INTEGER NOT NULL,
  position INTEGER NOT NULL,
  user_id INTEGER NOT NULL,
  amount INTEGER NOT NULL,
  is_police_bounty INTEGER NOT NULL,
  PRIMARY KEY (chat_id, position)
);

CREATE TABLE IF NOT EXISTS chat_untagged_users (
  chat_id INTEGER NOT NULL,
  user_id INTEGER NOT NULL,
  PRIMARY KEY (chat_id, user_id)
);

CREATE TABLE IF NOT EXISTS chat_hospital_stays (
  chat_id INTEGER NOT NULL,
  position INTEGER NOT NULL,
  user_id INTEGER NOT NULL,
  minutes INTEGER NOT NULL,
  PRIMARY KEY (chat_id, position)
);
"#;

pub struct ChatDb {
    conn: Connection,
}

impl ChatDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let db = Self { conn };
        db.conn.execute_batch(CHAT_DB_SCHEMA)?;
        db.ensure_chat_meta()?;
        Ok(db)
    }

    fn ensure_chat_meta(&self) -> Result<(), StoreError> {
        let version = self
            .conn
            .query_row(
                "SELECT schema_version FROM chat_meta WHERE id = 1",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        match version {
            Some(CHAT_SCHEMA_VERSION) => Ok(()),
            Some(other) => Err(StoreError::InvalidData(format!(
                "chat_meta version mismatch (schema {}, expected {})",
                other, CHAT_SCHEMA_VERSION
            ))),
            None => {
                self.conn.execute(
                    "INSERT INTO chat_meta (id, schema_version) VALUES (1, ?1)",
                    params![CHAT_SCHEMA_VERSION],
                )?;
                Ok(())
            }
        }
    }

    pub fn load_chats(&self) -> Result<Vec<LifeChatData>, StoreError> {
        let mut chats: BTreeMap<ChatId, LifeChatData> = BTreeMap::new();

        let mut stmt = self.conn.prepare("SELECT chat_id FROM chats")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        for row in rows {
            let chat_id = ChatId(row?);
            chats.insert(chat_id, LifeChatData::new(chat_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT chat_id, user_id, amount, is_police_bounty FROM chat_bounties ORDER BY chat_id, position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;
        for row in rows {
            let (chat_id, user_id, amount, is_police_bounty) = row?;
            chat_entry(&mut chats, chat_id)?.bounties.push(Bounty {
                user_id: UserId(user_id),
                amount,
                is_police_bounty: is_police_bounty != 0,
            });
        }

        let mut stmt = self
            .conn
            .prepare("SELECT chat_id, user_id FROM chat_untagged_users ORDER BY chat_id, user_id")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;
        for row in rows {
            let (chat_id, user_id) = row?;
            chat_entry(&mut chats, chat_id)?
                .users_not_tagged
                .push(UserId(user_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT chat_id, user_id, minutes FROM chat_hospital_stays ORDER BY chat_id, position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;
        for row in rows {
            let (chat_id, user_id, minutes) = row?;
            chat_entry(&mut chats, chat_id)?
                .users_in_hospital
                .push(HospitalStay {
                    user_id: UserId(user_id),
                    minutes,
                });
        }

        Ok(chats.into_values().collect())
    }

    pub fn save_chats(&mut self, chats: &[LifeChatData]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM chats", [])?;
        tx.execute("DELETE FROM chat_bounties", [])?;
        tx.execute("DELETE FROM chat_untagged_users", [])?;
        tx.execute("DELETE FROM chat_hospital_stays", [])?;

        for chat in chats {
            let chat_id = chat.chat_id.0;
            tx.execute("INSERT INTO chats (chat_id) VALUES (?1)", params![chat_id])?;
            for (position, bounty) in chat.bounties.iter().enumerate() {
                tx.execute(
                    "INSERT INTO chat_bounties (chat_id, position, user_id, amount, is_police_bounty) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        chat_id,
                        position as i64,
                        bounty.user_id.0,
                        bounty.amount,
                        if bounty.is_police_bounty { 1 } else { 0 },
                    ],
                )?;
            }
            for user_id in &chat.users_not_tagged {
                tx.execute(
                    "INSERT OR IGNORE INTO chat_untagged_users (chat_id, user_id) VALUES (?1, ?2)",
                    params![chat_id, user_id.0],
                )?;
            }
            for (position, stay) in chat.users_in_hospital.iter().enumerate() {
                tx.execute(
                    "INSERT INTO chat_hospital_stays (chat_id, position, user_id, minutes) VALUES (?1, ?2, ?3, ?4)",
                    params![chat_id, position as i64, stay.user_id.0, stay.minutes],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn chat_entry(
    chats: &mut BTreeMap<ChatId, LifeChatData>,
    chat_id: i64,
) -> Result<&mut LifeChatData, StoreError> {
    chats
        .get_mut(&ChatId(chat_id))
        .ok_or_else(|| StoreError::InvalidData(format!("row references unknown chat {}", chat_id)))
}

impl ChatRepository for ChatDb {
    fn load(&mut self) -> Result<Vec<LifeChatData>, StoreError> {
        self.load_chats()
    }

    fn save(&mut self, chats: &[LifeChatData]) -> Result<(), StoreError> {
        self.save_chats(chats)
    }
}
