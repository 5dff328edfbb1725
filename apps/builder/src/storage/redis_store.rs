use std::sync::Mutex;

use redis::{Commands, Connection};
use tracing::info;

use super::{KeyValueStore, StorageError};

/// Redis-backed store. Keys are written under an optional namespace so
/// several editor sessions can share one Redis instance.
pub struct RedisStore {
    conn: Mutex<Connection>,
    namespace: Option<String>,
}

impl RedisStore {
    /// Opens a connection eagerly so a bad `REDIS_URL` fails at startup.
    pub fn connect(url: &str, namespace: Option<String>) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection()?;
        info!("Redis store connected (namespace: {:?})", namespace);
        Ok(Self {
            conn: Mutex::new(conn),
            namespace,
        })
    }

    fn key(&self, key: &str) -> String {
        namespaced(self.namespace.as_deref(), key)
    }
}

fn namespaced(namespace: Option<&str>, key: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{ns}:{key}"),
        _ => key.to_string(),
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(conn.get(self.key(key))?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.set::<_, _, ()>(self.key(key), value)?;
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set(self.key(key), value).ignore();
        }
        let mut conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        pipe.query::<()>(&mut *conn)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
