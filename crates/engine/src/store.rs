use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{ExpensesData, ResultEngine};

/// File-backed storage of chat ledgers, one JSON document per chat.
///
/// Saving always rewrites the whole document (last write wins). Callers that
/// read, mutate and save should hold [`ExpenseStore::lock`] for the chat in
/// between.
#[derive(Clone, Debug)]
pub struct ExpenseStore {
    root: PathBuf,
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl ExpenseStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Arc::default(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a chat document.
    #[must_use]
    pub fn path_for(&self, chat_id: i64) -> PathBuf {
        self.root.join(format!("expenses_{chat_id}.json"))
    }

    /// Loads a chat document; `Ok(None)` when the chat has no file yet.
    pub fn load(&self, chat_id: i64) -> ResultEngine<Option<ExpensesData>> {
        let path = self.path_for(chat_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Overwrites a chat document with `data`.
    pub fn save(&self, chat_id: i64, data: &ExpensesData) -> ResultEngine<()> {
        let path = self.path_for(chat_id);
        let json = serde_json::to_string_pretty(data)?;
        write_atomically(&path, &json)?;
        tracing::debug!("saved ledger of chat {chat_id} to {}", path.display());
        Ok(())
    }

    /// Exclusive access to one chat, held across load → mutate → save.
    ///
    /// Locks nobody holds or waits for are dropped from the registry here, so
    /// it only tracks chats with work in flight.
    pub async fn lock(&self, chat_id: i64) -> OwnedMutexGuard<()> {
        let chat_lock = {
            let mut guard = self.locks.lock().await;
            guard.retain(|_, chat_lock| Arc::strong_count(chat_lock) > 1);
            guard.entry(chat_id).or_default().clone()
        };
        chat_lock.lock_owned().await
    }
}

fn write_atomically(path: &Path, contents: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}
