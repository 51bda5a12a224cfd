//! Data access gateway - reactive reads over the user store
//!
//! The store query tracks a single row. Reads are exposed as a conflating
//! stream: subscribers get the current row immediately (if one exists) and a
//! new value every time a write or delete lands. A slow subscriber observes
//! only the most recent row; intermediate values are dropped rather than
//! buffered.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::sync::{Mutex, watch};
use tokio::task;

use crate::storage::UserStore;
use crate::user::User;
use crate::{Error, Result};

/// Gateway contract for user record access
#[async_trait]
pub trait UserDataSource: Send + Sync {
    /// Stream of the tracked row: the current value on subscribe, then every
    /// subsequent change. Restartable; each call yields an independent
    /// subscription that ends when dropped or when the gateway goes away.
    fn user_stream(&self) -> BoxStream<'static, User>;

    /// Insert the user, or replace the record sharing its id
    async fn insert_or_update_user(&self, user: &User) -> Result<()>;

    /// Delete every stored record unconditionally
    async fn delete_all_users(&self) -> Result<()>;
}

/// Gateway over a local SQLite store.
///
/// Store operations run on the blocking worker pool; the tracked row is
/// republished on a watch channel after every successful mutation. The
/// handle is constructed once at startup and shared via `Arc`.
pub struct LocalUserDataSource {
    store: Arc<Mutex<UserStore>>,
    tx: watch::Sender<Option<User>>,
}

impl LocalUserDataSource {
    /// Wrap a store, seeding the channel with the currently tracked row
    pub fn new(store: UserStore) -> Result<Self> {
        let initial = store.first_user()?;
        let (tx, _) = watch::channel(initial);
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            tx,
        })
    }

    /// Snapshot of the last published row, without subscribing
    pub fn latest_user(&self) -> Option<User> {
        self.tx.borrow().clone()
    }
}

#[async_trait]
impl UserDataSource for LocalUserDataSource {
    fn user_stream(&self) -> BoxStream<'static, User> {
        let rx = self.tx.subscribe();
        stream::unfold((rx, false), |(mut rx, mut started)| async move {
            loop {
                if started {
                    // Err means the gateway was dropped; end the stream
                    rx.changed().await.ok()?;
                }
                let row = rx.borrow_and_update().clone();
                started = true;
                // An empty store publishes None; stay quiet until a row exists
                if let Some(user) = row {
                    return Some((user, (rx, started)));
                }
            }
        })
        .boxed()
    }

    async fn insert_or_update_user(&self, user: &User) -> Result<()> {
        let guard = self.store.clone().lock_owned().await;
        let user = user.clone();
        tracing::debug!("Upserting user {}", user.id);
        // Outer result is the write outcome; the refresh outcome is separate
        // because the write has already landed by the time we re-read
        let refresh = task::spawn_blocking(move || {
            guard.upsert_user(&user)?;
            Ok::<_, Error>(guard.first_user())
        })
        .await
        .map_err(|e| Error::Task(e.to_string()))??;
        match refresh {
            Ok(row) => {
                self.tx.send_replace(row);
            }
            Err(e) => tracing::error!("Unable to refresh tracked row after write: {e}"),
        }
        Ok(())
    }

    async fn delete_all_users(&self) -> Result<()> {
        let guard = self.store.clone().lock_owned().await;
        tracing::debug!("Deleting all users");
        task::spawn_blocking(move || guard.delete_all_users())
            .await
            .map_err(|e| Error::Task(e.to_string()))??;
        self.tx.send_replace(None);
        Ok(())
    }
}
