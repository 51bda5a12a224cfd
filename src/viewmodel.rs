//! View model - projects the tracked row for a screen and serializes writes

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::{Mutex, watch};

use crate::source::UserDataSource;
use crate::user::User;
use crate::{Error, Result};

/// Observable screen state. The screen enables its write control only while
/// `Idle`; the view model itself enforces the same rule, so a trigger that
/// slips through a still-enabled control is rejected rather than pipelined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Writing,
}

/// View model for the user screen.
///
/// Holds the record last seen or written, so a rename reuses the stored id
/// instead of minting a duplicate row.
pub struct UserViewModel {
    source: Arc<dyn UserDataSource>,
    current: Arc<Mutex<Option<User>>>,
    state_tx: watch::Sender<ViewState>,
}

impl UserViewModel {
    pub fn new(source: Arc<dyn UserDataSource>) -> Self {
        let (state_tx, _) = watch::channel(ViewState::Idle);
        Self {
            source,
            current: Arc::new(Mutex::new(None)),
            state_tx,
        }
    }

    /// Stream of display names, one per emission of the tracked row. Each
    /// emission also refreshes the record the next write will target.
    /// Dropping the stream releases the subscription; nothing is delivered
    /// after that.
    pub fn user_name(&self) -> BoxStream<'static, String> {
        let current = self.current.clone();
        self.source
            .user_stream()
            .then(move |user| {
                let current = current.clone();
                async move {
                    let name = user.display_name.clone();
                    *current.lock().await = Some(user);
                    name
                }
            })
            .boxed()
    }

    /// Observe the idle/writing state
    pub fn state(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    /// Seed the record the next write will target. Short-lived screens that
    /// already hold the row use this instead of waiting on the name stream.
    pub async fn adopt_user(&self, user: User) {
        *self.current.lock().await = Some(user);
    }

    /// Write the display name: updates the known record in place, or creates
    /// a new one with a generated id. At most one write is in flight per
    /// view model; a call arriving during another returns `WriteInFlight`.
    pub async fn update_user_name(&self, name: &str) -> Result<()> {
        // Dropping the guard restores Idle, so a write cancelled mid-await
        // cannot leave the view model wedged in Writing
        let _guard = WriteGuard::acquire(&self.state_tx).ok_or(Error::WriteInFlight)?;

        let user = {
            let current = self.current.lock().await;
            match current.as_ref() {
                Some(existing) => User::with_id(existing.id.clone(), name),
                None => User::new(name),
            }
        };

        let result = self.source.insert_or_update_user(&user).await;
        match &result {
            Ok(()) => *self.current.lock().await = Some(user),
            Err(e) => tracing::error!("Unable to update username: {e}"),
        }
        result
    }
}

/// Holds the exclusive right to write. Acquiring takes the Idle → Writing
/// transition atomically; dropping publishes Idle again, whether the write
/// completed, failed, or was cancelled.
struct WriteGuard<'a> {
    state_tx: &'a watch::Sender<ViewState>,
}

impl<'a> WriteGuard<'a> {
    fn acquire(state_tx: &'a watch::Sender<ViewState>) -> Option<Self> {
        let acquired = state_tx.send_if_modified(|state| {
            if *state == ViewState::Idle {
                *state = ViewState::Writing;
                true
            } else {
                false
            }
        });
        acquired.then_some(Self { state_tx })
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.state_tx.send_replace(ViewState::Idle);
    }
}

/// Constructs view models over a shared gateway handle. One typed
/// constructor per view model; nothing is dispatched on a runtime type.
pub struct ViewModelFactory {
    source: Arc<dyn UserDataSource>,
}

impl ViewModelFactory {
    pub fn new(source: Arc<dyn UserDataSource>) -> Self {
        Self { source }
    }

    pub fn user_view_model(&self) -> UserViewModel {
        UserViewModel::new(self.source.clone())
    }
}
