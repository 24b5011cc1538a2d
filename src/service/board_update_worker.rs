use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::constants::FALLBACK_REFRESH_RATE_SECONDS;
use crate::model::data::board::{Board, BoardPtr, update_unread};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The unread state was refreshed (or the refresh failed and was logged).
    Completed(Duration),
    /// Another refresh of the same board was still running.
    Skipped(Duration),
    /// The board is gone, the loop ends.
    Stopped
}

/// Periodically refreshes the unread state of one board.
///
/// The loop has no cancellation handle of its own. It ends on the first tick after the
/// worker got marked deleted or the board got dropped.
pub struct BoardUpdateWorker {
    board: Weak<RwLock<Board>>,
    refresh_lock: Mutex<()>,
    deleted: AtomicBool,
    started: AtomicBool
}

impl BoardUpdateWorker {
    pub fn new(board: &BoardPtr) -> BoardUpdateWorker {
        return BoardUpdateWorker {
            board: Arc::downgrade(board),
            refresh_lock: Mutex::new(()),
            deleted: AtomicBool::new(false),
            started: AtomicBool::new(false)
        };
    }

    pub fn is_deleted(&self) -> bool {
        return self.deleted.load(Ordering::SeqCst);
    }

    pub fn mark_deleted(&self) {
        self.deleted.store(true, Ordering::SeqCst);
    }

    /// Spawns the refresh loop. Only the first call does anything.
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.started.swap(true, Ordering::SeqCst) {
            return None;
        }

        let worker = self.clone();

        let join_handle = tokio::task::spawn(async move {
            info!("BoardUpdateWorker started");

            loop {
                let delay = match worker.do_work().await {
                    TickResult::Completed(delay) => delay,
                    TickResult::Skipped(delay) => delay,
                    TickResult::Stopped => break
                };

                sleep(delay).await;
            }

            info!("BoardUpdateWorker terminated");
        });

        return Some(join_handle);
    }

    /// One tick of the refresh loop.
    pub async fn do_work(&self) -> TickResult {
        if self.is_deleted() {
            debug!("do_work() worker is deleted");
            return TickResult::Stopped;
        }

        let board = self.board.upgrade();
        if board.is_none() {
            debug!("do_work() board was dropped");
            return TickResult::Stopped;
        }

        let board = board.unwrap();

        let guard = self.refresh_lock.try_lock();
        if guard.is_err() {
            let delay = refresh_delay(&board).await;
            debug!("do_work() refresh is already in progress, skipping the tick");
            return TickResult::Skipped(delay);
        }

        let _guard = guard.unwrap();
        let board_name = board.read().await.name.clone();

        match update_unread(&board).await {
            Ok(unread_forums) => {
                info!("do_work(\'{}\') {} unread forum(s)", board_name, unread_forums.len());
            }
            Err(error) => {
                error!("do_work(\'{}\') refresh error: {:#}", board_name, error);
            }
        }

        return TickResult::Completed(refresh_delay(&board).await);
    }
}

async fn refresh_delay(board: &BoardPtr) -> Duration {
    // Zero counts as invalid.
    let seconds = board.read().await
        .refresh_rate_seconds()
        .filter(|seconds| *seconds > 0)
        .unwrap_or(FALLBACK_REFRESH_RATE_SECONDS);

    return Duration::from_millis(seconds.saturating_mul(1000));
}
