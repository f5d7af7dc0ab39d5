use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// One-shot emphasis for freshly shortlisted rows, owned by a single viewer.
///
/// Armed from a navigation parameter, it stays active for a fixed window and then clears
/// itself. Re-arming restarts the window. Dropping the signal cancels the pending timer.
/// `arm` spawns onto the current Tokio runtime.
#[derive(Debug)]
pub struct HighlightSignal {
    window: Duration,
    /// Generation of the active arming, `0` when inactive.
    live: Arc<AtomicU64>,
    generation: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl HighlightSignal {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            live: Arc::new(AtomicU64::new(0)),
            generation: AtomicU64::new(0),
            timer: Mutex::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.live.load(Ordering::Acquire) != 0
    }

    pub fn arm(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        self.live.store(generation, Ordering::Release);

        let live = Arc::clone(&self.live);
        let window = self.window;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // A newer arming owns the flag if the generation moved on.
            let _ = live.compare_exchange(generation, 0, Ordering::AcqRel, Ordering::Acquire);
        }));
    }

    pub fn clear(&self) {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = timer.take() {
            pending.abort();
        }
        self.live.store(0, Ordering::Release);
    }
}

impl Drop for HighlightSignal {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = timer.take() {
            pending.abort();
        }
    }
}

/// Highlight signals keyed by viewer. Arming one viewer's window never emphasises rows
/// for anyone else. Expired signals are dropped on the next arming.
#[derive(Debug)]
pub struct HighlightSessions {
    window: Duration,
    viewers: Mutex<HashMap<String, HighlightSignal>>,
}

impl HighlightSessions {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            viewers: Mutex::new(HashMap::new()),
        }
    }

    /// Starts the viewer's window unless it is already running.
    pub fn arm(&self, viewer: &str) {
        let mut viewers = self.viewers.lock().unwrap_or_else(PoisonError::into_inner);
        viewers.retain(|_, signal| signal.is_active());

        let signal = viewers
            .entry(viewer.to_string())
            .or_insert_with(|| HighlightSignal::new(self.window));
        if !signal.is_active() {
            signal.arm();
        }
    }

    pub fn is_active(&self, viewer: &str) -> bool {
        self.viewers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(viewer)
            .is_some_and(HighlightSignal::is_active)
    }

    /// Ends the viewer's window early, cancelling its timer.
    pub fn clear(&self, viewer: &str) {
        let removed = self
            .viewers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(viewer);
        if let Some(signal) = removed {
            signal.clear();
        }
    }

    pub fn active_viewers(&self) -> usize {
        self.viewers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|signal| signal.is_active())
            .count()
    }
}
