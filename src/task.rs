use futures::channel::oneshot;
use thiserror::Error;

/// Result of blocking work that runs off the UI thread.
///
/// The UI polls it once per frame; it never blocks.
#[derive(Debug)]
pub struct PendingTask<T> {
    receiver: oneshot::Receiver<T>,
}

/// What a poll found
#[derive(Debug, PartialEq)]
pub enum TaskPoll<T> {
    Pending,
    Ready(T),
    /// The worker went away without answering (it panicked)
    Lost,
}

impl<T> PendingTask<T> {
    pub fn poll(&mut self) -> TaskPoll<T> {
        match self.receiver.try_recv() {
            Ok(Some(value)) => TaskPoll::Ready(value),
            Ok(None) => TaskPoll::Pending,
            Err(oneshot::Canceled) => TaskPoll::Lost,
        }
    }

    /// Wait for the result. Only for tests and shutdown paths.
    pub fn wait(self) -> Option<T> {
        futures::executor::block_on(self.receiver).ok()
    }
}

/// Run `work` in the background and hand back its result
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_task<T, F>(name: &str, work: F) -> PendingTask<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let spawned = std::thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || {
            // the receiver may already be gone if the UI moved on
            let _ = sender.send(work());
        });
    if let Err(e) = spawned {
        log::error!("Failed to spawn {} task: {}", name, e);
    }
    PendingTask { receiver }
}

/// Run `work` on the browser event loop and hand back its result
#[cfg(target_arch = "wasm32")]
pub fn spawn_task<T, F>(name: &str, work: F) -> PendingTask<T>
where
    T: 'static,
    F: FnOnce() -> T + 'static,
{
    let (sender, receiver) = oneshot::channel();
    log::debug!("Queueing {} task", name);
    wasm_bindgen_futures::spawn_local(async move {
        let _ = sender.send(work());
    });
    PendingTask { receiver }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("A save is already in progress")]
pub struct SaveRejected;

/// Allows at most one save in flight.
#[derive(Debug)]
pub struct SaveGate<T> {
    pending: Option<PendingTask<T>>,
}

impl<T> Default for SaveGate<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> SaveGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a save unless one is already running. `start` is only called when
    /// the gate is free.
    pub fn begin(&mut self, start: impl FnOnce() -> PendingTask<T>) -> Result<(), SaveRejected> {
        if self.pending.is_some() {
            log::warn!("Ignoring save request while another save is in flight");
            return Err(SaveRejected);
        }
        self.pending = Some(start());
        Ok(())
    }

    /// Collect the finished save, if any, freeing the gate.
    pub fn poll(&mut self) -> Option<TaskPoll<T>> {
        let task = self.pending.as_mut()?;
        match task.poll() {
            TaskPoll::Pending => None,
            done => {
                self.pending = None;
                Some(done)
            }
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn background_result_is_delivered() {
        let task = spawn_task("answer", || 6 * 7);
        assert_eq!(task.wait(), Some(42));
    }

    #[test]
    fn panicking_worker_is_reported_lost() {
        let mut task: PendingTask<u32> = spawn_task("boom", || panic!("worker failed"));
        loop {
            match task.poll() {
                TaskPoll::Pending => std::thread::yield_now(),
                TaskPoll::Lost => break,
                TaskPoll::Ready(_) => unreachable!(),
            }
        }
    }

    #[test]
    fn second_save_is_rejected_while_pending() {
        let (release, hold) = mpsc::channel::<()>();
        let mut gate = SaveGate::new();

        gate.begin(|| {
            spawn_task("save", move || {
                let _ = hold.recv();
                "saved"
            })
        })
        .unwrap();
        assert!(gate.is_saving());

        let mut started_second = false;
        let second = gate.begin(|| {
            started_second = true;
            spawn_task("save", || "again")
        });
        assert_eq!(second, Err(SaveRejected));
        assert!(!started_second);

        release.send(()).unwrap();
        let outcome = loop {
            if let Some(done) = gate.poll() {
                break done;
            }
            std::thread::yield_now();
        };
        assert_eq!(outcome, TaskPoll::Ready("saved"));
        assert!(!gate.is_saving());
        assert!(gate.begin(|| spawn_task("save", || "third")).is_ok());
    }
}
