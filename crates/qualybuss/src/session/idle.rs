use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};

/// Hook invoked when the idle countdown runs out.
pub trait SignOut: Send + Sync + 'static {
    fn sign_out(&self);
}

impl<F> SignOut for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn sign_out(&self) {
        self()
    }
}

/// Countdown reset by every user input; fires the sign-out hook once, then ends.
pub struct IdleMonitor {
    activity: watch::Sender<Instant>,
    task: JoinHandle<()>,
}

impl IdleMonitor {
    /// Must be called inside a tokio runtime.
    pub fn spawn(timeout: Duration, hook: Arc<dyn SignOut>) -> Self {
        let (activity, mut last_input) = watch::channel(Instant::now());

        let task = tokio::spawn(async move {
            loop {
                let deadline = *last_input.borrow_and_update() + timeout;
                tokio::select! {
                    _ = sleep_until(deadline) => {
                        tracing::info!(idle_secs = timeout.as_secs(), "session idle, signing out");
                        hook.sign_out();
                        return;
                    }
                    changed = last_input.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Self { activity, task }
    }

    /// Record a keystroke, click or scroll.
    pub fn touch(&self) {
        // Ignored once the monitor has fired: the receiver is gone.
        let _ = self.activity.send(Instant::now());
    }

    pub fn has_expired(&self) -> bool {
        self.task.is_finished()
    }

    /// End the countdown without signing out (explicit logout, page unload).
    pub fn stop(self) {
        self.task.abort();
    }
}
