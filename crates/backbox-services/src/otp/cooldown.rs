//! Resend cooldown timer.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Seconds a user must wait between OTP requests.
pub const RESEND_COOLDOWN_SECS: u32 = 60;

const TICK: Duration = Duration::from_secs(1);

/// Countdown from [`RESEND_COOLDOWN_SECS`] to zero, one tick per second.
///
/// The remaining seconds are published on a watch channel. At most one
/// countdown task is alive at a time; it is cancelled by [`cancel`](Self::cancel),
/// by a restart, and when the cooldown is dropped.
pub struct ResendCooldown {
    remaining: Arc<watch::Sender<u32>>,
    cancel_token: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl ResendCooldown {
    pub fn new() -> Self {
        let (remaining, _) = watch::channel(0);
        Self {
            remaining: Arc::new(remaining),
            cancel_token: None,
            handle: None,
        }
    }

    /// Restart the countdown at 60. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        self.stop_task();

        self.remaining.send_replace(RESEND_COOLDOWN_SECS);

        let cancel_token = CancellationToken::new();
        let remaining = Arc::clone(&self.remaining);
        let token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(TICK) => {
                        let mut left = 0;
                        remaining.send_modify(|value| {
                            *value = value.saturating_sub(1);
                            left = *value;
                        });
                        if left == 0 {
                            tracing::debug!("OTP resend cooldown elapsed");
                            break;
                        }
                    }
                }
            }
        });

        self.cancel_token = Some(cancel_token);
        self.handle = Some(handle);
    }

    /// Stop the countdown and reset to zero.
    pub fn cancel(&mut self) {
        self.stop_task();
        self.remaining.send_replace(0);
    }

    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn stop_task(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.handle.take();
    }
}

impl Default for ResendCooldown {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResendCooldown {
    fn drop(&mut self) {
        self.stop_task();
    }
}
