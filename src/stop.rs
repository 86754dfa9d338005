use tokio_util::sync::CancellationToken;

/// One-shot notification that the owning database client is shutting down.
///
/// Clones observe the same signal. Firing is idempotent and cannot be undone.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    token: CancellationToken,
}

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal.
    pub fn stop(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the signal has fired; immediately if it already has.
    pub async fn stopped(&self) {
        self.token.cancelled().await;
    }
}

impl From<CancellationToken> for StopSignal {
    fn from(token: CancellationToken) -> Self {
        Self { token }
    }
}
