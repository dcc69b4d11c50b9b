//! Calculating-screen race between the roast and the clock
//!
//! The calculating screen stays up for at least the minimum window. A roast
//! arriving by the extended window is shown; otherwise the fallback text is
//! shown and the generation keeps running detached.

use crate::config::RevealConfig;
use crate::error::NarrativeError;
use crate::narrative::{NarrativeGenerator, NarrativeRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, timeout_at, Instant};

/// Where the revealed text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealSource {
    /// Generated in time
    Generated,
    /// Generation failed
    Failed,
    /// Generation still running at the extended deadline
    TimedOut,
}

/// Outcome of the reveal race
#[derive(Debug)]
pub struct Reveal {
    /// Text to show
    pub text: String,
    /// Origin of `text`
    pub source: RevealSource,
    /// Time spent on the calculating screen
    pub waited: Duration,
    /// Still-running generation when `source` is `TimedOut`
    pub pending: Option<JoinHandle<Result<String, NarrativeError>>>,
}

impl Reveal {
    /// Whether the fallback text is shown
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source != RevealSource::Generated
    }
}

/// Run the roast generation against the reveal windows
pub async fn reveal_roast(
    generator: Arc<dyn NarrativeGenerator>,
    request: NarrativeRequest,
    config: &RevealConfig,
) -> Reveal {
    let start = Instant::now();
    let min_deadline = start + config.min_window();
    let extended_deadline = start + config.extended_window().max(config.min_window());

    let mut handle = tokio::spawn(async move { generator.roast(&request).await });

    let (text, source, pending) = match timeout_at(extended_deadline, &mut handle).await {
        Ok(Ok(Ok(text))) => (text, RevealSource::Generated, None),
        Ok(Ok(Err(e))) => {
            tracing::warn!(error = %e, "roast generation failed, using fallback");
            (config.fallback_text.clone(), RevealSource::Failed, None)
        }
        Ok(Err(join)) => {
            tracing::warn!(error = %join, "roast task aborted, using fallback");
            (config.fallback_text.clone(), RevealSource::Failed, None)
        }
        Err(_) => {
            tracing::warn!(
                extended_ms = config.extended_calculating_ms,
                "roast not ready, using fallback"
            );
            (config.fallback_text.clone(), RevealSource::TimedOut, Some(handle))
        }
    };

    sleep_until(min_deadline).await;
    let waited = start.elapsed();
    tracing::debug!(waited_ms = waited.as_millis(), ?source, "reveal complete");

    Reveal {
        text,
        source,
        waited,
        pending,
    }
}
