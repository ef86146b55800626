//! Authentication telemetry events and sinks.
//!
//! The credential store never surfaces login failures as errors to its
//! callers; telemetry is the only place where the outcome of a sign-in
//! attempt is reliably observable, so the event set mirrors the login
//! lifecycle exactly.

use std::io;

use serde::{Deserialize, Serialize};

use crate::auth::AuthProvider;

/// A structured telemetry event emitted by the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// An interactive sign-in attempt began.
    #[serde(rename = "auth.start")]
    AuthStart {
        /// Provider being signed into.
        provider: AuthProvider,
    },
    /// An interactive sign-in attempt succeeded.
    #[serde(rename = "auth.success")]
    AuthSuccess {
        /// Provider that was signed into.
        provider: AuthProvider,
    },
    /// The user gave up on an interactive sign-in attempt.
    #[serde(rename = "auth.fail")]
    AuthFail {
        /// Provider the sign-in targeted.
        provider: AuthProvider,
    },
    /// The user opted out of future sign-in notifications.
    #[serde(rename = "auth.cancel")]
    AuthCancel {
        /// Provider the notification targeted.
        provider: AuthProvider,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Telemetry sink that retains events for later inspection.
///
/// Only available to tests and consumers of the `test-support` feature.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingTelemetrySink {
    events: std::sync::Mutex<Vec<TelemetryEvent>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingTelemetrySink {
    /// Drains and returns all recorded events.
    pub fn take(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl TelemetrySink for RecordingTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordingTelemetrySink, TelemetryEvent, TelemetrySink};
    use crate::auth::AuthProvider;

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingTelemetrySink::default();
        sink.record(TelemetryEvent::AuthStart {
            provider: AuthProvider::GitHub,
        });

        assert_eq!(
            sink.take(),
            vec![TelemetryEvent::AuthStart {
                provider: AuthProvider::GitHub,
            }]
        );
    }

    #[test]
    fn events_serialise_with_dotted_type_tags() {
        let serialised = serde_json::to_string(&TelemetryEvent::AuthFail {
            provider: AuthProvider::GitHubEnterprise,
        })
        .expect("event should serialise");

        assert_eq!(
            serialised,
            r#"{"type":"auth.fail","provider":"github-enterprise"}"#
        );
    }
}
