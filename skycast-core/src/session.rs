//! UI-facing weather session.
//!
//! The session owns the latest snapshot. Fetches run as spawned tasks and
//! report back over a channel; only the task that drives the session (the UI
//! loop) ever mutates the snapshot. Completions from superseded submissions
//! are dropped.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    error::{ErrorKind, WeatherError},
    forecast::select_window,
    model::{ForecastSlot, WeatherQuery, WeatherSnapshot},
    provider::WeatherProvider,
};

/// Notifications for the UI layer, in the order they should be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherEvent {
    SnapshotReady(WeatherSnapshot),
    FetchFailed(ErrorKind),
    ForecastWindowReady(Vec<ForecastSlot>),
}

/// Result of one spawned fetch, sent back to the session.
#[derive(Debug)]
pub struct FetchDone {
    generation: u64,
    query: WeatherQuery,
    result: Result<WeatherSnapshot, WeatherError>,
}

#[derive(Debug)]
pub struct WeatherSession {
    provider: Arc<dyn WeatherProvider>,
    tx: mpsc::UnboundedSender<FetchDone>,
    rx: mpsc::UnboundedReceiver<FetchDone>,
    snapshot: Option<WeatherSnapshot>,
    generation: u64,
    in_flight: usize,
}

impl WeatherSession {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { provider, tx, rx, snapshot: None, generation: 0, in_flight: 0 }
    }

    /// Latest successfully fetched snapshot, if any.
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// Start a fetch for user input. Blank input is ignored and returns `None`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_location_submitted(&mut self, input: &str) -> Option<WeatherQuery> {
        let query = WeatherQuery::new(input)?;

        self.generation += 1;
        self.in_flight += 1;

        let generation = self.generation;
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let task_query = query.clone();

        tracing::debug!(query = %query, generation, "starting weather fetch");

        tokio::spawn(async move {
            let result = provider.fetch_weather(&task_query).await;
            // The receiver lives in the session; if it is gone nobody cares.
            let _ = tx.send(FetchDone { generation, query: task_query, result });
        });

        Some(query)
    }

    /// Wait for the next relevant completion and apply it.
    ///
    /// Returns an empty list when nothing is in flight, or when the only
    /// completions left were stale.
    pub async fn next_events(&mut self, now_hour: u32) -> Vec<WeatherEvent> {
        while self.in_flight > 0 {
            let Some(done) = self.rx.recv().await else {
                break;
            };
            self.in_flight -= 1;

            if done.generation != self.generation {
                tracing::debug!(
                    query = %done.query,
                    generation = done.generation,
                    latest = self.generation,
                    "discarding stale weather result"
                );
                continue;
            }

            return self.apply(done, now_hour);
        }

        Vec::new()
    }

    /// Recompute the window for the current snapshot, e.g. after the hour changed.
    pub fn refresh_window(&self, now_hour: u32) -> Option<Vec<ForecastSlot>> {
        self.snapshot.as_ref().map(|snap| select_window(snap, now_hour))
    }

    fn apply(&mut self, done: FetchDone, now_hour: u32) -> Vec<WeatherEvent> {
        match done.result {
            Ok(snapshot) => {
                let window = select_window(&snapshot, now_hour);
                self.snapshot = Some(snapshot.clone());
                vec![WeatherEvent::SnapshotReady(snapshot), WeatherEvent::ForecastWindowReady(window)]
            }
            Err(e) => {
                tracing::warn!(query = %done.query, error = %e, "weather fetch failed");
                vec![WeatherEvent::FetchFailed(e.kind())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, ForecastDay, HourlyEntry};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    #[derive(Debug, Default)]
    struct FakeProvider {
        gate: Notify,
    }

    fn snapshot(name: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            current: CurrentConditions {
                location_name: name.to_string(),
                region: None,
                country: None,
                local_time: None,
                temperature_c: Some(7.5),
                condition_text: Some("Cloudy".into()),
                condition_icon: None,
            },
            today: ForecastDay::new(
                (0..24)
                    .map(|h| HourlyEntry {
                        time: format!("2023-11-10 {h:02}:00"),
                        temperature_c: Some(h as f64),
                    })
                    .collect(),
            ),
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_weather(
            &self,
            query: &WeatherQuery,
        ) -> Result<WeatherSnapshot, WeatherError> {
            match query.as_str() {
                "Slow" => {
                    self.gate.notified().await;
                    Ok(snapshot("Slow"))
                }
                "Nowhere" => Err(WeatherError::FetchFailed {
                    status: Some(reqwest::StatusCode::BAD_REQUEST),
                    message: "No matching location found.".into(),
                }),
                "Garbled" => Err(WeatherError::DecodeFailed("expected value".into())),
                other => Ok(snapshot(other)),
            }
        }
    }

    #[tokio::test]
    async fn blank_submission_starts_nothing() {
        let mut session = WeatherSession::new(Arc::new(FakeProvider::default()));

        assert!(session.on_location_submitted("   ").is_none());
        assert!(!session.has_pending());
        assert!(session.next_events(10).await.is_empty());
    }

    #[tokio::test]
    async fn success_emits_snapshot_then_window() {
        let mut session = WeatherSession::new(Arc::new(FakeProvider::default()));
        session.on_location_submitted("Riga");

        let events = session.next_events(22).await;
        assert_eq!(events.len(), 2);

        match &events[0] {
            WeatherEvent::SnapshotReady(snap) => assert_eq!(snap.current.location_name, "Riga"),
            other => panic!("unexpected event: {other:?}"),
        }
        match &events[1] {
            WeatherEvent::ForecastWindowReady(slots) => {
                let hours: Vec<_> = slots.iter().map(|s| s.hour).collect();
                assert_eq!(hours, [22, 23, 0, 1, 2, 3]);
                assert_eq!(slots[0].label, "Now");
                assert_eq!(slots[0].temperature, "8°");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        assert_eq!(session.snapshot().map(|s| s.current.location_name.as_str()), Some("Riga"));
        assert!(!session.has_pending());
    }

    #[tokio::test]
    async fn failure_keeps_previous_snapshot() {
        let mut session = WeatherSession::new(Arc::new(FakeProvider::default()));

        session.on_location_submitted("Riga");
        session.next_events(0).await;

        session.on_location_submitted("Nowhere");
        let events = session.next_events(0).await;
        assert_eq!(events, [WeatherEvent::FetchFailed(ErrorKind::FetchFailed)]);

        session.on_location_submitted("Garbled");
        let events = session.next_events(0).await;
        assert_eq!(events, [WeatherEvent::FetchFailed(ErrorKind::DecodeFailed)]);

        assert_eq!(session.snapshot().map(|s| s.current.location_name.as_str()), Some("Riga"));
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let provider = Arc::new(FakeProvider::default());
        let mut session = WeatherSession::new(provider.clone());

        session.on_location_submitted("Slow");
        session.on_location_submitted("Tallinn");

        let events = session.next_events(12).await;
        assert!(matches!(&events[0], WeatherEvent::SnapshotReady(s) if s.current.location_name == "Tallinn"));

        provider.gate.notify_one();
        assert!(session.next_events(12).await.is_empty());
        assert_eq!(
            session.snapshot().map(|s| s.current.location_name.as_str()),
            Some("Tallinn")
        );
    }

    #[tokio::test]
    async fn refresh_window_follows_the_clock() {
        let mut session = WeatherSession::new(Arc::new(FakeProvider::default()));
        assert!(session.refresh_window(5).is_none());

        session.on_location_submitted("Riga");
        session.next_events(5).await;

        let window = session.refresh_window(6).expect("snapshot present");
        assert_eq!(window[0].hour, 6);
        assert_eq!(window[1].label, "07");
    }
}
