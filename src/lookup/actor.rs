//! Lookup actor - runs debounced country searches in the Tokio runtime

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::debounce::Debouncer;
use crate::lookup::client::{CountryLookup, LookupError};
use crate::messages::{LookupCommand, LookupResponse};
use crate::models::CountryOption;

/// Result of one debounced lookup, shared by every caller of the burst
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub query: String,
    pub result: Result<Vec<CountryOption>, LookupError>,
}

impl SearchOutcome {
    fn into_response(self, id: u64) -> LookupResponse {
        match self.result {
            Ok(options) => LookupResponse::Suggestions {
                id,
                query: self.query,
                options,
            },
            Err(e) => LookupResponse::Failed {
                id,
                query: self.query,
                message: e.to_string(),
            },
        }
    }
}

/// Lookup actor that serves search commands through a single debouncer
pub struct LookupActor {
    debouncer: Debouncer<String, SearchOutcome>,
    response_tx: mpsc::UnboundedSender<LookupResponse>,
    waiting: JoinSet<()>,
}

impl LookupActor {
    pub fn new(
        lookup: Arc<dyn CountryLookup>,
        delay: Duration,
        response_tx: mpsc::UnboundedSender<LookupResponse>,
    ) -> Self {
        let debouncer = Debouncer::new(delay, move |query: String| {
            let lookup = Arc::clone(&lookup);
            async move {
                let result = lookup.search(&query).await;
                if let Err(e) = &result {
                    tracing::error!(query = %query, error = %e, "Error fetching countries");
                }
                SearchOutcome { query, result }
            }
        });

        LookupActor {
            debouncer,
            response_tx,
            waiting: JoinSet::new(),
        }
    }

    /// Run the actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<LookupCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(LookupCommand::Search { id, query }) => {
                            tracing::debug!(id, query = %query, "Search scheduled");
                            let pending = self.debouncer.call(query);
                            let response_tx = self.response_tx.clone();

                            self.waiting.spawn(async move {
                                match pending.await {
                                    Ok(outcome) => {
                                        let _ = response_tx.send(outcome.into_response(id));
                                    }
                                    Err(e) => tracing::debug!(id, error = %e, "Search dropped"),
                                }
                            });
                        }

                        Some(LookupCommand::Shutdown) | None => {
                            self.debouncer.dispose();
                            break;
                        }
                    }
                }

                // Reap finished waiters
                Some(_result) = self.waiting.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::sleep;

    #[derive(Default)]
    struct FakeLookup {
        queries: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl CountryLookup for FakeLookup {
        async fn search(&self, query: &str) -> Result<Vec<CountryOption>, LookupError> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(LookupError::Connect("unreachable".to_string()));
            }
            Ok(vec![CountryOption::new(query, "🏳")])
        }
    }

    fn spawn_actor(
        lookup: Arc<FakeLookup>,
    ) -> (
        mpsc::UnboundedSender<LookupCommand>,
        mpsc::UnboundedReceiver<LookupResponse>,
        tokio::task::JoinHandle<()>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let actor = LookupActor::new(lookup, Duration::from_millis(600), resp_tx);
        let handle = tokio::spawn(actor.run(cmd_rx));
        (cmd_tx, resp_rx, handle)
    }

    fn search(id: u64, query: &str) -> LookupCommand {
        LookupCommand::Search {
            id,
            query: query.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_answers_every_id_with_last_query() {
        let lookup = Arc::new(FakeLookup::default());
        let (cmd_tx, mut resp_rx, _handle) = spawn_actor(Arc::clone(&lookup));

        cmd_tx.send(search(1, "g")).unwrap();
        sleep(Duration::from_millis(100)).await;
        cmd_tx.send(search(2, "germ")).unwrap();
        sleep(Duration::from_millis(100)).await;
        cmd_tx.send(search(3, "germany")).unwrap();

        let mut ids = Vec::new();
        for _ in 0..3 {
            match resp_rx.recv().await.unwrap() {
                LookupResponse::Suggestions { id, query, options } => {
                    assert_eq!(query, "germany");
                    assert_eq!(options[0].label, "germany");
                    ids.push(id);
                }
                other => panic!("unexpected response: {:?}", other),
            }
        }
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(*lookup.queries.lock().unwrap(), vec!["germany".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_becomes_failed_response() {
        let lookup = Arc::new(FakeLookup {
            fail: true,
            ..FakeLookup::default()
        });
        let (cmd_tx, mut resp_rx, _handle) = spawn_actor(lookup);

        cmd_tx.send(search(7, "atlantis")).unwrap();
        match resp_rx.recv().await.unwrap() {
            LookupResponse::Failed { id, query, message } => {
                assert_eq!(id, 7);
                assert_eq!(query, "atlantis");
                assert!(message.contains("unreachable"));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_search() {
        let lookup = Arc::new(FakeLookup::default());
        let (cmd_tx, mut resp_rx, handle) = spawn_actor(Arc::clone(&lookup));

        cmd_tx.send(search(1, "norway")).unwrap();
        cmd_tx.send(LookupCommand::Shutdown).unwrap();
        handle.await.unwrap();

        sleep(Duration::from_secs(2)).await;
        assert!(resp_rx.recv().await.is_none());
        assert!(lookup.queries.lock().unwrap().is_empty());
    }
}
