//! Fan-out dispatcher.
//!
//! Issues one independent query per recipient concurrently, each bounded by
//! its own deadline, and returns once every recipient has either answered or
//! been timed out. A slow or broken agent degrades to the silence sentinel
//! and never blocks the others.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::timeout;

use taleweaver_domain::{AgentAddress, SILENCE};

use crate::infrastructure::agent_client::AgentQueryPort;
use crate::infrastructure::registry::ContextRegistry;
use crate::roster::AgentConfig;

/// Per-recipient call bounds.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Deadline for each outbound agent query.
    pub agent_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            agent_timeout: Duration::from_secs(15),
        }
    }
}

pub struct FanoutDispatcher {
    endpoints: HashMap<AgentAddress, String>,
    registry: Arc<ContextRegistry>,
    transport: Arc<dyn AgentQueryPort>,
    config: DispatchConfig,
}

impl FanoutDispatcher {
    pub fn new(
        roster: &[AgentConfig],
        registry: Arc<ContextRegistry>,
        transport: Arc<dyn AgentQueryPort>,
        config: DispatchConfig,
    ) -> Self {
        let endpoints = roster
            .iter()
            .map(|agent| (agent.address(), agent.endpoint.clone()))
            .collect();
        Self {
            endpoints,
            registry,
            transport,
            config,
        }
    }

    /// Query every recipient concurrently and collect the full result set.
    ///
    /// Each recipient's payload is its registered initial context, a newline,
    /// then `message` (just `message` when no context is set). Recipients
    /// that time out, fail, or are unknown are recorded with the silence
    /// sentinel so every recipient always has exactly one entry. Entries come
    /// back in recipient order.
    pub async fn dispatch(
        &self,
        sender: &str,
        recipients: &[AgentAddress],
        message: &str,
    ) -> Vec<(AgentAddress, String)> {
        tracing::info!(
            sender = %sender,
            recipients = recipients.len(),
            "Dispatching message to agents"
        );

        let mut handles = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let recipient = recipient.clone();
            let endpoint = self.endpoints.get(&recipient).cloned();
            let payload = self.payload_for(&recipient, message);
            let transport = Arc::clone(&self.transport);
            let deadline = self.config.agent_timeout;

            handles.push(tokio::spawn(async move {
                let Some(endpoint) = endpoint else {
                    tracing::warn!(recipient = %recipient, "Recipient has no configured endpoint");
                    return (recipient, SILENCE.to_string());
                };

                match timeout(deadline, transport.query(&endpoint, &payload)).await {
                    Ok(Ok(text)) => (recipient, text),
                    Ok(Err(e)) => {
                        tracing::warn!(recipient = %recipient, error = %e, "Agent query failed");
                        (recipient, SILENCE.to_string())
                    }
                    Err(_) => {
                        tracing::warn!(
                            recipient = %recipient,
                            timeout_secs = deadline.as_secs(),
                            "Agent query timed out"
                        );
                        (recipient, SILENCE.to_string())
                    }
                }
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (handle, recipient) in join_all(handles).await.into_iter().zip(recipients) {
            match handle {
                Ok(entry) => results.push(entry),
                Err(e) => {
                    tracing::warn!(recipient = %recipient, error = %e, "Agent query task panicked");
                    results.push((recipient.clone(), SILENCE.to_string()));
                }
            }
        }
        results
    }

    fn payload_for(&self, recipient: &AgentAddress, message: &str) -> String {
        let context = self.registry.get(recipient);
        if context.is_empty() {
            message.to_string()
        } else {
            format!("{context}\n{message}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::agent_client::AgentQueryError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Test transport with a scripted behavior per endpoint.
    struct ScriptedTransport {
        behaviors: HashMap<String, Behavior>,
        payloads: Mutex<Vec<(String, String)>>,
    }

    enum Behavior {
        Reply(&'static str),
        ReplyAfter(Duration, &'static str),
        Fail,
        Hang,
    }

    impl ScriptedTransport {
        fn new(behaviors: Vec<(&str, Behavior)>) -> Self {
            Self {
                behaviors: behaviors
                    .into_iter()
                    .map(|(endpoint, behavior)| (endpoint.to_string(), behavior))
                    .collect(),
                payloads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AgentQueryPort for ScriptedTransport {
        async fn query(&self, endpoint: &str, message: &str) -> Result<String, AgentQueryError> {
            self.payloads
                .lock()
                .expect("payload log")
                .push((endpoint.to_string(), message.to_string()));
            match self.behaviors.get(endpoint) {
                Some(Behavior::Reply(text)) => Ok(text.to_string()),
                Some(Behavior::ReplyAfter(delay, text)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(text.to_string())
                }
                Some(Behavior::Fail) => {
                    Err(AgentQueryError::RequestFailed("connection refused".into()))
                }
                Some(Behavior::Hang) | None => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
            }
        }
    }

    fn roster() -> Vec<AgentConfig> {
        vec![
            AgentConfig {
                name: "guard".into(),
                address: "agent-guard".into(),
                port: 8001,
                endpoint: "http://guard/query".into(),
            },
            AgentConfig {
                name: "merchant".into(),
                address: "agent-merchant".into(),
                port: 8002,
                endpoint: "http://merchant/query".into(),
            },
        ]
    }

    fn dispatcher(
        transport: ScriptedTransport,
        registry: Arc<ContextRegistry>,
        timeout: Duration,
    ) -> FanoutDispatcher {
        FanoutDispatcher::new(
            &roster(),
            registry,
            Arc::new(transport),
            DispatchConfig {
                agent_timeout: timeout,
            },
        )
    }

    fn recipients() -> Vec<AgentAddress> {
        vec![
            AgentAddress::new("agent-guard"),
            AgentAddress::new("agent-merchant"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn slow_agent_recorded_as_silence() {
        let transport = ScriptedTransport::new(vec![
            ("http://guard/query", Behavior::Reply("Guard raises alarm")),
            ("http://merchant/query", Behavior::Hang),
        ]);
        let dispatcher = dispatcher(
            transport,
            Arc::new(ContextRegistry::new()),
            Duration::from_secs(15),
        );

        let started = Instant::now();
        let results = dispatcher
            .dispatch("narrator", &recipients(), "Player draws sword")
            .await;

        // The responder's entry survives; the hung agent degrades to silence
        // and the call returns at the timeout bound, not after the hang.
        assert_eq!(
            results,
            vec![
                (AgentAddress::new("agent-guard"), "Guard raises alarm".to_string()),
                (AgentAddress::new("agent-merchant"), SILENCE.to_string()),
            ]
        );
        assert!(started.elapsed() < Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_queries_share_the_deadline() {
        // Two agents that each take 10s must finish together in ~10s, not 20s.
        let transport = ScriptedTransport::new(vec![
            (
                "http://guard/query",
                Behavior::ReplyAfter(Duration::from_secs(10), "Guard raises alarm"),
            ),
            (
                "http://merchant/query",
                Behavior::ReplyAfter(Duration::from_secs(10), "Merchant haggles"),
            ),
        ]);
        let dispatcher = dispatcher(
            transport,
            Arc::new(ContextRegistry::new()),
            Duration::from_secs(15),
        );

        let started = Instant::now();
        let results = dispatcher
            .dispatch("narrator", &recipients(), "Player draws sword")
            .await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(_, text)| text != SILENCE));
        assert!(started.elapsed() < Duration::from_secs(11));
    }

    #[tokio::test]
    async fn failed_agent_recorded_as_silence() {
        let transport = ScriptedTransport::new(vec![
            ("http://guard/query", Behavior::Fail),
            ("http://merchant/query", Behavior::Reply("Merchant haggles")),
        ]);
        let dispatcher = dispatcher(
            transport,
            Arc::new(ContextRegistry::new()),
            Duration::from_secs(15),
        );

        let results = dispatcher
            .dispatch("narrator", &recipients(), "Player draws sword")
            .await;

        assert_eq!(results[0], (AgentAddress::new("agent-guard"), SILENCE.to_string()));
        assert_eq!(
            results[1],
            (AgentAddress::new("agent-merchant"), "Merchant haggles".to_string())
        );
    }

    #[tokio::test]
    async fn initial_context_is_prepended_per_recipient() {
        let registry = Arc::new(ContextRegistry::new());
        registry.set(AgentAddress::new("agent-guard"), "You are the town guard.");

        let transport = ScriptedTransport::new(vec![
            ("http://guard/query", Behavior::Reply("ok")),
            ("http://merchant/query", Behavior::Reply("ok")),
        ]);
        let payloads_handle;
        let dispatcher = {
            let transport = Arc::new(transport);
            payloads_handle = Arc::clone(&transport);
            FanoutDispatcher::new(
                &roster(),
                registry,
                transport,
                DispatchConfig::default(),
            )
        };

        dispatcher
            .dispatch("narrator", &recipients(), "Player draws sword")
            .await;

        let payloads = payloads_handle.payloads.lock().expect("payload log");
        let guard_payload = payloads
            .iter()
            .find(|(endpoint, _)| endpoint == "http://guard/query")
            .map(|(_, payload)| payload.clone())
            .expect("guard queried");
        let merchant_payload = payloads
            .iter()
            .find(|(endpoint, _)| endpoint == "http://merchant/query")
            .map(|(_, payload)| payload.clone())
            .expect("merchant queried");

        assert_eq!(guard_payload, "You are the town guard.\nPlayer draws sword");
        assert_eq!(merchant_payload, "Player draws sword");
    }

    #[tokio::test]
    async fn unknown_recipient_recorded_as_silence() {
        let transport = ScriptedTransport::new(vec![]);
        let dispatcher = dispatcher(
            transport,
            Arc::new(ContextRegistry::new()),
            Duration::from_secs(1),
        );

        let results = dispatcher
            .dispatch("narrator", &[AgentAddress::new("agent-ghost")], "hello")
            .await;

        assert_eq!(
            results,
            vec![(AgentAddress::new("agent-ghost"), SILENCE.to_string())]
        );
    }
}
