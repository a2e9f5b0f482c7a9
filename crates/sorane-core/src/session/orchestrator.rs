//! Session orchestration: one invocation per inbound message.
//!
//! The orchestrator sequences the whole exchange: best-effort profile
//! extraction, prompt composition from the persona plus per-user state,
//! the chat generation call, memory append, segmentation, and paced
//! delivery. It runs entirely inside the detached worker task the webhook
//! dispatcher spawned, after the HTTP acknowledgment has already been
//! returned, so every failure here is terminal-local: logged, replaced
//! with a safe fallback, never propagated.

use std::sync::Arc;

use sorane_types::event::InboundMessage;
use sorane_types::llm::{GenerationRequest, SamplingConfig};
use sorane_types::persona::Persona;
use sorane_types::turn::Turn;

use crate::delivery::DeliveryScheduler;
use crate::llm::BoxTextGenerator;
use crate::profile::ProfileExtractor;
use crate::prompt;
use crate::segment;
use crate::session::store::{MemoryStore, ProfileStore};
use crate::session::RECENT_TURN_WINDOW;

/// Coordinates one exchange per inbound message.
///
/// Generic over the store traits so the orchestrator never depends on the
/// storage choice (sorane-core never depends on sorane-infra). Invocations
/// for the same user are not mutually exclusive: two concurrent messages
/// may interleave their read-modify-write store access, which is accepted
/// best-effort chat state, not a safety violation.
pub struct SessionOrchestrator<P: ProfileStore, M: MemoryStore> {
    generator: Arc<BoxTextGenerator>,
    profiles: P,
    memories: M,
    persona: Persona,
    scheduler: DeliveryScheduler,
    chat_sampling: SamplingConfig,
    extraction_sampling: SamplingConfig,
}

impl<P: ProfileStore, M: MemoryStore> SessionOrchestrator<P, M> {
    pub fn new(
        generator: Arc<BoxTextGenerator>,
        profiles: P,
        memories: M,
        persona: Persona,
        scheduler: DeliveryScheduler,
        chat_sampling: SamplingConfig,
        extraction_sampling: SamplingConfig,
    ) -> Self {
        Self {
            generator,
            profiles,
            memories,
            persona,
            scheduler,
            chat_sampling,
            extraction_sampling,
        }
    }

    /// Access the profile store.
    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    /// Access the memory store.
    pub fn memories(&self) -> &M {
        &self.memories
    }

    /// Process one inbound message end to end.
    ///
    /// A failed generation delivers the persona's fixed fallback reply and
    /// appends nothing to memory, so a dead backend never poisons future
    /// context with error text.
    #[tracing::instrument(
        name = "handle_message",
        skip(self, message),
        fields(user_id = %message.user_id, input_len = message.text.len())
    )]
    pub async fn handle(&self, message: InboundMessage) {
        let InboundMessage {
            user_id,
            text,
            reply_token,
        } = message;

        // 1. Best-effort extraction; an empty delta merges as a no-op but
        //    skipping it avoids creating store entries for no information.
        let delta =
            ProfileExtractor::extract(&self.generator, &text, &self.extraction_sampling).await;
        if !delta.is_empty() {
            self.profiles.merge(&user_id, delta);
        }

        // 2. Snapshot state, 3. compose and generate.
        let profile = self.profiles.snapshot(&user_id);
        let recent = self.memories.recent(&user_id, RECENT_TURN_WINDOW);
        let request = GenerationRequest {
            prompt: prompt::compose(&self.persona, &profile, &recent, &text),
            sampling: self.chat_sampling.clone(),
        };

        let response = match self.generator.generate(&request).await {
            Ok(generation) => generation.text,
            Err(error) => {
                // 4. Backend unavailable: fixed fallback, no memory commit.
                tracing::warn!(error = %error, "generation failed; sending fallback reply");
                let fallback = vec![self.persona.fallback_reply.clone()];
                self.scheduler.deliver(&user_id, reply_token, fallback).await;
                return;
            }
        };

        // 5. Commit the turn, then segment and deliver.
        self.memories.append(&user_id, Turn::new(text, response.clone()));
        let chunks = segment::segment(&response);
        self.scheduler.deliver(&user_id, reply_token, chunks).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use sorane_types::error::DeliveryError;
    use sorane_types::event::{ReplyToken, UserId};
    use sorane_types::llm::{Generation, GeneratorError};
    use sorane_types::profile::{Profile, ProfileDelta};

    use crate::llm::TextGenerator;
    use crate::messaging::{BoxMessagePort, MessagePort};

    /// Pops one scripted result per generate call; the extractor calls
    /// first, the chat generation second.
    struct ScriptedGenerator {
        outputs: Mutex<VecDeque<Result<String, GeneratorError>>>,
    }

    impl ScriptedGenerator {
        fn new(outputs: Vec<Result<String, GeneratorError>>) -> Self {
            Self {
                outputs: Mutex::new(outputs.into()),
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<Generation, GeneratorError> {
            self.outputs
                .lock()
                .unwrap()
                .pop_front()
                .expect("more generate calls than scripted outputs")
                .map(|text| Generation { text })
        }
    }

    #[derive(Default)]
    struct TestProfileStore {
        profiles: Mutex<HashMap<UserId, Profile>>,
    }

    impl ProfileStore for TestProfileStore {
        fn snapshot(&self, user_id: &UserId) -> Profile {
            self.profiles
                .lock()
                .unwrap()
                .get(user_id)
                .cloned()
                .unwrap_or_default()
        }

        fn merge(&self, user_id: &UserId, delta: ProfileDelta) {
            self.profiles
                .lock()
                .unwrap()
                .entry(user_id.clone())
                .or_default()
                .merge(delta);
        }
    }

    #[derive(Default)]
    struct TestMemoryStore {
        turns: Mutex<HashMap<UserId, Vec<Turn>>>,
    }

    impl TestMemoryStore {
        fn turn_count(&self, user_id: &UserId) -> usize {
            self.turns
                .lock()
                .unwrap()
                .get(user_id)
                .map_or(0, Vec::len)
        }
    }

    impl MemoryStore for TestMemoryStore {
        fn recent(&self, user_id: &UserId, limit: usize) -> Vec<Turn> {
            let turns = self.turns.lock().unwrap();
            let Some(history) = turns.get(user_id) else {
                return Vec::new();
            };
            let skip = history.len().saturating_sub(limit);
            history[skip..].to_vec()
        }

        fn append(&self, user_id: &UserId, turn: Turn) {
            self.turns
                .lock()
                .unwrap()
                .entry(user_id.clone())
                .or_default()
                .push(turn);
        }
    }

    type SendLog = Arc<Mutex<Vec<(&'static str, String)>>>;

    struct RecordingPort {
        sends: SendLog,
    }

    impl MessagePort for RecordingPort {
        fn name(&self) -> &str {
            "recording"
        }

        async fn reply(&self, _token: &ReplyToken, text: &str) -> Result<(), DeliveryError> {
            self.sends.lock().unwrap().push(("reply", text.to_string()));
            Ok(())
        }

        async fn push(&self, _user_id: &UserId, text: &str) -> Result<(), DeliveryError> {
            self.sends.lock().unwrap().push(("push", text.to_string()));
            Ok(())
        }
    }

    const EMPTY_DELTA: &str = r#"{"name": null, "likes": [], "location": null, "tags": []}"#;

    fn orchestrator(
        outputs: Vec<Result<String, GeneratorError>>,
    ) -> (
        SessionOrchestrator<TestProfileStore, TestMemoryStore>,
        SendLog,
    ) {
        let sends: SendLog = Arc::default();
        let port = Arc::new(BoxMessagePort::new(RecordingPort {
            sends: Arc::clone(&sends),
        }));
        let orchestrator = SessionOrchestrator::new(
            Arc::new(BoxTextGenerator::new(ScriptedGenerator::new(outputs))),
            TestProfileStore::default(),
            TestMemoryStore::default(),
            Persona::default(),
            DeliveryScheduler::new(port),
            SamplingConfig::chat(),
            SamplingConfig::extraction(),
        );
        (orchestrator, sends)
    }

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            user_id: UserId::from("U1"),
            text: text.to_string(),
            reply_token: ReplyToken::new("rt-1"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn successful_exchange_appends_turn_and_delivers_chunks() {
        let (orchestrator, sends) = orchestrator(vec![
            Ok(EMPTY_DELTA.to_string()),
            Ok("（輕哼一聲）\n你來了。\n今天過得如何？".to_string()),
        ]);

        orchestrator.handle(message("我回來了")).await;
        tokio::time::sleep(std::time::Duration::from_secs(10)).await;

        let user = UserId::from("U1");
        assert_eq!(orchestrator.memories().turn_count(&user), 1);
        let recent = orchestrator.memories().recent(&user, 5);
        let turn = &recent[0];
        assert_eq!(turn.input, "我回來了");
        assert_eq!(turn.response, "（輕哼一聲）\n你來了。\n今天過得如何？");

        let sends = sends.lock().unwrap();
        assert_eq!(sends.len(), 3);
        assert_eq!(sends[0], ("reply", "（輕哼一聲）".to_string()));
        assert_eq!(sends[1], ("push", "你來了。".to_string()));
        assert_eq!(sends[2], ("push", "今天過得如何？".to_string()));
    }

    #[tokio::test]
    async fn backend_failure_sends_fallback_and_skips_memory() {
        let (orchestrator, sends) = orchestrator(vec![
            Ok(EMPTY_DELTA.to_string()),
            Err(GeneratorError::Timeout),
        ]);

        orchestrator.handle(message("在嗎")).await;

        assert_eq!(orchestrator.memories().turn_count(&UserId::from("U1")), 0);
        let sends = sends.lock().unwrap();
        assert_eq!(sends.len(), 1);
        assert_eq!(
            sends[0],
            ("reply", Persona::default().fallback_reply),
        );
    }

    #[tokio::test]
    async fn extraction_failure_does_not_block_the_exchange() {
        let (orchestrator, sends) = orchestrator(vec![
            Err(GeneratorError::Http("connection refused".to_string())),
            Ok("嗯。".to_string()),
        ]);

        orchestrator.handle(message("你好")).await;

        assert_eq!(orchestrator.memories().turn_count(&UserId::from("U1")), 1);
        assert!(orchestrator
            .profiles()
            .snapshot(&UserId::from("U1"))
            .is_empty());
        assert_eq!(sends.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn extracted_name_appears_in_the_next_composed_prompt() {
        let (orchestrator, _sends) = orchestrator(vec![
            Ok(r#"{"name": "小明", "likes": [], "location": null, "tags": []}"#.to_string()),
            Ok("小明，你回來啦。".to_string()),
        ]);

        orchestrator.handle(message("我叫小明")).await;

        let profile = orchestrator.profiles().snapshot(&UserId::from("U1"));
        assert_eq!(profile.name.as_deref(), Some("小明"));

        // The next composed prompt carries the profile line.
        let prompt = prompt::compose(&Persona::default(), &profile, &[], "今天好熱");
        assert!(prompt.contains("名字：小明"));
    }

    #[tokio::test]
    async fn recent_turns_flow_back_into_the_prompt_window() {
        let mut outputs = Vec::new();
        for i in 0..8 {
            outputs.push(Ok(EMPTY_DELTA.to_string()));
            outputs.push(Ok(format!("回覆{i}。")));
        }
        let (orchestrator, _sends) = orchestrator(outputs);

        for i in 0..8 {
            orchestrator
                .handle(InboundMessage {
                    user_id: UserId::from("U1"),
                    text: format!("訊息{i}"),
                    reply_token: ReplyToken::new(format!("rt-{i}")),
                })
                .await;
        }

        let recent = orchestrator
            .memories()
            .recent(&UserId::from("U1"), RECENT_TURN_WINDOW);
        assert_eq!(recent.len(), RECENT_TURN_WINDOW);
        assert_eq!(recent[0].input, "訊息3");
        assert_eq!(recent[4].input, "訊息7");
    }
}
