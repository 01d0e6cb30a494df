use async_trait::async_trait;
use coach_chat::{
    ChatError, ChatSession, CompletionError, CompletionProvider, ExchangeCoordinator,
    RequestBuilder, SendOutcome, SpeechCapture, DEFAULT_GREETING,
};
use coach_types::{
    AudioReference, ChatMessage, ChatRole, CompletionChoice, CompletionRequest,
    CompletionResponse, ExchangeState, Speaker,
};
use coach_voice::{AudioPlayer, SpeechSynthesizer, VoiceError};
use std::sync::{Arc, Mutex};

/// Replies with a fixed text and records every request it sees.
struct ScriptedCompletion {
    reply: Result<String, ()>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(CompletionResponse {
                choices: vec![CompletionChoice {
                    message: ChatMessage::new(ChatRole::Assistant, text.clone()),
                }],
            }),
            Err(()) => Err(CompletionError::Status {
                status: 500,
                body: "internal error".to_string(),
            }),
        }
    }
}

/// Returns an empty choices list.
struct NoChoices;

#[async_trait]
impl CompletionProvider for NoChoices {
    async fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse, CompletionError> {
        Ok(CompletionResponse::default())
    }
}

struct FixedSpeech(Result<Vec<u8>, ()>);

#[async_trait]
impl SpeechSynthesizer for FixedSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, VoiceError> {
        match &self.0 {
            Ok(bytes) => Ok(bytes.clone()),
            Err(()) => Err(VoiceError::Proxy("proxy returned 502".to_string())),
        }
    }
}

/// Records what it was asked to play, optionally failing.
#[derive(Default)]
struct RecordingPlayer {
    played: Mutex<Vec<AudioReference>>,
    fail: bool,
}

impl AudioPlayer for RecordingPlayer {
    fn play(&self, audio: &AudioReference) -> Result<(), VoiceError> {
        self.played.lock().unwrap().push(audio.clone());
        if self.fail {
            return Err(VoiceError::Playback("device busy".to_string()));
        }
        Ok(())
    }
}

fn coordinator(completion: Arc<dyn CompletionProvider>) -> ExchangeCoordinator {
    ExchangeCoordinator::new(RequestBuilder::default(), completion)
}

#[tokio::test]
async fn send_appends_user_then_assistant() {
    let completion = ScriptedCompletion::replying("Hello! How can I help?");
    let coordinator = coordinator(completion.clone());
    let mut session = ChatSession::default();

    let outcome = coordinator.send(&mut session, "Hi", None).await.unwrap();

    assert_eq!(
        outcome,
        SendOutcome::Replied {
            reply: "Hello! How can I help?".to_string(),
            audio: None
        }
    );
    let turns = session.transcript().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].text(), Some(DEFAULT_GREETING));
    assert_eq!((turns[1].speaker(), turns[1].text()), (Speaker::User, Some("Hi")));
    assert_eq!(
        (turns[2].speaker(), turns[2].text()),
        (Speaker::Assistant, Some("Hello! How can I help?"))
    );
    assert_eq!(session.exchange_state(), ExchangeState::Idle);
    assert!(session.notice().is_none());
}

#[tokio::test]
async fn request_carries_persona_and_user_turn() {
    let completion = ScriptedCompletion::replying("Why do I need a pen?");
    let coordinator = coordinator(completion.clone());
    let mut session = ChatSession::default();
    session.select_persona("sellAPen").unwrap();

    coordinator
        .send(&mut session, "Let me tell you about this pen", None)
        .await
        .unwrap();

    let requests = completion.requests();
    assert_eq!(requests.len(), 1);
    let messages = &requests[0].messages;
    assert_eq!(messages[0].role, ChatRole::System);
    assert_eq!(messages[0].content, session.persona());
    assert_eq!(
        messages.last().unwrap(),
        &ChatMessage::new(ChatRole::User, "Let me tell you about this pen")
    );
}

#[tokio::test]
async fn empty_send_is_a_no_op() {
    let completion = ScriptedCompletion::replying("unused");
    let coordinator = coordinator(completion.clone());
    let mut session = ChatSession::default();

    let outcome = coordinator.send(&mut session, "", None).await.unwrap();

    assert_eq!(outcome, SendOutcome::Ignored);
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.exchange_state(), ExchangeState::Idle);
    assert!(completion.requests().is_empty());
}

#[tokio::test]
async fn speech_capture_is_used_when_nothing_typed() {
    let completion = ScriptedCompletion::replying("Go on.");
    let coordinator = coordinator(completion);
    let mut session = ChatSession::default();
    let capture = SpeechCapture::new("I have a great pen", false);

    coordinator.send(&mut session, "", Some(&capture)).await.unwrap();

    assert_eq!(
        session.transcript().turns()[1].text(),
        Some("I have a great pen")
    );
}

#[tokio::test]
async fn speech_appends_separate_audio_turn() {
    let completion = ScriptedCompletion::replying("Hello! How can I help?");
    let player = Arc::new(RecordingPlayer::default());
    let coordinator = coordinator(completion)
        .with_speech(Arc::new(FixedSpeech(Ok(vec![1, 2, 3]))))
        .with_player(player.clone());
    let mut session = ChatSession::default();
    session.set_speech_enabled(true);

    let outcome = coordinator.send(&mut session, "Hi", None).await.unwrap();

    let turns = session.transcript().turns();
    assert_eq!(turns.len(), 4);
    assert_eq!(turns[2].text(), Some("Hello! How can I help?"));
    assert!(turns[2].audio_reference().is_none());

    let audio_turn = &turns[3];
    assert_eq!(audio_turn.speaker(), Speaker::Assistant);
    assert_eq!(audio_turn.text(), None);
    let reference = audio_turn.audio_reference().expect("audio turn");
    assert_eq!(reference.as_str(), "data:audio/mp3;base64,AQID");
    assert_eq!(reference.decode().unwrap(), vec![1, 2, 3]);

    assert_eq!(player.played.lock().unwrap().as_slice(), &[reference.clone()]);
    assert!(matches!(outcome, SendOutcome::Replied { audio: Some(_), .. }));
}

#[tokio::test]
async fn audio_turns_are_not_replayed() {
    let completion = ScriptedCompletion::replying("Sure.");
    let coordinator = coordinator(completion.clone())
        .with_speech(Arc::new(FixedSpeech(Ok(vec![9, 9]))));
    let mut session = ChatSession::default();
    session.set_speech_enabled(true);

    coordinator.send(&mut session, "First", None).await.unwrap();
    coordinator.send(&mut session, "Second", None).await.unwrap();

    assert_eq!(session.transcript().len(), 7);
    let requests = completion.requests();
    let second = &requests[1];
    let roles: Vec<ChatRole> = second.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            ChatRole::System,
            ChatRole::Assistant,
            ChatRole::User,
            ChatRole::Assistant,
            ChatRole::User,
        ]
    );
}

#[tokio::test]
async fn speech_disabled_on_session_skips_synthesis() {
    let completion = ScriptedCompletion::replying("Text only");
    let player = Arc::new(RecordingPlayer::default());
    let coordinator = coordinator(completion)
        .with_speech(Arc::new(FixedSpeech(Ok(vec![1]))))
        .with_player(player.clone());
    let mut session = ChatSession::default();

    coordinator.send(&mut session, "Hi", None).await.unwrap();

    assert_eq!(session.transcript().len(), 3);
    assert!(player.played.lock().unwrap().is_empty());
}

#[tokio::test]
async fn synthesis_failure_keeps_text_reply() {
    let completion = ScriptedCompletion::replying("Still here");
    let coordinator = coordinator(completion).with_speech(Arc::new(FixedSpeech(Err(()))));
    let mut session = ChatSession::default();
    session.set_speech_enabled(true);

    let outcome = coordinator.send(&mut session, "Hi", None).await.unwrap();

    assert_eq!(
        outcome,
        SendOutcome::Replied {
            reply: "Still here".to_string(),
            audio: None
        }
    );
    assert_eq!(session.transcript().len(), 3);
    assert_eq!(session.transcript().last().unwrap().text(), Some("Still here"));
}

#[tokio::test]
async fn playback_failure_does_not_block_reply() {
    let completion = ScriptedCompletion::replying("Listen");
    let player = Arc::new(RecordingPlayer {
        played: Mutex::new(Vec::new()),
        fail: true,
    });
    let coordinator = coordinator(completion)
        .with_speech(Arc::new(FixedSpeech(Ok(vec![4, 5, 6]))))
        .with_player(player);
    let mut session = ChatSession::default();
    session.set_speech_enabled(true);

    coordinator.send(&mut session, "Hi", None).await.unwrap();

    assert_eq!(session.transcript().len(), 4);
    assert!(session.transcript().last().unwrap().audio_reference().is_some());
}

#[tokio::test]
async fn completion_failure_restores_idle_and_records_notice() {
    let coordinator = coordinator(ScriptedCompletion::failing());
    let mut session = ChatSession::default();

    let err = coordinator.send(&mut session, "Hi", None).await.unwrap_err();

    assert!(matches!(
        err,
        ChatError::Completion(CompletionError::Status { status: 500, .. })
    ));
    assert_eq!(session.exchange_state(), ExchangeState::Idle);
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(session.transcript().last().unwrap().speaker(), Speaker::User);
    let notice = session.notice().expect("notice recorded");
    assert!(notice.message().contains("500"), "got: {}", notice);
}

#[tokio::test]
async fn missing_choices_is_a_failure() {
    let coordinator = coordinator(Arc::new(NoChoices));
    let mut session = ChatSession::default();

    let err = coordinator.send(&mut session, "Hi", None).await.unwrap_err();

    assert!(matches!(err, ChatError::Completion(CompletionError::Malformed(_))));
    assert_eq!(session.exchange_state(), ExchangeState::Idle);
}

#[tokio::test]
async fn successful_send_clears_previous_notice() {
    let mut session = ChatSession::default();
    let _ = coordinator(ScriptedCompletion::failing())
        .send(&mut session, "Hi", None)
        .await;
    assert!(session.notice().is_some());

    coordinator(ScriptedCompletion::replying("Back again"))
        .send(&mut session, "Hello?", None)
        .await
        .unwrap();

    assert!(session.notice().is_none());
}

#[tokio::test]
async fn begin_rejects_second_exchange_while_awaiting() {
    let completion = ScriptedCompletion::replying("First reply");
    let coordinator = coordinator(completion.clone());
    let mut session = ChatSession::default();

    let pending = coordinator
        .begin(&mut session, "First", None)
        .unwrap()
        .expect("pending exchange");
    assert!(session.is_typing());
    assert_eq!(session.transcript().len(), 2);

    let err = coordinator.begin(&mut session, "Second", None).unwrap_err();
    assert!(matches!(err, ChatError::ExchangeInFlight));
    assert_eq!(session.transcript().len(), 2);

    let result = coordinator.exchange(&pending).await;
    coordinator.finish(&mut session, result).unwrap();

    assert!(!session.is_typing());
    assert_eq!(session.transcript().len(), 3);

    // A new exchange is allowed once idle again.
    assert!(coordinator.send(&mut session, "Second", None).await.is_ok());
    assert_eq!(completion.requests().len(), 2);
}

#[tokio::test]
async fn dropped_send_future_restores_idle() {
    /// Never completes.
    struct Hanging;

    #[async_trait]
    impl CompletionProvider for Hanging {
        async fn complete(
            &self,
            _: &CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            std::future::pending().await
        }
    }

    let coordinator = coordinator(Arc::new(Hanging));
    let mut session = ChatSession::default();

    let timed_out = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        coordinator.send(&mut session, "Hi", None),
    )
    .await;

    assert!(timed_out.is_err());
    assert_eq!(session.exchange_state(), ExchangeState::Idle);
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn new_chat_after_several_turns() {
    let coordinator = coordinator(ScriptedCompletion::replying("Okay"));
    let mut session = ChatSession::default();
    session.select_persona("prospectCeo").unwrap();
    for text in ["one", "two", "three"] {
        coordinator.send(&mut session, text, None).await.unwrap();
    }
    assert_eq!(session.transcript().len(), 7);

    session.new_chat();

    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.transcript().turns()[0].text(), Some(DEFAULT_GREETING));
    assert_eq!(session.active_scenario(), None);
}
