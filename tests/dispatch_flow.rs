//! Dispatcher integration tests
//! Run with: cargo test --test dispatch_flow

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use svensson::application::errors::{BotError, MediaError};
use svensson::application::messaging::{EventDispatcher, Outcome};
use svensson::application::services::{MessageService, Outbox};
use svensson::domain::entities::{CommandTable, InboundEvent, MessageKind, OutboundMessage, PresenceShow};
use svensson::domain::traits::{EventSource, MediaResolver, StanzaSink};

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

const ROOM: &str = "lounge@conference.example.org";
const ALICE: &str = "lounge@conference.example.org/alice";

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Plain(OutboundMessage),
    Raw(String),
}

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<Sent>>,
    fail: bool,
}

impl RecordingSink {
    fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail: true }
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl StanzaSink for RecordingSink {
    async fn send_plain(&self, message: &OutboundMessage) -> Result<(), BotError> {
        if self.fail {
            return Err(BotError::SendFailure("not connected".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Plain(message.clone()));
        Ok(())
    }

    async fn send_raw(&self, stanza: &str) -> Result<(), BotError> {
        if self.fail {
            return Err(BotError::SendFailure("not connected".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Raw(stanza.to_string()));
        Ok(())
    }
}

/// Resolver stub that hands back a fixed answer
struct StubResolver {
    answer: Result<String, fn() -> MediaError>,
    queries: Mutex<Vec<String>>,
}

impl StubResolver {
    fn returning(uri: &str) -> Self {
        Self { answer: Ok(uri.to_string()), queries: Mutex::new(Vec::new()) }
    }

    fn failing(err: fn() -> MediaError) -> Self {
        Self { answer: Err(err), queries: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl MediaResolver for StubResolver {
    async fn resolve_media(&self, query: &str) -> Result<String, MediaError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.answer {
            Ok(uri) => Ok(uri.clone()),
            Err(make) => Err(make()),
        }
    }
}

/// Replays events, then reports the session as lost
struct ScriptedSource {
    events: Mutex<VecDeque<InboundEvent>>,
}

impl ScriptedSource {
    fn new(events: Vec<InboundEvent>) -> Self {
        Self { events: Mutex::new(events.into()) }
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn receive(&self) -> Result<InboundEvent, BotError> {
        let next = self.events.lock().unwrap().pop_front();
        next.ok_or_else(|| BotError::TransportFatal("stream ended".to_string()))
    }
}

fn dispatcher(sink: Arc<RecordingSink>, resolver: Arc<StubResolver>) -> EventDispatcher {
    EventDispatcher::new("Svensson", CommandTable::standard(), resolver, MessageService::new(sink))
}

fn groupchat(text: &str) -> InboundEvent {
    InboundEvent::message(ALICE, MessageKind::GroupChat, text)
}

fn url_of(stanza: &str) -> &str {
    let start = stanza.find("<url>").unwrap() + "<url>".len();
    let end = stanza.find("</url>").unwrap();
    &stanza[start..end]
}

#[tokio::test]
async fn test_hi_replies_to_room() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("https://e.com/a.gif")));

    assert_eq!(bot.handle(groupchat("Svensson hi")).await, Outcome::Replied);

    assert_eq!(sink.sent(), vec![Sent::Plain(OutboundMessage::new(ROOM, MessageKind::GroupChat, "Hi!"))]);
}

#[tokio::test]
async fn test_case_variation_dispatches() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("https://e.com/a.gif")));

    assert_eq!(bot.handle(groupchat("svensson HI")).await, Outcome::Replied);
    assert_eq!(sink.sent().len(), 1);
}

#[tokio::test]
async fn test_nick_alone_and_unaddressed_are_ignored() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("https://e.com/a.gif")));

    assert_eq!(bot.handle(groupchat("Svensson")).await, Outcome::Ignored);
    assert_eq!(bot.handle(groupchat("hello everyone")).await, Outcome::Ignored);
    assert_eq!(bot.handle(groupchat("")).await, Outcome::Ignored);
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_command_gets_what() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("https://e.com/a.gif")));

    assert_eq!(bot.handle(groupchat("Svensson dance please")).await, Outcome::Replied);
    assert_eq!(sink.sent(), vec![Sent::Plain(OutboundMessage::new(ROOM, MessageKind::GroupChat, "What?"))]);
}

#[tokio::test]
async fn test_gif_sends_one_oob_stanza_without_query() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let resolver = Arc::new(StubResolver::returning("https://example.com/a.gif?x=1"));
    let bot = dispatcher(sink.clone(), resolver.clone());

    assert_eq!(bot.handle(groupchat("Svensson gif cats")).await, Outcome::SharedMedia);

    let sent = sink.sent();
    assert_eq!(sent.len(), 1);
    let Sent::Raw(stanza) = &sent[0] else {
        panic!("expected a raw stanza, got {:?}", sent[0]);
    };
    assert_eq!(url_of(stanza), "https://example.com/a.gif");
    assert!(stanza.starts_with(&format!("<message to='{}' type='groupchat' id='", ROOM)));
    assert!(stanza.contains("<body>https://example.com/a.gif</body>"));
    assert_eq!(*resolver.queries.lock().unwrap(), vec!["cats".to_string()]);
}

#[tokio::test]
async fn test_gif_with_unparsable_uri_is_dropped() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("giphy.gif?x=1")));

    assert_eq!(bot.handle(groupchat("Svensson gif cats")).await, Outcome::Abandoned);
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn test_gif_query_joins_words() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let resolver = Arc::new(StubResolver::returning("https://example.com/a.gif"));
    let bot = dispatcher(sink.clone(), resolver.clone());

    bot.handle(groupchat("Svensson: gif Happy, Dancing Cats!")).await;
    assert_eq!(*resolver.queries.lock().unwrap(), vec!["happy dancing cats".to_string()]);
}

#[tokio::test]
async fn test_gif_failure_is_silent() {
    ensure_init();
    let failures: [fn() -> MediaError; 4] = [
        || MediaError::NoResults,
        || MediaError::MissingField("downsized"),
        || MediaError::Network("timed out".to_string()),
        || MediaError::Decode("bad json".to_string()),
    ];
    for make in failures {
        let sink = Arc::new(RecordingSink::default());
        let bot = dispatcher(sink.clone(), Arc::new(StubResolver::failing(make)));

        assert_eq!(bot.handle(groupchat("Svensson gif cats")).await, Outcome::Abandoned);
        assert!(sink.sent().is_empty());
    }
}

#[tokio::test]
async fn test_direct_chat_answered_at_sender() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("https://e.com/a.gif")));

    let event = InboundEvent::message("bob@example.org/laptop", MessageKind::Chat, "Svensson hi");
    bot.handle(event).await;

    assert_eq!(
        sink.sent(),
        vec![Sent::Plain(OutboundMessage::new("bob@example.org/laptop", MessageKind::Chat, "Hi!"))]
    );
}

#[tokio::test]
async fn test_presence_is_only_observed() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("https://e.com/a.gif")));

    assert_eq!(bot.handle(InboundEvent::presence(ALICE, PresenceShow::Dnd)).await, Outcome::Observed);
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn test_send_failure_does_not_stop_the_loop() {
    ensure_init();
    let sink = Arc::new(RecordingSink::failing());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("https://e.com/a.gif")));

    assert_eq!(bot.handle(groupchat("Svensson hi")).await, Outcome::Abandoned);
    assert_eq!(bot.handle(groupchat("Svensson gif cats")).await, Outcome::Abandoned);

    let source = ScriptedSource::new(vec![groupchat("Svensson hi"), groupchat("Svensson hi")]);
    let result = bot.run(&source, CancellationToken::new()).await;
    // Only the exhausted source ends the loop.
    assert!(matches!(result, Err(BotError::TransportFatal(_))));
}

#[tokio::test]
async fn test_run_handles_events_in_order_until_transport_fault() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink.clone(), Arc::new(StubResolver::returning("https://e.com/a.gif?rid=1")));

    let source = ScriptedSource::new(vec![
        InboundEvent::presence(ALICE, PresenceShow::Online),
        groupchat("Svensson hi"),
        groupchat("not for the bot"),
        groupchat("Svensson gif cats"),
        groupchat("Svensson what"),
    ]);

    let result = bot.run(&source, CancellationToken::new()).await;
    assert!(matches!(result, Err(BotError::TransportFatal(_))));

    let sent = sink.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], Sent::Plain(OutboundMessage::new(ROOM, MessageKind::GroupChat, "Hi!")));
    assert!(matches!(&sent[1], Sent::Raw(s) if url_of(s) == "https://e.com/a.gif"));
    assert_eq!(sent[2], Sent::Plain(OutboundMessage::new(ROOM, MessageKind::GroupChat, "What?")));
}

/// Never yields an event
struct SilentSource;

#[async_trait]
impl EventSource for SilentSource {
    async fn receive(&self) -> Result<InboundEvent, BotError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_cancel_stops_blocked_receive() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let bot = dispatcher(sink, Arc::new(StubResolver::returning("https://e.com/a.gif")));

    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        stopper.cancel();
    });

    assert!(bot.run(&SilentSource, cancel).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dispatcher_and_reminders_share_outbox() {
    ensure_init();
    let sink = Arc::new(RecordingSink::default());
    let (outbox, _writer) = Outbox::spawn(sink.clone(), 4);
    let shared: Arc<dyn StanzaSink> = Arc::new(outbox);

    let bot = EventDispatcher::new(
        "Svensson",
        CommandTable::standard(),
        Arc::new(StubResolver::returning("https://e.com/a.gif?x=1")),
        MessageService::new(shared.clone()),
    );
    let reminders = MessageService::new(shared.clone());

    let chat = tokio::spawn(async move {
        for _ in 0..20 {
            bot.handle(groupchat("Svensson gif cats")).await;
        }
    });
    let remind = tokio::spawn(async move {
        for i in 0..20 {
            reminders
                .respond("alice@example.org", MessageKind::Chat, &format!("Reminder {}", i))
                .await
                .unwrap();
        }
    });
    chat.await.unwrap();
    remind.await.unwrap();

    let sent = sink.sent();
    assert_eq!(sent.len(), 40);
    assert_eq!(sent.iter().filter(|s| matches!(s, Sent::Raw(_))).count(), 20);
    for s in sent {
        if let Sent::Raw(stanza) = s {
            assert!(stanza.ends_with("</message>"));
            assert_eq!(url_of(&stanza), "https://e.com/a.gif");
        }
    }
}
