//! Tests for [`assistant::AssistantOrchestrator::reply`]: grounding, memory, fallbacks, ordering.
//!
//! External interactions: none. Catalog source and completion client are in-process fakes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assistant::{AssistantOrchestrator, SERVICE_ERROR_REPLY, TRANSPORT_ERROR_REPLY};
use common::{cache_with, mouse_listing, product, FakeLlm, FixedSource, Scripted};
use memory_core::TurnRole;
use memory_inmemory::InMemoryConversationStore;
use prompt::{MessageRole, PromptComposer, MATCHES_HEADER};

fn orchestrator(source: Arc<FixedSource>, llm: Arc<FakeLlm>, max_turns: usize) -> AssistantOrchestrator {
    AssistantOrchestrator::new(
        cache_with(source),
        Arc::new(InMemoryConversationStore::new(max_turns)),
        llm,
        PromptComposer::default(),
    )
}

/// **Test: "busco un mouse" sends system + grounded user turn and stores both turns.**
#[tokio::test]
async fn test_reply_grounds_user_turn_and_stores_exchange() {
    let source = Arc::new(FixedSource::ok(mouse_listing()));
    let llm = Arc::new(FakeLlm::new(Scripted::Reply("Tenemos el Mouse USB Gamer".to_string())));
    let bot = orchestrator(source, llm.clone(), 10);

    let reply = bot.reply("5491100000000", "busco un mouse").await;
    assert_eq!(reply, "Tenemos el Mouse USB Gamer");

    let request = llm.request(0);
    assert_eq!(request.len(), 2);
    assert_eq!(request[0].role, MessageRole::System);
    assert!(request[0].content.contains("- Perifericos (1 productos)"));
    assert_eq!(request[1].role, MessageRole::User);
    assert!(request[1].content.starts_with("busco un mouse\n\n"));
    assert!(request[1].content.contains(MATCHES_HEADER));
    assert!(request[1].content.contains("• Mouse USB Gamer | $1,500 | ✅ 3 en stock"));

    let history = bot.store().history("5491100000000").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, TurnRole::User);
    assert!(history[0].content.contains("🔗 https://www.novacenter.ar/tienda/?producto=A1"));
    assert_eq!(history[1].role, TurnRole::Assistant);
    assert_eq!(history[1].content, "Tenemos el Mouse USB Gamer");
}

/// **Test: A greeting with no matches carries the negative sentence, not an empty block.**
#[tokio::test]
async fn test_reply_without_matches_states_nothing_found() {
    let source = Arc::new(FixedSource::ok(mouse_listing()));
    let llm = Arc::new(FakeLlm::new(Scripted::Reply("¡Hola!".to_string())));
    let bot = orchestrator(source, llm.clone(), 10);

    bot.reply("u1", "hola").await;

    let user_turn = &llm.request(0)[1].content;
    assert_eq!(
        user_turn,
        "hola\n\n📦 No encontré productos que coincidan con \"hola\" en el catálogo."
    );
}

/// **Test: A service error object yields the service fallback; no assistant turn is stored.**
#[tokio::test]
async fn test_service_error_uses_service_fallback() {
    let source = Arc::new(FixedSource::ok(mouse_listing()));
    let llm = Arc::new(FakeLlm::new(Scripted::ServiceError));
    let bot = orchestrator(source, llm, 10);

    let reply = bot.reply("u1", "busco un mouse").await;
    assert_eq!(reply, SERVICE_ERROR_REPLY);

    let history = bot.store().history("u1").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].role, TurnRole::User);
}

/// **Test: Timeouts and malformed responses yield the technical fallback.**
#[tokio::test]
async fn test_transport_and_malformed_use_transport_fallback() {
    for script in [Scripted::TransportError, Scripted::Malformed] {
        let source = Arc::new(FixedSource::ok(mouse_listing()));
        let llm = Arc::new(FakeLlm::new(script));
        let bot = orchestrator(source, llm, 10);

        let reply = bot.reply("u1", "busco un mouse").await;
        assert_eq!(reply, TRANSPORT_ERROR_REPLY);
        assert!(bot
            .store()
            .history("u1")
            .await
            .unwrap()
            .iter()
            .all(|t| t.role == TurnRole::User));
    }
}

/// **Test: An unreachable catalog still produces a reply, grounded with the no-matches sentence.**
#[tokio::test]
async fn test_unavailable_catalog_still_replies() {
    let source = Arc::new(FixedSource::failing());
    let llm = Arc::new(FakeLlm::new(Scripted::Reply("Escribinos".to_string())));
    let bot = orchestrator(source, llm.clone(), 10);

    let reply = bot.reply("u1", "busco un mouse").await;
    assert_eq!(reply, "Escribinos");
    assert!(llm.request(0)[1].content.contains("No encontré productos"));
}

/// **Test: Only the last `max_turns` turns are sent after the system message.**
#[tokio::test]
async fn test_history_is_capped() {
    let source = Arc::new(FixedSource::ok(mouse_listing()));
    let llm = Arc::new(FakeLlm::new(Scripted::Reply("ok".to_string())));
    let bot = orchestrator(source, llm.clone(), 4);

    bot.reply("u1", "uno").await;
    bot.reply("u1", "dos").await;
    bot.reply("u1", "tres").await;

    let third = llm.request(2);
    assert_eq!(third.len(), 5);
    assert_eq!(third[0].role, MessageRole::System);
    assert_eq!(third[1].role, MessageRole::Assistant);
    assert!(third[2].content.starts_with("dos"));
    assert!(third[4].content.starts_with("tres"));
    assert_eq!(bot.store().history("u1").await.unwrap().len(), 4);
}

/// **Test: The system message is rebuilt from the current snapshot on every message.**
#[tokio::test]
async fn test_system_prompt_follows_refreshed_catalog() {
    let source = Arc::new(FixedSource::ok(mouse_listing()));
    let llm = Arc::new(FakeLlm::new(Scripted::Reply("ok".to_string())));
    let bot = orchestrator(source.clone(), llm.clone(), 10);

    bot.reply("u1", "hola").await;
    source.set_listing(vec![
        product("A1", "mouse usb gamer", "Perifericos>Mouse", 1500.0, 3),
        product("B7", "auricular bluetooth", "Audio>Auriculares", 9999.5, 0),
    ]);
    assert!(bot.catalog().refresh().await);
    bot.reply("u1", "hola de nuevo").await;

    assert!(!llm.request(0)[0].content.contains("- Audio"));
    let system = &llm.request(1)[0].content;
    assert!(system.contains("- Perifericos (1 productos)"));
    assert!(system.contains("- Audio (1 productos)"));
}

/// **Test: Two messages from one user are answered in arrival order, never interleaved.**
#[tokio::test(start_paused = true)]
async fn test_same_user_messages_are_serialized() {
    let source = Arc::new(FixedSource::ok(mouse_listing()));
    let llm = Arc::new(FakeLlm::new(Scripted::EchoAfter(Duration::from_secs(2))));
    let bot = orchestrator(source, llm.clone(), 10);

    let (first, second) = tokio::join!(bot.reply("u1", "primero"), bot.reply("u1", "segundo"));
    assert_eq!(first, "eco: primero");
    assert_eq!(second, "eco: segundo");

    // The second request already sees the first exchange.
    let second_request = llm.request(1);
    assert_eq!(second_request.len(), 4);
    assert_eq!(second_request[2].content, "eco: primero");

    let roles: Vec<TurnRole> = bot
        .store()
        .history("u1")
        .await
        .unwrap()
        .iter()
        .map(|t| t.role)
        .collect();
    assert_eq!(
        roles,
        vec![TurnRole::User, TurnRole::Assistant, TurnRole::User, TurnRole::Assistant]
    );
}

/// **Test: Different users do not wait for each other.**
#[tokio::test(start_paused = true)]
async fn test_different_users_run_concurrently() {
    let source = Arc::new(FixedSource::ok(mouse_listing()));
    let llm = Arc::new(FakeLlm::new(Scripted::EchoAfter(Duration::from_secs(5))));
    let bot = orchestrator(source, llm.clone(), 10);

    let started = tokio::time::Instant::now();
    let (a, b) = tokio::join!(bot.reply("u1", "hola"), bot.reply("u2", "hola"));
    assert_eq!(a, "eco: hola");
    assert_eq!(b, "eco: hola");
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(llm.request_count(), 2);
    assert_eq!(bot.store().history("u2").await.unwrap().len(), 2);
}

/// **Test: Turns reserved in arrival order are answered in that order even when each runs in its
/// own task on a multi-thread runtime.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reserved_turns_keep_arrival_order_across_tasks() {
    for _ in 0..100 {
        let source = Arc::new(FixedSource::ok(mouse_listing()));
        let llm = Arc::new(FakeLlm::new(Scripted::Reply("ok".to_string())));
        let bot = Arc::new(orchestrator(source, llm, 10));

        let handles: Vec<_> = ["primero", "segundo", "tercero"]
            .into_iter()
            .map(|text| {
                let mut slot = bot.reserve("u1");
                let bot = bot.clone();
                tokio::spawn(async move { bot.reply_in_turn(&mut slot, "u1", text).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let asked: Vec<String> = bot
            .store()
            .history("u1")
            .await
            .unwrap()
            .iter()
            .filter(|t| t.role == TurnRole::User)
            .map(|t| t.content.lines().next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(asked, vec!["primero", "segundo", "tercero"]);
    }
}

/// **Test: A later-reserved turn polled first still waits for the earlier one.**
#[tokio::test]
async fn test_later_turn_waits_for_earlier_reservation() {
    let source = Arc::new(FixedSource::ok(mouse_listing()));
    let llm = Arc::new(FakeLlm::new(Scripted::EchoAfter(Duration::from_millis(20))));
    let bot = Arc::new(orchestrator(source, llm.clone(), 10));

    let mut first = bot.reserve("u1");
    let mut second = bot.reserve("u1");
    let late = {
        let bot = bot.clone();
        tokio::spawn(async move { bot.reply_in_turn(&mut second, "u1", "segundo").await })
    };
    tokio::task::yield_now().await;
    let early = bot.reply_in_turn(&mut first, "u1", "primero").await;
    drop(first);

    assert_eq!(early, "eco: primero");
    assert_eq!(late.await.unwrap(), "eco: segundo");
    assert_eq!(llm.request(0)[1].content.lines().next(), Some("primero"));
}
