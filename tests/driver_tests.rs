//! The driver task on a paused tokio clock: real delays, no real waiting.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    init_logging, mismatch, pairs, FlakyStore, RecordingAudio, RecordingHaptics, SlowStore,
};
use memo_match::services::{HapticPulse, Sound, RETRY_FAILED_MESSAGE};
use memo_match::{
    CardFace, EngineConfig, ErrorKind, FlipOutcome, FlipRejection, GameDriver, GameHandle,
    GameSettings, GameStats, MemoryStore, PlayerId, Services, StorageKey, Theme, UiEvent,
};
use tokio::sync::broadcast;
use tokio::time::sleep;

fn config() -> EngineConfig {
    EngineConfig::default().with_seed(77)
}

async fn spawn(services: Services) -> GameHandle {
    init_logging();
    let handle = GameDriver::spawn(config(), services);
    // Queued behind startup, so the stored state is loaded when this returns.
    handle.snapshot().await.expect("driver running");
    handle
}

/// Next event matching `pick`, skipping the rest.
async fn next_event<T>(
    events: &mut broadcast::Receiver<UiEvent>,
    mut pick: impl FnMut(UiEvent) -> Option<T>,
) -> T {
    loop {
        let event = events.recv().await.expect("driver still running");
        if let Some(found) = pick(event) {
            return found;
        }
    }
}

// =============================================================================
// Mismatch delay
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_mismatch_conceals_after_delay() {
    let handle = spawn(Services::in_memory()).await;
    handle.apply_settings(GameSettings::new(2, Theme::Animals)).await.unwrap();
    let [a, b] = mismatch(&handle.snapshot().await.unwrap().cards);

    handle.flip_card(a).await.unwrap();
    let outcome = handle.flip_card(b).await.unwrap();
    assert!(matches!(outcome, FlipOutcome::Mismatched { .. }));

    sleep(Duration::from_millis(900)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.selection.as_slice(), &[a, b]);
    assert_eq!(snap.current_player_index, 0);

    sleep(Duration::from_millis(200)).await;
    let snap = handle.snapshot().await.unwrap();
    assert!(snap.selection.is_empty());
    assert_eq!(snap.cards[a].face, CardFace::Hidden);
    assert_eq!(snap.cards[b].face, CardFace::Hidden);
    assert_eq!(snap.current_player_index, 1);
}

#[tokio::test(start_paused = true)]
async fn test_third_flip_during_delay_is_rejected() {
    let handle = spawn(Services::in_memory()).await;
    let [a, b] = mismatch(&handle.snapshot().await.unwrap().cards);
    let third = (0..20).find(|i| *i != a && *i != b).unwrap();

    handle.flip_card(a).await.unwrap();
    handle.flip_card(b).await.unwrap();
    sleep(Duration::from_millis(400)).await;

    assert_eq!(
        handle.flip_card(third).await,
        Some(FlipOutcome::Ignored(FlipRejection::SelectionFull))
    );

    sleep(Duration::from_millis(1000)).await;
    let snap = handle.snapshot().await.unwrap();
    assert!(snap.cards.iter().all(|c| c.face == CardFace::Hidden));
}

/// A roll-back scheduled before a reset must not touch the new session.
#[tokio::test(start_paused = true)]
async fn test_stale_conceal_after_reset() {
    let handle = spawn(Services::in_memory()).await;
    handle.apply_settings(GameSettings::new(2, Theme::Food)).await.unwrap();

    let [a, b] = mismatch(&handle.snapshot().await.unwrap().cards);
    handle.flip_card(a).await.unwrap();
    handle.flip_card(b).await.unwrap();

    handle.reset_game().await.unwrap();
    sleep(Duration::from_millis(600)).await;

    let [c, d] = mismatch(&handle.snapshot().await.unwrap().cards);
    handle.flip_card(c).await.unwrap();
    handle.flip_card(d).await.unwrap();

    // The old timer has fired by now; the new pair is still up.
    sleep(Duration::from_millis(500)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.selection.as_slice(), &[c, d]);
    assert_eq!(snap.current_player_index, 0);

    sleep(Duration::from_millis(600)).await;
    let snap = handle.snapshot().await.unwrap();
    assert!(snap.selection.is_empty());
    assert_eq!(snap.current_player_index, 1);
}

// =============================================================================
// Feedback
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_sounds_haptics_and_events() {
    let audio = RecordingAudio::default();
    let haptics = RecordingHaptics::default();
    let services = Services::in_memory()
        .with_audio(Arc::new(audio.clone()))
        .with_haptics(Arc::new(haptics.clone()));
    let handle = spawn(services).await;
    handle.apply_settings(GameSettings::new(2, Theme::Animals)).await.unwrap();
    let mut events = handle.events();

    let cards = handle.snapshot().await.unwrap().cards;
    let [a, b] = pairs(&cards)[0];
    handle.flip_card(a).await.unwrap();
    handle.flip_card(b).await.unwrap();

    assert_eq!(
        next_event(&mut events, |e| match e {
            UiEvent::Matched { pair, player, score } => Some((pair, player, score)),
            _ => None,
        })
        .await,
        ([a, b], PlayerId::new(1), 1)
    );
    assert_eq!(audio.played(), vec![Sound::Flip, Sound::Flip, Sound::Match]);
    assert_eq!(haptics.pulses(), vec![HapticPulse::Match]);
}

#[tokio::test(start_paused = true)]
async fn test_mismatch_events() {
    let haptics = RecordingHaptics::default();
    let handle = spawn(Services::in_memory().with_haptics(Arc::new(haptics.clone()))).await;
    handle.apply_settings(GameSettings::new(3, Theme::Animals)).await.unwrap();
    let mut events = handle.events();

    let [a, b] = mismatch(&handle.snapshot().await.unwrap().cards);
    handle.flip_card(a).await.unwrap();
    handle.flip_card(b).await.unwrap();

    let mismatched = next_event(&mut events, |e| match e {
        UiEvent::Mismatched { pair } => Some(pair),
        _ => None,
    })
    .await;
    assert_eq!(mismatched, [a, b]);
    assert_eq!(haptics.pulses(), vec![HapticPulse::Mismatch]);

    let concealed = next_event(&mut events, |e| match e {
        UiEvent::Concealed { pair, next_player } => Some((pair, next_player)),
        _ => None,
    })
    .await;
    assert_eq!(concealed, ([a, b], 1));
}

// =============================================================================
// Completion
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_solo_new_best_time() {
    let audio = RecordingAudio::default();
    let store = MemoryStore::with_entries([(
        "memo-game-stats",
        r#"{"bestTime":30000,"lastGameTime":45000}"#,
    )]);
    let services = Services::new(Arc::new(store.clone())).with_audio(Arc::new(audio.clone()));
    let handle = spawn(services).await;
    let mut events = handle.events();

    sleep(Duration::from_millis(20_500)).await;
    for [a, b] in pairs(&handle.snapshot().await.unwrap().cards) {
        handle.flip_card(a).await.unwrap();
        handle.flip_card(b).await.unwrap();
    }

    let duration = next_event(&mut events, |e| match e {
        UiEvent::GameOver { duration, .. } => Some(duration),
        _ => None,
    })
    .await;
    assert!(duration >= Duration::from_millis(20_500));

    let (is_new_best, stats, previous_best) = next_event(&mut events, |e| match e {
        UiEvent::BestTime {
            is_new_best,
            stats,
            previous_best,
            ..
        } => Some((is_new_best, stats, previous_best)),
        _ => None,
    })
    .await;
    assert!(is_new_best);
    assert_eq!(previous_best, Some(Duration::from_secs(30)));
    assert_eq!(
        stats,
        GameStats {
            best_time: Some(duration),
            last_game_time: Some(duration),
        }
    );

    let snap = handle.snapshot().await.unwrap();
    assert!(snap.is_over());
    assert_eq!(snap.is_new_best, Some(true));
    assert!(snap.celebrating);
    assert_eq!(audio.played().last(), Some(&Sound::Victory));

    // The clock stays frozen.
    sleep(Duration::from_secs(30)).await;
    assert_eq!(handle.snapshot().await.unwrap().elapsed, duration);

    // Celebration ended on its own.
    assert!(!handle.snapshot().await.unwrap().celebrating);
}

#[tokio::test(start_paused = true)]
async fn test_solo_slower_game_no_victory() {
    let audio = RecordingAudio::default();
    let store = MemoryStore::with_entries([("memo-game-stats", r#"{"bestTime":10000}"#)]);
    let services = Services::new(Arc::new(store)).with_audio(Arc::new(audio.clone()));
    let handle = spawn(services).await;
    let mut events = handle.events();

    sleep(Duration::from_secs(25)).await;
    for [a, b] in pairs(&handle.snapshot().await.unwrap().cards) {
        handle.flip_card(a).await.unwrap();
        handle.flip_card(b).await.unwrap();
    }

    let (is_new_best, stats) = next_event(&mut events, |e| match e {
        UiEvent::BestTime { is_new_best, stats, .. } => Some((is_new_best, stats)),
        _ => None,
    })
    .await;
    assert!(!is_new_best);
    assert_eq!(stats.best_time, Some(Duration::from_secs(10)));
    assert!(!audio.played().contains(&Sound::Victory));
    assert!(!handle.snapshot().await.unwrap().celebrating);
}

// =============================================================================
// Settings, names, storage failures
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_rename_is_persisted() {
    let store = MemoryStore::new();
    let handle = spawn(Services::new(Arc::new(store.clone()))).await;
    handle.apply_settings(GameSettings::new(2, Theme::Food)).await.unwrap();

    assert_eq!(
        handle.edit_player_name(PlayerId::new(2), "Grace").await.as_deref(),
        Some("Grace")
    );
    assert_eq!(handle.edit_player_name(PlayerId::new(2), "   ").await, None);
    assert_eq!(handle.edit_player_name(PlayerId::new(4), "Nobody").await, None);

    // Let the background writes land.
    sleep(Duration::from_millis(10)).await;
    handle.snapshot().await.unwrap();
    assert_eq!(
        store.raw("memo-game-settings").await.as_deref(),
        Some(r#"{"playerCount":2,"cardTheme":"Food"}"#)
    );
    assert!(store
        .raw("memo-game-players")
        .await
        .is_some_and(|raw| raw.contains(r#""name":"Grace""#)));
    assert_eq!(handle.snapshot().await.unwrap().players[1].name, "Grace");
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_retry_succeeds() {
    let store = FlakyStore::new();
    store.fail_writes(true);
    let handle = spawn(Services::new(Arc::new(store.clone()))).await;
    let mut events = handle.events();

    handle.edit_player_name(PlayerId::new(1), "Ada").await.unwrap();
    let notice = next_event(&mut events, |e| match e {
        UiEvent::Notice(notice) => Some(notice),
        _ => None,
    })
    .await;
    assert_eq!(notice.kind, ErrorKind::Storage);
    assert!(notice.can_retry());

    // The game itself went ahead.
    assert_eq!(handle.snapshot().await.unwrap().players[0].name, "Ada");

    store.fail_writes(false);
    assert!(handle.retry(&notice));
    let key = next_event(&mut events, |e| match e {
        UiEvent::Saved { key } => Some(key),
        _ => None,
    })
    .await;
    assert_eq!(key, StorageKey::Players);
    assert!(store.inner.raw("memo-game-players").await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_failed_retry_gives_up() {
    let store = FlakyStore::new();
    store.fail_writes(true);
    let handle = spawn(Services::new(Arc::new(store.clone()))).await;
    let mut events = handle.events();

    handle.apply_settings(GameSettings::new(2, Theme::Random)).await.unwrap();
    let notice = next_event(&mut events, |e| match e {
        UiEvent::Notice(notice) => Some(notice),
        _ => None,
    })
    .await;
    assert!(handle.retry(&notice));

    let last = next_event(&mut events, |e| match e {
        UiEvent::Notice(notice) => Some(notice),
        _ => None,
    })
    .await;
    assert_eq!(last.message, RETRY_FAILED_MESSAGE);
    assert!(!last.can_retry());
    assert!(!handle.retry(&last));
}

#[tokio::test(start_paused = true)]
async fn test_reset_all_data_through_driver() {
    let store = MemoryStore::with_entries([
        ("memo-game-settings", r#"{"playerCount":3,"cardTheme":"Food"}"#),
        ("memo-game-stats", r#"{"bestTime":30000}"#),
    ]);
    let handle = spawn(Services::new(Arc::new(store.clone()))).await;
    assert_eq!(handle.snapshot().await.unwrap().players.len(), 3);
    let mut events = handle.events();

    handle.reset_all_data().await.unwrap();

    assert!(store.is_empty().await);
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.settings, GameSettings::new(1, Theme::Animals));
    assert_eq!(snap.stats, GameStats::default());
    assert_eq!(snap.players.len(), 1);
    assert_eq!(events.recv().await.unwrap(), UiEvent::DataReset);
}

#[tokio::test(start_paused = true)]
async fn test_reset_all_data_failure_is_reported() {
    let store = FlakyStore::new();
    let handle = spawn(Services::new(Arc::new(store.clone()))).await;
    handle.apply_settings(GameSettings::new(2, Theme::Food)).await.unwrap();
    let generation = handle.snapshot().await.unwrap().generation;
    store.fail_writes(true);

    let error = handle.reset_all_data().await.expect_err("remove fails");
    assert!(error.is_storage());
    assert_eq!(handle.snapshot().await.unwrap().generation, generation);
    assert_eq!(handle.snapshot().await.unwrap().settings.player_count, 2);
}

/// A solo stats sequence still in flight when the data is wiped lands before
/// the wipe and never reappears afterwards.
#[tokio::test(start_paused = true)]
async fn test_reset_waits_for_stats_sequence() {
    let store = SlowStore::new(Duration::from_millis(200));
    let handle = spawn(Services::new(Arc::new(store.clone()))).await;
    let mut events = handle.events();

    sleep(Duration::from_secs(5)).await;
    for [a, b] in pairs(&handle.snapshot().await.unwrap().cards) {
        handle.flip_card(a).await.unwrap();
        handle.flip_card(b).await.unwrap();
    }
    handle.reset_all_data().await.unwrap();

    sleep(Duration::from_secs(1)).await;
    let snap = handle.snapshot().await.unwrap();
    assert!(store.inner.is_empty().await);
    assert_eq!(snap.stats, GameStats::default());
    assert_eq!(snap.is_new_best, None);
    assert!(!snap.celebrating);

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen.contains(&UiEvent::DataReset));
    assert!(!seen.iter().any(|e| matches!(e, UiEvent::BestTime { .. })));
    assert!(!seen.iter().any(|e| matches!(e, UiEvent::Notice(_))));
}

/// Settings and names written just before a wipe do not survive it.
#[tokio::test(start_paused = true)]
async fn test_reset_waits_for_pending_writes() {
    let store = SlowStore::new(Duration::from_millis(200));
    let handle = spawn(Services::new(Arc::new(store.clone()))).await;

    handle.apply_settings(GameSettings::new(3, Theme::Food)).await.unwrap();
    handle.edit_player_name(PlayerId::new(2), "Grace").await.unwrap();
    handle.reset_all_data().await.unwrap();

    sleep(Duration::from_secs(1)).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(store.inner.raw("memo-game-settings").await, None);
    assert_eq!(store.inner.raw("memo-game-players").await, None);
    assert_eq!(snap.settings, GameSettings::default());
    assert_eq!(snap.players.len(), 1);
}

/// Shutdown lets background writes finish.
#[tokio::test(start_paused = true)]
async fn test_shutdown_flushes_writes() {
    let store = SlowStore::new(Duration::from_millis(200));
    let handle = spawn(Services::new(Arc::new(store.clone()))).await;

    handle.edit_player_name(PlayerId::new(1), "Ada").await.unwrap();
    handle.shutdown();
    sleep(Duration::from_secs(1)).await;

    assert!(handle.is_closed());
    assert!(store
        .inner
        .raw("memo-game-players")
        .await
        .is_some_and(|raw| raw.contains(r#""name":"Ada""#)));
}

#[tokio::test(start_paused = true)]
async fn test_closed_driver() {
    let handle = spawn(Services::in_memory()).await;
    handle.shutdown();
    // Let the task exit.
    sleep(Duration::from_millis(1)).await;

    assert!(handle.is_closed());
    assert_eq!(handle.flip_card(0).await, None);
    let error = handle.reset_all_data().await.expect_err("stopped");
    assert!(error.is_game_state());
}
