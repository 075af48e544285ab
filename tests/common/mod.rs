//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use liars_dice::{
    EventLog, InMemoryStore, LoadedDice, PlayerId, Round, RoundKey, RoundSession, Seating,
};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub struct Table {
    pub session: RoundSession,
    pub store: Arc<InMemoryStore>,
    pub events: Arc<EventLog>,
}

/// A not-yet-started round for `dice_counts.len()` seats, seat 0 starting.
pub fn table(game: u64, dice_counts: &[u8]) -> Table {
    init_logging();
    let store = Arc::new(InMemoryStore::new());
    let events = Arc::new(EventLog::new());
    let seating = Seating::with_dice_counts(dice_counts).unwrap();
    let round = Round::new(RoundKey::new(game, 1), PlayerId(0));
    let session = RoundSession::new(round, seating, store.clone(), events.clone()).unwrap();
    Table {
        session,
        store,
        events,
    }
}

/// Two players, five dice each, every die showing 3, already started.
pub fn all_threes() -> Table {
    let mut t = table(1, &[5, 5]);
    t.session.start(&mut LoadedDice::new(&[3]).unwrap()).unwrap();
    t.events.drain();
    t
}
