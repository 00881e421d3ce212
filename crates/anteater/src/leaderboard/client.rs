use anteater_helpers::platform;
use anteater_helpers::storage::{self, StorageScope};
use bevy::prelude::*;

use super::{
    ANONYMOUS, Leaderboard, LeaderboardError, LeaderboardEntry, SessionKey, SessionRecord,
    SubmitOutcome,
};
use crate::core::{GameRng, SaveScoreRequested, Score};
use crate::host_bridge::{GameMessage, HostMessage, send_game_message};

pub const LEADERBOARD_KEY: &str = "anteater.leaderboard";
pub const SESSION_KEY: &str = "anteater.session";
/// Best score of the session, kept beside its key so a reload still only accepts improvements.
pub const SESSION_BEST_KEY: &str = "anteater.session_best";
pub const PLAYER_NAME_KEY: &str = "anteater.player_name";

pub const ZERO_SCORE_NOTICE: &str = "Eat some ants first!";

/// Where submitted scores go.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeaderboardBackend {
    /// Kept in browser storage or a local file.
    #[default]
    Local,
    /// Owned by the host page, which pushes snapshots back.
    Remote,
}

/// Last name typed into the save prompt.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(pub String);

impl Default for PlayerName {
    fn default() -> Self {
        Self(ANONYMOUS.to_string())
    }
}

pub struct LeaderboardPlugin;

impl Plugin for LeaderboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Leaderboard>()
            .init_resource::<LeaderboardBackend>()
            .init_resource::<PlayerName>()
            .add_event::<SaveScoreRequested>()
            .add_systems(Startup, restore_leaderboard)
            .add_systems(Update, (apply_host_messages, save_score).chain());
    }
}

/// Message shown after a save attempt, if any.
pub fn save_notice(result: &Result<SubmitOutcome, LeaderboardError>) -> Option<String> {
    match result {
        Err(LeaderboardError::ZeroScore) => Some(ZERO_SCORE_NOTICE.to_string()),
        Ok(SubmitOutcome::NotImproved { previous }) => Some(format!(
            "Your best score of {previous} still stands. Eat more ants to beat it!"
        )),
        Ok(SubmitOutcome::Recorded { .. } | SubmitOutcome::OutOfRanking) => None,
    }
}

fn load_or_default<T: serde::de::DeserializeOwned + Default>(scope: StorageScope, key: &str) -> T {
    match storage::load_json(scope, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            warn!("Could not restore {key}: {err}");
            T::default()
        }
    }
}

/// Reloads the tab's session, or starts a new one. Slots are the session storage keys.
fn restore_session(key_slot: &str, best_slot: &str, rng: &mut fastrand::Rng) -> SessionRecord {
    match storage::load_string(StorageScope::Session, key_slot) {
        Ok(Some(key)) if !key.is_empty() => {
            let best = load_or_default::<Option<u64>>(StorageScope::Session, best_slot);
            return SessionRecord {
                key: SessionKey(key),
                best,
            };
        }
        Ok(_) => {}
        Err(err) => warn!("Could not read session key: {err}"),
    }

    let key = SessionKey::generate(rng);
    if let Err(err) = storage::save_string(StorageScope::Session, key_slot, &key.0) {
        warn!("Could not keep session key: {err}");
    }
    SessionRecord::new(key)
}

fn remember_session_best(best_slot: &str, record: &SessionRecord) {
    if let Err(err) = storage::save_json(StorageScope::Session, best_slot, &record.best) {
        warn!("Could not keep session best: {err}");
    }
}

fn restore_leaderboard(mut commands: Commands, mut rng: ResMut<GameRng>) {
    let board: Leaderboard = load_or_default(StorageScope::Local, LEADERBOARD_KEY);
    let board = Leaderboard::from_entries(board.entries().to_vec());
    let name = storage::load_string(StorageScope::Local, PLAYER_NAME_KEY)
        .ok()
        .flatten()
        .map_or_else(PlayerName::default, PlayerName);
    let record = restore_session(SESSION_KEY, SESSION_BEST_KEY, &mut rng.0);

    info!(
        "Leaderboard restored with {} entries, session {} (best {:?})",
        board.entries().len(),
        record.key,
        record.best
    );
    commands.insert_resource(board);
    commands.insert_resource(name);
    commands.insert_resource(record);
}

fn apply_host_messages(
    mut messages: EventReader<HostMessage>,
    mut backend: ResMut<LeaderboardBackend>,
    mut board: ResMut<Leaderboard>,
) {
    for message in messages.read() {
        if *backend != LeaderboardBackend::Remote {
            info!("Host page keeps the leaderboard from now on");
            *backend = LeaderboardBackend::Remote;
        }
        match message {
            HostMessage::Hello => {}
            HostMessage::LeaderboardSnapshot(entries) => board.replace(entries.clone()),
        }
    }
}

fn publish(entry: LeaderboardEntry, board: &Leaderboard, backend: LeaderboardBackend) {
    match backend {
        LeaderboardBackend::Remote => send_game_message(GameMessage::SubmitScore(entry)),
        LeaderboardBackend::Local => {
            if let Err(err) = storage::save_json(StorageScope::Local, LEADERBOARD_KEY, board) {
                warn!("Could not persist leaderboard: {err}");
            }
        }
    }
}

fn save_score(
    mut requests: EventReader<SaveScoreRequested>,
    score: Res<Score>,
    backend: Res<LeaderboardBackend>,
    mut board: ResMut<Leaderboard>,
    mut record: ResMut<SessionRecord>,
    mut player_name: ResMut<PlayerName>,
) {
    // Several clicks in one frame still mean one save.
    if requests.read().count() == 0 {
        return;
    }

    if score.0 == 0 {
        platform::alert(ZERO_SCORE_NOTICE);
        return;
    }
    let Some(name) = platform::prompt("Name for the leaderboard:", &player_name.0) else {
        debug!("Save cancelled");
        return;
    };

    let result = record.save(&mut board, &name, score.0, platform::now_millis());
    let outcome = result.as_ref().map(|(outcome, _)| *outcome).map_err(|err| *err);
    if let Some(notice) = save_notice(&outcome) {
        platform::alert(&notice);
    }

    let Ok((outcome, entry)) = result else {
        return;
    };
    if matches!(outcome, SubmitOutcome::NotImproved { .. }) {
        return;
    }

    info!("Saved score {} for {} ({outcome:?})", entry.score, entry.name);
    remember_session_best(SESSION_BEST_KEY, &record);
    if player_name.0 != entry.name {
        player_name.0.clone_from(&entry.name);
        if let Err(err) = storage::save_string(StorageScope::Local, PLAYER_NAME_KEY, &entry.name) {
            warn!("Could not remember player name: {err}");
        }
    }
    publish(entry, &board, *backend);
}
