//! `postMessage` channel to the page hosting the game.
//!
//! A host page that keeps a shared leaderboard announces itself with
//! `Hello` and then pushes snapshots. Without a host (native builds, or a
//! bare page) nothing ever arrives and the game keeps scores locally.

use std::sync::{Arc, LazyLock};

use bevy::prelude::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::MessageEvent;

use crate::leaderboard::LeaderboardEntry;

/// Messages the host page sends to the game.
#[derive(Event, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum HostMessage {
    Hello,
    LeaderboardSnapshot(Vec<LeaderboardEntry>),
}

/// Messages the game sends to the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum GameMessage {
    Ready,
    SubmitScore(LeaderboardEntry),
}

pub static HOST_MESSAGE_QUEUE: LazyLock<Arc<Mutex<Vec<HostMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

/// Outbox standing in for the host page natively.
#[cfg(not(target_arch = "wasm32"))]
pub static GAME_MESSAGE_QUEUE: LazyLock<Arc<Mutex<Vec<GameMessage>>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Vec::new())));

#[cfg(target_arch = "wasm32")]
fn listen_host_messages() {
    let Some(window) = web_sys::window() else {
        error!("No global window, host messages disabled");
        return;
    };
    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Pages post all sorts of things; only our own shapes are kept.
        match serde_wasm_bindgen::from_value::<HostMessage>(event.data()) {
            Ok(message) => HOST_MESSAGE_QUEUE.lock().push(message),
            Err(err) => debug!("Ignoring foreign message: {err}"),
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Err(err) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Could not listen for host messages: {err:?}");
        return;
    }

    closure.forget(); // Lives for the whole program.
}

#[cfg(not(target_arch = "wasm32"))]
pub fn send_game_message(message: GameMessage) {
    GAME_MESSAGE_QUEUE.lock().push(message);
}

#[cfg(target_arch = "wasm32")]
pub fn send_game_message(message: GameMessage) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(value) = serde_wasm_bindgen::to_value(&message) else {
        error!("Could not serialize {message:?}");
        return;
    };
    let Ok(Some(parent)) = window.parent() else {
        debug!("{message:?} not sent, no host page");
        return;
    };
    if let Err(err) = parent.post_message(&value, "*") {
        warn!("Could not post {message:?}: {err:?}");
    }
}

fn announce_ready() {
    send_game_message(GameMessage::Ready);
}

fn forward_host_messages(mut writer: EventWriter<HostMessage>) {
    let messages: Vec<_> = HOST_MESSAGE_QUEUE.lock().drain(..).collect();
    for message in messages {
        writer.send(message);
    }
}

pub struct HostBridgePlugin;

impl Plugin for HostBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HostMessage>()
            .add_systems(PreUpdate, forward_host_messages)
            .add_systems(PostStartup, announce_ready);
        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, listen_host_messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::SessionKey;

    #[test]
    fn messages_use_tagged_json() {
        let message = GameMessage::SubmitScore(LeaderboardEntry {
            name: "Ada".into(),
            score: 12,
            session: SessionKey("abc".into()),
            timestamp: 5,
        });
        let json = serde_json::to_value(&message).expect("serializable");
        assert_eq!(json["type"], "SubmitScore", "tag field");
        assert_eq!(json["payload"]["session"], "abc", "session key is a plain string");

        let hello: HostMessage =
            serde_json::from_str(r#"{ "type": "Hello" }"#).expect("unit variant parses");
        assert_eq!(hello, HostMessage::Hello, "hello");
    }
}
