use std::{collections::BTreeMap, path::PathBuf};

use anyhow::anyhow;
use matrix_sdk::ruma::RoomId;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::bot::DispatchOptions;

/// Name of the room used when no other room claims a repository.
const DEFAULT_ROOM: &str = "default";

#[derive(Clone, Debug, Deserialize)]
pub struct BitloloConfig {
    /// The URL for the homeserver we should connect to
    pub matrix_homeserver: Url,
    /// The bot's account username
    pub matrix_username: String,
    /// The bot's account password
    pub matrix_password: String,
    /// Path to a directory where the bot will store Matrix state and current session information.
    pub matrix_state_dir: PathBuf,
    /// Rooms the bot posts to, by name. The bot will only accept invitations to these rooms.
    pub matrix_rooms: BTreeMap<String, RoomConfig>,
    /// Secret shared with Bitbucket to sign webhook payloads. Unsigned payloads are accepted when
    /// this is missing.
    #[serde(default)]
    pub bitbucket_secret: Option<String>,
    /// Don't announce `repo:push` events at all
    #[serde(default)]
    pub skip_push_messages: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RoomConfig {
    pub id: RoomId,
    /// Repositories whose events go to this room
    #[serde(default, with = "serde_regex")]
    pub repos: Option<Regex>,
}

impl BitloloConfig {
    pub fn default_room(&self) -> anyhow::Result<&RoomId> {
        self.matrix_rooms
            .get(DEFAULT_ROOM)
            .map(|room| &room.id)
            .ok_or_else(|| anyhow!("no `{}` room configured", DEFAULT_ROOM))
    }

    /// Finds the first room (in name order) whose `repos` regex matches `repo`, falling back to
    /// the default room.
    pub fn find_room_for(&self, repo: &str) -> anyhow::Result<&RoomId> {
        let matching = self.matrix_rooms.values().find(|room| {
            room.repos
                .as_ref()
                .map_or(false, |regex| regex.is_match(repo))
        });

        match matching {
            Some(room) => Ok(&room.id),
            None => self.default_room(),
        }
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            skip_push_messages: self.skip_push_messages,
        }
    }
}
