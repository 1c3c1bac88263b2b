use serde::{de::IgnoredAny, Deserialize};

use crate::webhooks::bitbucket::events::{nullable, Repository, User};

#[derive(Debug, Default, Deserialize)]
pub struct RepoPushEvent {
    #[serde(default, deserialize_with = "nullable")]
    pub actor: User,
    #[serde(default, deserialize_with = "nullable")]
    pub repository: Repository,
    #[serde(default, deserialize_with = "nullable")]
    pub push: Push,
}

#[derive(Debug, Default, Deserialize)]
pub struct Push {
    #[serde(default, deserialize_with = "nullable")]
    pub changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Change {
    /// State of the ref after the push, empty when it was deleted
    #[serde(default, deserialize_with = "nullable")]
    pub new: RefState,
    #[serde(default, deserialize_with = "nullable")]
    pub commits: Vec<IgnoredAny>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefState {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// `branch`, `tag`...
    #[serde(default, deserialize_with = "nullable", rename = "type")]
    pub kind: String,
}
