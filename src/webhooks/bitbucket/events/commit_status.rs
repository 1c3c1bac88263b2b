use serde::Deserialize;

use crate::webhooks::bitbucket::events::{nullable, Repository, User};

#[derive(Debug, Default, Deserialize)]
pub struct RepoCommitStatusUpdatedEvent {
    #[serde(default, deserialize_with = "nullable")]
    pub repository: Repository,
    #[serde(default, deserialize_with = "nullable")]
    pub commit_status: CommitStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitStatus {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// `SUCCESSFUL`, `FAILED`, `INPROGRESS` or `STOPPED`
    #[serde(default, deserialize_with = "nullable")]
    pub state: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub commit: StatusCommit,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusCommit {
    #[serde(default, deserialize_with = "nullable")]
    pub author: CommitAuthor,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitAuthor {
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,
}
