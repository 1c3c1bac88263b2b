use serde::Deserialize;

use crate::webhooks::bitbucket::events::{nullable, HtmlLinks, Repository, User};

/// Payload shared by `pullrequest:created`, `updated`, `fulfilled` and `rejected`.
#[derive(Debug, Default, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default, deserialize_with = "nullable")]
    pub actor: User,
    #[serde(default, deserialize_with = "nullable")]
    pub repository: Repository,
    #[serde(default, deserialize_with = "nullable", rename = "pullrequest")]
    pub pull_request: PullRequest,
}

/// Payload of `pullrequest:approved` and `unapproved`.
#[derive(Debug, Default, Deserialize)]
pub struct PullRequestApprovalEvent {
    #[serde(default, deserialize_with = "nullable")]
    pub actor: User,
    #[serde(default, deserialize_with = "nullable")]
    pub repository: Repository,
    #[serde(default, deserialize_with = "nullable", rename = "pullrequest")]
    pub pull_request: PullRequest,
    #[serde(default, deserialize_with = "nullable")]
    pub approval: Approval,
}

#[derive(Debug, Default, Deserialize)]
pub struct Approval {
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    /// `OPEN`, `MERGED`, `DECLINED` or `SUPERSEDED`
    #[serde(default, deserialize_with = "nullable")]
    pub state: String,
    #[serde(default, deserialize_with = "nullable")]
    pub source: Endpoint,
    #[serde(default, deserialize_with = "nullable")]
    pub destination: Endpoint,
    #[serde(default, deserialize_with = "nullable")]
    pub author: User,
    #[serde(default, deserialize_with = "nullable")]
    pub closed_by: User,
    #[serde(default, deserialize_with = "nullable")]
    pub reviewers: Vec<User>,
    #[serde(default, deserialize_with = "nullable")]
    pub participants: Vec<Participant>,
    #[serde(default, deserialize_with = "nullable")]
    pub links: HtmlLinks,
}

impl PullRequest {
    pub fn html_url(&self) -> &str {
        &self.links.html.href
    }
}

/// One side of a pull request: the branch and the repository it lives in.
#[derive(Debug, Default, Deserialize)]
pub struct Endpoint {
    #[serde(default, deserialize_with = "nullable")]
    pub branch: Branch,
    #[serde(default, deserialize_with = "nullable")]
    pub repository: Repository,
}

#[derive(Debug, Default, Deserialize)]
pub struct Branch {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Participant {
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,
    #[serde(default, deserialize_with = "nullable")]
    pub approved: bool,
}
