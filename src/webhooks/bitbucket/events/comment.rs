use serde::Deserialize;

use crate::webhooks::bitbucket::events::{nullable, HtmlLinks, PullRequest, Repository, User};

/// Payload of `pullrequest:comment_created`, `comment_updated` and `comment_deleted`.
#[derive(Debug, Default, Deserialize)]
pub struct PullRequestCommentEvent {
    #[serde(default, deserialize_with = "nullable")]
    pub actor: User,
    #[serde(default, deserialize_with = "nullable")]
    pub repository: Repository,
    #[serde(default, deserialize_with = "nullable", rename = "pullrequest")]
    pub pull_request: PullRequest,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: Comment,
}

#[derive(Debug, Default, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "nullable")]
    pub user: User,
    #[serde(default, deserialize_with = "nullable")]
    pub content: CommentContent,
    #[serde(default, deserialize_with = "nullable")]
    pub links: HtmlLinks,
}

impl Comment {
    pub fn html_url(&self) -> &str {
        &self.links.html.href
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentContent {
    #[serde(default, deserialize_with = "nullable")]
    pub raw: String,
}
