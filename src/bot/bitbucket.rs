use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::{
    bot::{message::Message, Response},
    webhooks::bitbucket::nullable,
};

mod comment;
mod pull_request;
mod repo;

#[cfg(test)]
pub(crate) mod fixtures;

/// Knobs read by the formatters. Built from the configuration, never mutated by them.
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatchOptions {
    pub skip_push_messages: bool,
}

type Handler = fn(&[u8], &DispatchOptions) -> anyhow::Result<Option<Response>>;

/// Bitbucket events we know how to announce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Push,
    CommitStatusUpdated,
    PullRequestCreated,
    PullRequestUpdated,
    PullRequestApproved,
    PullRequestUnapproved,
    PullRequestMerged,
    PullRequestRejected,
    PullRequestCommentCreated,
    PullRequestCommentUpdated,
    PullRequestCommentDeleted,
}

impl EventKind {
    #[cfg(test)]
    pub(crate) const ALL: [EventKind; 11] = [
        Self::Push,
        Self::CommitStatusUpdated,
        Self::PullRequestCreated,
        Self::PullRequestUpdated,
        Self::PullRequestApproved,
        Self::PullRequestUnapproved,
        Self::PullRequestMerged,
        Self::PullRequestRejected,
        Self::PullRequestCommentCreated,
        Self::PullRequestCommentUpdated,
        Self::PullRequestCommentDeleted,
    ];

    /// Parses the value of Bitbucket's `X-Event-Key` header.
    pub fn from_key(key: &str) -> Option<Self> {
        let kind = match key {
            "repo:push" => Self::Push,
            "repo:commit_status_updated" => Self::CommitStatusUpdated,
            "pullrequest:created" => Self::PullRequestCreated,
            "pullrequest:updated" => Self::PullRequestUpdated,
            "pullrequest:approved" => Self::PullRequestApproved,
            "pullrequest:unapproved" => Self::PullRequestUnapproved,
            "pullrequest:fulfilled" => Self::PullRequestMerged,
            "pullrequest:rejected" => Self::PullRequestRejected,
            "pullrequest:comment_created" => Self::PullRequestCommentCreated,
            "pullrequest:comment_updated" => Self::PullRequestCommentUpdated,
            "pullrequest:comment_deleted" => Self::PullRequestCommentDeleted,
            _ => return None,
        };

        Some(kind)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Push => "repo:push",
            Self::CommitStatusUpdated => "repo:commit_status_updated",
            Self::PullRequestCreated => "pullrequest:created",
            Self::PullRequestUpdated => "pullrequest:updated",
            Self::PullRequestApproved => "pullrequest:approved",
            Self::PullRequestUnapproved => "pullrequest:unapproved",
            Self::PullRequestMerged => "pullrequest:fulfilled",
            Self::PullRequestRejected => "pullrequest:rejected",
            Self::PullRequestCommentCreated => "pullrequest:comment_created",
            Self::PullRequestCommentUpdated => "pullrequest:comment_updated",
            Self::PullRequestCommentDeleted => "pullrequest:comment_deleted",
        }
    }

    fn handler(self) -> Handler {
        match self {
            Self::Push => repo::handle_push,
            Self::CommitStatusUpdated => repo::handle_commit_status_updated,
            Self::PullRequestCreated => pull_request::handle_created,
            Self::PullRequestUpdated => pull_request::handle_updated,
            Self::PullRequestApproved => pull_request::handle_approved,
            Self::PullRequestUnapproved => pull_request::handle_unapproved,
            Self::PullRequestMerged => pull_request::handle_merged,
            Self::PullRequestRejected => pull_request::handle_rejected,
            Self::PullRequestCommentCreated => comment::handle_created,
            Self::PullRequestCommentUpdated => comment::handle_updated,
            Self::PullRequestCommentDeleted => comment::handle_deleted,
        }
    }
}

/// Turns a raw Bitbucket webhook payload into a [`Response`].
///
/// Returns `Ok(None)` when there is nothing to announce: the event kind is unknown, the payload
/// lacks the fields needed for a meaningful message, or push messages are disabled. The only
/// error is a payload that can't be decoded for its event kind.
pub fn dispatch(
    key: &str,
    body: &[u8],
    options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    match EventKind::from_key(key) {
        Some(kind) => {
            trace!("handling {:?} event", kind);
            (kind.handler())(body, options)
        }
        None => {
            trace!("ignoring unsupported event `{}`", key);
            Ok(None)
        }
    }
}

/// A `null` body decodes to the empty payload, which the guards then suppress.
fn decode<T: DeserializeOwned + Default>(kind: EventKind, body: &[u8]) -> anyhow::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let event = nullable(&mut deserializer)
        .and_then(|event| deserializer.end().map(|()| event))
        .with_context(|| format!("couldn't decode {} payload", kind.key()))?;

    Ok(event)
}

fn respond(repo: String, message: Message) -> Option<Response> {
    if repo.is_empty() {
        trace!("payload has no repository name, can't route `{}`", message.title);
        return None;
    }

    Some(Response { repo, message })
}
