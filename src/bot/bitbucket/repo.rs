use tracing::trace;

use crate::{
    bot::{
        bitbucket::{decode, respond, DispatchOptions, EventKind},
        message::{Color, Message},
        Response,
    },
    webhooks::bitbucket::{RepoCommitStatusUpdatedEvent, RepoPushEvent},
};

const UNKNOWN: &str = "unknown";

pub(super) fn handle_push(
    body: &[u8],
    options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    // checked before decoding, so even garbage is silently dropped
    if options.skip_push_messages {
        trace!("push messages are disabled");
        return Ok(None);
    }

    let event: RepoPushEvent = decode(EventKind::Push, body)?;

    // only the first change is announced
    let (commits, name, kind) = match event.push.changes.first() {
        Some(change) => (
            change.commits.len(),
            or_unknown(&change.new.name),
            or_unknown(&change.new.kind),
        ),
        None => (0, UNKNOWN, UNKNOWN),
    };

    let mut message = Message::new("Push happened", Color::Success)
        .field("Number of commits", commits.to_string())
        .field("Resource name", name)
        .field("Resource type", kind);

    let actor = &event.actor.display_name;
    if !actor.is_empty() {
        message = message.description(format!("{} pushed", actor));
    }

    Ok(respond(event.repository.name, message))
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        UNKNOWN
    } else {
        value
    }
}

pub(super) fn handle_commit_status_updated(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event: RepoCommitStatusUpdatedEvent = decode(EventKind::CommitStatusUpdated, body)?;
    let status = &event.commit_status;

    if status.name.is_empty() {
        return Ok(None);
    }

    let color = match status.state.as_str() {
        "FAILED" => Color::Failure,
        "SUCCESSFUL" => Color::Success,
        _ => Color::Gray,
    };
    let author = &status.commit.author.user;

    let message = Message::new(
        format!("[{}]: {}", event.repository.full_name, status.name),
        color,
    )
    .author(&author.display_name, author.avatar())
    .non_empty_field("Status", &status.state)
    .url(&status.url);

    Ok(respond(event.repository.name, message))
}
