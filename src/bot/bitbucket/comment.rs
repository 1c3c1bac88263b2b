use crate::{
    bot::{
        bitbucket::{decode, respond, DispatchOptions, EventKind},
        message::{Color, Message},
        utils::shorten_content,
        Response,
    },
    webhooks::bitbucket::PullRequestCommentEvent,
};

/// Builds the common part of comment messages, or `None` if the comment has no author or the pull
/// request no title.
fn comment_message(
    event: &PullRequestCommentEvent,
    action: &str,
    color: Color,
) -> Option<Message> {
    let pr = &event.pull_request;
    if event.comment.user.display_name.is_empty() || pr.title.is_empty() {
        return None;
    }

    let message = Message::new(
        format!(
            "[{}]: Comment {} on pull request: {}",
            pr.destination.repository.full_name, action, pr.title
        ),
        color,
    )
    .author(&event.actor.display_name, event.actor.avatar())
    .branches(&pr.source.branch.name, &pr.destination.branch.name)
    .url(event.comment.html_url());

    Some(message)
}

pub(super) fn handle_created(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event: PullRequestCommentEvent = decode(EventKind::PullRequestCommentCreated, body)?;

    let message = match comment_message(&event, "created", Color::PrCreated) {
        Some(message) => message,
        None => return Ok(None),
    };

    let comment = match event.comment.content.raw.as_str() {
        "" => "no comment".to_owned(),
        raw => shorten_content(raw, 105, 100),
    };

    Ok(respond(event.repository.name, message.field("Comment", comment)))
}

pub(super) fn handle_updated(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event: PullRequestCommentEvent = decode(EventKind::PullRequestCommentUpdated, body)?;

    Ok(comment_message(&event, "updated", Color::PrUpdated).and_then(|message| {
        let message = message.field("Author:", event.comment.user.display_name.as_str());
        respond(event.repository.name, message)
    }))
}

pub(super) fn handle_deleted(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event: PullRequestCommentEvent = decode(EventKind::PullRequestCommentDeleted, body)?;

    Ok(comment_message(&event, "deleted", Color::Failure).and_then(|message| {
        let message = message.field("Author:", event.comment.user.display_name.as_str());
        respond(event.repository.name, message)
    }))
}
