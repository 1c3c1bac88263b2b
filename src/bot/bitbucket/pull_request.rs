use crate::{
    bot::{
        bitbucket::{decode, respond, DispatchOptions, EventKind},
        message::{Color, Message},
        utils::shorten_content,
        Response,
    },
    webhooks::bitbucket::{
        Participant, PullRequest, PullRequestApprovalEvent, PullRequestEvent, User,
    },
};

const NO_REVIEWERS: &str = "none";

fn title(repository: &str, action: &str, pull_request: &PullRequest) -> String {
    format!(
        "[{}]: Pull request {}: {}",
        repository, action, pull_request.title
    )
}

fn reviewer_names(reviewers: &[User]) -> String {
    if reviewers.is_empty() {
        return NO_REVIEWERS.to_owned();
    }

    reviewers
        .iter()
        .map(|reviewer| reviewer.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per participant, in order, marked with their approval.
fn participant_list(participants: &[Participant]) -> String {
    if participants.is_empty() {
        return NO_REVIEWERS.to_owned();
    }

    participants
        .iter()
        .map(|participant| {
            let mark = if participant.approved { "✓" } else { "x " };
            format!("{}{}", mark, participant.user.display_name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn shorten_description(description: &str) -> String {
    shorten_content(description, 200, 199)
}

fn opened_or_updated(
    event: PullRequestEvent,
    action: &str,
    color: Color,
    reviewers: String,
) -> Option<Response> {
    let pr = &event.pull_request;
    if event.actor.display_name.is_empty() || pr.title.is_empty() {
        return None;
    }

    let message = Message::new(title(&pr.source.repository.full_name, action, pr), color)
        .author(&event.actor.display_name, event.actor.avatar())
        .branches(&pr.source.branch.name, &pr.destination.branch.name)
        .url(pr.html_url())
        .field("Reviewers", reviewers)
        .non_empty_field("Status", &pr.state)
        .non_empty_field("PR Description", &shorten_description(&pr.description));

    respond(event.repository.name, message)
}

pub(super) fn handle_created(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event: PullRequestEvent = decode(EventKind::PullRequestCreated, body)?;
    let reviewers = reviewer_names(&event.pull_request.reviewers);

    Ok(opened_or_updated(event, "opened", Color::PrCreated, reviewers))
}

pub(super) fn handle_updated(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event: PullRequestEvent = decode(EventKind::PullRequestUpdated, body)?;
    let reviewers = participant_list(&event.pull_request.participants);

    Ok(opened_or_updated(event, "updated", Color::PrUpdated, reviewers))
}

/// The author block shows who (un)approved, the "Created by" field who opened the pull request.
fn approval(event: PullRequestApprovalEvent, action: &str, color: Color) -> Option<Response> {
    let pr = &event.pull_request;
    if event.actor.display_name.is_empty() || pr.title.is_empty() {
        return None;
    }

    let approver = &event.approval.user;
    let message = Message::new(title(&pr.source.repository.full_name, action, pr), color)
        .author(&approver.display_name, approver.avatar())
        .branches(&pr.source.branch.name, &pr.destination.branch.name)
        .url(pr.html_url())
        .non_empty_field("Created by", &pr.author.display_name);

    respond(event.repository.name, message)
}

pub(super) fn handle_approved(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event = decode(EventKind::PullRequestApproved, body)?;
    Ok(approval(event, "approved", Color::Success))
}

pub(super) fn handle_unapproved(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event = decode(EventKind::PullRequestUnapproved, body)?;
    Ok(approval(event, "unapproved", Color::Failure))
}

/// Merged and rejected pull requests are guarded on who closed them. The author block pairs the
/// actor's name with the closer's avatar.
fn closed(
    event: PullRequestEvent,
    action: &str,
    color: Color,
    reviewers: bool,
) -> Option<Response> {
    let pr = &event.pull_request;
    if pr.closed_by.display_name.is_empty() || pr.title.is_empty() {
        return None;
    }

    let mut message = Message::new(title(&event.repository.full_name, action, pr), color)
        .author(&event.actor.display_name, pr.closed_by.avatar())
        .branches(&pr.source.branch.name, &pr.destination.branch.name)
        .url(pr.html_url());

    if reviewers {
        message = message.field("Reviewers", participant_list(&pr.participants));
    }

    let message = message
        .non_empty_field("Created by", &event.actor.display_name)
        .non_empty_field("Status", &pr.state);

    respond(event.repository.name, message)
}

pub(super) fn handle_merged(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event = decode(EventKind::PullRequestMerged, body)?;
    Ok(closed(event, "merged", Color::Success, true))
}

pub(super) fn handle_rejected(
    body: &[u8],
    _options: &DispatchOptions,
) -> anyhow::Result<Option<Response>> {
    let event = decode(EventKind::PullRequestRejected, body)?;
    Ok(closed(event, "rejected", Color::Failure, false))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::bot::{
        bitbucket::fixtures::{announce, avatar, payload, PR_URL},
        message::{Author, Field},
    };

    use super::*;

    fn field<'a>(message: &'a Message, name: &str) -> Option<&'a str> {
        message
            .fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    fn field_names(message: &Message) -> Vec<&str> {
        message
            .fields
            .iter()
            .map(|Field { name, .. }| name.as_str())
            .collect()
    }

    fn author(name: &str, avatar_of: &str) -> Option<Author> {
        Some(Author {
            name: name.to_owned(),
            icon_url: avatar(avatar_of),
        })
    }

    #[test]
    fn test_created() {
        let kind = EventKind::PullRequestCreated;
        let message = announce(kind, &payload(kind)).unwrap().message;

        assert_eq!(
            message.title,
            "[alice/widgets]: Pull request opened: Add widget factory"
        );
        assert_eq!(message.color, Color::PrCreated);
        assert_eq!(message.author, author("Alice", "Alice"));
        assert_eq!(
            message.description.as_deref(),
            Some("`feature/factory` > `main`")
        );
        assert_eq!(message.url.as_deref(), Some(PR_URL));
        assert_eq!(field_names(&message), ["Reviewers", "Status", "PR Description"]);
        assert_eq!(field(&message, "Reviewers"), Some("Bob"));
        assert_eq!(field(&message, "Status"), Some("OPEN"));
        assert_eq!(
            field(&message, "PR Description"),
            Some("Widgets can now be built in bulk.")
        );
    }

    #[test]
    fn test_created_reviewers() {
        let kind = EventKind::PullRequestCreated;

        let mut body = payload(kind);
        body["pullrequest"]["reviewers"] = json!([
            { "display_name": "Bob" },
            { "display_name": "Carol" },
        ]);
        let message = announce(kind, &body).unwrap().message;
        assert_eq!(field(&message, "Reviewers"), Some("Bob, Carol"));

        body["pullrequest"]["reviewers"] = json!(null);
        let message = announce(kind, &body).unwrap().message;
        assert_eq!(field(&message, "Reviewers"), Some("none"));
    }

    #[test]
    fn test_description_truncation() {
        let kind = EventKind::PullRequestCreated;
        let description_with = |len: usize| {
            let mut body = payload(kind);
            body["pullrequest"]["description"] = json!("d".repeat(len));
            let message = announce(kind, &body).unwrap().message;
            field(&message, "PR Description").map(str::to_owned)
        };

        assert_eq!(description_with(200), Some("d".repeat(200)));
        assert_eq!(description_with(201), Some(format!("{}…", "d".repeat(199))));
        assert_eq!(description_with(0), None);
    }

    #[test]
    fn test_optional_parts_are_omitted() {
        let kind = EventKind::PullRequestCreated;
        let mut body = payload(kind);
        body["pullrequest"]["destination"]["branch"] = json!(null);
        body["pullrequest"]["links"] = json!({});
        body["pullrequest"]["state"] = json!("");

        let message = announce(kind, &body).unwrap().message;

        assert_eq!(message.description, None);
        assert_eq!(message.url, None);
        assert_eq!(field_names(&message), ["Reviewers", "PR Description"]);
    }

    #[test]
    fn test_missing_actor_is_suppressed() {
        for kind in [
            EventKind::PullRequestCreated,
            EventKind::PullRequestUpdated,
            EventKind::PullRequestApproved,
            EventKind::PullRequestUnapproved,
        ] {
            let mut body = payload(kind);
            body["actor"]["display_name"] = json!("");

            assert!(announce(kind, &body).is_none(), "{:?}", kind);
        }
    }

    #[test]
    fn test_updated() {
        let kind = EventKind::PullRequestUpdated;
        let message = announce(kind, &payload(kind)).unwrap().message;

        assert_eq!(
            message.title,
            "[alice/widgets]: Pull request updated: Add widget factory"
        );
        assert_eq!(message.color, Color::PrUpdated);
        assert_eq!(field_names(&message), ["Reviewers", "Status", "PR Description"]);
        assert_eq!(field(&message, "Reviewers"), Some("✓Bob\nx Carol"));
    }

    #[test]
    fn test_updated_without_participants() {
        let kind = EventKind::PullRequestUpdated;
        let mut body = payload(kind);
        body["pullrequest"]["participants"] = json!([]);

        let message = announce(kind, &body).unwrap().message;

        assert_eq!(field(&message, "Reviewers"), Some("none"));
    }

    #[test]
    fn test_approved() {
        let kind = EventKind::PullRequestApproved;
        let message = announce(kind, &payload(kind)).unwrap().message;

        assert_eq!(
            message.title,
            "[alice/widgets]: Pull request approved: Add widget factory"
        );
        assert_eq!(message.color, Color::Success);
        assert_eq!(message.author, author("Bob", "Bob"));
        assert_eq!(message.url.as_deref(), Some(PR_URL));
        assert_eq!(field_names(&message), ["Created by"]);
        assert_eq!(field(&message, "Created by"), Some("Alice"));
    }

    #[test]
    fn test_unapproved() {
        let kind = EventKind::PullRequestUnapproved;
        let message = announce(kind, &payload(kind)).unwrap().message;

        assert_eq!(
            message.title,
            "[alice/widgets]: Pull request unapproved: Add widget factory"
        );
        assert_eq!(message.color, Color::Failure);
        assert_eq!(message.author, author("Bob", "Bob"));
        assert_eq!(field(&message, "Created by"), Some("Alice"));
    }

    #[test]
    fn test_merged() {
        let kind = EventKind::PullRequestMerged;
        let mut body = payload(kind);
        body["actor"] = json!({ "display_name": "Erin" });

        let message = announce(kind, &body).unwrap().message;

        assert_eq!(
            message.title,
            "[acme/widgets]: Pull request merged: Add widget factory"
        );
        assert_eq!(message.color, Color::Success);
        assert_eq!(message.author, author("Erin", "Dave"));
        assert_eq!(field_names(&message), ["Reviewers", "Created by", "Status"]);
        assert_eq!(field(&message, "Reviewers"), Some("✓Bob\nx Carol"));
        assert_eq!(field(&message, "Created by"), Some("Erin"));
        assert_eq!(field(&message, "Status"), Some("MERGED"));
    }

    #[test]
    fn test_rejected() {
        let kind = EventKind::PullRequestRejected;
        let message = announce(kind, &payload(kind)).unwrap().message;

        assert_eq!(
            message.title,
            "[acme/widgets]: Pull request rejected: Add widget factory"
        );
        assert_eq!(message.color, Color::Failure);
        assert_eq!(message.author, author("Dave", "Dave"));
        assert_eq!(
            message.description.as_deref(),
            Some("`feature/factory` > `main`")
        );
        assert_eq!(field_names(&message), ["Created by", "Status"]);
        assert_eq!(field(&message, "Status"), Some("DECLINED"));
    }

    #[test]
    fn test_closed_without_closer_is_suppressed() {
        for kind in [EventKind::PullRequestMerged, EventKind::PullRequestRejected] {
            let mut body = payload(kind);
            body["pullrequest"]["closed_by"] = json!(null);

            assert!(announce(kind, &body).is_none(), "{:?}", kind);
        }
    }

    #[test]
    fn test_closed_without_actor_has_no_author() {
        let kind = EventKind::PullRequestRejected;
        let mut body = payload(kind);
        body["actor"] = json!(null);

        let message = announce(kind, &body).unwrap().message;

        assert_eq!(message.author, None);
        assert_eq!(field_names(&message), ["Status"]);
    }
}
