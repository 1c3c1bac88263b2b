//! Minimal, realistic payloads for every event kind. `alice/widgets` is a fork of
//! `acme/widgets`, so titles show which repository a formatter picked.

use serde_json::{json, Value};

use super::EventKind;

pub(crate) const PR_URL: &str = "https://bitbucket.org/acme/widgets/pull-requests/12";
pub(crate) const COMMENT_URL: &str =
    "https://bitbucket.org/acme/widgets/pull-requests/12/_/diff#comment-7";

pub(crate) fn user(name: &str) -> Value {
    json!({
        "display_name": name,
        "links": { "avatar": { "href": avatar(name) } },
    })
}

pub(crate) fn avatar(name: &str) -> String {
    format!("https://avatars.example.org/{}.png", name.to_lowercase())
}

fn repository(full_name: &str) -> Value {
    let name = full_name.rsplit('/').next().unwrap_or(full_name);
    json!({ "name": name, "full_name": full_name })
}

pub(crate) fn pull_request() -> Value {
    json!({
        "title": "Add widget factory",
        "description": "Widgets can now be built in bulk.",
        "state": "OPEN",
        "source": {
            "branch": { "name": "feature/factory" },
            "repository": repository("alice/widgets"),
        },
        "destination": {
            "branch": { "name": "main" },
            "repository": repository("acme/widgets"),
        },
        "author": user("Alice"),
        "closed_by": null,
        "reviewers": [user("Bob")],
        "participants": [
            { "user": user("Bob"), "approved": true },
            { "user": user("Carol"), "approved": false },
        ],
        "links": { "html": { "href": PR_URL } },
    })
}

pub(crate) fn payload(kind: EventKind) -> Value {
    match kind {
        EventKind::Push => json!({
            "actor": user("Alice"),
            "repository": repository("acme/widgets"),
            "push": {
                "changes": [{
                    "new": { "name": "main", "type": "branch" },
                    "commits": [{ "hash": "4f1c2e9" }, { "hash": "9ab03d1" }],
                }],
            },
        }),
        EventKind::CommitStatusUpdated => json!({
            "repository": repository("acme/widgets"),
            "commit_status": {
                "name": "CI #42",
                "state": "SUCCESSFUL",
                "url": "https://ci.example.org/builds/42",
                "commit": { "author": { "user": user("Alice") } },
            },
        }),
        EventKind::PullRequestCreated | EventKind::PullRequestUpdated => json!({
            "actor": user("Alice"),
            "repository": repository("acme/widgets"),
            "pullrequest": pull_request(),
        }),
        EventKind::PullRequestApproved | EventKind::PullRequestUnapproved => json!({
            "actor": user("Bob"),
            "repository": repository("acme/widgets"),
            "pullrequest": pull_request(),
            "approval": { "user": user("Bob") },
        }),
        EventKind::PullRequestMerged | EventKind::PullRequestRejected => {
            let mut pull_request = pull_request();
            pull_request["closed_by"] = user("Dave");
            pull_request["state"] = if kind == EventKind::PullRequestMerged {
                json!("MERGED")
            } else {
                json!("DECLINED")
            };

            json!({
                "actor": user("Dave"),
                "repository": repository("acme/widgets"),
                "pullrequest": pull_request,
            })
        }
        EventKind::PullRequestCommentCreated
        | EventKind::PullRequestCommentUpdated
        | EventKind::PullRequestCommentDeleted => json!({
            "actor": user("Bob"),
            "repository": repository("acme/widgets"),
            "pullrequest": pull_request(),
            "comment": {
                "user": user("Bob"),
                "content": { "raw": "Could the factory reuse the widget pool?" },
                "links": { "html": { "href": COMMENT_URL } },
            },
        }),
    }
}

/// Runs `body` through the dispatcher with default options, expecting it to decode.
pub(crate) fn announce(kind: EventKind, body: &Value) -> Option<crate::bot::Response> {
    super::dispatch(
        kind.key(),
        body.to_string().as_bytes(),
        &super::DispatchOptions::default(),
    )
    .expect("payload should decode")
}
