use anyhow::anyhow;
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request, State,
};
use tracing::{error, info, trace};

mod events;
pub use events::*;

mod signing;
use signing::SignedBitbucketPayload;

use crate::webhooks::{Event, EventSender};

const X_EVENT_KEY: &str = "X-Event-Key";

pub struct BitbucketSecret(pub Option<String>);

/// A Bitbucket webhook delivery, still undecoded: the payload schema depends on the key.
#[derive(Debug)]
pub struct BitbucketEvent {
    /// Value of the `X-Event-Key` header, e.g. `pullrequest:created`
    pub key: String,
    pub payload: String,
}

#[rocket::post("/api/webhooks/bitbucket", data = "<payload>")]
pub fn bitbucket_webhook(
    key: EventKey,
    payload: SignedBitbucketPayload,
    sender: &State<EventSender>,
) -> Result<&'static str, Status> {
    info!("received Bitbucket event {}", key.0);
    trace!("payload: {}", payload.0);

    let event = Event::Bitbucket(BitbucketEvent {
        key: key.0,
        payload: payload.0,
    });
    if sender.0.send(event).is_err() {
        error!("event channel was closed, dropping event");
        return Err(Status::ServiceUnavailable);
    }

    Ok("OK")
}

pub struct EventKey(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for EventKey {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let keys = request.headers().get(X_EVENT_KEY).collect::<Vec<_>>();
        if keys.len() != 1 {
            trace!("couldn't locate {} header", X_EVENT_KEY);
            return Outcome::Failure((
                Status::BadRequest,
                anyhow!("request header needs exactly one event key"),
            ));
        }

        Outcome::Success(EventKey(keys[0].to_owned()))
    }
}
