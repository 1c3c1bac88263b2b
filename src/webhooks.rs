use tokio::sync::mpsc::UnboundedSender;

pub mod bitbucket;
pub use bitbucket::{bitbucket_webhook, BitbucketEvent};

pub struct EventSender(pub UnboundedSender<Event>);

#[derive(Debug)]
pub enum Event {
    Bitbucket(BitbucketEvent),
}
