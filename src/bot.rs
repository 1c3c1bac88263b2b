use std::{
    fs::File,
    io::{BufReader, BufWriter},
};

use anyhow::{anyhow, Context};
use matrix_sdk::{
    room::Room,
    ruma::{
        events::{room::member::MemberEventContent, AnyMessageEventContent, StrippedStateEvent},
        RoomId,
    },
    Client, ClientConfig, Session, SyncSettings,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, trace, warn};

use crate::{config::BitloloConfig, webhooks::Event};

mod bitbucket;
pub use bitbucket::{dispatch, DispatchOptions};

mod handlers;
use handlers::autojoin_authorized_rooms;

mod message;
pub use message::Message;

mod message_builder;

pub(crate) mod utils;

pub struct Bitlolo {
    client: Client,
    config: BitloloConfig,
}

impl Bitlolo {
    /// Creates a new [`Bitlolo`] bot and builds a [`matrix_sdk::Client`] using the provided
    /// [`BitloloConfig`].
    ///
    /// The [`Client`] is only initialized, not ready to be used yet.
    pub fn new(config: BitloloConfig) -> anyhow::Result<Self> {
        let client_config = ClientConfig::new().store_path(config.matrix_state_dir.join("store"));
        let client = Client::new_with_config(config.matrix_homeserver.clone(), client_config)?;

        Ok(Self { client, config })
    }

    /// Loads session information from file, or creates it if no previous session is found.
    ///
    /// The bot is ready to run once this function has been called.
    pub async fn init(&self) -> anyhow::Result<()> {
        self.load_or_init_session()
            .await
            .context("couldn't init session for matrix bot")?;

        let authorized_rooms: Vec<RoomId> = self
            .config
            .matrix_rooms
            .values()
            .map(|room| room.id.clone())
            .collect();

        self.client
            .register_event_handler({
                move |ev: StrippedStateEvent<MemberEventContent>, client: Client, room: Room| {
                    let authorized_rooms = authorized_rooms.clone();
                    async move { autojoin_authorized_rooms(ev, client, room, authorized_rooms).await }
                }
            })
            .await;

        Ok(())
    }

    /// Start listening to Matrix events, and announce Bitbucket events received on `events`.
    ///
    /// [`Bitlolo::init`] **must** be called before this function, otherwise the [`Client`] isn't
    /// logged in.
    pub async fn run(&self, events: UnboundedReceiver<Event>) {
        debug!("running...");

        let client = self.client.clone();
        let config = self.config.clone();
        tokio::task::spawn(async move { Self::receive_events(events, client, config).await });

        self.client.sync(SyncSettings::default()).await
    }

    async fn receive_events(
        mut events: UnboundedReceiver<Event>,
        client: Client,
        config: BitloloConfig,
    ) {
        loop {
            let event = match events.recv().await {
                Some(event) => event,
                None => {
                    info!("all channel senders were dropped, exiting receive loop");
                    break;
                }
            };
            debug!("received event: {:?}", event);

            if let Err(e) = Self::handle_event(event, &client, &config).await {
                warn!("encountered error while handling event: {:#}", e);
            }
        }
    }

    async fn handle_event(
        event: Event,
        client: &Client,
        config: &BitloloConfig,
    ) -> anyhow::Result<()> {
        let response = match event {
            Event::Bitbucket(event) => dispatch(
                &event.key,
                event.payload.as_bytes(),
                &config.dispatch_options(),
            )?,
        };

        let Response { message, repo } = match response {
            Some(response) => response,
            // event doesn't need a message from the bot
            None => {
                trace!("event didn't need to be announced");
                return Ok(());
            }
        };

        let room = config.find_room_for(&repo).and_then(|room_id| {
            client.get_joined_room(room_id).ok_or_else(|| {
                anyhow!(
                    "room with id {} isn't joined yet, can't send message",
                    room_id
                )
            })
        })?;

        trace!(
            "sending message `{}` to room `{}`",
            message.title,
            room.room_id()
        );
        room.send(AnyMessageEventContent::RoomMessage((&message).into()), None)
            .await?;

        Ok(())
    }

    /// This loads the session information from an existing file, and tries to login with it. If no such
    /// file is found, then login using username and password, and save the new session information on
    /// disk.
    async fn load_or_init_session(&self) -> anyhow::Result<()> {
        let session_file = self.config.matrix_state_dir.join("session.yaml");

        if session_file.is_file() {
            let reader = BufReader::new(File::open(&session_file)?);
            let session: Session = serde_yaml::from_reader(reader)
                .with_context(|| format!("couldn't parse {}", session_file.display()))?;

            self.client.restore_login(session.clone()).await?;
            info!("Reused session: {}, {}", session.user_id, session.device_id);
        } else {
            let response = self
                .client
                .login(
                    &self.config.matrix_username,
                    &self.config.matrix_password,
                    None,
                    Some("bitlolo bot"),
                )
                .await?;

            info!("logged in as {}", self.config.matrix_username);

            let session = Session {
                access_token: response.access_token,
                user_id: response.user_id,
                device_id: response.device_id,
            };

            let writer = BufWriter::new(File::create(&session_file)?);
            serde_yaml::to_writer(writer, &session)?;
        }

        Ok(())
    }
}

/// A message to announce, and the repository it is about.
#[derive(Debug)]
pub struct Response {
    pub message: Message,
    pub repo: String,
}
