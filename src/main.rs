use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Clap;
use rocket::routes;
use tokio::sync::mpsc::unbounded_channel;

mod bot;
use bot::Bitlolo;

mod config;
use config::BitloloConfig;

mod webhooks;
use webhooks::{bitbucket::BitbucketSecret, bitbucket_webhook, EventSender};

#[derive(Clap)]
#[clap(version = "0.1")]
struct Opts {
    /// Configuration file for bitlolo
    #[clap(short, long, parse(from_os_str))]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let config_file = File::open(&opts.config)
        .with_context(|| format!("couldn't open {}:", opts.config.display()))?;
    let config: BitloloConfig = serde_yaml::from_reader(BufReader::new(config_file))
        .context("couldn't parse config file")?;

    let (sender, receiver) = unbounded_channel();
    let bitbucket_secret = config.bitbucket_secret.clone();

    let bitlolo = Bitlolo::new(config).context("failed to create bitlolo bot")?;
    bitlolo.init().await.context("failed to init bitlolo bot")?;
    tokio::spawn(async move { bitlolo.run(receiver).await });

    let rocket = rocket::build()
        .mount("/", routes![bitbucket_webhook])
        .manage(EventSender(sender))
        .manage(BitbucketSecret(bitbucket_secret));
    rocket.launch().await.map_err(|err| anyhow::anyhow!(err))
}
