#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::unreadable_literal)]

use serenity::{prelude::GatewayIntents, Client};
use sqlx::postgres::PgPoolOptions;
use std::{
    env,
    sync::{atomic::AtomicBool, Arc},
    time::Instant,
};
use tracing::{error, info};

use crate::{
    commands::ping::ShardManagerContainer,
    database::postgres::{afk::get_all_afk, giveaways::PgGiveawayStore},
    models::{afk::AfkCache, config::BotConfig, handler::Handler},
};

mod commands;
mod common;
mod database;
mod events;
mod models;

#[tokio::main]
async fn main() {
    let log_level = match env::var("DEBUG").unwrap_or(false.to_string()).as_str() {
        "true" => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Getting environment variables");
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load configuration: {}", err);
            return;
        }
    };

    info!("Establishing connection to main database");
    let main_database = match PgPoolOptions::new().connect(&config.database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Could not connect to main database: {}", err);
            return;
        }
    };
    info!("Running outstanding migrations");
    if let Err(err) = sqlx::migrate!().run(&main_database).await {
        error!("Could not run migrations: {}", err);
        return;
    }
    info!("Connected to main database");

    let afk = match get_all_afk(&main_database).await {
        Ok(statuses) => AfkCache::new(statuses),
        Err(err) => {
            error!("Could not load AFK statuses: {}", err);
            return;
        }
    };
    info!("Loaded {} AFK statuses", afk.len().await);

    // Discord client connection
    let handler = Handler {
        giveaways: PgGiveawayStore::new(main_database.clone()),
        main_database,
        afk: Arc::new(afk),
        giveaway_config: config.giveaway,
        start_time: Instant::now(),
        expiry_task_started: Arc::new(AtomicBool::new(false)),
    };
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(err) => {
            error!("Could not build Cyni Discord client: {}", err);
            return;
        }
    };

    client
        .data
        .write()
        .await
        .insert::<ShardManagerContainer>(client.shard_manager.clone());

    if let Err(err) = client.start_autosharded().await {
        error!(
            "Attempted to start Cyni Discord client, but failed with error: {}",
            err
        );
    }
}
