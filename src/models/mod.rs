pub mod afk;
pub mod announcer;
pub mod command;
pub mod config;
pub mod giveaway;
pub mod handler;
pub mod response;
