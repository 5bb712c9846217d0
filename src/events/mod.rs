pub mod command;
pub mod expire;
pub mod message;
pub mod reaction;
pub mod ready;
pub mod router;
