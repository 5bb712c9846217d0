pub mod afk;
pub mod giveaways;
