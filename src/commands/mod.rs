use crate::models::command::Command;

pub mod about;
pub mod afk;
pub mod avatar;
pub mod giveaway;
pub mod ping;
pub mod serverinfo;
pub mod whois;

pub fn get_command_list() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(giveaway::GiveawayCommand),
        Box::new(afk::AfkCommand),
        Box::new(about::AboutCommand),
        Box::new(ping::PingCommand),
        Box::new(serverinfo::ServerInfoCommand),
        Box::new(whois::WhoisCommand),
        Box::new(avatar::AvatarCommand),
    ]
}
