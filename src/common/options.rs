use serenity::all::{ResolvedOption, ResolvedValue, User};

#[derive(Debug, Clone)]
pub struct Options<'a> {
    pub options: Vec<ResolvedOption<'a>>,
}

fn find<'b, 'a>(options: &'b [ResolvedOption<'a>], name: &str) -> Option<&'b ResolvedValue<'a>> {
    for option in options {
        match &option.value {
            ResolvedValue::SubCommandGroup(cmd) | ResolvedValue::SubCommand(cmd) => {
                return find(cmd, name);
            }
            value if option.name == name => return Some(value),
            _ => continue,
        }
    }
    None
}

impl Options<'_> {
    pub fn get_user(&self, name: &str) -> Option<User> {
        match find(&self.options, name) {
            Some(ResolvedValue::User(user, _)) => Some((*user).clone()),
            _ => None,
        }
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        match find(&self.options, name) {
            Some(ResolvedValue::String(string)) => Some((*string).to_string()),
            _ => None,
        }
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        match find(&self.options, name) {
            Some(ResolvedValue::Integer(integer)) => Some(*integer),
            _ => None,
        }
    }
}
