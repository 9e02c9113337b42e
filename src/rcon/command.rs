use std::fmt;

/// A console command line, sent verbatim.
///
/// Quoted arguments are wrapped in double quotes as-is; an argument that
/// itself contains `"` cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(String);

fn quoted(arg: &str) -> String {
    format!("\"{}\"", arg)
}

impl Command {
    pub fn raw(text: impl Into<String>) -> Self {
        Command(text.into())
    }

    pub fn list_players() -> Self {
        Self::raw("listplayers")
    }

    pub fn save_world() -> Self {
        Self::raw("saveworld")
    }

    pub fn do_exit() -> Self {
        Self::raw("doexit")
    }

    pub fn chat_to_player(player: &str, message: &str) -> Self {
        Command(format!(
            "serverchattoplayer {} {}",
            quoted(player),
            quoted(message)
        ))
    }

    pub fn chat_to_id(steam64: &str, message: &str) -> Self {
        Command(format!("serverchatto {} {}", quoted(steam64), quoted(message)))
    }

    pub fn get_chat() -> Self {
        Self::raw("getchat")
    }

    pub fn set_time_of_day(time: &str) -> Self {
        Command(format!("settimeofday {}", time))
    }

    pub fn allow_player(steam64: &str) -> Self {
        Command(format!("allowplayertojoinnocheck {}", steam64))
    }

    pub fn disallow_player(steam64: &str) -> Self {
        Command(format!("disallowplayertojoinnocheck {}", steam64))
    }

    pub fn set_message_of_the_day(motd: &str) -> Self {
        Command(format!("setmessageoftheday {}", motd))
    }

    pub fn broadcast(message: &str) -> Self {
        Command(format!("broadcast {}", message))
    }

    pub fn kick_player(steam64: &str) -> Self {
        Command(format!("kickplayer {}", steam64))
    }

    pub fn ban_player(steam64: &str) -> Self {
        Command(format!("banplayer {}", steam64))
    }

    pub fn unban_player(steam64: &str) -> Self {
        Command(format!("unbanplayer {}", steam64))
    }

    pub fn slomo(multiplier: i32) -> Self {
        Command(format!("slomo {}", multiplier))
    }

    pub fn destroy_wild_dinos() -> Self {
        Self::raw("destroywilddinos")
    }

    pub fn destroy_all_enemies() -> Self {
        Self::raw("destroyallenemies")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
