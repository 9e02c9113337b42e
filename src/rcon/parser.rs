//! Parsers for the two console replies that carry structured data.
//!
//! Both work line by line and skip anything that does not match, so banners
//! such as "No Players Connected" simply produce an empty list.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// `<index>. <name>, <steam64>`
static PLAYER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\. ([^,]+), (\d+)").expect("player line pattern is valid")
});

/// `<speaker>[ (<display name>)]: <text>`
static CHAT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*(?:\(([\w\s]+)\))?:\s*(.*)$").expect("chat line pattern is valid")
});

/// Speaker prefix the server uses for its own announcements.
pub const SERVER_SPEAKER_PREFIX: &str = "SERVER";

/// A player connected at the time of listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub username: String,
    pub steam64: String,
}

/// One line of in-game chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub username: String,
    pub display_name: Option<String>,
    pub text: String,
    pub is_server_message: bool,
}

/// Parse a `listplayers` reply, keeping server order and duplicates.
pub fn parse_players(reply: &str) -> Vec<Player> {
    reply
        .lines()
        .filter_map(|line| PLAYER_LINE.captures(line))
        .map(|caps| Player {
            username: caps[1].to_string(),
            steam64: caps[2].to_string(),
        })
        .collect()
}

/// Parse a `getchat` reply in the order the server buffered the lines.
///
/// A speaker token that merely starts with "SERVER" is also flagged as a
/// server message, so a player named "SERVERA" is misclassified.
pub fn parse_chat(reply: &str) -> Vec<ChatMessage> {
    reply
        .lines()
        .filter_map(|line| CHAT_LINE.captures(line))
        .map(|caps| {
            let username = caps[1].to_string();
            ChatMessage {
                is_server_message: username.starts_with(SERVER_SPEAKER_PREFIX),
                display_name: caps.get(2).map(|m| m.as_str().to_string()),
                text: caps[3].to_string(),
                username,
            }
        })
        .collect()
}
