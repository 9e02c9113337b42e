use crate::rcon::{ChatMessage, Player};
use anyhow::{Context, Result};
use serde::Serialize;

/// Render players as a box table.
pub fn format_players_table(players: &[Player]) -> String {
    if players.is_empty() {
        return "No players connected.".to_string();
    }

    let name_width = players
        .iter()
        .map(|p| p.username.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);
    let id_width = players
        .iter()
        .map(|p| p.steam64.len())
        .max()
        .unwrap_or(0)
        .max(7);

    let mut out = String::new();
    out.push_str(&format!(
        "┌{:─<w_idx$}┬{:─<w_name$}┬{:─<w_id$}┐\n",
        "",
        "",
        "",
        w_idx = 5,
        w_name = name_width + 2,
        w_id = id_width + 2
    ));
    out.push_str(&format!(
        "│ {:>3} │ {:<w_name$} │ {:<w_id$} │\n",
        "#",
        "Username",
        "Steam64",
        w_name = name_width,
        w_id = id_width
    ));
    out.push_str(&format!(
        "├{:─<w_idx$}┼{:─<w_name$}┼{:─<w_id$}┤\n",
        "",
        "",
        "",
        w_idx = 5,
        w_name = name_width + 2,
        w_id = id_width + 2
    ));
    for (index, player) in players.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>3} │ {:<w_name$} │ {:<w_id$} │\n",
            index,
            player.username,
            player.steam64,
            w_name = name_width,
            w_id = id_width
        ));
    }
    out.push_str(&format!(
        "└{:─<w_idx$}┴{:─<w_name$}┴{:─<w_id$}┘\n",
        "",
        "",
        "",
        w_idx = 5,
        w_name = name_width + 2,
        w_id = id_width + 2
    ));
    out.push_str(&format!("Total players: {}", players.len()));
    out
}

pub fn format_chat_line(message: &ChatMessage) -> String {
    let speaker = match &message.display_name {
        Some(display_name) => format!("{} ({})", message.username, display_name),
        None => message.username.clone(),
    };
    if message.is_server_message {
        format!("[server] {}: {}", speaker, message.text)
    } else {
        format!("{}: {}", speaker, message.text)
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}

pub fn print_players(players: &[Player], json: bool) -> Result<()> {
    if json {
        return print_json(players);
    }
    println!("{}", format_players_table(players));
    Ok(())
}

pub fn print_chat(messages: &[ChatMessage], json: bool) -> Result<()> {
    if json {
        return print_json(messages);
    }
    for message in messages {
        println!("{}", format_chat_line(message));
    }
    Ok(())
}
