//! Bot commands as they arrive in chat text.

use crate::navigation::NavigationIntent;
use crate::session::SessionRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `play all`: every file in the media folder.
    PlayAll,
    /// `play <track id>`
    Play(String),
    /// `playlist <playlist id>`
    Playlist(String),
    Next,
    Prev,
    Stop,
}

impl Command {
    /// The session this command starts, if it starts one.
    pub fn request(&self) -> Option<SessionRequest> {
        match self {
            Command::PlayAll => Some(SessionRequest::LocalAll),
            Command::Play(id) => Some(SessionRequest::Track(id.clone())),
            Command::Playlist(id) => Some(SessionRequest::Playlist(id.clone())),
            _ => None,
        }
    }

    /// The intent this command delivers to a running session, if any.
    pub fn intent(&self) -> Option<NavigationIntent> {
        match self {
            Command::Next => Some(NavigationIntent::Next),
            Command::Prev => Some(NavigationIntent::Previous),
            Command::Stop => Some(NavigationIntent::Stop),
            _ => None,
        }
    }
}

/// Parse `text` as `<prefix> <verb> [argument]`.
///
/// Returns `None` for text not addressed to the bot, unknown verbs, missing
/// arguments and stray extra words.
pub fn parse(prefix: &str, text: &str) -> Option<Command> {
    let mut words = text.split_whitespace();
    if words.next()? != prefix {
        return None;
    }
    let verb = words.next()?;
    let arg = words.next();
    if words.next().is_some() {
        return None;
    }

    match (verb, arg) {
        ("play", Some("all")) => Some(Command::PlayAll),
        ("play", Some(id)) => Some(Command::Play(id.to_string())),
        ("playlist", Some(id)) => Some(Command::Playlist(id.to_string())),
        ("next", None) => Some(Command::Next),
        ("prev", None) => Some(Command::Prev),
        ("stop", None) => Some(Command::Stop),
        _ => None,
    }
}
