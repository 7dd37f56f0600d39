//! Line-oriented stand-in for the chat platform.

use std::io::BufRead;

use tracing::{info, warn};

use crate::command::{self, Command};
use crate::config::BotSettings;
use crate::session::SessionRegistry;

/// One console line: an optional leading `@channel`, then the message text.
#[derive(Debug, PartialEq, Eq)]
pub struct Message<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

pub fn split_message<'a>(line: &'a str, default_channel: &'a str) -> Message<'a> {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('@') {
        let (channel, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if !channel.is_empty() {
            return Message {
                channel,
                text: text.trim_start(),
            };
        }
    }
    Message {
        channel: default_channel,
        text: line,
    }
}

/// Act on one command for `channel`.
pub fn dispatch(registry: &SessionRegistry, channel: &str, command: &Command) {
    if let Some(request) = command.request() {
        if registry.is_playing(channel) {
            info!("{} is busy; {:?} will start when it is free", channel, request);
        }
        registry.start(channel, request);
    } else if let Some(intent) = command.intent() {
        if !registry.navigate(channel, intent) {
            warn!("nothing is playing on {}; ignoring {:?}", channel, intent);
        }
    }
}

/// Read messages until EOF, dispatching the ones addressed to the bot.
pub fn serve(
    input: impl BufRead,
    registry: &SessionRegistry,
    bot: &BotSettings,
) -> std::io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let message = split_message(&line, &bot.default_channel);
        match command::parse(&bot.prefix, message.text) {
            Some(cmd) => dispatch(registry, message.channel, &cmd),
            None if message.text.starts_with(&bot.prefix) => {
                warn!("unrecognised command: {}", message.text)
            }
            None => {}
        }
    }
    Ok(())
}
