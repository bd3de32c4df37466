use clap::Parser;

use tgnotify_core::{domain::ChatId, input::parse_chat_id, Result};

/// Send standard input to a Telegram chat, or greet everyone who messages the bot.
#[derive(Debug, Parser)]
#[command(name = "tgnotify", version)]
pub struct Cli {
    /// Poll for incoming messages and reply with the sender's id
    #[arg(short = 'd', long = "daemon", conflicts_with = "target")]
    pub daemon: bool,

    /// Destination chat id; prompted for on standard input when omitted
    #[arg(allow_negative_numbers = true)]
    pub target: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Poll,
    /// `None` means ask for the chat id interactively.
    Send(Option<ChatId>),
}

impl Cli {
    /// Validate arguments before anything touches the network.
    pub fn mode(&self) -> Result<Mode> {
        if self.daemon {
            return Ok(Mode::Poll);
        }
        match &self.target {
            Some(raw) => Ok(Mode::Send(Some(parse_chat_id(raw)?))),
            None => Ok(Mode::Send(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgnotify_core::errors::Error;

    fn mode(args: &[&str]) -> Result<Mode> {
        let mut argv = vec!["tgnotify"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().mode()
    }

    #[test]
    fn daemon_flag_selects_poll_mode() {
        assert_eq!(mode(&["-d"]).unwrap(), Mode::Poll);
        assert_eq!(mode(&["--daemon"]).unwrap(), Mode::Poll);
    }

    #[test]
    fn numeric_target_selects_send_mode() {
        assert_eq!(mode(&["123"]).unwrap(), Mode::Send(Some(ChatId(123))));
        assert_eq!(
            mode(&["-1001234"]).unwrap(),
            Mode::Send(Some(ChatId(-1001234)))
        );
    }

    #[test]
    fn missing_target_prompts() {
        assert_eq!(mode(&[]).unwrap(), Mode::Send(None));
    }

    #[test]
    fn malformed_target_is_config_error() {
        assert!(matches!(mode(&["abc"]), Err(Error::Config(_))));
        assert!(matches!(mode(&["0"]), Err(Error::Config(_))));
    }

    #[test]
    fn daemon_with_target_is_rejected() {
        assert!(Cli::try_parse_from(["tgnotify", "-d", "123"]).is_err());
    }
}
