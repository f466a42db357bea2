//! Chat commands: parsing, reply texts and dispatch.

pub mod handler;
pub mod texts;

pub use handler::{CommandHandler, MemeSource};

/// Commands the bot answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`.
    Help,
    /// `/meme`.
    Meme,
    /// `/stats`.
    Stats,
}

impl Command {
    /// Parse the leading command of a message.
    ///
    /// Accepts `/cmd`, `/cmd@botname` and trailing arguments. A command
    /// addressed to a different bot (in group chats) is ignored when our own
    /// username is known.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let body = first.strip_prefix('/')?;

        let (name, target) = match body.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (body, None),
        };

        if let (Some(target), Some(me)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(me) {
                return None;
            }
        }

        match name.to_ascii_lowercase().as_str() {
            "start" | "help" => Some(Command::Help),
            "meme" => Some(Command::Meme),
            "stats" => Some(Command::Stats),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert_eq!(Command::parse("/start", None), Some(Command::Help));
        assert_eq!(Command::parse("/help", None), Some(Command::Help));
        assert_eq!(Command::parse("/meme", None), Some(Command::Meme));
        assert_eq!(Command::parse("  /stats  ", None), Some(Command::Stats));
        assert_eq!(Command::parse("/MEME please", None), Some(Command::Meme));
    }

    #[test]
    fn ignores_plain_text_and_unknown_commands() {
        assert_eq!(Command::parse("meme", None), None);
        assert_eq!(Command::parse("", None), None);
        assert_eq!(Command::parse("/unknown", None), None);
        assert_eq!(Command::parse("hello /meme", None), None);
    }

    #[test]
    fn respects_bot_mentions() {
        assert_eq!(
            Command::parse("/meme@MemifyBot", Some("memifybot")),
            Some(Command::Meme)
        );
        assert_eq!(Command::parse("/meme@OtherBot", Some("memifybot")), None);
        assert_eq!(
            Command::parse("/meme@AnyBot", None),
            Some(Command::Meme)
        );
    }
}
