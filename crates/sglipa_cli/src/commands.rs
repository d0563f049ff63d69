//! Parsing of terminal input lines.

/// One line typed into the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Quit,
    Help,
    /// `/say [seed]`
    Say(Option<&'a str>),
    Stats,
    /// `/chance N`; `None` when N is missing or not an integer.
    Chance(Option<i64>),
    ToggleLearning,
    Reset,
    /// `/reply <original> | <text>`: a user answering another user.
    Reply { original: &'a str, text: &'a str },
    /// `^ <text>`: a user answering the bot's last message.
    ReplyToBot(&'a str),
    /// Any other line: a plain chat message.
    Chat(&'a str),
}

pub fn parse_line(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if line == "quit" || line == "exit" {
        return Input::Quit;
    }
    if let Some(text) = line.strip_prefix('^') {
        return Input::ReplyToBot(text.trim());
    }
    if !line.starts_with('/') {
        return Input::Chat(line);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let arg = Some(rest).filter(|r| !r.is_empty());
    match command {
        "/help" | "/start" => Input::Help,
        "/say" => Input::Say(arg),
        "/stats" => Input::Stats,
        "/chance" => Input::Chance(arg.and_then(|a| parse_percent(a.split_whitespace().next()?))),
        "/learn" => Input::ToggleLearning,
        "/reset" => Input::Reset,
        "/reply" => match rest.split_once('|') {
            Some((original, text)) if !text.trim().is_empty() => Input::Reply {
                original: original.trim(),
                text: text.trim(),
            },
            _ => Input::Help,
        },
        // Unknown commands are not chat; show usage instead of learning them.
        _ => Input::Help,
    }
}

pub const HELP: &str = "\
Type a message to chat. Commands:
  /say [seed]            generate a phrase, optionally starting from a word in seed
  /stats                 show what has been learned
  /chance N              set the chance (0-100) of answering unprompted
  /learn                 toggle learning on/off
  /reset                 forget everything
  /reply original | text teach `text` as an answer to `original`
  ^ text                 answer the bot's last message
  quit                   save and exit";

/// Integer argument; digit strings too long for `i64` saturate so the
/// later clamp still applies.
fn parse_percent(arg: &str) -> Option<i64> {
    if let Ok(n) = arg.parse() {
        return Some(n);
    }
    let (negative, digits) = match arg.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, arg.strip_prefix('+').unwrap_or(arg)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}
