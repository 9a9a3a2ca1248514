#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Run,
    Open(Option<String>),
    Save(Option<String>),
    Show,
    Transcript,
    Clear,
    FontIncrease,
    FontDecrease,
    Theme,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_console_command(input: &str) -> Option<ConsoleCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or(trimmed).to_string();
    let argument = parts
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    let parsed = match command.as_str() {
        "/run" => ConsoleCommand::Run,
        "/open" => ConsoleCommand::Open(argument),
        "/save" => ConsoleCommand::Save(argument),
        "/show" => ConsoleCommand::Show,
        "/transcript" => ConsoleCommand::Transcript,
        "/clear" => ConsoleCommand::Clear,
        "/font+" => ConsoleCommand::FontIncrease,
        "/font-" => ConsoleCommand::FontDecrease,
        "/theme" => ConsoleCommand::Theme,
        "/help" => ConsoleCommand::Help,
        "/quit" => ConsoleCommand::Quit,
        _ => ConsoleCommand::Unknown(command),
    };

    Some(parsed)
}
