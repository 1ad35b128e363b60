use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Buy,
    Sell,
    Status,
    Help,
    Quit,
}

/// Map a key press to a simulator command. Bindings are case sensitive;
/// uppercase characters are left unbound.
pub fn parse_key(key_code: &KeyCode) -> Option<Command> {
    match key_code {
        KeyCode::Char('c') => Some(Command::Buy),
        KeyCode::Char('v') => Some(Command::Sell),
        KeyCode::Char('s') => Some(Command::Status),
        KeyCode::Char('q') => Some(Command::Help),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
