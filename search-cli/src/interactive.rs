/// What a line typed in interactive mode asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InteractiveCommand {
    /// Raw search input. Goes through the debouncer like a keystroke would.
    Input(String),
    More,
    Retry,
    Quit,
}

impl InteractiveCommand {
    pub(crate) fn parse(line: &str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match line.trim() {
            ":more" | ":m" => Self::More,
            ":retry" | ":r" => Self::Retry,
            ":quit" | ":q" => Self::Quit,
            _ => Self::Input(line.to_string()),
        }
    }
}
