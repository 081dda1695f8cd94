use clap::Parser;
use clap::ValueEnum;

#[derive(Parser, Debug)]
#[command(version, about = "Incremental search over an Open Library compatible index")]
pub struct Cli {
    /// Query to search for. An empty query lists whatever the index returns
    /// for `q=`.
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Number of pages to load before exiting in one-shot mode.
    #[arg(long = "pages", value_name = "N", default_value_t = 1)]
    pub pages: u32,

    /// Read queries from stdin, one raw input event per line.
    /// `:more` loads the next page, `:retry` repeats a failed fetch and
    /// `:quit` exits.
    #[arg(long = "interactive", short = 'i', default_value_t = false)]
    pub interactive: bool,

    /// Print every state snapshot to stdout as JSONL.
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// Search service root; overrides `base_url` from config.toml.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Quiet period before typed input becomes the query.
    #[arg(long = "debounce-ms", value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Per-request timeout. `0` disables the timeout.
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Specifies color settings for use in the output.
    #[arg(long = "color", value_enum, default_value_t = Color::Auto)]
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Color {
    Always,
    Never,
    #[default]
    Auto,
}
