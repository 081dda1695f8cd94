//! Turns controller snapshots into terminal output.
//!
//! Human mode prints each title once, as it arrives, on stdout and reports
//! loading and error transitions on stderr. JSON mode writes one serialized
//! snapshot per line and nothing else to stdout.

use std::io;
use std::io::Write;

use owo_colors::OwoColorize;
use scrollsearch_controller::Generation;
use scrollsearch_controller::SearchSnapshot;

pub(crate) trait SnapshotWriter {
    fn write_snapshot(&mut self, snapshot: &SearchSnapshot) -> io::Result<()>;
}

pub(crate) struct HumanOutput<W> {
    out: W,
    with_ansi: bool,
    generation: Option<Generation>,
    printed: usize,
    was_loading: bool,
}

impl<W: Write> HumanOutput<W> {
    pub(crate) fn new(out: W, with_ansi: bool) -> Self {
        Self {
            out,
            with_ansi,
            generation: None,
            printed: 0,
            was_loading: false,
        }
    }

    #[allow(clippy::print_stderr)]
    fn status(&self, message: &str) {
        if self.with_ansi {
            eprintln!("{}", message.dimmed());
        } else {
            eprintln!("{message}");
        }
    }
}

impl<W: Write> SnapshotWriter for HumanOutput<W> {
    fn write_snapshot(&mut self, snapshot: &SearchSnapshot) -> io::Result<()> {
        if self.generation != Some(snapshot.generation) {
            self.generation = Some(snapshot.generation);
            self.printed = 0;
            self.was_loading = false;
            let header = format!("search: {:?}", snapshot.query);
            if self.with_ansi {
                writeln!(self.out, "{}", header.bold())?;
            } else {
                writeln!(self.out, "{header}")?;
            }
        }

        for title in snapshot.results.iter().skip(self.printed) {
            writeln!(self.out, "{title}")?;
        }
        self.printed = snapshot.results.len();
        self.out.flush()?;

        if snapshot.loading && !self.was_loading {
            self.status(&format!("Loading page {}...", snapshot.page));
        } else if !snapshot.loading && snapshot.error {
            self.status(&format!(
                "Error loading page {}. Enter :retry to try again.",
                snapshot.page
            ));
        } else if !snapshot.loading && !snapshot.has_more && self.was_loading {
            let total = snapshot
                .total_hits
                .map(|hits| format!(" of {hits}"))
                .unwrap_or_default();
            self.status(&format!(
                "No more results ({}{total} shown).",
                snapshot.results.len()
            ));
        }
        self.was_loading = snapshot.loading;
        Ok(())
    }
}

pub(crate) struct JsonOutput<W> {
    out: W,
}

impl<W: Write> JsonOutput<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SnapshotWriter for JsonOutput<W> {
    fn write_snapshot(&mut self, snapshot: &SearchSnapshot) -> io::Result<()> {
        let line = serde_json::to_string(snapshot).map_err(io::Error::other)?;
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}
