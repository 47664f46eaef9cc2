use std::io::{self, BufRead, Write};

use comfy_table::{presets::ASCII_FULL, Table};
use maestro_core::{
    movies::{MovieDetails, Schedule, ScheduleListing},
    presenter::{MessageKind, Presenter},
};
use tracing::warn;

/// Line-oriented presenter: prompts on the writer, answers from the reader.
/// End of input counts as cancelling the current prompt.
pub struct ConsolePresenter<R, W> {
    input: R,
    output: W,
}

impl ConsolePresenter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = writeln!(self.output, "{text}").and_then(|_| self.output.flush()) {
            warn!("failed to write to console: {err}");
        }
    }

    /// Prints `label` and reads one line; `None` on end of input.
    fn ask(&mut self, label: &str) -> Option<String> {
        if let Err(err) = write!(self.output, "{label}").and_then(|_| self.output.flush()) {
            warn!("failed to write prompt: {err}");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                warn!("failed to read input: {err}");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Presenter for ConsolePresenter<R, W> {
    fn select_location(&mut self, locations: &[String]) -> Option<String> {
        let first = locations.first()?;
        let mut menu = String::from("Select location:");
        for (i, location) in locations.iter().enumerate() {
            menu.push_str(&format!("\n  {}) {location}", i + 1));
        }
        self.emit(&menu);

        loop {
            let answer = self.ask(&format!("Location [{first}]: "))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Some(first.clone());
            }
            if let Some(location) = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| locations.get(i))
            {
                return Some(location.clone());
            }
            if let Some(location) = locations.iter().find(|l| l.eq_ignore_ascii_case(answer)) {
                return Some(location.clone());
            }
            self.emit("Please choose one of the listed locations.");
        }
    }

    fn enter_date(&mut self) -> Option<String> {
        self.ask("Enter the date (YYYY-MM-DD): ")
    }

    fn choose_schedule_index(&mut self, count: usize) -> Option<usize> {
        loop {
            let answer = self.ask(&format!(
                "Enter the index of the schedule you want to view (0-{}): ",
                count.saturating_sub(1)
            ))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return None;
            }
            match answer.parse() {
                Ok(index) => return Some(index),
                Err(_) => self.emit("Please enter a number."),
            }
        }
    }

    fn enter_showtime(&mut self, showtimes: &[String]) -> Option<String> {
        if !showtimes.is_empty() {
            self.emit(&format!("Showtimes: {}", showtimes.join(", ")));
        }
        self.ask("Enter the desired showtime: ")
    }

    fn enter_seat_count(&mut self) -> Option<String> {
        self.ask("Enter the number of seats to book: ")
    }

    fn show_listings(&mut self, listings: &[ScheduleListing]) {
        let table = render_listings(listings);
        self.emit(&table);
    }

    fn show_details(&mut self, schedule: &Schedule, details: &MovieDetails) {
        let text = render_details(schedule, details);
        self.emit(&text);
    }

    fn show_message(&mut self, kind: MessageKind, title: &str, text: &str) {
        let line = match kind {
            MessageKind::Info => format!("[{title}] {text}"),
            MessageKind::Error => format!("[{title}] error: {text}"),
        };
        self.emit(&line);
    }
}

/// Table with Index, Title, Duration, and Showtimes columns.
pub fn render_listings(listings: &[ScheduleListing]) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_header(["Index", "Title", "Duration", "Showtimes"]);
    for l in listings {
        table.add_row([
            l.index.to_string(),
            l.details.title.clone(),
            l.details.duration.to_string(),
            l.schedule.showtimes.join(", "),
        ]);
    }
    table.to_string()
}

pub fn render_details(schedule: &Schedule, details: &MovieDetails) -> String {
    format!(
        "Title: {}\nDuration: {} minutes\nSynopsis: {}\nShowtimes: {}",
        details.title,
        details.duration,
        details.synopsis,
        schedule.showtimes.join(", ")
    )
}
