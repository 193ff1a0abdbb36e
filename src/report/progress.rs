use std::io::{IsTerminal, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

/// Minimum gap between two redraws; progress arrives once per attempt.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);
const BAR_WIDTH: usize = 30;

/// Terminal progress bar on stderr, fed by the engine's progress callback.
pub struct ProgressLine {
    style: ProgressStyle,
    no_color: bool,
    last_draw: Option<Instant>,
}

impl ProgressLine {
    /// Returns `None` when stderr is not a terminal.
    #[must_use]
    pub fn for_stderr(no_color: bool) -> Option<Self> {
        if !std::io::stderr().is_terminal() {
            return None;
        }
        Some(Self {
            style: ProgressStyle::new(BAR_WIDTH),
            no_color,
            last_draw: None,
        })
    }

    /// Redraws at most every [`REDRAW_INTERVAL`]; the first call always draws.
    pub fn update(&mut self, completed: u64, total: u64) {
        let now = Instant::now();
        if self
            .last_draw
            .is_some_and(|last| now.saturating_duration_since(last) < REDRAW_INTERVAL)
        {
            return;
        }
        self.last_draw = Some(now);
        if let Err(err) = render(&self.style, completed, total, self.no_color) {
            tracing::debug!("Failed to draw progress line: {}", err);
        }
    }
}

/// Draws the final state and moves the cursor past the progress line.
pub fn finish_progress_line(total: u64, no_color: bool) {
    let style = ProgressStyle::new(BAR_WIDTH);
    let finished = render(&style, total, total, no_color).and_then(|()| {
        let mut out = std::io::stderr();
        out.write_all(b"\n")?;
        out.flush()
    });
    if let Err(err) = finished {
        tracing::debug!("Failed to finish progress line: {}", err);
    }
}

fn render(
    style: &ProgressStyle,
    completed: u64,
    total: u64,
    no_color: bool,
) -> Result<(), std::io::Error> {
    let line = build_progress_line(style, completed, total, no_color);

    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in line {
        match segment.color {
            Some(color) if !no_color => queue!(
                out,
                SetForegroundColor(color),
                Print(&segment.text),
                ResetColor
            )?,
            Some(_) | None => queue!(out, Print(&segment.text))?,
        }
    }
    out.flush()?;
    Ok(())
}

pub(super) fn build_progress_line(
    style: &ProgressStyle,
    completed: u64,
    total: u64,
    no_color: bool,
) -> Vec<ProgressSegment> {
    let size = style.size.max(1);
    let goal = u128::from(total.max(1));
    let current = u128::from(completed).min(goal);
    let size_u128 = u128::from(u64::try_from(size).unwrap_or(u64::MAX));

    let scaled = current
        .saturating_mul(size_u128)
        .checked_div(goal)
        .unwrap_or(0);
    let complete_size = usize::try_from(scaled).unwrap_or(size).min(size);
    let incomplete_size = size.saturating_sub(complete_size);

    let percent_x100 = current
        .saturating_mul(10_000)
        .checked_div(goal)
        .unwrap_or(0);
    let percent_text = format!(
        " {}.{:02}%",
        percent_x100.checked_div(100).unwrap_or(0),
        percent_x100.checked_rem(100).unwrap_or(0)
    );
    let count_text = format!(" | {}/{} requests", completed, total);

    let progress_bar = format!(
        "{}{}{}{}",
        style.begin,
        style.fill.repeat(complete_size),
        style.empty.repeat(incomplete_size),
        style.end
    );

    if no_color {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::plain(percent_text),
            ProgressSegment::plain(count_text),
        ]
    } else {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::colored(percent_text, Color::Cyan),
            ProgressSegment::colored(count_text, Color::Yellow),
        ]
    }
}

pub(super) struct ProgressStyle {
    size: usize,
    begin: &'static str,
    end: &'static str,
    fill: &'static str,
    empty: &'static str,
}

impl ProgressStyle {
    pub(super) const fn new(size: usize) -> Self {
        Self {
            size,
            begin: "[",
            end: "]",
            fill: "#",
            empty: "-",
        }
    }
}

pub(super) struct ProgressSegment {
    pub(super) text: String,
    pub(super) color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}
