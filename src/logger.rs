//! Terminal output for the build.
//!
//! - `log!` prints a message behind a colored `[module]` prefix
//! - `ProgressBars` draws one in-place bar per build phase
//!
//! ```ignore
//! log!("scan"; "found {} pages", count);
//!
//! if let Some(progress) = ProgressBars::new_filtered(&[("static", 12), ("pages", 40)]) {
//!     progress.inc_by_name("pages");
//!     progress.finish();
//! }
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Number of bars currently drawn below the log area.
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// Bar layout: "[module] [████░░░░] 42/100"

const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;
/// `" []"` around the bar plus the space before the counter.
const BAR_DECORATION_LEN: usize = 4;

/// Display width of `"[module] "`.
#[inline]
const fn prefix_len(module_len: usize) -> usize {
    module_len + 3
}

fn terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("render"; "{} -> {}", page.source().display(), page.file());
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Progress Bars
// ============================================================================

/// One progress bar per build phase, each on its own terminal line.
///
/// Bars are updated from rayon workers, so drawing is serialized by a mutex
/// and counters are atomic.
pub struct ProgressBars {
    bars: Vec<ProgressBar>,
    lock: Mutex<()>,
}

struct ProgressBar {
    name: &'static str,
    prefix: ColoredString,
    total: usize,
    current: AtomicUsize,
    row: usize,
}

impl ProgressBars {
    pub fn new(phases: &[(&'static str, usize)]) -> Self {
        let mut stdout = stdout().lock();
        for _ in 0..phases.len() {
            writeln!(stdout).ok();
        }
        stdout.flush().ok();

        BAR_COUNT.store(phases.len(), Ordering::SeqCst);

        let bars = phases
            .iter()
            .enumerate()
            .map(|(row, (name, total))| ProgressBar {
                name,
                prefix: colorize_prefix(name),
                total: *total,
                current: AtomicUsize::new(0),
                row,
            })
            .collect();

        Self {
            bars,
            lock: Mutex::new(()),
        }
    }

    /// Like `new`, but drops empty phases.
    ///
    /// Returns `None` when there is at most one item in total.
    pub fn new_filtered(phases: &[(&'static str, usize)]) -> Option<Self> {
        let filtered: Vec<_> = phases
            .iter()
            .filter(|(_, count)| *count > 0)
            .copied()
            .collect();
        let total: usize = filtered.iter().map(|(_, c)| c).sum();

        if total <= 1 {
            return None;
        }

        Some(Self::new(&filtered))
    }

    pub fn inc_by_name(&self, name: &str) {
        if let Some(bar) = self.bars.iter().find(|bar| bar.name == name) {
            let current = bar.current.fetch_add(1, Ordering::Relaxed) + 1;
            self.display(bar, current);
        }
    }

    fn display(&self, bar: &ProgressBar, current: usize) {
        let _guard = self.lock.lock().ok();

        let counter = format!("{}/{}", current, bar.total);
        let overhead = prefix_len(bar.name.len()) + BAR_DECORATION_LEN + counter.len();
        let bar_width = (terminal_width() as usize)
            .saturating_sub(overhead)
            .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
        let (filled, empty) = split_bar(current, bar.total, bar_width);

        let mut stdout = stdout().lock();
        #[allow(clippy::cast_possible_truncation)] // one bar per phase
        let lines_up = (self.bars.len() - bar.row) as u16;
        execute!(stdout, cursor::MoveUp(lines_up)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        write!(
            stdout,
            "{} [{}{}] {}",
            bar.prefix,
            "█".repeat(filled),
            "░".repeat(empty),
            counter
        )
        .ok();
        execute!(stdout, cursor::MoveDown(lines_up)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Erase all bars. Also runs on drop.
    #[allow(clippy::cast_possible_truncation)]
    pub fn finish(&self) {
        if BAR_COUNT.swap(0, Ordering::SeqCst) == 0 {
            return;
        }
        let _guard = self.lock.lock().ok();

        let mut stdout = stdout().lock();
        let rows = self.bars.len() as u16;
        execute!(stdout, cursor::MoveUp(rows)).ok();
        for _ in &self.bars {
            execute!(stdout, Clear(ClearType::CurrentLine)).ok();
            execute!(stdout, cursor::MoveDown(1)).ok();
        }
        execute!(stdout, cursor::MoveUp(rows)).ok();
        stdout.flush().ok();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Split `width` cells into (filled, empty) for `current` out of `total`.
fn split_bar(current: usize, total: usize, width: usize) -> (usize, usize) {
    let filled = if total > 0 {
        (current.min(total) * width) / total
    } else {
        0
    };
    (filled, width - filled)
}

// ============================================================================
// Plain log lines
// ============================================================================

/// Print `[module] message`, keeping any active progress bars below it.
#[allow(clippy::cast_possible_truncation)]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        execute!(stdout, cursor::MoveUp(bar_count as u16)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    }

    // Multiline messages (error chains) are printed whole.
    let message = if message.contains('\n') {
        message
    } else {
        let max_len = (terminal_width() as usize).saturating_sub(prefix_len(module.len()));
        truncate_str(message, max_len)
    };
    writeln!(stdout, "{prefix} {message}").ok();

    for _ in 0..bar_count {
        writeln!(stdout).ok();
    }
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "build" => prefix.bright_green().bold(),
        "scan" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Cut `s` to at most `max_len` bytes on a char boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
