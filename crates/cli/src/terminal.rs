use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pakar_pipeline::CorpusStats;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const ANSWER: Color = Color::Cyan;
    const CONTEXT: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// Terminal I/O for the question loop.
#[derive(Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the startup banner.
    pub fn print_banner(&self, profile: &str, docs_dir: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("pakar"),
            ResetColor,
            Print(" - Immigration Law Expert System\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("Profile: {} | Documents: {}\n", profile, docs_dir)),
            Print("Type 'exit' or 'quit' to end.\n"),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Read one question. `None` on end of input or an exit command.
    pub fn read_input(&self) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::PROMPT),
            Print("question> "),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let trimmed = input.trim().to_string();

        if matches!(trimmed.as_str(), "exit" | "quit" | "/exit" | "/quit") {
            return Ok(None);
        }
        Ok(Some(trimmed))
    }

    pub fn print_answer(&self, answer: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ANSWER),
            Print(answer.trim_end()),
            Print("\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_context(&self, context: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::CONTEXT),
            Print(format!("{}\n", context)),
            SetForegroundColor(Colors::DIM),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_stats(&self, stats: &CorpusStats) -> Result<()> {
        self.print_info(&format!(
            "Indexed {} chunks from {} files ({} skipped), {} curated answers ({} skipped).",
            stats.chunks, stats.files_indexed, stats.files_skipped, stats.qa_records, stats.qa_skipped
        ))
    }

    /// Show a spinner/waiting indicator. Returns a handle to stop it.
    pub fn start_spinner(&self, message: &str) -> Result<SpinnerHandle> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{} ", message)),
            ResetColor,
        )?;
        stdout.flush()?;

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = std::thread::spawn(move || {
            let frames = ['|', '/', '-', '\\'];
            let mut i = 0;
            while running_clone.load(Ordering::SeqCst) {
                let mut stdout = io::stdout();
                execute!(
                    stdout,
                    SetForegroundColor(Colors::DIM),
                    Print(format!("\r{} ", frames[i % frames.len()])),
                    ResetColor,
                )
                .ok();
                stdout.flush().ok();
                i += 1;
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            // Clear spinner
            let mut stdout = io::stdout();
            execute!(stdout, Print("\r  \r")).ok();
            stdout.flush().ok();
        });

        Ok(SpinnerHandle {
            running,
            thread: Some(handle),
        })
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Print an info message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

/// Handle to a running spinner. Drop or call stop() to terminate it.
pub struct SpinnerHandle {
    running: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Stop the spinner and wait for the line to be cleared.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
