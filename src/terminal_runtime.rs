use std::io;
use std::panic;
use std::sync::Once;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::KeyEvent;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::input::poll_key;
use crate::renderer;

pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

static RESTORE_HOOK: Once = Once::new();

/// Raw mode plus alternate screen, held for as long as the app runs.
///
/// `enter` also chains a panic hook that puts the shell back before the
/// panic message prints. Dropping without `leave` still restores, but only
/// logs a failure.
pub struct TerminalSession {
    terminal: AppTerminal,
    restored: bool,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        install_restore_hook();
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
            let _ = restore_terminal();
        })?;
        debug!("terminal entered");

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Runs the app against the real terminal until it asks to quit, then
    /// restores the shell.
    pub fn run(mut self, app: &mut App) -> io::Result<()> {
        let outcome = drive(&mut self.terminal, app, poll_key, Instant::now);
        let restored = self.leave();
        outcome.and(restored)
    }

    /// Restores the terminal, reporting any error to the caller.
    pub fn leave(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        restore_terminal()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(error) = self.leave() {
            warn!(%error, "terminal restore failed");
        }
    }
}

/// Frame loop: draw, wait for a key up to the next tick, apply it, advance.
///
/// Generic over the backend and the key source so it can be driven headless.
pub fn drive<B, K, C>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut next_key: K,
    mut clock: C,
) -> io::Result<()>
where
    B: Backend,
    K: FnMut(Duration) -> io::Result<Option<KeyEvent>>,
    C: FnMut() -> Instant,
{
    let mut frames = 0u64;

    while !app.should_quit() {
        let now = clock();
        terminal.draw(|frame| renderer::render(frame, app, now))?;
        frames += 1;

        if let Some(key) = next_key(app.poll_timeout(clock()))? {
            app.handle_key(key, clock());
        }

        app.update(clock());
    }

    info!(frames, "frame loop finished");
    Ok(())
}

/// Leaves raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}

fn install_restore_hook() {
    RESTORE_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            previous(panic_info);
        }));
    });
}
