//! Terminal demo host for the mdedit toolbar.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p mdedit-tui -- <file.md>
//! ```
//!
//! Settings are read from `mdedit.yaml` in the working directory when present. With a `project`
//! configured, pickers and search talk to the server at `api_base_url` and Ctrl+S saves there;
//! otherwise the demo runs offline and saves to the file. Logs go to `logs/mdedit.log`.
//!
//! # Keys
//!
//! - Arrows / Home / End: move the caret, Shift extends the selection
//! - Alt+B / Alt+I / Alt+S / Alt+`: bold, italic, strikethrough, inline code
//! - Alt+Q / Alt+U / Alt+O / Alt+-: quote, bullets, numbers, rule
//! - Alt+H then 1-6: heading
//! - Alt+M / Alt+L: insert image, link article
//! - Alt+K: search
//! - Ctrl+T: table builder
//! - Ctrl+O: upload an image into the media library
//! - Ctrl+S: save, Ctrl+R: revert, Ctrl+Q: quit
//! - F1: shortcut list

mod app;
mod cursor;
mod logging;
mod store;
mod view;
mod worker;

use app::App;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mdedit_core::EditorConfig;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env, fs,
    io::{self, stdout},
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.md>", args[0]);
        process::exit(1);
    }

    let file_path = PathBuf::from(&args[1]);
    let content = if file_path.exists() {
        fs::read_to_string(&file_path)?
    } else {
        String::new()
    };

    logging::init(Path::new("logs"))?;
    let config = EditorConfig::load_or_default("mdedit.yaml")?;
    tracing::info!(file = %file_path.display(), project = %config.project, "starting");

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(file_path, content, &config);
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(text),
                _ => {}
            }
        }
    }

    Ok(())
}
