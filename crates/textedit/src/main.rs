use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use textedit::{ui, App, Config};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("textedit: {}", e);
            if let Some(source) = e.source() {
                eprintln!("Caused by: {}", source);
            }
            log::error!("Application error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// stderr shares the screen with the editor when it is a terminal, so logs go
/// to a file instead. Without a usable file logging stays off.
fn init_logging() {
    let mut logger = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("textedit", LevelFilter::Debug);
    }

    if io::stderr().is_terminal() {
        let Some(file) = open_log_file() else {
            return;
        };
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();
}

fn open_log_file() -> Option<File> {
    let path = Config::log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

async fn run() -> Result<()> {
    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut app = App::new().await?;
    log::info!("Application initialized successfully");

    if let Some(arg) = env::args().nth(1) {
        app.open_initial(&PathBuf::from(arg)).await;
    } else {
        log::info!("No file specified, starting with the welcome text");
    }

    if let Ok((cols, rows)) = terminal::size() {
        app.resize(cols, rows);
    }

    enable_raw_mode().map_err(|e| anyhow::anyhow!("Failed to initialize terminal: {}", e))?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(anyhow::anyhow!("Failed to set up terminal: {}", e));
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = restore_terminal();
            return Err(e.into());
        }
    };

    let res = run_app(&mut terminal, &mut app).await;
    restore_terminal()?;
    res
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        if let Err(e) = terminal.draw(|f| ui::draw(f, app)) {
            log::error!("Terminal draw error: {}", e);
        }

        app.update_status();

        if app.should_quit() {
            log::info!("Application shutdown requested");
            break;
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if let Err(e) = app.handle_key_event(key).await {
                    log::error!("Key event handling error: {}", e);
                    app.session.status_mut().set_error(format!("Error: {}", e));
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Resize(cols, rows) => app.resize(cols, rows),
            _ => {}
        }

        // Cursor label catches up once the event has been handled
        app.session.refresh_cursor();
    }

    log::info!("Application loop ended successfully");
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}
