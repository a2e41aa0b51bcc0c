mod app;
mod auth;
mod config;
mod editor;
mod editor_state;
mod event;
mod highlight;
mod preview;
mod scroll;
mod store;
mod theme;
mod ui;

use std::env;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::App;
use config::Config;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-v" || a == "--version") {
        println!("markable {}", VERSION);
        return Ok(());
    }
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return Ok(());
    }

    let config = Config::load_or_create();
    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn print_help() {
    println!("markable {}", VERSION);
    println!();
    println!("A terminal markdown note editor with live preview and synced storage.");
    println!();
    println!("USAGE:");
    println!("    markable [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help");
    println!("    -v, --version    Print version");
    println!();
    println!("CONFIG:");
    println!("    ~/.config/markable/config.toml");
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.poll_events();

        terminal.draw(|f| ui::render(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll so background completions show up without a keypress
        if crossterm::event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    event::handle_key(app, key);
                }
            }
        }
    }
}
