mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use wordpace::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    language::Corpus,
    logging::init_file_logger,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::SessionState,
    word_source::{PromptWordSource, RandomWordSource, WordSource},
    ConfigurationError, TypingTest,
};

/// Redraw cadence; the countdown itself advances once per second
const TICK_RATE_MS: u64 = 100;

/// timed typing test with live wpm and charted results
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test: type the words as they scroll by, get live words-per-minute and accuracy, and a chart of both when the clock runs out."
)]
pub struct Cli {
    /// number of seconds to run the test
    #[clap(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
    seconds: Option<u64>,

    /// built-in word list to draw from
    #[clap(short = 'l', long)]
    language: Option<String>,

    /// custom word list (JSON corpus or whitespace separated text)
    #[clap(long)]
    word_list: Option<PathBuf>,

    /// custom prompt to type, repeated as needed
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// print the final report as JSON after leaving the test
    #[clap(long)]
    json: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command line flags on the stored preferences
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(seconds) = self.seconds {
            config.duration_secs = seconds;
        }
        if let Some(ref language) = self.language {
            config.language = language.clone();
            config.word_list = None;
        }
        if let Some(ref path) = self.word_list {
            config.word_list = Some(path.clone());
        }
        config
    }

    fn word_source(&self, config: &Config) -> Result<Box<dyn WordSource>, ConfigurationError> {
        if let Some(ref prompt) = self.prompt {
            return Ok(Box::new(PromptWordSource::new(prompt)?));
        }

        let corpus = match config.word_list {
            Some(ref path) => Corpus::from_path(path)?,
            None => Corpus::builtin(&config.language)?,
        };
        Ok(Box::new(RandomWordSource::new(corpus)?))
    }
}

/// Terminal front end state: the test plus the text field feeding it
pub struct App {
    pub test: TypingTest<Box<dyn WordSource>>,
    pub input: String,
    /// last key was a space, so Enter now means restart
    pub space_armed: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(test: TypingTest<Box<dyn WordSource>>) -> Self {
        Self {
            test,
            input: String::new(),
            space_armed: false,
            should_quit: false,
        }
    }

    pub fn restart(&mut self) {
        self.test.on_restart();
        self.input.clear();
        self.space_armed = false;
    }

    fn set_input(&mut self, buffer: String, now: Instant) {
        let previous = self.input.chars().count();
        self.input = buffer;
        if let Some(change) = self.test.apply_input_change(previous, &self.input, now) {
            if change.clears_input() {
                self.input.clear();
            }
        }
    }

    fn cycle_duration(&mut self, forward: bool) {
        let options = TypingTest::<Box<dyn WordSource>>::duration_options();
        let current = self
            .test
            .pending_duration()
            .unwrap_or(self.test.config().duration_secs);
        let pos = options.iter().position(|&d| d == current);
        let next = match (pos, forward) {
            (Some(i), true) => options[(i + 1) % options.len()],
            (Some(i), false) => options[(i + options.len() - 1) % options.len()],
            (None, _) => options[0],
        };

        if let Ok(true) = self.test.on_duration_selected(next) {
            self.input.clear();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        let was_space_armed = std::mem::take(&mut self.space_armed);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.restart(),
            KeyCode::Enter if was_space_armed => self.restart(),
            KeyCode::Left => self.cycle_duration(false),
            KeyCode::Right => self.cycle_duration(true),
            _ if self.test.state() == SessionState::Finished => match key.code {
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            KeyCode::Backspace => {
                let mut buffer = self.input.clone();
                buffer.pop();
                self.set_input(buffer, now);
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let kept = self.input.trim_end().rfind(' ').map_or(0, |i| i + 1);
                let buffer = self.input[..kept].to_string();
                self.set_input(buffer, now);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char(c) => {
                let mut buffer = self.input.clone();
                buffer.push(c);
                self.set_input(buffer, now);
                self.space_armed = c == ' ';
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_file_logger(&AppDirs::log_path())?;

    let test = prepare_test(&cli, &FileConfigStore::new())?;
    let mut app = App::new(test);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    if let Some(report) = app.test.report() {
        if cli.json {
            println!("{}", report.to_json()?);
        } else {
            println!("{report}");
        }
    }

    Ok(())
}

/// Build the test from stored settings and flags. Settings are only persisted
/// once they have produced a working session.
fn prepare_test(
    cli: &Cli,
    store: &FileConfigStore,
) -> Result<TypingTest<Box<dyn WordSource>>, Box<dyn Error>> {
    let config = cli.apply_to(store.load());
    let session_config = config.session_config()?;
    let source = cli.word_source(&config)?;

    if cli.save_config {
        store.save(&config)?;
        info!("saved settings to {}", store.path().display());
    }

    Ok(TypingTest::new(session_config, source))
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        match runner.step() {
            AppEvent::Tick(now) => {
                if app.test.on_tick(now).is_none() {
                    continue;
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => app.on_key(key, Instant::now()),
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
