use std::io::{self, Stdout};

use anyhow::Result;
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::Rng;
use tracing::{info, warn};

use maze_race::config::{init_logging, Args, Settings};
use maze_race::game::{Game, MoveOutcome};
use maze_race::render::{self, Renderer, HELP_TEXT, MENU_TEXT, QUIT_TEXT};

fn main() -> Result<()> {
    let settings = Settings::from_args(Args::parse())?;
    init_logging(&settings)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, settings: &Settings) -> Result<()> {
    let mut rng = settings.rng();
    info!(rows = settings.rows, columns = settings.columns, seed = ?settings.seed, "starting");

    loop {
        render::draw_screen(stdout, MENU_TEXT)?;
        match read_key()? {
            'q' => {
                if confirm_quit(stdout)? {
                    return Ok(());
                }
            }
            'h' => show_help(stdout)?,
            's' => play(stdout, settings, &mut rng)?,
            _ => {}
        }
    }
}

/// Plays one game. Quitting mid-game abandons it and returns to the menu.
fn play(stdout: &mut Stdout, settings: &Settings, rng: &mut impl Rng) -> Result<()> {
    let mut game = Game::generate(settings.rows, settings.columns, rng)?;
    let mut renderer = Renderer::new(&game, settings.history);
    let mut status = String::new();

    while game.is_running() {
        let prompt = move_prompt(&game.legal_move_keys());
        renderer.render(stdout, &game, &prompt, &status)?;
        let key = read_key()?;
        status.clear();
        match key {
            'q' => {
                if confirm_quit(stdout)? {
                    info!(moves = game.move_count(), "game abandoned");
                    return Ok(());
                }
                renderer.invalidate();
            }
            'h' => {
                show_help(stdout)?;
                renderer.invalidate();
            }
            key => match game.apply_key(key) {
                Ok(MoveOutcome::Applied) => {}
                Ok(MoveOutcome::Forfeited { winner }) => {
                    status = format!("{} has no legal move left", winner.opposite());
                }
                Err(err) => {
                    warn!(%err, "input rejected");
                    status = format!("{err}. Try again");
                }
            },
        }
    }

    let result = match game.winner() {
        Some(winner) => format!("Congratulations, {winner} is the winner!"),
        None => "The game is a draw!".to_string(),
    };
    renderer.render(stdout, &game, &result, "Press any key to return to the menu")?;
    read_key()?;
    Ok(())
}

fn move_prompt(keys: &[char]) -> String {
    if keys.is_empty() {
        return "No legal moves left, press any key to forfeit".to_string();
    }
    let keys: Vec<String> = keys.iter().map(char::to_string).collect();
    format!("Enter your move ({}), h for help, q to quit", keys.join(" "))
}

fn show_help(stdout: &mut Stdout) -> Result<()> {
    render::draw_screen(stdout, HELP_TEXT)?;
    read_key()?;
    Ok(())
}

fn confirm_quit(stdout: &mut Stdout) -> Result<bool> {
    render::draw_screen(stdout, QUIT_TEXT)?;
    Ok(read_key()? == 'q')
}

/// Blocks until a key is pressed. Escape counts as `q`.
fn read_key() -> io::Result<char> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char(c) => return Ok(c.to_ascii_lowercase()),
                KeyCode::Esc => return Ok('q'),
                KeyCode::Enter => return Ok('\n'),
                _ => {}
            }
        }
    }
}
