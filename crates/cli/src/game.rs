//! Interactive console game loop.

use std::io::{self, Write as _};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rand::RngExt;

use othello_core::board::BOARD_SIZE;
use othello_core::disc::Disc;
use othello_core::game_state::GameState;
use othello_core::search::{
    RunOptions, Search, SearchOptions, SearchProgressCallback, WorkerId,
};
use othello_core::strategy::StrategySchedule;

/// Which colors are driven by the engine.
#[derive(Clone, Copy, Debug)]
pub struct GameMode {
    pub white_is_cpu: bool,
    pub black_is_cpu: bool,
}

enum HumanAction {
    Moved,
    Passed,
    Reset,
    Quit,
}

pub fn run(mode: Option<GameMode>, strategy: Option<usize>, threads: usize) -> Result<()> {
    let interactive = mode.is_none();
    loop {
        let current = match mode {
            Some(m) => m,
            None => match select_game_mode()? {
                Some(m) => m,
                None => return Ok(()),
            },
        };
        play_game(current, strategy, threads)?;
        if !interactive {
            return Ok(());
        }
    }
}

fn select_game_mode() -> Result<Option<GameMode>> {
    loop {
        println!("=== SELECT GAME MODE ===");
        println!("   MC: You (O) vs CPU (X)");
        println!("   CM: CPU (O) vs You (X)");
        println!("   CC: CPU vs CPU");
        println!("   MM: Two players");
        println!("   Q:  Quit");
        let Some(input) = read_line(">> ")? else {
            return Ok(None);
        };
        match input.to_ascii_uppercase().as_str() {
            "MC" => return Ok(Some(GameMode { white_is_cpu: false, black_is_cpu: true })),
            "CM" => return Ok(Some(GameMode { white_is_cpu: true, black_is_cpu: false })),
            "CC" => return Ok(Some(GameMode { white_is_cpu: true, black_is_cpu: true })),
            "MM" => return Ok(Some(GameMode { white_is_cpu: false, black_is_cpu: false })),
            "Q" | "QUIT" => return Ok(None),
            _ => {}
        }
    }
}

fn play_game(mode: GameMode, strategy: Option<usize>, threads: usize) -> Result<()> {
    let index = strategy
        .unwrap_or_else(|| rand::rng().random_range(0..StrategySchedule::builtin_count()));
    let engine = Search::new(
        SearchOptions::default()
            .with_threads(threads)
            .with_schedule(StrategySchedule::builtin(index)),
    );

    let mut state = GameState::new();
    let mut turn = 0u32;
    let mut passes = 0;
    render(&state);

    while passes < 2 {
        turn += 1;
        let color = state.side_to_move();
        let is_cpu = match color {
            Disc::White => mode.white_is_cpu,
            _ => mode.black_is_cpu,
        };

        if is_cpu {
            print!("[CPU {} t{turn}] ", color.to_char());
            io::stdout().flush()?;
            let opts = RunOptions {
                turn,
                callback: Some(progress_printer()),
            };
            match engine.choose_move(state.board(), color, &opts) {
                Some(decision) => {
                    println!(" -> {},{}", decision.cand.x, decision.cand.y);
                    passes = 0;
                    state
                        .make_move(decision.cand.x, decision.cand.y)
                        .map_err(anyhow::Error::msg)?;
                }
                None => {
                    println!(" pass");
                    passes += 1;
                    let _ = state.make_pass();
                }
            }
        } else {
            match human_turn(&mut state, color)? {
                HumanAction::Moved => passes = 0,
                HumanAction::Passed => passes += 1,
                HumanAction::Reset => return Ok(()),
                HumanAction::Quit => return Ok(()),
            }
        }
        render(&state);
    }

    let [white, black] = state.get_score();
    let verdict = match white.cmp(&black) {
        std::cmp::Ordering::Greater => "White wins".bright_white().bold(),
        std::cmp::Ordering::Less => "Black wins".bright_blue().bold(),
        std::cmp::Ordering::Equal => "Draw".yellow().bold(),
    };
    println!("GAME RESULT: O={white} X={black} -- {verdict}");
    Ok(())
}

fn human_turn(state: &mut GameState, color: Disc) -> Result<HumanAction> {
    if !state.board().has_legal_moves(color) {
        println!("[{}] no legal move, pass", color.to_char());
        let _ = state.make_pass();
        return Ok(HumanAction::Passed);
    }

    loop {
        let Some(input) = read_line(&format!("[{}] x,y / undo / reset >> ", color.to_char()))?
        else {
            return Ok(HumanAction::Quit);
        };
        match input.to_ascii_lowercase().as_str() {
            "reset" => return Ok(HumanAction::Reset),
            "undo" => {
                // Back to the position before this player's previous move.
                if !state.undo() {
                    println!("nothing to undo");
                    continue;
                }
                while state.side_to_move() != color && state.undo() {}
                render(state);
            }
            cell => {
                let Some((x, y)) = parse_cell(cell) else {
                    println!("expected: x,y (0-7)");
                    continue;
                };
                match state.make_move(x, y) {
                    Ok(()) => return Ok(HumanAction::Moved),
                    Err(_) => println!("you cannot place there"),
                }
            }
        }
    }
}

fn parse_cell(input: &str) -> Option<(usize, usize)> {
    let (x, y) = input.split_once(',')?;
    let x = x.trim().parse::<usize>().ok()?;
    let y = y.trim().parse::<usize>().ok()?;
    (x < BOARD_SIZE && y < BOARD_SIZE).then_some((x, y))
}

/// Prompts and reads one trimmed line; `None` on end of input.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prints one marker per finished candidate: `+` primary, `*` secondary.
fn progress_printer() -> Arc<SearchProgressCallback> {
    Arc::new(|progress| {
        let mark = match progress.worker {
            WorkerId::Primary => "+",
            WorkerId::Secondary => "*",
        };
        print!("{mark}");
        let _ = io::stdout().flush();
    })
}

fn render(state: &GameState) {
    let board = state.board();
    let to_move = state.side_to_move();
    let [white, black] = state.get_score();

    println!("  0 1 2 3 4 5 6 7");
    for y in 0..BOARD_SIZE {
        print!("{y} ");
        for x in 0..BOARD_SIZE {
            match board.get(x, y) {
                Disc::White => print!("{} ", "O".bright_white().bold()),
                Disc::Black => print!("{} ", "X".bright_blue().bold()),
                Disc::Empty => {
                    if board.is_legal_move(x, y, to_move) {
                        print!("{} ", ".".green());
                    } else {
                        print!("{} ", "-".dimmed());
                    }
                }
            }
        }
        match y {
            0 => print!("  {} to move", to_move.to_char()),
            1 => print!("  O: {white}"),
            2 => print!("  X: {black}"),
            _ => {}
        }
        println!();
    }
}
