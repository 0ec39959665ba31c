use std::io::{self, BufRead, Write};

use reversi_core::{
    RevCoord, RevGame, RevGameSettings, RevInvalidMoveError, RevInvalidOpeningError,
    RevInvalidSettingsError, RevInvalidUndoError, RevMoveResult, RevOpening, RevPlayer,
};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("usage: reversi [<width> <height> <players>]")]
    Usage,
    #[error("unsupported game settings: {0:?}")]
    Settings(RevInvalidSettingsError),
    #[error("no standard opening fits a {width}x{height} board with {players} players")]
    NoOpening {
        width: usize,
        height: usize,
        players: usize,
    },
    #[error("failed to seed the opening: {0:?}")]
    Opening(RevInvalidOpeningError),
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("failed to initialize logging: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (width, height, players) = match args.len() {
        0 => (8, 8, 2),
        3 => {
            let parse = |arg: &String| arg.parse::<usize>().map_err(|_| AppError::Usage);
            (parse(&args[0])?, parse(&args[1])?, parse(&args[2])?)
        }
        _ => return Err(AppError::Usage),
    };

    let settings = RevGameSettings::new(width, height, players);
    let mut game = RevGame::new(settings).map_err(AppError::Settings)?;
    let opening = RevOpening::standard(&settings).ok_or(AppError::NoOpening {
        width,
        height,
        players,
    })?;
    opening.apply(&mut game).map_err(AppError::Opening)?;

    println!("enter `x y` to place a tile, `undo` to take a move back, `quit` to stop");
    println!("{}", render(&game));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while let Some(player) = game.current_player() {
        print!("player {} > ", player.index() + 1);
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        match line.trim() {
            "" => {}
            "quit" => return Ok(()),
            "undo" => match game.undo() {
                Ok(()) => println!("{}", render(&game)),
                Err(RevInvalidUndoError::NothingToUndo) => println!("nothing to undo"),
                Err(err) => println!("cannot undo: {:?}", err),
            },
            input => {
                let Some(pos) = parse_coord(input) else {
                    println!("enter `x y`, `undo`, or `quit`");
                    continue;
                };
                match game.try_move(pos) {
                    Ok(result) => {
                        log::debug!("move at {} {} changed {} cells", pos.x, pos.y, result.updates.len());
                        if !result.is_done() {
                            for skipped in skipped_players(&result, players) {
                                log::info!(
                                    "player {} has no legal move and was skipped",
                                    skipped.index() + 1
                                );
                            }
                        }
                        println!("{}", render(&game));
                    }
                    Err(RevInvalidMoveError::PositionOccupied) => {
                        println!("that cell is already taken")
                    }
                    Err(RevInvalidMoveError::NoCaptures) => println!("that move captures nothing"),
                    Err(RevInvalidMoveError::InvalidPosition) => {
                        println!("that position is off the board")
                    }
                    Err(RevInvalidMoveError::NotAllowed) => println!("the game is over"),
                }
            }
        }
    }

    println!("game over");
    let counts = game.tile_counts();
    let best = counts.values().copied().max().unwrap_or(0);
    let winners: Vec<String> = game
        .players()
        .filter(|player| counts.get(*player) == Some(&best))
        .map(|player| (player.index() + 1).to_string())
        .collect();
    if winners.len() == 1 {
        println!("player {} wins with {} tiles", winners[0], best);
    } else {
        println!(
            "draw between players {} with {} tiles each",
            winners.join(" and "),
            best
        );
    }
    Ok(())
}

/// The players the turn rotation passed over, in seating order.
fn skipped_players(result: &RevMoveResult, player_count: usize) -> Vec<RevPlayer> {
    let mut skipped = Vec::new();
    let mut candidate = result.mover.successor(player_count);
    while Some(candidate) != result.next_player && skipped.len() < player_count {
        skipped.push(candidate);
        candidate = candidate.successor(player_count);
    }
    skipped
}

fn parse_coord(input: &str) -> Option<RevCoord> {
    let mut parts = input.split_whitespace();
    let x = parts.next()?.parse::<i32>().ok()?;
    let y = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(RevCoord::new(x, y))
}

fn render(game: &RevGame) -> String {
    let mut out = String::new();
    for y in 0..game.board.height {
        for x in 0..game.board.width {
            let pos = RevCoord::new(x as i32, y as i32);
            match game.board.try_get_owner(pos) {
                Some(player) => out.push((b'1' + player.index() as u8) as char),
                None => out.push('.'),
            }
        }
        out.push('\n');
    }
    let counts = game.tile_counts();
    let scores: Vec<String> = game
        .players()
        .map(|player| {
            format!(
                "{}: {}",
                player.index() + 1,
                counts.get(player).copied().unwrap_or(0)
            )
        })
        .collect();
    out.push_str(&scores.join("  "));
    out
}
