use std::io::{self, BufRead, Read};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use checkmate::{
    benchmark_search, divide, perft, play_match, AiPlayer, Board, Color, Game, GameResult, HumanPlayer, MatchConfig, Move,
    MoveProvider, RandomPlayer, DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH,
};

// Depth pairings for `bench --match`, stronger engine first
const MATCHUPS: [(u32, u32); 3] = [(2, 1), (3, 1), (3, 2)];

#[derive(Parser)]
#[command(name = "checkmate", version, about = "Play chess against a minimax engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Who plays which side
    #[arg(long, value_enum, default_value_t = Mode::Hva)]
    mode: Mode,

    /// Search depth for every engine player
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
    depth: u32,

    /// Search depth for an engine playing White
    #[arg(long)]
    white_depth: Option<u32>,

    /// Search depth for an engine playing Black
    #[arg(long)]
    black_depth: Option<u32>,

    /// Stop after this many plies
    #[arg(long)]
    max_plies: Option<u32>,

    /// Start from this FEN instead of the initial position
    #[arg(long)]
    fen: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Count leaf nodes of the legal move tree
    Perft {
        #[arg(long, default_value_t = 4)]
        depth: u32,

        #[arg(long)]
        fen: Option<String>,

        /// Print the count below each root move
        #[arg(long)]
        divide: bool,
    },
    /// Time the search and play engine matches at different depths
    Bench {
        /// Only time engine moves at depths 1 through --depth
        #[arg(long)]
        search: bool,

        /// Only play the depth-vs-depth matches
        #[arg(long = "match")]
        matches: bool,

        #[arg(long, default_value_t = MAX_SEARCH_DEPTH)]
        depth: u32,

        /// Engine moves timed per depth
        #[arg(long, default_value_t = 3)]
        moves: u32,

        /// Games per pairing
        #[arg(long, default_value_t = 3)]
        games: u32,

        /// Plies per game before it is scored as a draw
        #[arg(long, default_value_t = 50)]
        max_plies: u32,

        #[arg(long)]
        fen: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Human vs human
    Hvh,
    /// Human (White) vs engine
    Hva,
    /// Engine (White) vs human
    Avh,
    /// Engine vs engine
    Ava,
    /// Engine (White) vs random mover
    Random,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Perft { depth, ref fen, divide }) => run_perft(load_board(fen.as_deref())?, depth, divide),
        Some(Command::Bench {
            search,
            matches,
            depth,
            moves,
            games,
            max_plies,
            ref fen,
        }) => {
            let board = load_board(fen.as_deref())?;
            // Neither flag means both parts
            let both = !search && !matches;
            if search || both {
                run_search_bench(&board, depth, moves);
            }
            if matches || both {
                run_matches(&board, games, max_plies)?;
            }
            Ok(())
        }
        None => play(&cli),
    }
}

fn load_board(fen: Option<&str>) -> Result<Board> {
    match fen {
        Some(fen) => Board::from_fen(fen).with_context(|| format!("cannot load position `{}`", fen)),
        None => Ok(Board::new()),
    }
}

fn run_perft(mut board: Board, depth: u32, split: bool) -> Result<()> {
    let start = Instant::now();
    let nodes = if split {
        let counts = divide(&mut board, depth);
        for (mv, count) in &counts {
            println!("{}: {}", mv, count);
        }
        counts.iter().map(|(_, count)| count).sum()
    } else {
        perft(&mut board, depth)
    };
    let elapsed = start.elapsed();

    println!("perft({}) = {}", depth, nodes);
    info!(depth, nodes, elapsed_ms = elapsed.as_millis() as u64, "perft finished");
    Ok(())
}

fn run_search_bench(board: &Board, max_depth: u32, moves: u32) {
    for depth in 1..=max_depth.clamp(1, MAX_SEARCH_DEPTH) {
        let bench = benchmark_search(board, depth, moves);
        println!(
            "depth {}: {} moves, {:.3}s per move, {} nodes, {:.0} nodes/sec",
            depth,
            bench.moves,
            bench.time_per_move().as_secs_f64(),
            bench.nodes,
            bench.nodes_per_second()
        );
    }
}

fn run_matches(board: &Board, games: u32, max_plies: u32) -> Result<()> {
    let config = MatchConfig {
        games,
        max_plies,
        ..MatchConfig::default()
    };
    for (strong, weak) in MATCHUPS {
        let result = play_match(board, strong, weak, &config)
            .with_context(|| format!("depth {} vs depth {} match failed", strong, weak))?;
        let elo = match result.elo_difference() {
            Some(diff) => format!("{:+.0}", diff),
            None => "n/a".to_string(),
        };
        println!(
            "depth {} vs depth {}: {}W-{}D-{}L, score {:.1}%, Elo difference {}",
            strong,
            weak,
            result.wins,
            result.draws,
            result.losses,
            result.score() * 100.0,
            elo
        );
    }
    Ok(())
}

fn play(cli: &Cli) -> Result<()> {
    let board = load_board(cli.fen.as_deref())?;
    let white_depth = cli.white_depth.unwrap_or(cli.depth);
    let black_depth = cli.black_depth.unwrap_or(cli.depth);

    let engine = |color, depth| -> Box<dyn MoveProvider> { Box::new(AiPlayer::new(color, depth)) };
    let human = |color| -> Box<dyn MoveProvider> { Box::new(HumanPlayer::new(color, StdinLines::default(), io::stdout())) };

    let (mut white, mut black) = match cli.mode {
        Mode::Hvh => (human(Color::White), human(Color::Black)),
        Mode::Hva => (human(Color::White), engine(Color::Black, black_depth)),
        Mode::Avh => (engine(Color::White, white_depth), human(Color::Black)),
        Mode::Ava => (engine(Color::White, white_depth), engine(Color::Black, black_depth)),
        Mode::Random => (
            engine(Color::White, white_depth),
            Box::new(RandomPlayer::new(Color::Black)) as Box<dyn MoveProvider>,
        ),
    };

    let mut game = Game::from_board(board);
    println!("{}", game.board());

    let result = match game.run(white.as_mut(), black.as_mut(), cli.max_plies, |board, mv| {
        println!("{}", describe_move(board, mv));
    }) {
        Ok(result) => result,
        Err(checkmate::MoveError::Aborted) => {
            println!("Game aborted.");
            return Ok(());
        }
        Err(err) => return Err(err).context("game stopped"),
    };

    match result {
        GameResult::WhiteWins => println!("Checkmate. White wins."),
        GameResult::BlackWins => println!("Checkmate. Black wins."),
        GameResult::Draw => println!("Stalemate. The game is drawn."),
        GameResult::Ongoing => println!("Stopped after {} plies.", game.board().history_len()),
    }
    println!("{}", game.board().to_fen());
    Ok(())
}

/// The move just played, the resulting board, and a check notice for the
/// side now to move.
fn describe_move(board: &Board, mv: &Move) -> String {
    let side = board.current_player();
    let mut text = format!("{} played {}\n{}", side.opposite(), mv, board);
    if board.is_in_check(side) && !board.is_checkmate(side) {
        text.push_str(&format!("\nCheck! {} is in check.", side));
    }
    text
}

/// Reads stdin one line at a time, taking the lock only for that line, so
/// both players of a human game can share the terminal.
#[derive(Default)]
struct StdinLines {
    line: Vec<u8>,
    pos: usize,
}

impl Read for StdinLines {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for StdinLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.line.len() {
            self.line.clear();
            self.pos = 0;
            io::stdin().lock().read_until(b'\n', &mut self.line)?;
        }
        Ok(&self.line[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.line.len());
    }
}
