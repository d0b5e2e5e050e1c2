//! Search timing and engine-vs-engine matches

use std::time::{Duration, Instant};

use tracing::info;

use crate::board::{Board, Color};
use crate::error::MoveError;
use crate::game::{AiPlayer, Game, GameResult};
use crate::search::Search;

/// Timing of consecutive engine moves at a fixed depth.
#[derive(Debug, Clone)]
pub struct SearchBenchmark {
    pub depth: u32,
    pub moves: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchBenchmark {
    pub fn time_per_move(&self) -> Duration {
        if self.moves == 0 {
            return Duration::ZERO;
        }
        self.elapsed / self.moves
    }

    pub fn nodes_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.nodes as f64 / seconds
        } else {
            0.0
        }
    }
}

/// Lets the engine play `moves` plies from `start`, one search per ply, and
/// sums the searched nodes and the wall time. Stops early when the side to
/// move has no legal moves.
pub fn benchmark_search(start: &Board, depth: u32, moves: u32) -> SearchBenchmark {
    let mut board = start.clone();
    let mut search = Search::new();
    let mut result = SearchBenchmark {
        depth,
        moves: 0,
        nodes: 0,
        elapsed: Duration::ZERO,
    };

    for _ in 0..moves {
        let side = board.current_player();
        let started = Instant::now();
        let mv = match search.select_move(&board, side, depth) {
            Ok(mv) => mv,
            Err(_) => break,
        };
        result.elapsed += started.elapsed();
        result.nodes += search.nodes_searched();
        result.moves += 1;
        board.make_move(mv);
    }

    info!(
        depth,
        moves = result.moves,
        nodes = result.nodes,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "search benchmark finished"
    );
    result
}

/// Configuration for a match
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Number of games to play
    pub games: u32,
    /// Plies per game before it is scored as a draw
    pub max_plies: u32,
    /// Swap colors every game instead of giving the first engine White
    pub alternate_colors: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 3,
            max_plies: 50,
            alternate_colors: true,
        }
    }
}

/// Win/draw/loss tally from the first engine's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl MatchResult {
    pub fn total_games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// 1 per win, 0.5 per draw, averaged over the games played.
    pub fn score(&self) -> f64 {
        let total = self.total_games();
        if total == 0 {
            return 0.5;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / total as f64
    }

    /// Rating difference implied by the score. `None` for a clean sweep
    /// either way, where the logistic model has no finite answer.
    pub fn elo_difference(&self) -> Option<f64> {
        let score = self.score();
        if score <= 0.0 || score >= 1.0 {
            return None;
        }
        Some(400.0 * (score / (1.0 - score)).log10())
    }
}

/// Plays a match between an engine searching `first_depth` plies and one
/// searching `second_depth`, every game starting from `start`. Games cut off
/// by the ply limit count as draws.
pub fn play_match(
    start: &Board,
    first_depth: u32,
    second_depth: u32,
    config: &MatchConfig,
) -> Result<MatchResult, MoveError> {
    let mut tally = MatchResult::default();

    for game_num in 0..config.games {
        let first_color = if config.alternate_colors && game_num % 2 == 1 {
            Color::Black
        } else {
            Color::White
        };
        let (white_depth, black_depth) = match first_color {
            Color::White => (first_depth, second_depth),
            Color::Black => (second_depth, first_depth),
        };

        let mut white = AiPlayer::new(Color::White, white_depth);
        let mut black = AiPlayer::new(Color::Black, black_depth);
        let mut game = Game::from_board(start.clone());
        let result = game.run(&mut white, &mut black, Some(config.max_plies), |_, _| {})?;

        let winner = match result {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw | GameResult::Ongoing => None,
        };
        match winner {
            Some(color) if color == first_color => tally.wins += 1,
            Some(_) => tally.losses += 1,
            None => tally.draws += 1,
        }

        info!(
            game = game_num + 1,
            first_color = %first_color,
            result = ?result,
            plies = game.board().history_len(),
            wins = tally.wins,
            draws = tally.draws,
            losses = tally.losses,
            "match game finished"
        );
    }

    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_benchmark_counts_moves_and_nodes() {
        let start = Board::new();
        let bench = benchmark_search(&start, 1, 3);
        assert_eq!(bench.depth, 1);
        assert_eq!(bench.moves, 3);
        // Depth 1 searches every root move once
        assert!(bench.nodes >= 20);
        assert_eq!(start, Board::new());
    }

    #[test]
    fn test_search_benchmark_stops_when_game_is_over() {
        let mated = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let bench = benchmark_search(&mated, 2, 3);
        assert_eq!(bench.moves, 0);
        assert_eq!(bench.nodes, 0);
        assert_eq!(bench.time_per_move(), Duration::ZERO);
        assert_eq!(bench.nodes_per_second(), 0.0);
    }

    #[test]
    fn test_match_score_and_elo() {
        let even = MatchResult { wins: 1, draws: 1, losses: 1 };
        assert_eq!(even.total_games(), 3);
        assert_eq!(even.score(), 0.5);
        assert_eq!(even.elo_difference(), Some(0.0));

        let ahead = MatchResult { wins: 3, draws: 0, losses: 1 };
        assert_eq!(ahead.score(), 0.75);
        let elo = ahead.elo_difference().unwrap();
        assert!((elo - 190.85).abs() < 0.1, "{}", elo);

        let sweep = MatchResult { wins: 2, draws: 0, losses: 0 };
        assert_eq!(sweep.elo_difference(), None);
        assert_eq!(MatchResult::default().score(), 0.5);
    }

    #[test]
    fn test_match_with_ply_limit_is_drawn() {
        let config = MatchConfig {
            games: 2,
            max_plies: 4,
            alternate_colors: true,
        };
        let result = play_match(&Board::new(), 1, 1, &config).unwrap();
        assert_eq!(result, MatchResult { wins: 0, draws: 2, losses: 0 });
    }

    #[test]
    fn test_match_tallies_from_first_engine() {
        let start = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();

        let white_every_game = MatchConfig {
            games: 2,
            max_plies: 10,
            alternate_colors: false,
        };
        let result = play_match(&start, 2, 1, &white_every_game).unwrap();
        assert_eq!(result, MatchResult { wins: 2, draws: 0, losses: 0 });

        // With colors swapped the second engine gets White and mates at once
        let alternating = MatchConfig {
            alternate_colors: true,
            ..white_every_game
        };
        let result = play_match(&start, 2, 1, &alternating).unwrap();
        assert_eq!(result, MatchResult { wins: 1, draws: 0, losses: 1 });
    }
}
