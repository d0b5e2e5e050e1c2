use std::io::Cursor;

use checkmate::{parse_move, AiPlayer, Board, Color, Game, GameResult, HumanPlayer, RandomPlayer};

fn play_all(game: &mut Game, moves: &[&str]) {
    for text in moves {
        game.play_move(parse_move(text).unwrap()).unwrap();
    }
}

#[test]
fn fools_mate() {
    let mut game = Game::new();
    play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(game.result(), GameResult::BlackWins);
    assert!(game.board().is_checkmate(Color::White));
    assert_eq!(
        game.board().to_fen(),
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
    );
}

#[test]
fn scholars_mate() {
    let mut game = Game::new();
    play_all(&mut game, &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"]);

    assert_eq!(game.result(), GameResult::WhiteWins);
    assert_eq!(
        game.board().to_fen(),
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4"
    );
}

#[test]
fn scripted_players_through_run() {
    let mut game = Game::new();
    let mut white = HumanPlayer::new(Color::White, Cursor::new("e2e4\nf1c4\nd1h5\nh5f7\n"), Vec::new());
    let mut black = HumanPlayer::new(Color::Black, Cursor::new("e7e5\nb8c6\ng8f6\n"), Vec::new());

    let mut plies = 0;
    let result = game.run(&mut white, &mut black, None, |_, _| plies += 1).unwrap();
    assert_eq!(result, GameResult::WhiteWins);
    assert_eq!(plies, 7);
}

#[test]
fn engine_finds_mate_in_one() {
    let board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut game = Game::from_board(board);
    let mut white = AiPlayer::new(Color::White, 2);
    let mut black = AiPlayer::new(Color::Black, 2);

    let result = game.run(&mut white, &mut black, Some(10), |_, _| {}).unwrap();
    assert_eq!(result, GameResult::WhiteWins);
    assert_eq!(game.board().history_len(), 1);
}

#[test]
fn engine_vs_engine_respects_ply_limit() {
    let mut game = Game::new();
    let mut white = AiPlayer::new(Color::White, 1);
    let mut black = AiPlayer::new(Color::Black, 1);

    let result = game.run(&mut white, &mut black, Some(6), |_, _| {}).unwrap();
    assert_eq!(result, GameResult::Ongoing);
    assert_eq!(game.board().history_len(), 6);
    assert_eq!(game.board().current_player(), Color::White);
}

#[test]
fn engine_vs_random_only_plays_legal_moves() {
    let mut game = Game::new();
    let mut white = AiPlayer::new(Color::White, 1);
    let mut black = RandomPlayer::with_seed(Color::Black, 2024);

    let mut replay = Board::new();
    game.run(&mut white, &mut black, Some(20), |board, mv| {
        assert!(replay.legal_moves(replay.current_player()).contains(mv));
        replay.make_move(*mv);
        assert_eq!(&replay, board);
    })
    .unwrap();
}
