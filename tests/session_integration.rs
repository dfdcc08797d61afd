use chess_session::board::{Bitboard, BoardState, CheckState, Color, MoveKind, Piece, Role, Square};
use chess_session::config::SessionConfig;
use chess_session::feedback::SquareFeedback;
use chess_session::game_logic::{GameSession, SelectionState, Tap};
use chess_session::mock::{ScriptedTaps, TerminalDisplay};
use chess_session::{BoardDisplay, ChessError};

/// Helper: parse a square name.
fn sq(s: &str) -> Square {
    s.parse().expect("valid square")
}

/// Helper: bitboard from square names.
fn squares(names: &[&str]) -> Bitboard {
    names.iter().map(|s| sq(s)).collect()
}

/// Helper: session from a FEN string with default config.
fn session_from_fen(fen: &str) -> GameSession {
    let board = BoardState::from_fen(fen).expect("valid FEN");
    GameSession::from_position(board, SessionConfig::default())
}

/// Helper: queue a script and replay it into the session.
fn play(session: &mut GameSession, script: &str) -> Option<Tap> {
    let mut taps = ScriptedTaps::new();
    taps.push_script(script).expect("valid script");
    taps.play(session).expect("script accepted")
}

// ============================================================================
// Selection and feedback
// ============================================================================

#[test]
fn selecting_pawn_highlights_origin_and_destinations() {
    let mut session = GameSession::default();

    let tap = play(&mut session, "e2").expect("tap reported");

    assert_eq!(tap.highlight(), squares(&["e3", "e4"]));
    let feedback = session.feedback();
    assert_eq!(feedback.get(sq("e2")), Some(SquareFeedback::Origin));
    assert_eq!(feedback.get(sq("e3")), Some(SquareFeedback::Destination));
    assert_eq!(feedback.get(sq("e4")), Some(SquareFeedback::Destination));
    assert_eq!(feedback.squares().len(), 3);
}

#[test]
fn selecting_opponent_piece_clears_feedback() {
    let mut session = GameSession::default();

    play(&mut session, "e2");
    let tap = play(&mut session, "e7");

    assert_eq!(tap, Some(Tap::Cleared));
    assert_eq!(session.selection(), SelectionState::Idle);
    assert!(session.feedback().is_empty());
}

#[test]
fn capture_destinations_are_marked() {
    let mut session = GameSession::default();
    play(&mut session, "e2e4. d7d5.");

    play(&mut session, "e4");

    let feedback = session.feedback();
    assert_eq!(feedback.get(sq("d5")), Some(SquareFeedback::Capture));
    assert_eq!(feedback.get(sq("e5")), Some(SquareFeedback::Destination));
}

// ============================================================================
// Undo / redo timeline
// ============================================================================

#[test]
fn undo_redo_walks_the_timeline() {
    let mut session = GameSession::default();
    play(&mut session, "e2e4. e7e5. d1h5.");
    let after_one = {
        let mut replay = GameSession::default();
        play(&mut replay, "e2e4.");
        *replay.board()
    };
    let after_two = {
        let mut replay = GameSession::default();
        play(&mut replay, "e2e4. e7e5.");
        *replay.board()
    };

    play(&mut session, "< <");
    assert_eq!(session.history().current_index(), 1);
    assert_eq!(session.history().cached_count(), 2);
    assert_eq!(*session.board(), after_one);

    play(&mut session, ">");
    assert_eq!(session.history().current_index(), 2);
    assert_eq!(*session.board(), after_two);
}

#[test]
fn new_move_discards_redo_tail() {
    let mut session = GameSession::default();
    play(&mut session, "e2e4. e7e5. d1h5.");
    play(&mut session, "< <");

    play(&mut session, "b8c6.");

    assert_eq!(session.history().current_index(), 2);
    assert!(!session.history().can_redo());
    assert_eq!(session.redo().unwrap_err(), ChessError::NoHistory);
    assert_eq!(
        session.board().piece_on(sq("c6")),
        Some(Piece::new(Color::Black, Role::Knight))
    );
}

#[test]
fn undo_at_start_is_rejected() {
    let mut session = GameSession::default();
    let mut taps = ScriptedTaps::new();
    taps.push_script("<").unwrap();

    let err = taps.play(&mut session).unwrap_err();

    assert_eq!(err.source, ChessError::NoHistory);
    assert_eq!(*session.board(), BoardState::initial_position());
}

// ============================================================================
// Special moves
// ============================================================================

#[test]
fn en_passant_removes_pushed_pawn() {
    let mut session = GameSession::default();
    play(&mut session, "e2e4. a7a6. e4e5. d7d5.");
    assert_eq!(session.board().en_passantable(), Some(sq("d5")));

    play(&mut session, "e5");
    assert_eq!(
        session.feedback().get(sq("d6")),
        Some(SquareFeedback::Capture)
    );

    let Some(Tap::Moved(report)) = play(&mut session, "d6") else {
        panic!("expected a move");
    };
    assert_eq!(report.kind, MoveKind::EnPassant);
    assert_eq!(report.captured, Some(Piece::new(Color::Black, Role::Pawn)));
    assert_eq!(session.board().piece_on(sq("d5")), None);
    assert_eq!(
        session.captured(Color::Black),
        vec![Piece::new(Color::Black, Role::Pawn)]
    );
}

#[test]
fn castling_moves_rook_and_clears_rights() {
    let mut session = session_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");

    let tap = play(&mut session, "e1").expect("tap reported");
    assert!(tap.highlight().contains(sq("g1")));
    assert!(tap.highlight().contains(sq("c1")));

    let Some(Tap::Moved(report)) = play(&mut session, "g1") else {
        panic!("expected a move");
    };
    assert_eq!(report.kind, MoveKind::CastleKingside);
    assert_eq!(
        session.board().piece_on(sq("f1")),
        Some(Piece::new(Color::White, Role::Rook))
    );
    assert_eq!(session.board().piece_on(sq("h1")), None);
    assert!(
        !session
            .board()
            .castling_rights()
            .may_castle(Color::White, chess_session::board::CastleSide::Queenside)
    );
}

#[test]
fn castling_through_attacked_square_is_not_offered() {
    // Black rook on f8 covers f1
    let mut session = session_from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");

    let tap = play(&mut session, "e1").expect("tap reported");

    assert!(!tap.highlight().contains(sq("g1")));
    assert!(tap.highlight().contains(sq("c1")));
}

#[test]
fn promotion_waits_for_piece_choice() {
    let mut session = session_from_fen("8/P7/8/8/8/8/k7/4K3 w - - 0 1");

    let tap = play(&mut session, "a7 a8");
    assert_eq!(
        tap,
        Some(Tap::AwaitingPromotion {
            from: sq("a7"),
            to: sq("a8"),
        })
    );
    assert_eq!(session.make_move(52, 44, None), Err(ChessError::PromotionPending));

    let Some(Tap::Moved(report)) = play(&mut session, "=Q") else {
        panic!("expected a move");
    };
    assert_eq!(report.kind, MoveKind::Promotion);
    assert_eq!(report.outcome, CheckState::Check);
    assert_eq!(
        session.board().piece_on(sq("a8")),
        Some(Piece::new(Color::White, Role::Queen))
    );
}

#[test]
fn auto_promotion_skips_the_picker() {
    let board = BoardState::from_fen("8/P7/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    let config = SessionConfig::default().with_auto_promotion(Role::Knight);
    let mut session = GameSession::from_position(board, config);

    let tap = play(&mut session, "a7 a8");

    assert!(matches!(tap, Some(Tap::Moved(_))));
    assert_eq!(
        session.board().piece_on(sq("a8")),
        Some(Piece::new(Color::White, Role::Knight))
    );
}

// ============================================================================
// Check and game end
// ============================================================================

#[test]
fn fools_mate_is_checkmate_with_check_feedback() {
    let mut session = GameSession::default();

    let Some(Tap::Moved(report)) = play(&mut session, "f2f3. e7e5. g2g4. d8h4.") else {
        panic!("expected a move");
    };

    assert_eq!(report.outcome, CheckState::Checkmate);
    assert_eq!(session.status().to_string(), "Checkmate, Black wins");
    let feedback = session.feedback();
    assert_eq!(feedback.get(sq("e1")), Some(SquareFeedback::Check));
    assert_eq!(feedback.get(sq("h4")), Some(SquareFeedback::Checker));

    // No white piece has a move
    for square in session.board().occupied_by(Color::White) {
        assert!(session.board().valid_moves(square).is_empty());
    }
}

#[test]
fn pinned_piece_cannot_leave_the_pin() {
    // White knight on e2 pinned by rook on e8
    let mut session = session_from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");

    let tap = play(&mut session, "e2").expect("tap reported");

    assert_eq!(tap.highlight(), Bitboard::EMPTY);
    assert_eq!(
        session.make_move(sq("e2").index(), sq("c3").index(), None),
        Err(ChessError::IllegalMove {
            from: sq("e2"),
            to: sq("c3"),
        })
    );
}

// ============================================================================
// Persistence and display
// ============================================================================

#[test]
fn serialized_board_restores_position() {
    let mut session = GameSession::default();
    play(&mut session, "e2e4. c7c5. e4e5. d7d5.");
    let record = session.serialize_board();

    let mut restored = GameSession::default();
    restored.deserialize_board(&record).unwrap();

    assert_eq!(restored.board(), session.board());
    assert_eq!(restored.history().current_index(), 0);
    assert_eq!(restored.board().en_passantable(), Some(sq("d5")));
}

#[test]
fn save_slots_survive_further_play() {
    let mut session = GameSession::default();
    play(&mut session, "e2e4.");
    session.save(0).unwrap();
    play(&mut session, "e7e5.");

    session.load(0).unwrap();

    assert_eq!(session.board().turn(), Color::Black);
    assert_eq!(session.board().piece_on(sq("e5")), None);
    assert_eq!(session.slot_titles()[0], "Slot 1: Black to move");
    assert_eq!(session.slot_titles()[1], "Slot 2: empty");
    assert_eq!(session.load(1), Err(ChessError::EmptySlot(1)));
    assert_eq!(session.save(9), Err(ChessError::NoSuchSlot(9)));
}

#[test]
fn render_shows_selection_on_terminal() {
    let mut session = GameSession::default();
    play(&mut session, "g1");
    let mut display = TerminalDisplay::with_writer(Vec::new());

    session.render(&mut display).unwrap();

    let output = String::from_utf8(display.into_inner()).unwrap();
    assert!(output.contains("\x1b[42m N \x1b[0m"), "origin in green");
    assert_eq!(output.matches("\x1b[44m").count(), 2, "f3 and h3 in blue");
}

#[test]
fn display_trait_accepts_any_board() {
    let board = BoardState::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
    let mut display = TerminalDisplay::with_writer(Vec::new());

    display
        .show(&board, &chess_session::feedback::BoardFeedback::new())
        .unwrap();

    let output = String::from_utf8(display.into_inner()).unwrap();
    assert!(output.lines().nth(7).unwrap().contains(" K "));
}
