use super::{Bitboard, BoardState, CastleSide, Color, Piece, Role, Square};

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Check status of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckState {
    None,
    Check,
    Checkmate,
    Stalemate,
}

impl CheckState {
    /// No further moves are possible.
    #[inline]
    pub const fn is_game_over(self) -> bool {
        matches!(self, CheckState::Checkmate | CheckState::Stalemate)
    }
}

/// A fully legal move, with the promotion piece filled in for promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegalMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl BoardState {
    /// Legal destinations of the piece at `index`.
    ///
    /// Empty when the square is empty or holds a piece of the side not to move.
    pub fn compute_valid_moves(&self, index: usize) -> Result<Bitboard, crate::ChessError> {
        let from = Square::try_from(index)?;
        Ok(self.valid_moves(from))
    }

    /// Legal destinations of the piece on `from`, with king safety applied.
    pub fn valid_moves(&self, from: Square) -> Bitboard {
        let Some(piece) = self.piece_on(from) else {
            return Bitboard::EMPTY;
        };
        if piece.color != self.turn {
            return Bitboard::EMPTY;
        }

        let mut destinations: Bitboard = self
            .pseudo_destinations(from, piece)
            .filter(|&to| self.leaves_king_safe(from, to))
            .collect();
        if piece.role == Role::King {
            destinations |= self.castling_destinations(from);
        }
        destinations
    }

    /// All legal moves of the side to move, promotions expanded per piece.
    pub fn legal_moves(&self) -> Vec<LegalMove> {
        let mut moves = Vec::new();
        for from in self.occupied_by(self.turn) {
            for to in self.valid_moves(from) {
                if self.is_promotion(from, to) {
                    moves.extend(Role::PROMOTIONS.map(|role| LegalMove {
                        from,
                        to,
                        promotion: Some(role),
                    }));
                } else {
                    moves.push(LegalMove {
                        from,
                        to,
                        promotion: None,
                    });
                }
            }
        }
        moves
    }

    pub fn has_legal_move(&self) -> bool {
        self.occupied_by(self.turn)
            .any(|from| !self.valid_moves(from).is_empty())
    }

    /// Count leaf nodes of the legal move tree to `depth` plies.
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .into_iter()
            .map(|mv| {
                self.play_unchecked(mv.from, mv.to, mv.promotion)
                    .state
                    .perft(depth - 1)
            })
            .sum()
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| *p == Piece::new(color, Role::King))
            .map(|(sq, _)| sq)
    }

    /// Pieces of color `by` that attack `target`.
    pub fn attackers_of(&self, target: Square, by: Color) -> Bitboard {
        let holds = |square: Square, roles: &[Role]| {
            self.piece_on(square)
                .is_some_and(|p| p.color == by && roles.contains(&p.role))
        };

        let mut attackers = Bitboard::EMPTY;
        for (files, rows) in KNIGHT_STEPS {
            if let Some(sq) = target.offset(files, rows)
                && holds(sq, &[Role::Knight])
            {
                attackers.insert(sq);
            }
        }
        for (files, rows) in KING_STEPS {
            if let Some(sq) = target.offset(files, rows)
                && holds(sq, &[Role::King])
            {
                attackers.insert(sq);
            }
        }
        // A pawn attacks diagonally forward, so look one row behind the target.
        for files in [-1, 1] {
            if let Some(sq) = target.offset(files, -by.forward())
                && holds(sq, &[Role::Pawn])
            {
                attackers.insert(sq);
            }
        }
        for dir in ROOK_DIRS {
            if let Some(sq) = self.first_blocker(target, dir)
                && holds(sq, &[Role::Rook, Role::Queen])
            {
                attackers.insert(sq);
            }
        }
        for dir in BISHOP_DIRS {
            if let Some(sq) = self.first_blocker(target, dir)
                && holds(sq, &[Role::Bishop, Role::Queen])
            {
                attackers.insert(sq);
            }
        }
        attackers
    }

    #[inline]
    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        !self.attackers_of(target, by).is_empty()
    }

    /// Pieces giving check to the side to move.
    pub fn checkers(&self) -> Bitboard {
        self.king_square(self.turn)
            .map_or(Bitboard::EMPTY, |king| self.attackers_of(king, self.turn.other()))
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        !self.checkers().is_empty()
    }

    pub fn outcome(&self) -> CheckState {
        match (self.is_check(), self.has_legal_move()) {
            (true, true) => CheckState::Check,
            (true, false) => CheckState::Checkmate,
            (false, false) => CheckState::Stalemate,
            (false, true) => CheckState::None,
        }
    }

    /// A pawn move onto the far row.
    pub fn is_promotion(&self, from: Square, to: Square) -> bool {
        self.piece_on(from).is_some_and(|p| {
            p.role == Role::Pawn && to.row() == p.color.other().back_row()
        })
    }

    fn first_blocker(&self, from: Square, (files, rows): (i8, i8)) -> Option<Square> {
        let mut current = from;
        loop {
            current = current.offset(files, rows)?;
            if self.piece_on(current).is_some() {
                return Some(current);
            }
        }
    }

    /// Empty squares along a ray plus the first occupied square, whatever its color.
    fn ray(&self, from: Square, (files, rows): (i8, i8)) -> impl Iterator<Item = Square> + '_ {
        let mut current = Some(from);
        let mut blocked = false;
        std::iter::from_fn(move || {
            if blocked {
                return None;
            }
            let next = current?.offset(files, rows)?;
            current = Some(next);
            blocked = self.piece_on(next).is_some();
            Some(next)
        })
    }

    /// Destinations ignoring king safety and castling.
    fn pseudo_destinations(&self, from: Square, piece: Piece) -> Bitboard {
        let not_own = |sq: &Square| self.piece_on(*sq).is_none_or(|p| p.color != piece.color);

        match piece.role {
            Role::Pawn => self.pawn_destinations(from, piece.color),
            Role::Knight => KNIGHT_STEPS
                .iter()
                .filter_map(|&(f, r)| from.offset(f, r))
                .filter(not_own)
                .collect(),
            Role::King => KING_STEPS
                .iter()
                .filter_map(|&(f, r)| from.offset(f, r))
                .filter(not_own)
                .collect(),
            Role::Rook => self.slides(from, &ROOK_DIRS).filter(not_own).collect(),
            Role::Bishop => self.slides(from, &BISHOP_DIRS).filter(not_own).collect(),
            Role::Queen => self
                .slides(from, &ROOK_DIRS)
                .chain(self.slides(from, &BISHOP_DIRS))
                .filter(not_own)
                .collect(),
        }
    }

    fn slides<'a>(
        &'a self,
        from: Square,
        dirs: &'a [(i8, i8)],
    ) -> impl Iterator<Item = Square> + 'a {
        dirs.iter().flat_map(move |&dir| self.ray(from, dir))
    }

    fn pawn_destinations(&self, from: Square, color: Color) -> Bitboard {
        let forward = color.forward();
        let mut destinations = Bitboard::EMPTY;

        if let Some(one) = from.offset(0, forward)
            && self.piece_on(one).is_none()
        {
            destinations.insert(one);
            let start_row = color.back_row() as i8 + forward;
            if from.row() as i8 == start_row
                && let Some(two) = one.offset(0, forward)
                && self.piece_on(two).is_none()
            {
                destinations.insert(two);
            }
        }

        for files in [-1, 1] {
            let Some(target) = from.offset(files, forward) else {
                continue;
            };
            if self.piece_on(target).is_some_and(|p| p.color != color) {
                destinations.insert(target);
            }
            // En passant: the double-pushed pawn sits beside us, capture lands behind it.
            if let Some(ep) = self.en_passantable
                && ep.row() == from.row()
                && ep.file() == target.file()
                && self.piece_on(ep) == Some(Piece::new(color.other(), Role::Pawn))
                && self.piece_on(target).is_none()
            {
                destinations.insert(target);
            }
        }
        destinations
    }

    /// Castling destinations for a king on `from`.
    ///
    /// The king must not be in check, and must not pass through or land on
    /// an attacked square.
    fn castling_destinations(&self, from: Square) -> Bitboard {
        let color = self.turn;
        let row = color.back_row();
        let mut destinations = Bitboard::EMPTY;

        if from != Square::at(4, row) || self.is_attacked(from, color.other()) {
            return destinations;
        }

        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if !self.castling.may_castle(color, side) {
                continue;
            }
            let (rook_file, between, path): (u8, &[u8], [u8; 2]) = match side {
                CastleSide::Kingside => (7, &[5, 6], [5, 6]),
                CastleSide::Queenside => (0, &[1, 2, 3], [3, 2]),
            };
            if self.piece_on(Square::at(rook_file, row)) != Some(Piece::new(color, Role::Rook)) {
                continue;
            }
            if between
                .iter()
                .any(|&file| self.piece_on(Square::at(file, row)).is_some())
            {
                continue;
            }
            if path
                .iter()
                .any(|&file| self.is_attacked(Square::at(file, row), color.other()))
            {
                continue;
            }
            destinations.insert(Square::at(path[1], row));
        }
        destinations
    }

    fn leaves_king_safe(&self, from: Square, to: Square) -> bool {
        let mover = self.turn;
        let after = self.play_unchecked(from, to, None).state;
        after
            .king_square(mover)
            .is_none_or(|king| !after.is_attacked(king, mover.other()))
    }
}
