//! battle.rs：
//! - 負責戰鬥流程與回合管理：行動順序、移動分段推進、回合結束時的牌堆與能量重置。
//! - 移動以離散步數建模：begin_move 規劃路徑，每次 tick_move 走一步。
//! - 不負責單一效果結算（見 action/card.rs）與棋盤初始化。
use crate::*;

#[derive(Debug, Clone, Default)]
pub struct Battle {
    pub turn_order: Vec<PieceID>,
    pub current_turn_index: usize,
    move_path: Vec<Pos>,
    move_index: usize,
}

/// 單次 tick 的移動結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTick {
    /// 沒有進行中的移動
    Idle,
    /// 走了一步，尚未到達
    Stepped(Pos),
    /// 走完最後一步
    Finished(Pos),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleResult {
    Ongoing,
    /// 敵方全滅
    Victory,
    /// 我方全滅
    Defeat,
}

/// 回合交替的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub ended: PieceID,
    pub next: PieceID,
    /// 結束方棄掉的手牌數
    pub discarded: usize,
    /// 新回合抽到的手牌數
    pub drawn: usize,
}

impl Battle {
    pub fn new(turn_order: Vec<PieceID>) -> Self {
        Battle {
            turn_order,
            current_turn_index: 0,
            move_path: Vec::new(),
            move_index: 0,
        }
    }

    pub fn current_piece_id(&self) -> Option<&PieceID> {
        self.turn_order.get(self.current_turn_index)
    }

    /// 開始移動當前棋子
    /// 目的地必須在其移動範圍的可達格內；移動中的棋子不可再下移動指令
    pub fn begin_move(&mut self, board: &mut Board, dst: Pos) -> Result<(), Error> {
        let func = "Battle::begin_move";

        let piece_id = *self
            .current_piece_id()
            .ok_or(Error::NoActingPiece { func })?;
        let src = board
            .piece_to_pos(&piece_id)
            .ok_or(Error::NoSuchPiece { func, piece_id })?;
        let piece = board
            .pieces
            .get(&piece_id)
            .ok_or(Error::NoSuchPiece { func, piece_id })?;
        if piece.is_moving {
            return Err(Error::PieceMoving { func, piece_id });
        }
        if !accessible_tiles(board, src, piece.move_range).contains(&dst) {
            return Err(Error::NotReachable { func, pos: dst });
        }
        let path = find_path(board, src, dst);
        if path.len() <= 1 {
            // 原地或不可達都不觸發移動
            return Err(Error::NotReachable { func, pos: dst });
        }
        self.move_path = path[1..].to_vec();
        self.move_index = 0;
        if let Some(piece) = board.pieces.get_mut(&piece_id) {
            piece.is_moving = true;
        }
        Ok(())
    }

    /// 計時器 tick：讓移動中的棋子前進一步
    /// 一個 tick 內只有一個棋子移動一步
    pub fn tick_move(&mut self, board: &mut Board) -> Result<MoveTick, Error> {
        let func = "Battle::tick_move";

        if self.move_path.is_empty() {
            return Ok(MoveTick::Idle);
        }
        let piece_id = *self
            .current_piece_id()
            .ok_or(Error::NoActingPiece { func })?;
        let from = board
            .piece_to_pos(&piece_id)
            .ok_or(Error::NoSuchPiece { func, piece_id })?;
        let to = self.move_path[self.move_index];
        move_piece(board, from, to).map_err(|e| Error::Wrap {
            func,
            source: Box::new(e),
        })?;
        tracing::debug!(piece = piece_id, x = to.x, y = to.y, "move step");
        if self.move_index == self.move_path.len() - 1 {
            self.move_path.clear();
            self.move_index = 0;
            if let Some(piece) = board.pieces.get_mut(&piece_id) {
                piece.is_moving = false;
            }
            Ok(MoveTick::Finished(to))
        } else {
            self.move_index += 1;
            Ok(MoveTick::Stepped(to))
        }
    }

    /// 由當前棋子出牌，並清理被擊倒者的行動順序
    pub fn play_card(
        &mut self,
        board: &mut Board,
        hand_index: usize,
        target: Option<Pos>,
    ) -> Result<Vec<String>, Error> {
        let func = "Battle::play_card";

        let piece_id = *self
            .current_piece_id()
            .ok_or(Error::NoActingPiece { func })?;
        let msgs =
            crate::action::play_card(board, piece_id, hand_index, target).map_err(|e| {
                Error::Wrap {
                    func,
                    source: Box::new(e),
                }
            })?;
        self.prune_turn_order(board);
        Ok(msgs)
    }

    /// 結束回合：當前成員整手牌進棄牌堆，換下一位並重置其回合資源
    pub fn end_turn(&mut self, board: &mut Board) -> Result<TurnReport, Error> {
        let func = "Battle::end_turn";

        let ended = *self
            .current_piece_id()
            .ok_or(Error::NoActingPiece { func })?;
        let ending_piece = board
            .pieces
            .get_mut(&ended)
            .ok_or(Error::NoSuchPiece { func, piece_id: ended })?;
        if ending_piece.is_moving {
            return Err(Error::PieceMoving {
                func,
                piece_id: ended,
            });
        }
        let discarded = ending_piece.cards.discard_hand();

        self.current_turn_index = (self.current_turn_index + 1) % self.turn_order.len();
        let next = *self
            .current_piece_id()
            .ok_or(Error::NoActingPiece { func })?;

        // 新回合重置：能量回滿、防禦歸零、補抽手牌
        let mut drawn = 0;
        if let Some(piece) = board.pieces.get_mut(&next) {
            piece.energy = piece.energy_max;
            piece.defense = 0;
            if piece.is_party() {
                drawn = piece.cards.draw(DRAW_PER_TURN);
            }
        }
        tracing::debug!(ended, next, discarded, drawn, "turn changed");
        Ok(TurnReport {
            ended,
            next,
            discarded,
            drawn,
        })
    }

    /// 把已不在場上的棋子移出行動順序，並維持當前棋子不變
    pub fn prune_turn_order(&mut self, board: &Board) {
        let current = self.current_piece_id().copied();
        self.turn_order.retain(|id| board.pieces.contains_key(id));
        match current.and_then(|cur| self.turn_order.iter().position(|id| *id == cur)) {
            Some(idx) => self.current_turn_index = idx,
            None => {
                if self.turn_order.is_empty() {
                    self.current_turn_index = 0;
                } else {
                    self.current_turn_index %= self.turn_order.len();
                }
            }
        }
    }

    /// 勝負判定：一方戰鬥單位全滅即結束
    pub fn battle_result(&self, board: &Board) -> BattleResult {
        let any_party = board.pieces.values().any(Piece::is_party);
        let any_enemy = board.pieces.values().any(Piece::is_enemy);
        match (any_party, any_enemy) {
            (false, _) => BattleResult::Defeat,
            (_, false) => BattleResult::Victory,
            _ => BattleResult::Ongoing,
        }
    }
}
