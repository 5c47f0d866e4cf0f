//! movement.rs：
//! - 負責棋子移動相關邏輯（可達範圍、最短路徑、單步移動）。
//! - 僅處理移動本身，不負責卡牌判定或回合流程。
//! - 四方向移動、無斜角，單步成本固定為 1。
use crate::*;
use std::collections::{BTreeSet, HashMap};

/// 檢查位置的地形是否可站立（不處理棋子阻擋）
pub fn is_tile_ground(board: &Board, pos: Pos) -> bool {
    board.get_tile(pos).is_some_and(Tile::is_ground)
}

/// 提供移動邏輯用的棋盤視圖，實作 PathfindingBoard 供路徑搜尋演算法使用
/// 被任何棋子佔據的格子一律視為阻擋（起點除外，起點不會被詢問）
struct BlockedBoardView<'a> {
    board: &'a Board,
    max_steps: Steps,
}

impl PathfindingBoard for BlockedBoardView<'_> {
    /// 判斷座標是否合法
    fn is_valid(&self, pos: Pos) -> bool {
        is_tile_ground(self.board, pos)
    }

    /// 判斷座標是否可通行（不可超出步數上限，不可穿越任何棋子）
    fn is_passable(&self, _active_piece_pos: Pos, pos: Pos, total: Steps) -> bool {
        if total > self.max_steps {
            return false;
        }
        self.board.pos_to_piece(pos).is_none()
    }

    /// 取得座標移動成本
    fn get_cost(&self, _pos: Pos) -> Steps {
        1
    }

    /// 取得鄰近座標（上下左右）
    fn get_neighbors(&self, pos: Pos) -> Vec<Pos> {
        let dirs = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        dirs.into_iter()
            .map(|(dx, dy)| (dx + pos.x as isize, dy + pos.y as isize))
            .filter_map(|(x, y)| {
                if x >= 0 && y >= 0 {
                    Some((x as usize, y as usize))
                } else {
                    None
                }
            })
            .map(|(x, y)| Pos { x, y })
            .collect()
    }
}

/// 計算 range 步內的可達範圍
/// 排除被其他棋子佔據的格子，起點必定包含在內
pub fn accessible_tiles(board: &Board, src: Pos, range: Steps) -> BTreeSet<Pos> {
    let view = BlockedBoardView {
        board,
        max_steps: range,
    };
    dijkstra(&view, src).into_keys().collect()
}

/// 計算 src 到 dst 的最短路徑（含起點）
/// 被佔據的非起點格子視為阻擋；不可達時回傳空 Vec
pub fn find_path(board: &Board, src: Pos, dst: Pos) -> Vec<Pos> {
    if src == dst {
        return vec![src];
    }
    let view = BlockedBoardView {
        board,
        max_steps: MAX_MOVE_STEPS,
    };
    let map = dijkstra(&view, src);
    reconstruct_path(&map, src, dst).unwrap_or_default()
}

pub fn reconstruct_path(
    map: &HashMap<Pos, (Steps, Pos)>,
    from: Pos,
    to: Pos,
) -> Result<Vec<Pos>, Error> {
    let func = "reconstruct_path";

    let mut path = Vec::new();
    let mut current = to;
    while current != from {
        let Some((_, prev)) = map.get(&current) else {
            return Err(Error::NotReachable { func, pos: to });
        };
        path.push(current);
        current = *prev;
    }
    path.push(from);
    path.reverse();
    Ok(path)
}

/// 將 from 的棋子移動一步到 to，同步佔據表並更新面向
pub fn move_piece(board: &mut Board, from: Pos, to: Pos) -> Result<(), Error> {
    let func = "move_piece";

    if from == to {
        return Ok(()); // 不需要移動
    }
    if !is_tile_ground(board, to) {
        return Err(Error::NoTileAtPos { func, pos: to });
    }
    let piece_id = match board.pos_to_piece(from) {
        Some(id) => id,
        None => return Err(Error::NoPieceAtPos { func, pos: from }),
    };
    board
        .piece_map
        .move_piece(piece_id, from, to)
        .map_err(|e| Error::Wrap {
            func,
            source: Box::new(e),
        })?;
    if let Some(piece) = board.pieces.get_mut(&piece_id) {
        piece.facing = Facing::from_step(from, to);
    }
    Ok(())
}
