use crate::*;

/// 隨機挑一個未被佔據的 Ground 格放置棋子
/// 重抽迴圈：抽到被佔據的格子就重抽，只要還有空格便保證終止
pub fn place_piece_random(
    board: &mut Board,
    piece: Piece,
    rng: &mut impl rand::Rng,
) -> Result<Pos, Error> {
    let func = "place_piece_random";

    let cells = board.available_cells();
    if !cells.iter().any(|c| board.pos_to_piece(*c).is_none()) {
        return Err(Error::BoardFull { func });
    }
    let mut cell = cells[rng.random_range(0..cells.len())];
    while board.pos_to_piece(cell).is_some() {
        cell = cells[rng.random_range(0..cells.len())];
    }
    place_piece_at(board, piece, cell).map_err(|e| Error::Wrap {
        func,
        source: Box::new(e),
    })?;
    Ok(cell)
}

/// 把棋子放到指定格（關卡設定或測試用）
pub fn place_piece_at(board: &mut Board, piece: Piece, pos: Pos) -> Result<(), Error> {
    let func = "place_piece_at";

    if !is_tile_ground(board, pos) {
        return Err(Error::NoTileAtPos { func, pos });
    }
    if board.pieces.contains_key(&piece.id) {
        return Err(Error::PieceExists {
            func,
            piece_id: piece.id,
        });
    }
    board
        .piece_map
        .insert(piece.id, pos)
        .map_err(|e| Error::Wrap {
            func,
            source: Box::new(e),
        })?;
    board.pieces.insert(piece.id, piece);
    Ok(())
}
