// 戰鬥邏輯錯誤型別，攜帶 function name 與 context，支援來源錯誤巢狀
use crate::*;
use cards_lib::CardName;
use thiserror::Error;

/// 戰鬥核心錯誤型別
#[derive(Debug, Error)]
pub enum Error {
    #[error("`{func}`: 解析失敗: {detail}")]
    ParseError { func: &'static str, detail: String },

    #[error("`{func}`: 位置 {pos:?} 不存在")]
    NoTileAtPos { func: &'static str, pos: Pos },

    #[error("`{func}`: 位置 {pos:?} 無棋子")]
    NoPieceAtPos { func: &'static str, pos: Pos },

    #[error("`{func}`: 棋子 {piece_id} 不存在")]
    NoSuchPiece { func: &'static str, piece_id: PieceID },

    #[error("`{func}`: 棋子 {piece_id} 已在場上")]
    PieceExists { func: &'static str, piece_id: PieceID },

    #[error("`{func}`: 位置 {pos:?} 已被佔用")]
    PosOccupied { func: &'static str, pos: Pos },

    #[error("`{func}`: 棋子 {piece_id} 不在 {pos:?}")]
    PieceNotAtPos {
        func: &'static str,
        piece_id: PieceID,
        pos: Pos,
    },

    #[error("`{func}`: 目標 {pos:?} 不可到達")]
    NotReachable { func: &'static str, pos: Pos },

    #[error("`{func}`: 棋子 {piece_id} 移動中")]
    PieceMoving { func: &'static str, piece_id: PieceID },

    #[error("`{func}`: 無行動中的棋子")]
    NoActingPiece { func: &'static str },

    #[error("`{func}`: 沒有可放置棋子的空格")]
    BoardFull { func: &'static str },

    #[error("`{func}`: 棋子 {piece_id} 沒有牌組")]
    NoCards { func: &'static str, piece_id: PieceID },

    #[error("`{func}`: 手牌沒有第 {index} 張")]
    NoSuchCard { func: &'static str, index: usize },

    #[error("`{func}`: 能量不足以打出 {card}: {energy} < {cost}")]
    NotEnoughEnergy {
        func: &'static str,
        card: CardName,
        energy: i32,
        cost: i32,
    },

    #[error("`{func}`: 卡牌 {card} 需要指定目標")]
    NoTargetSelected { func: &'static str, card: CardName },

    #[error("`{func}`: 卡牌 {card} 無法作用於 {pos:?}，超出射程")]
    TargetOutOfRange {
        func: &'static str,
        card: CardName,
        pos: Pos,
    },

    #[error("`{func}`: 卡牌 {card} 目標不符: {detail}")]
    WrongTargetKind {
        func: &'static str,
        card: CardName,
        detail: String,
    },

    #[error("`{func}`: 包裝: {source}")]
    Wrap {
        func: &'static str,
        #[source]
        source: Box<Error>,
    },
}

pub fn root_error(err: &Error) -> &Error {
    let mut err = err;
    while let Error::Wrap { source, .. } = err {
        err = source.as_ref();
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_error_unwraps_nested() {
        let inner = Error::NotReachable {
            func: "a",
            pos: Pos { x: 1, y: 2 },
        };
        let wrapped = Error::Wrap {
            func: "b",
            source: Box::new(Error::Wrap {
                func: "c",
                source: Box::new(inner),
            }),
        };
        assert!(matches!(
            root_error(&wrapped),
            Error::NotReachable { func: "a", .. }
        ));
    }

    #[test]
    fn test_error_display_contains_func() {
        let err = Error::PosOccupied {
            func: "place_piece_at",
            pos: Pos { x: 3, y: 4 },
        };
        let msg = err.to_string();
        assert!(msg.contains("place_piece_at"), "{msg}");
        assert!(msg.contains("3"), "{msg}");
    }
}
