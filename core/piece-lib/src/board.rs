use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use strum_macros::{Display, EnumIter};

/// 格子種類：Ground 可站立，Void 為等角地圖上的破洞
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, Display, EnumIter, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    #[default]
    Ground,
    Void,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile {
    #[serde(default)]
    pub kind: TileKind,
}

impl Tile {
    pub fn is_ground(&self) -> bool {
        self.kind == TileKind::Ground
    }
}

// config 欄位需要排序
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BoardConfig {
    pub tiles: Vec<Vec<Tile>>,
    #[serde(default, with = "pieceid_key_map")]
    pub pieces: BTreeMap<PieceID, PieceMarker>,
}

#[derive(Debug, Default)]
pub struct Board {
    pub tiles: Vec<Vec<Tile>>,
    pub pieces: HashMap<PieceID, Piece>,
    pub piece_map: PieceMap,
}

impl Board {
    pub fn from_config(config: BoardConfig) -> Result<Self, Error> {
        let func = "Board::from_config";

        let mut board = Board {
            tiles: config.tiles,
            ..Default::default()
        };
        for (piece_id, marker) in config.pieces {
            let piece = Piece::from_marker(piece_id, &marker);
            place_piece_at(&mut board, piece, marker.pos).map_err(|e| Error::Wrap {
                func,
                source: Box::new(e),
            })?;
        }
        Ok(board)
    }

    pub fn pos_to_piece(&self, pos: Pos) -> Option<PieceID> {
        self.piece_map.get_piece(pos)
    }

    pub fn piece_to_pos(&self, piece_id: &PieceID) -> Option<Pos> {
        self.piece_map.get_pos(*piece_id)
    }

    /// 所有可站立的格子座標，依列優先排序
    pub fn available_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if tile.is_ground() {
                    cells.push(Pos { x, y });
                }
            }
        }
        cells
    }

    /// 把棋子從場上完全移除（佔據表與棋子表）
    pub fn remove_piece(&mut self, piece_id: PieceID) -> Option<Piece> {
        self.piece_map.remove(piece_id);
        self.pieces.remove(&piece_id)
    }
}

// $t:ty: 匹配型別
macro_rules! impl_board {
    ($t:ty) => {
        impl $t {
            pub fn width(&self) -> usize {
                self.tiles.first().map_or(0, |row| row.len())
            }

            pub fn height(&self) -> usize {
                self.tiles.len()
            }

            pub fn get_tile(&self, pos: Pos) -> Option<&Tile> {
                let Pos { x, y } = pos;
                self.tiles.get(y)?.get(x)
            }

            pub fn get_tile_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
                let Pos { x, y } = pos;
                self.tiles.get_mut(y)?.get_mut(x)
            }
        }
    };
}

impl_board!(BoardConfig);
impl_board!(Board);

/// 佔據表：pos ↔ piece 雙向映射，每格至多一個棋子
#[derive(Debug, Default)]
pub struct PieceMap {
    pos_to_piece: HashMap<Pos, PieceID>,
    piece_to_pos: HashMap<PieceID, Pos>,
}

impl PieceMap {
    pub fn insert(&mut self, piece_id: PieceID, pos: Pos) -> Result<(), Error> {
        let func = "PieceMap::insert";

        if self.pos_to_piece.contains_key(&pos) {
            return Err(Error::PosOccupied { func, pos });
        }
        if self.piece_to_pos.contains_key(&piece_id) {
            return Err(Error::PieceExists { func, piece_id });
        }
        self.pos_to_piece.insert(pos, piece_id);
        self.piece_to_pos.insert(piece_id, pos);
        Ok(())
    }

    pub fn move_piece(&mut self, piece_id: PieceID, from: Pos, to: Pos) -> Result<(), Error> {
        let func = "PieceMap::move_piece";

        if self.piece_to_pos.get(&piece_id) != Some(&from) {
            return Err(Error::PieceNotAtPos {
                func,
                piece_id,
                pos: from,
            });
        }
        if self.pos_to_piece.contains_key(&to) {
            return Err(Error::PosOccupied { func, pos: to });
        }
        self.pos_to_piece.remove(&from);
        self.pos_to_piece.insert(to, piece_id);
        self.piece_to_pos.insert(piece_id, to);
        Ok(())
    }

    pub fn remove(&mut self, piece_id: PieceID) -> Option<Pos> {
        let pos = self.piece_to_pos.remove(&piece_id)?;
        self.pos_to_piece.remove(&pos);
        Some(pos)
    }

    pub fn get_piece(&self, pos: Pos) -> Option<PieceID> {
        self.pos_to_piece.get(&pos).copied()
    }

    pub fn get_pos(&self, piece_id: PieceID) -> Option<Pos> {
        self.piece_to_pos.get(&piece_id).copied()
    }
}

// 讓 BTreeMap<PieceID, PieceMarker> 可以用 string key 序列化
mod pieceid_key_map {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(
        map: &BTreeMap<PieceID, PieceMarker>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let string_map: BTreeMap<String, &PieceMarker> =
            map.iter().map(|(k, v)| (k.to_string(), v)).collect();
        string_map.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<PieceID, PieceMarker>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string_map: BTreeMap<String, PieceMarker> = BTreeMap::deserialize(deserializer)?;
        string_map
            .into_iter()
            .map(|(k, v)| {
                k.parse()
                    .map(|num| (num, v))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
