//! piece.rs：
//! - 定義棋子（Piece）資料結構與各種類的基礎屬性，不含戰鬥流程。
//! - 我方棋子額外持有能量與牌堆；障礙物與陷阱只佔格子。
//! - 面向（facing）依等角投影的螢幕位移決定，集中於此計算。
use crate::*;
use cards_lib::Card;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, EnumString, Display, EnumIter, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartyType {
    Player,
}

#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, EnumString, Display, EnumIter, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnemyType {
    Slime,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Party(PartyType),
    Enemy(EnemyType),
    Obstacle,
    Trap,
}

/// 面向：等角投影下只分左右
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// 依單步位移決定面向
    /// 等角投影的螢幕 X 正比於 (x - y)，螢幕 X 減少即面向左
    pub fn from_step(from: Pos, to: Pos) -> Facing {
        let screen = |p: Pos| p.x as isize - p.y as isize;
        if screen(to) - screen(from) < 0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }
}

/// 關卡設定中的棋子擺放資料
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PieceMarker {
    pub kind: PieceKind,
    pub pos: Pos,
}

#[derive(Debug, Clone)]
pub struct Piece {
    pub id: PieceID,
    pub kind: PieceKind,
    pub facing: Facing,
    pub is_moving: bool,
    pub move_range: Steps,
    pub hp: i32,
    pub max_hp: i32,
    /// 防禦值：承受傷害時先行吸收
    pub defense: i32,
    pub energy: i32,
    pub energy_max: i32,
    pub cards: BattleCards,
}

impl Piece {
    pub fn new(id: PieceID, kind: PieceKind) -> Self {
        let hp = base_hp(&kind);
        Piece {
            id,
            kind,
            facing: Facing::default(),
            is_moving: false,
            move_range: base_move_range(&kind),
            hp,
            max_hp: hp,
            defense: 0,
            energy: 0,
            energy_max: base_energy_max(&kind),
            cards: BattleCards::default(),
        }
    }

    pub fn from_marker(id: PieceID, marker: &PieceMarker) -> Self {
        Piece::new(id, marker.kind)
    }

    /// 附帶牌組（只對我方棋子有意義）
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.cards = BattleCards::new(deck);
        self
    }

    pub fn is_party(&self) -> bool {
        matches!(self.kind, PieceKind::Party(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, PieceKind::Enemy(_))
    }

    /// 是否為參與戰鬥的單位（我方或敵方，非擺設）
    pub fn is_battler(&self) -> bool {
        self.is_party() || self.is_enemy()
    }

    pub fn same_side(&self, other: &Piece) -> bool {
        (self.is_party() && other.is_party()) || (self.is_enemy() && other.is_enemy())
    }

    pub fn is_defeated(&self) -> bool {
        self.is_battler() && self.hp <= 0
    }

    /// 承受傷害：防禦值先吸收，剩餘扣 HP
    /// 回傳 (吸收量, 實際 HP 損失)
    pub fn take_damage(&mut self, damage: i32) -> (i32, i32) {
        let damage = damage.max(0);
        let absorbed = self.defense.min(damage);
        self.defense -= absorbed;
        let hp_loss = damage - absorbed;
        self.hp -= hp_loss;
        (absorbed, hp_loss)
    }
}

/// 各種類棋子的基礎 HP
pub fn base_hp(kind: &PieceKind) -> i32 {
    match kind {
        PieceKind::Party(PartyType::Player) => 30,
        PieceKind::Enemy(EnemyType::Slime) => 12,
        PieceKind::Obstacle | PieceKind::Trap => 0,
    }
}

/// 各種類棋子的移動範圍（步數）
pub fn base_move_range(kind: &PieceKind) -> Steps {
    match kind {
        PieceKind::Party(PartyType::Player) => 3,
        PieceKind::Enemy(EnemyType::Slime) => 2,
        PieceKind::Obstacle | PieceKind::Trap => 0,
    }
}

/// 各種類棋子的能量上限，只有我方棋子能打牌
pub fn base_energy_max(kind: &PieceKind) -> i32 {
    match kind {
        PieceKind::Party(PartyType::Player) => 3,
        _ => 0,
    }
}
