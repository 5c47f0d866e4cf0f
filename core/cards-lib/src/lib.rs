use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

pub type CardName = String;

/// 卡牌資料結構
/// name / description 為 i18n key，由外層介面負責翻譯
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Card {
    pub card_type: CardType,
    pub name: CardName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub target: CardTarget,
    #[serde(default = "default_range")]
    pub range: usize,
    // 攻擊
    #[serde(default)]
    pub attack_damage: i32,
    #[serde(default)]
    pub attack_times: u32,
    // 防禦
    #[serde(default)]
    pub defense_value: i32,
    // 道具
    #[serde(default)]
    pub draw_cards: usize,
}

#[derive(
    Debug,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    EnumString,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardType {
    Attack,
    Defense,
    Special,
    Item,
}

#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, Default, EnumString, Display, EnumIter, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardTarget {
    Caster,
    Enemy,
    Ally,
    AllEnemies,
    AllAllies,
    All,
    #[default]
    None,
}

impl Card {
    /// 是否需要玩家指定單一目標格
    pub fn need_target(&self) -> bool {
        matches!(self.target, CardTarget::Enemy | CardTarget::Ally)
    }
}

fn default_range() -> usize {
    1
}

/// 內建卡牌目錄：初始牌組使用的四張基礎卡
pub mod catalog {
    use super::*;

    /// 打擊：對射程內一名敵人造成傷害
    pub fn strike() -> Card {
        Card {
            card_type: CardType::Attack,
            name: "C_A_STRIKE".to_string(),
            description: "C_A_STRIKE_DESC".to_string(),
            cost: 1,
            target: CardTarget::Enemy,
            range: 1,
            attack_damage: 6,
            attack_times: 1,
            defense_value: 0,
            draw_cards: 0,
        }
    }

    /// 防禦：為自己疊防禦值
    pub fn defend() -> Card {
        Card {
            card_type: CardType::Defense,
            name: "C_D_DEFEND".to_string(),
            description: "C_D_DEFEND_DESC".to_string(),
            cost: 1,
            target: CardTarget::Caster,
            range: 1,
            attack_damage: 0,
            attack_times: 0,
            defense_value: 3,
            draw_cards: 0,
        }
    }

    /// 掙扎：特技卡
    pub fn struggle() -> Card {
        Card {
            card_type: CardType::Special,
            name: "C_S_STRUGGLE".to_string(),
            description: "C_S_STRUGGLE_DESC".to_string(),
            cost: 1,
            target: CardTarget::Caster,
            range: 1,
            attack_damage: 0,
            attack_times: 0,
            defense_value: 0,
            draw_cards: 0,
        }
    }

    /// 緊急補給：道具卡，抽牌
    pub fn ecs() -> Card {
        Card {
            card_type: CardType::Item,
            name: "C_I_ECS".to_string(),
            description: "C_I_ECS_DESC".to_string(),
            cost: 1,
            target: CardTarget::Caster,
            range: 1,
            attack_damage: 0,
            attack_times: 0,
            defense_value: 0,
            draw_cards: 2,
        }
    }

    /// 初始牌組：打擊、防禦、掙扎、補給各兩張
    pub fn starter_deck() -> Vec<Card> {
        vec![
            strike(),
            defend(),
            struggle(),
            ecs(),
            strike(),
            defend(),
            struggle(),
            ecs(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_need_target() {
        // 只有 Enemy / Ally 需要指定目標格
        let test_data = [
            (CardTarget::Caster, false),
            (CardTarget::Enemy, true),
            (CardTarget::Ally, true),
            (CardTarget::AllEnemies, false),
            (CardTarget::AllAllies, false),
            (CardTarget::All, false),
            (CardTarget::None, false),
        ];
        for (target, expected) in test_data {
            let card = Card {
                target,
                ..catalog::strike()
            };
            assert_eq!(card.need_target(), expected, "target {target} 判定錯誤");
        }
    }

    #[test]
    fn test_deserialize_card_with_defaults() {
        // 只給必填欄位，其餘取預設值
        let data = r#"{ "card_type": "attack", "name": "C_A_STRIKE" }"#;
        let card: Card = serde_json::from_str(data).unwrap();
        assert_eq!(card.card_type, CardType::Attack);
        assert_eq!(card.name, "C_A_STRIKE");
        assert_eq!(card.description, "");
        assert_eq!(card.cost, 0);
        assert_eq!(card.target, CardTarget::None);
        assert_eq!(card.range, 1);
        assert_eq!(card.attack_damage, 0);
        assert_eq!(card.attack_times, 0);
        assert_eq!(card.defense_value, 0);
        assert_eq!(card.draw_cards, 0);
    }

    #[test]
    fn test_deserialize_card_full() {
        let data = r#"{
            "card_type": "attack",
            "name": "C_A_STRIKE",
            "description": "C_A_STRIKE_DESC",
            "cost": 1,
            "target": "enemy",
            "range": 1,
            "attack_damage": 6,
            "attack_times": 1
        }"#;
        let card: Card = serde_json::from_str(data).unwrap();
        assert_eq!(card, catalog::strike());
    }

    #[test]
    fn test_card_target_serde_names() {
        // snake_case 序列化名稱
        let test_data = [
            (CardTarget::Caster, "\"caster\""),
            (CardTarget::AllEnemies, "\"all_enemies\""),
            (CardTarget::AllAllies, "\"all_allies\""),
            (CardTarget::None, "\"none\""),
        ];
        for (target, expected) in test_data {
            assert_eq!(serde_json::to_string(&target).unwrap(), expected);
        }
    }

    #[test]
    fn test_catalog_values() {
        let strike = catalog::strike();
        assert_eq!(strike.cost, 1);
        assert_eq!(strike.attack_damage, 6);
        assert_eq!(strike.attack_times, 1);
        assert!(strike.need_target());

        let defend = catalog::defend();
        assert_eq!(defend.defense_value, 3);
        assert!(!defend.need_target());

        let ecs = catalog::ecs();
        assert_eq!(ecs.card_type, CardType::Item);
        assert_eq!(ecs.draw_cards, 2);

        // 初始牌組：四種卡各兩張
        let deck = catalog::starter_deck();
        assert_eq!(deck.len(), 8);
        assert_eq!(
            deck.iter()
                .filter(|c| c.card_type == CardType::Attack)
                .count(),
            2
        );
    }
}
