//! card.rs：
//! - 負責牌堆三分區（牌庫/手牌/棄牌）狀態機與出牌結算。
//! - 卡牌只會沿 牌庫 → 手牌 → 棄牌 單向流動，不洗回牌庫。
//! - 僅處理卡牌本身，不負責移動或回合流程。
use crate::*;
use cards_lib::{Card, CardTarget, CardType};

/// 戰鬥中一名成員的牌堆三分區，皆為有序序列
#[derive(Debug, Clone, Default)]
pub struct BattleCards {
    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub discard: Vec<Card>,
}

impl BattleCards {
    pub fn new(deck: Vec<Card>) -> Self {
        BattleCards {
            deck,
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }

    /// 三分區的卡牌總數
    pub fn total(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len()
    }

    /// 洗牌庫（開戰前使用）
    pub fn shuffle_deck(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.deck.shuffle(rng);
    }

    /// 從牌庫頂抽至多 n 張進手牌，受手牌上限限制
    /// 牌庫抽乾即停，回傳實際抽到的張數
    pub fn draw(&mut self, n: usize) -> usize {
        let mut drawn = 0;
        while drawn < n && !self.deck.is_empty() && self.hand.len() < MAX_HAND_SIZE {
            let card = self.deck.remove(0);
            self.hand.push(card);
            drawn += 1;
        }
        drawn
    }

    /// 棄掉整手牌（保持順序），回傳張數
    pub fn discard_hand(&mut self) -> usize {
        let n = self.hand.len();
        self.discard.append(&mut self.hand);
        n
    }

    /// 把手牌第 index 張移入棄牌堆
    pub fn discard_from_hand(&mut self, index: usize) -> Result<(), Error> {
        let func = "BattleCards::discard_from_hand";

        if index >= self.hand.len() {
            return Err(Error::NoSuchCard { func, index });
        }
        let card = self.hand.remove(index);
        self.discard.push(card);
        Ok(())
    }
}

/// 出牌主流程
/// 檢查行動資格與能量，驗證目標，套用效果後扣能量並把卡牌移入棄牌堆
/// 回傳戰鬥訊息
pub fn play_card(
    board: &mut Board,
    caster: PieceID,
    hand_index: usize,
    target: Option<Pos>,
) -> Result<Vec<String>, Error> {
    let func = "play_card";

    let caster_pos = board
        .piece_to_pos(&caster)
        .ok_or(Error::NoSuchPiece { func, piece_id: caster })?;
    let piece = board
        .pieces
        .get(&caster)
        .ok_or(Error::NoSuchPiece { func, piece_id: caster })?;
    if piece.is_moving {
        return Err(Error::PieceMoving {
            func,
            piece_id: caster,
        });
    }
    if !piece.is_party() {
        return Err(Error::NoCards {
            func,
            piece_id: caster,
        });
    }
    let card = piece
        .cards
        .hand
        .get(hand_index)
        .cloned()
        .ok_or(Error::NoSuchCard {
            func,
            index: hand_index,
        })?;
    if card.cost > piece.energy {
        return Err(Error::NotEnoughEnergy {
            func,
            card: card.name.clone(),
            energy: piece.energy,
            cost: card.cost,
        });
    }
    let targets = resolve_targets(board, &card, caster, caster_pos, target).map_err(|e| {
        Error::Wrap {
            func,
            source: Box::new(e),
        }
    })?;

    let mut msgs = vec![format!(
        "{} 在 ({}, {}) 打出",
        card.name, caster_pos.x, caster_pos.y
    )];
    match card.card_type {
        CardType::Attack => {
            for target_id in &targets {
                for _ in 0..card.attack_times {
                    let Some(target_piece) = board.pieces.get_mut(target_id) else {
                        break; // 目標已在前幾擊倒下
                    };
                    let old_hp = target_piece.hp;
                    target_piece.take_damage(card.attack_damage);
                    let new_hp = target_piece.hp;
                    msgs.push(format!(
                        "單位 {} HP: {old_hp} → {new_hp}",
                        target_piece.id
                    ));
                    if target_piece.is_defeated() {
                        board.remove_piece(*target_id);
                        msgs.push(format!("單位 {target_id} 被擊倒"));
                        break;
                    }
                }
            }
        }
        CardType::Defense => {
            for target_id in &targets {
                if let Some(target_piece) = board.pieces.get_mut(target_id) {
                    target_piece.defense += card.defense_value;
                    msgs.push(format!(
                        "單位 {} 防禦 +{}，目前 {}",
                        target_id, card.defense_value, target_piece.defense
                    ));
                }
            }
        }
        CardType::Item => {
            // 道具卡：目前只有抽牌效果
            if card.draw_cards > 0 {
                if let Some(piece) = board.pieces.get_mut(&caster) {
                    let drawn = piece.cards.draw(card.draw_cards);
                    msgs.push(format!("抽了 {drawn} 張牌"));
                }
            }
        }
        CardType::Special => {
            msgs.push(format!("{} 發動", card.name));
        }
    }

    // 扣能量並把卡牌移入棄牌堆
    let piece = board
        .pieces
        .get_mut(&caster)
        .ok_or(Error::NoSuchPiece { func, piece_id: caster })?;
    piece.energy -= card.cost;
    piece.cards.discard_from_hand(hand_index)?;
    tracing::debug!(piece = caster, card = %card.name, "card resolved");
    Ok(msgs)
}

use inner::*;
mod inner {
    use super::*;

    /// 依卡牌目標種類解析受影響的棋子
    pub fn resolve_targets(
        board: &Board,
        card: &Card,
        caster: PieceID,
        caster_pos: Pos,
        target: Option<Pos>,
    ) -> Result<Vec<PieceID>, Error> {
        let func = "resolve_targets";

        let battlers = |filter: fn(&Piece) -> bool| -> Vec<PieceID> {
            let mut ids: Vec<PieceID> = board
                .pieces
                .values()
                .filter(|p| filter(p))
                .map(|p| p.id)
                .collect();
            ids.sort_unstable();
            ids
        };

        match card.target {
            CardTarget::Caster => Ok(vec![caster]),
            CardTarget::Enemy | CardTarget::Ally => {
                let pos = target.ok_or_else(|| Error::NoTargetSelected {
                    func,
                    card: card.name.clone(),
                })?;
                if manhattan_distance(caster_pos, pos) > card.range {
                    return Err(Error::TargetOutOfRange {
                        func,
                        card: card.name.clone(),
                        pos,
                    });
                }
                let target_id = board
                    .pos_to_piece(pos)
                    .ok_or(Error::NoPieceAtPos { func, pos })?;
                let target_piece =
                    board
                        .pieces
                        .get(&target_id)
                        .ok_or(Error::NoPieceAtPos { func, pos })?;
                let ok = match card.target {
                    CardTarget::Enemy => target_piece.is_enemy(),
                    _ => target_piece.is_party(),
                };
                if !ok {
                    return Err(Error::WrongTargetKind {
                        func,
                        card: card.name.clone(),
                        detail: format!("{:?} 不是 {} 的合法目標", target_piece.kind, card.target),
                    });
                }
                Ok(vec![target_id])
            }
            CardTarget::AllEnemies => Ok(battlers(Piece::is_enemy)),
            CardTarget::AllAllies => Ok(battlers(Piece::is_party)),
            CardTarget::All => Ok(battlers(Piece::is_battler)),
            CardTarget::None => Ok(vec![]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cards_lib::catalog;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn at(x: usize, y: usize) -> Pos {
        Pos { x, y }
    }

    /// 3×3 棋盤：玩家在 (1,1) 帶初始牌組與滿能量，史萊姆在 (1,0)
    fn battle_board() -> Board {
        let mut board = Board {
            tiles: vec![vec![Tile::default(); 3]; 3],
            ..Default::default()
        };
        let mut player =
            Piece::new(1, PieceKind::Party(PartyType::Player)).with_deck(catalog::starter_deck());
        player.energy = player.energy_max;
        player.cards.draw(4);
        place_piece_at(&mut board, player, at(1, 1)).unwrap();
        place_piece_at(
            &mut board,
            Piece::new(2, PieceKind::Enemy(EnemyType::Slime)),
            at(1, 0),
        )
        .unwrap();
        board
    }

    #[test]
    fn test_draw_from_deck_front() {
        let mut cards = BattleCards::new(catalog::starter_deck());
        assert_eq!(cards.draw(3), 3);
        assert_eq!(cards.hand.len(), 3);
        assert_eq!(cards.deck.len(), 5);
        // 抽牌順序為牌庫頂（序列前端）
        assert_eq!(cards.hand[0], catalog::strike());
        assert_eq!(cards.hand[1], catalog::defend());
        assert_eq!(cards.hand[2], catalog::struggle());
    }

    #[test]
    fn test_draw_stops_on_empty_deck() {
        // 牌庫抽乾即停，棄牌堆不會洗回牌庫
        let mut cards = BattleCards::new(vec![catalog::strike(), catalog::defend()]);
        cards.discard.push(catalog::struggle());
        assert_eq!(cards.draw(5), 2);
        assert_eq!(cards.hand.len(), 2);
        assert!(cards.deck.is_empty());
        assert_eq!(cards.discard.len(), 1);
    }

    #[test]
    fn test_draw_respects_hand_limit() {
        let mut deck = Vec::new();
        for _ in 0..3 {
            deck.extend(catalog::starter_deck());
        }
        let mut cards = BattleCards::new(deck);
        assert_eq!(cards.draw(99), MAX_HAND_SIZE);
        assert_eq!(cards.hand.len(), MAX_HAND_SIZE);
        // 手牌滿了再抽抽不到
        assert_eq!(cards.draw(1), 0);
    }

    #[test]
    fn test_discard_hand_keeps_order_and_counts() {
        let mut cards = BattleCards::new(catalog::starter_deck());
        cards.draw(3);
        cards.discard.push(catalog::ecs());
        let before_discard = cards.discard.len();
        let before_hand = cards.hand.len();
        let total = cards.total();

        let n = cards.discard_hand();
        assert_eq!(n, before_hand);
        assert!(cards.hand.is_empty());
        assert_eq!(cards.discard.len(), before_discard + n);
        // 棄牌堆尾端保持原手牌順序
        assert_eq!(cards.discard[before_discard], catalog::strike());
        assert_eq!(cards.discard[before_discard + 1], catalog::defend());
        // 總數不變
        assert_eq!(cards.total(), total);
    }

    #[test]
    fn test_shuffle_deck_keeps_cards() {
        let mut cards = BattleCards::new(catalog::starter_deck());
        let mut rng = StdRng::seed_from_u64(42);
        cards.shuffle_deck(&mut rng);
        assert_eq!(cards.deck.len(), 8);
        for card in [
            catalog::strike(),
            catalog::defend(),
            catalog::struggle(),
            catalog::ecs(),
        ] {
            assert_eq!(
                cards.deck.iter().filter(|c| **c == card).count(),
                2,
                "{} 張數改變",
                card.name
            );
        }
    }

    #[test]
    fn test_play_card_attack() {
        let mut board = battle_board();
        // 手牌第 0 張是打擊
        let msgs = play_card(&mut board, 1, 0, Some(at(1, 0))).unwrap();
        assert!(msgs.iter().any(|m| m.contains("C_A_STRIKE")));
        assert!(msgs.iter().any(|m| m.contains("HP: 12 → 6")));

        let player = board.pieces.get(&1).unwrap();
        assert_eq!(player.energy, 2);
        assert_eq!(player.cards.hand.len(), 3);
        assert_eq!(player.cards.discard.len(), 1);
        assert_eq!(player.cards.discard[0].name, "C_A_STRIKE");
        assert_eq!(board.pieces.get(&2).unwrap().hp, 6);
    }

    #[test]
    fn test_play_card_kills_and_removes() {
        let mut board = battle_board();
        board.pieces.get_mut(&2).unwrap().hp = 5;
        let msgs = play_card(&mut board, 1, 0, Some(at(1, 0))).unwrap();
        assert!(msgs.iter().any(|m| m.contains("被擊倒")));
        assert!(board.pieces.get(&2).is_none());
        assert_eq!(board.pos_to_piece(at(1, 0)), None);
    }

    #[test]
    fn test_play_card_defense() {
        let mut board = battle_board();
        // 手牌第 1 張是防禦
        play_card(&mut board, 1, 1, None).unwrap();
        let player = board.pieces.get(&1).unwrap();
        assert_eq!(player.defense, 3);
        assert_eq!(player.energy, 2);
    }

    #[test]
    fn test_play_card_item_draws() {
        let mut board = battle_board();
        // 手牌第 3 張是補給（抽 2 張）
        let deck_before = board.pieces.get(&1).unwrap().cards.deck.len();
        let msgs = play_card(&mut board, 1, 3, None).unwrap();
        assert!(msgs.iter().any(|m| m.contains("抽了 2 張牌")));
        let player = board.pieces.get(&1).unwrap();
        // 原手牌 4 - 打出 1 + 抽 2
        assert_eq!(player.cards.hand.len(), 5);
        assert_eq!(player.cards.deck.len(), deck_before - 2);
    }

    #[test]
    fn test_play_card_energy_never_negative() {
        let mut board = battle_board();
        board.pieces.get_mut(&1).unwrap().energy = 0;
        let err = play_card(&mut board, 1, 0, Some(at(1, 0))).unwrap_err();
        assert!(matches!(err, Error::NotEnoughEnergy { .. }), "{err:?}");

        // 出牌失敗時狀態不變
        let player = board.pieces.get(&1).unwrap();
        assert_eq!(player.energy, 0);
        assert_eq!(player.cards.hand.len(), 4);
        assert!(player.cards.discard.is_empty());
        assert_eq!(board.pieces.get(&2).unwrap().hp, 12);
    }

    #[test]
    fn test_play_card_target_errors() {
        let mut board = battle_board();

        // 需要目標卻沒給
        let err = play_card(&mut board, 1, 0, None).unwrap_err();
        assert!(
            matches!(root_error(&err), Error::NoTargetSelected { .. }),
            "{err:?}"
        );
        // 超出射程（打擊射程 1，敵人在距離 2）
        let mut far_board = battle_board();
        let slime_pos = far_board.piece_to_pos(&2).unwrap();
        far_board.piece_map.move_piece(2, slime_pos, at(0, 0)).unwrap();
        let err = play_card(&mut far_board, 1, 0, Some(at(0, 0))).unwrap_err();
        assert!(
            matches!(root_error(&err), Error::TargetOutOfRange { .. }),
            "{err:?}"
        );
        // 目標格無單位
        let err = play_card(&mut board, 1, 0, Some(at(0, 1))).unwrap_err();
        assert!(
            matches!(root_error(&err), Error::NoPieceAtPos { .. }),
            "{err:?}"
        );
        // 攻擊卡指向我方
        let err = play_card(&mut board, 1, 0, Some(at(1, 1))).unwrap_err();
        assert!(
            matches!(root_error(&err), Error::WrongTargetKind { .. }),
            "{err:?}"
        );
        // 全部失敗後手牌與能量不變
        let player = board.pieces.get(&1).unwrap();
        assert_eq!(player.cards.hand.len(), 4);
        assert_eq!(player.energy, player.energy_max);
    }

    #[test]
    fn test_play_card_guards() {
        let mut board = battle_board();

        // 移動中不可出牌
        board.pieces.get_mut(&1).unwrap().is_moving = true;
        let err = play_card(&mut board, 1, 0, Some(at(1, 0))).unwrap_err();
        assert!(matches!(err, Error::PieceMoving { .. }), "{err:?}");
        board.pieces.get_mut(&1).unwrap().is_moving = false;

        // 敵人沒有牌組
        let err = play_card(&mut board, 2, 0, None).unwrap_err();
        assert!(matches!(err, Error::NoCards { .. }), "{err:?}");

        // 手牌沒有這張
        let err = play_card(&mut board, 1, 9, None).unwrap_err();
        assert!(matches!(err, Error::NoSuchCard { .. }), "{err:?}");
    }

    #[test]
    fn test_resolve_targets_groups() {
        let mut board = battle_board();
        place_piece_at(
            &mut board,
            Piece::new(3, PieceKind::Enemy(EnemyType::Slime)),
            at(0, 0),
        )
        .unwrap();
        place_piece_at(&mut board, Piece::new(4, PieceKind::Obstacle), at(2, 2)).unwrap();

        let mut card = catalog::strike();
        card.target = CardTarget::AllEnemies;
        assert_eq!(
            resolve_targets(&board, &card, 1, at(1, 1), None).unwrap(),
            vec![2, 3]
        );
        card.target = CardTarget::AllAllies;
        assert_eq!(
            resolve_targets(&board, &card, 1, at(1, 1), None).unwrap(),
            vec![1]
        );
        // 擺設不參與 All
        card.target = CardTarget::All;
        assert_eq!(
            resolve_targets(&board, &card, 1, at(1, 1), None).unwrap(),
            vec![1, 2, 3]
        );
        card.target = CardTarget::None;
        assert!(resolve_targets(&board, &card, 1, at(1, 1), None)
            .unwrap()
            .is_empty());
    }
}
