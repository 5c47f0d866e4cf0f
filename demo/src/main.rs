//! 主控台示範：重現原型關卡（6×6 地圖、六隻史萊姆、一名玩家與初始牌組），
//! 以腳本化的回合流程演示移動、出牌與回合交替。
use anyhow::Result;
use cards_lib::catalog;
use piece_lib::*;
use std::collections::BTreeSet;
use tracing_subscriber::EnvFilter;

const PLAYER_ID: PieceID = 1;
const ROUNDS: usize = 5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = rand::rng();

    // 6×6 測試關卡，全為 Ground
    let mut board = Board {
        tiles: vec![vec![Tile::default(); 6]; 6],
        ..Default::default()
    };

    // 六隻史萊姆與一名玩家，隨機站位
    let mut order = vec![PLAYER_ID];
    for id in 2..=7 {
        place_piece_random(
            &mut board,
            Piece::new(id, PieceKind::Enemy(EnemyType::Slime)),
            &mut rng,
        )?;
        order.push(id);
    }
    let mut player =
        Piece::new(PLAYER_ID, PieceKind::Party(PartyType::Player)).with_deck(catalog::starter_deck());
    player.cards.shuffle_deck(&mut rng);
    let player_pos = place_piece_random(&mut board, player, &mut rng)?;
    println!("玩家進場於 ({}, {})", player_pos.x, player_pos.y);

    let mut battle = Battle::new(order);

    // 開場回合：能量回滿、抽開局手牌
    if let Some(piece) = board.pieces.get_mut(&PLAYER_ID) {
        piece.energy = piece.energy_max;
        piece.cards.draw(DRAW_PER_TURN);
    }

    for round in 1..=ROUNDS {
        println!("---- 第 {round} 回合 ----");
        run_player_turn(&mut battle, &mut board)?;
        if battle.battle_result(&board) != BattleResult::Ongoing {
            break;
        }
        // 敵方回合：AI 不在本示範範圍，直接輪過
        while battle.current_piece_id() != Some(&PLAYER_ID) {
            battle.end_turn(&mut board)?;
        }
    }

    match battle.battle_result(&board) {
        BattleResult::Victory => println!("勝利！"),
        BattleResult::Defeat => println!("敗北…"),
        BattleResult::Ongoing => {
            let left = board.pieces.values().filter(|p| p.is_enemy()).count();
            println!("示範結束，剩餘敵人 {left} 隻");
        }
    }
    Ok(())
}

fn run_player_turn(battle: &mut Battle, board: &mut Board) -> Result<()> {
    let src = board
        .piece_to_pos(&PLAYER_ID)
        .ok_or_else(|| anyhow::anyhow!("玩家不在場上"))?;
    let range = board
        .pieces
        .get(&PLAYER_ID)
        .map(|p| p.move_range)
        .unwrap_or(0);
    let tiles = accessible_tiles(board, src, range);
    println!("可移動格數：{}", tiles.len());

    // 朝最近的敵人靠近，逐 tick 播放每一步
    if let Some(dst) = approach_target(board, src, &tiles) {
        battle.begin_move(board, dst)?;
        loop {
            match battle.tick_move(board)? {
                MoveTick::Stepped(pos) => println!("  走到 ({}, {})", pos.x, pos.y),
                MoveTick::Finished(pos) => {
                    println!("  抵達 ({}, {})", pos.x, pos.y);
                    break;
                }
                MoveTick::Idle => break,
            }
        }
    }

    // 能量夠就一直出牌
    while let Some((index, target)) = choose_card(board) {
        for msg in battle.play_card(board, index, target)? {
            println!("  {msg}");
        }
        if battle.battle_result(board) != BattleResult::Ongoing {
            return Ok(());
        }
    }

    let report = battle.end_turn(board)?;
    println!("回合結束：棄 {} 張牌", report.discarded);
    Ok(())
}

/// 在可達格中挑最接近任一敵人的一格；沒有比原地更近的選擇就不移動
fn approach_target(board: &Board, src: Pos, tiles: &BTreeSet<Pos>) -> Option<Pos> {
    let enemies: Vec<Pos> = board
        .pieces
        .values()
        .filter(|p| p.is_enemy())
        .filter_map(|p| board.piece_to_pos(&p.id))
        .collect();
    if enemies.is_empty() {
        return None;
    }
    let dist = |pos: Pos| {
        enemies
            .iter()
            .map(|e| manhattan_distance(pos, *e))
            .min()
            .unwrap_or(usize::MAX)
    };
    tiles
        .iter()
        .copied()
        .min_by_key(|pos| (dist(*pos), *pos))
        .filter(|best| dist(*best) < dist(src))
}

/// 挑一張出得起的牌：攻擊卡需要射程內有敵人，其他卡直接出
fn choose_card(board: &Board) -> Option<(usize, Option<Pos>)> {
    let player = board.pieces.get(&PLAYER_ID)?;
    let pos = board.piece_to_pos(&PLAYER_ID)?;
    for (index, card) in player.cards.hand.iter().enumerate() {
        if card.cost > player.energy {
            continue;
        }
        if card.need_target() {
            let target = board
                .pieces
                .values()
                .filter(|p| p.is_enemy())
                .filter_map(|p| board.piece_to_pos(&p.id))
                .find(|enemy_pos| manhattan_distance(pos, *enemy_pos) <= card.range);
            if let Some(target) = target {
                return Some((index, Some(target)));
            }
        } else {
            return Some((index, None));
        }
    }
    None
}
