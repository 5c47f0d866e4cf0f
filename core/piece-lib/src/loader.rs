//! 棋盤載入器
use crate::*;
use std::collections::HashMap;

/// 從 ASCII 格式載入地形
///
/// ASCII 格式：每行用空格分隔的符號
/// - `.` = Ground
/// - `_` = Void
/// - 其他符號（`P`、`E` 等）= 標記位置（也作為 Ground）
/// - 相同的標記會全部收集成 Vec
///
/// 返回：(地形, 標記映射)
///
/// 例如：
/// ```text
/// P . .
/// . _ E
/// . . .
/// ```
pub fn load_from_ascii(ascii: &str) -> Result<(Vec<Vec<Tile>>, HashMap<String, Vec<Pos>>), Error> {
    let func = "load_from_ascii";

    let lines: Vec<&str> = ascii
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(Error::ParseError {
            func,
            detail: "棋盤為空".to_string(),
        });
    }

    let width = lines[0].split_whitespace().count();
    let mut tiles = Vec::new();
    let mut markers: HashMap<String, Vec<Pos>> = HashMap::new();

    for (y, line) in lines.iter().enumerate() {
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() != width {
            return Err(Error::ParseError {
                func,
                detail: format!("第 {y} 行寬度 {} 與首行 {width} 不一致", cells.len()),
            });
        }
        let mut row = Vec::new();
        for (x, cell) in cells.into_iter().enumerate() {
            let kind = if cell == "_" {
                TileKind::Void
            } else {
                TileKind::Ground
            };
            row.push(Tile { kind });

            // `.` 與 `_` 以外的符號記為標記
            if cell != "." && cell != "_" {
                markers
                    .entry(cell.to_string())
                    .or_default()
                    .push(Pos { x, y });
            }
        }
        tiles.push(row);
    }

    Ok((tiles, markers))
}

/// 從 TOML 文字讀取關卡設定
pub fn board_config_from_toml(text: &str) -> Result<BoardConfig, Error> {
    let func = "board_config_from_toml";

    toml::from_str(text).map_err(|e| Error::ParseError {
        func,
        detail: e.to_string(),
    })
}
