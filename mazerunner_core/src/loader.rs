//! Game file parsing.
//!
//! A game file holds one or more levels, each introduced by a header line
//! `Maze <n> - <rows> <cols>` and followed by exactly `<rows>` maze lines.
//! Blank lines between levels are ignored.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Item, Position, Tile,
    level::Level,
    map::{Grid, GridError},
};

const PLAYER_SYMBOL: char = 'P';

/// Largest maze accepted, in cells.
const MAX_CELLS: usize = 1 << 20;

/// Errors raised while reading a game file. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read game file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Game file contains no levels.")]
    NoLevels,
    #[error("Line {line}: expected a header like 'Maze 1 - 5 5', found '{text}'")]
    BadHeader { line: usize, text: String },
    #[error("Level starting at line {line}: expected {expected} rows, found {found}")]
    MissingRows {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line}: row is {found} cells wide, maze is {expected}")]
    RowTooLong {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Line {line}: unknown maze symbol '{symbol}' at column {col}")]
    UnknownSymbol {
        line: usize,
        col: usize,
        symbol: char,
    },
    #[error("Level {level}: expected exactly one start position ('P'), found {found}")]
    StartCount { level: usize, found: usize },
    #[error("Level {level}: expected exactly one door ('D'), found {found}")]
    DoorCount { level: usize, found: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Reads and parses a game file from disk.
pub fn load_levels(path: &Path) -> Result<Vec<Level>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let levels = parse_levels(&text)?;
    log::info!("Loaded {} level(s) from {}", levels.len(), path.display());
    Ok(levels)
}

/// Parses every level in `text`.
pub fn parse_levels(text: &str) -> Result<Vec<Level>, LoadError> {
    let mut lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .map(|(index, line)| (index + 1, line));
    let mut levels = Vec::new();

    while let Some((header_line, header)) = lines.next() {
        if header.trim().is_empty() {
            continue;
        }
        let (rows, cols) = parse_header(header_line, header)?;

        let mut body = Vec::new();
        for _ in 0..rows {
            match lines.next() {
                Some(row) => body.push(row),
                None => {
                    return Err(LoadError::MissingRows {
                        line: header_line,
                        expected: rows,
                        found: body.len(),
                    });
                }
            }
        }

        levels.push(parse_level(levels.len() + 1, rows, cols, &body)?);
    }

    if levels.is_empty() {
        return Err(LoadError::NoLevels);
    }
    Ok(levels)
}

fn parse_header(line: usize, text: &str) -> Result<(usize, usize), LoadError> {
    let bad_header = || LoadError::BadHeader {
        line,
        text: text.to_string(),
    };
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        ["Maze", _number, "-", rows, cols] => {
            let rows: usize = rows.parse().map_err(|_| bad_header())?;
            let cols: usize = cols.parse().map_err(|_| bad_header())?;
            if rows == 0 || cols == 0 || rows.checked_mul(cols).is_none_or(|n| n > MAX_CELLS) {
                return Err(bad_header());
            }
            Ok((rows, cols))
        }
        _ => Err(bad_header()),
    }
}

fn parse_level(
    number: usize,
    rows: usize,
    cols: usize,
    body: &[(usize, &str)],
) -> Result<Level, LoadError> {
    let mut maze: Grid<Tile> = Grid::new(rows, cols);
    let mut items = BTreeMap::new();
    let mut starts = Vec::new();
    let mut doors = Vec::new();

    for (row, (line, text)) in body.iter().enumerate() {
        let width = text.chars().count();
        if width > cols {
            return Err(LoadError::RowTooLong {
                line: *line,
                expected: cols,
                found: width,
            });
        }

        // Short rows are padded with empty tiles.
        for (col, symbol) in text.chars().enumerate() {
            let position = Position { row, col };
            if symbol == PLAYER_SYMBOL {
                starts.push(position);
            } else if let Some(item) = Item::from_symbol(symbol) {
                items.insert(position, item);
            } else if let Some(tile) = Tile::from_symbol(symbol) {
                if tile == Tile::Door {
                    doors.push(position);
                }
                maze.set(position, tile)?;
            } else {
                return Err(LoadError::UnknownSymbol {
                    line: *line,
                    col: col + 1,
                    symbol,
                });
            }
        }
    }

    let [start] = starts.as_slice() else {
        return Err(LoadError::StartCount {
            level: number,
            found: starts.len(),
        });
    };
    let [door] = doors.as_slice() else {
        return Err(LoadError::DoorCount {
            level: number,
            found: doors.len(),
        });
    };

    log::debug!(
        "Parsed level {number}: {rows}x{cols}, {} item(s), start {:?}",
        items.len(),
        start
    );
    Ok(Level::new(maze, items, *start, *door))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LEVELS: &str = "\
Maze 1 - 5 5
#####
#P C#
# M #
#  D#
#####

Maze 2 - 4 6
######
#P LW#
#$  D#
######
";

    #[test]
    fn parses_multiple_levels() {
        let levels = parse_levels(TWO_LEVELS).unwrap();
        assert_eq!(levels.len(), 2);

        let first = &levels[0];
        assert_eq!(first.dimensions(), (5, 5));
        assert_eq!(first.start(), Position::new(1, 1));
        assert_eq!(first.door(), Position::new(3, 3));
        assert_eq!(first.item_at(Position::new(1, 3)), Some(Item::Coin));
        assert_eq!(first.item_at(Position::new(2, 2)), Some(Item::Potion));
        assert_eq!(first.tile_at(Position::new(1, 1)), Some(Tile::Empty));

        let second = &levels[1];
        assert_eq!(second.dimensions(), (4, 6));
        assert_eq!(second.tile_at(Position::new(1, 3)), Some(Tile::Lava));
        assert_eq!(second.item_at(Position::new(2, 1)), Some(Item::Candy));
        assert!(second.is_door_unlocked());
    }

    #[test]
    fn bundled_games_parse() {
        for text in [
            include_str!("../../games/game1.txt"),
            include_str!("../../games/game2.txt"),
        ] {
            let levels = parse_levels(text).unwrap();
            assert!(levels.iter().all(|level| level.coins_remaining() > 0));
        }
    }

    #[test]
    fn short_rows_are_padded() {
        let levels = parse_levels("Maze 1 - 2 4\n#PD\n#\n").unwrap();
        assert_eq!(levels[0].tile_at(Position::new(0, 3)), Some(Tile::Empty));
        assert_eq!(levels[0].tile_at(Position::new(1, 2)), Some(Tile::Empty));
    }

    #[test]
    fn rejects_malformed_files() {
        assert!(matches!(parse_levels("\n\n"), Err(LoadError::NoLevels)));
        assert!(matches!(
            parse_levels("Level 1 - 2 2\n"),
            Err(LoadError::BadHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_levels("Maze 1 - 99999999 99999999\n"),
            Err(LoadError::BadHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_levels("Maze 1 - 3 3\n#PD\n"),
            Err(LoadError::MissingRows {
                line: 1,
                expected: 3,
                found: 1
            })
        ));
        assert!(matches!(
            parse_levels("Maze 1 - 1 3\n#PDD#\n"),
            Err(LoadError::RowTooLong { line: 2, .. })
        ));
        assert!(matches!(
            parse_levels("Maze 1 - 1 3\nPDx\n"),
            Err(LoadError::UnknownSymbol {
                line: 2,
                col: 3,
                symbol: 'x'
            })
        ));
        assert!(matches!(
            parse_levels("Maze 1 - 1 3\nPPD\n"),
            Err(LoadError::StartCount { level: 1, found: 2 })
        ));
        assert!(matches!(
            parse_levels("Maze 1 - 1 3\n P \n"),
            Err(LoadError::DoorCount { level: 1, found: 0 })
        ));
    }
}
