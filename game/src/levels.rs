use crate::error::LoadError;
use crate::grid::{Grid, LevelMetadata, Tile};
use crate::position::GridPosition;

include!(concat!(env!("OUT_DIR"), "/levels.rs"));

#[derive(Clone, Debug)]
pub(crate) struct Level {
    pub(crate) name: String,
    pub(crate) metadata: LevelMetadata,
    pub(crate) grid: Grid,
    pub(crate) key: GridPosition,
    pub(crate) door: GridPosition,
}

impl Level {
    pub(crate) fn parse(name: &str, csv: &str, json: &str) -> Result<Self, LoadError> {
        let metadata = LevelMetadata::parse(json)?;
        let (grid, markers) = Grid::from_csv(csv, metadata.biome)?;
        let key = single("key", &markers.keys)?;
        let door = single("door", &markers.doors)?;

        let open = |what: String, cell: GridPosition| {
            if grid.at(cell) == Tile::Ground && cell != door {
                Ok(())
            } else {
                Err(LoadError::BadSpawn {
                    what,
                    row: cell.row,
                    col: cell.col,
                })
            }
        };
        open("player".to_string(), metadata.player.cell)?;
        for spawn in &metadata.enemies {
            open(format!("{:?}", spawn.kind), spawn.cell)?;
            for &waypoint in &spawn.route {
                open(format!("{:?} waypoint", spawn.kind), waypoint)?;
            }
        }

        Ok(Self {
            name: name.to_string(),
            metadata,
            grid,
            key,
            door,
        })
    }

    pub(crate) fn display_name(&self) -> &str {
        &self.metadata.name
    }
}

fn single(what: &'static str, cells: &[GridPosition]) -> Result<GridPosition, LoadError> {
    match cells {
        [cell] => Ok(*cell),
        _ => Err(LoadError::Marker(what, cells.len())),
    }
}

/// Sort key putting `level_2` before `level_10`: the name without its
/// trailing digits, then those digits as a number.
fn play_order(name: &str) -> (&str, Option<u64>, &str) {
    let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
    (prefix, name[prefix.len()..].parse().ok(), name)
}

/// Embedded level names in play order.
pub(crate) fn names() -> impl Iterator<Item = &'static str> {
    let mut names: Vec<&'static str> = LEVEL_DATA.iter().map(|(name, _, _)| *name).collect();
    names.sort_by(|a, b| play_order(a).cmp(&play_order(b)));
    names.into_iter()
}

pub(crate) fn load(name: &str) -> Result<Level, LoadError> {
    let (name, csv, json) = LEVEL_DATA
        .iter()
        .find(|(n, _, _)| *n == name)
        .ok_or_else(|| LoadError::UnknownLevel(name.to_string()))?;
    Level::parse(name, csv, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
#,#,#,#
#,.,+,#
#,K,D,#
#,#,#,#
";

    #[test]
    fn every_embedded_level_loads() {
        let names: Vec<&str> = names().collect();
        assert_eq!(names, vec!["level_1", "level_2", "level_3"]);
        for name in names {
            let level = load(name).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(!level.display_name().is_empty());
        }
    }

    #[test]
    fn levels_are_ordered_by_their_number() {
        let mut names = vec!["level_10", "level_2", "level_1", "intro", "level_"];
        names.sort_by(|a, b| play_order(a).cmp(&play_order(b)));
        assert_eq!(names, vec!["intro", "level_", "level_1", "level_2", "level_10"]);
    }

    #[test]
    fn unknown_level_is_an_error() {
        assert!(matches!(load("nope"), Err(LoadError::UnknownLevel(_))));
    }

    #[test]
    fn key_and_door_are_required() {
        let json = r#"{ "name": "T", "player": { "cell": { "row": 1, "col": 1 } } }"#;
        let result = Level::parse("t", "#,#,#\n#,.,#\n#,D,#\n", json);
        assert!(matches!(result, Err(LoadError::Marker("key", 0))));
        let result = Level::parse("t", "#,#,#\n#,K,#\n#,K,#\n#,D,#\n", json);
        assert!(matches!(result, Err(LoadError::Marker("key", 2))));
    }

    #[test]
    fn spawns_must_be_on_open_ground() {
        let json = r#"{ "name": "T", "player": { "cell": { "row": 1, "col": 2 } } }"#;
        assert!(matches!(
            Level::parse("t", CSV, json),
            Err(LoadError::BadSpawn { row: 1, col: 2, .. })
        ));

        let json = r#"{
            "name": "T",
            "player": { "cell": { "row": 1, "col": 1 } },
            "enemies": [ { "kind": "slime", "cell": { "row": 1, "col": 1 }, "route": [ { "row": 9, "col": 9 } ] } ]
        }"#;
        assert!(matches!(
            Level::parse("t", CSV, json),
            Err(LoadError::BadSpawn { row: 9, col: 9, .. })
        ));
    }
}
