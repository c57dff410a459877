use std::collections::BTreeMap;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::entity::EnemyKind;
use crate::error::LoadError;
use crate::position::GridPosition;
use crate::world::HiddenItemKind;

use super::{Biome, Grid, Tile};

/// Everything about a level that the CSV grid does not say.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct LevelMetadata {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) biome: Biome,
    pub(crate) player: PlayerSpawn,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) enemies: Vec<EnemySpawn>,
    /// Kills per enemy kind needed before the door will open.
    #[serde(default)]
    pub(crate) required_kills: BTreeMap<EnemyKind, u32>,
    #[serde(default)]
    pub(crate) hidden_items: HiddenItemConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct PlayerSpawn {
    pub(crate) cell: GridPosition,
    #[serde(default = "default_player_health")]
    pub(crate) health: i32,
    #[serde(default = "default_dynamites")]
    pub(crate) dynamites: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct EnemySpawn {
    pub(crate) kind: EnemyKind,
    pub(crate) cell: GridPosition,
    /// Patrol waypoints. Only slimes use it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) route: Vec<GridPosition>,
    /// Length of generated random paths.
    #[serde(default = "default_path_length")]
    pub(crate) path_length: usize,
    #[serde(default = "default_enemy_speed")]
    pub(crate) speed: i32,
    #[serde(default = "default_enemy_health")]
    pub(crate) health: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct HiddenItemConfig {
    /// Chance that a cracked wall hides anything at all.
    #[serde(default = "default_hidden_chance")]
    pub(crate) chance: f64,
    /// Relative weights of the item kinds, rolled cumulatively in key order.
    #[serde(default = "default_hidden_weights")]
    pub(crate) weights: BTreeMap<HiddenItemKind, f64>,
}

impl Default for HiddenItemConfig {
    fn default() -> Self {
        Self {
            chance: default_hidden_chance(),
            weights: default_hidden_weights(),
        }
    }
}

fn default_player_health() -> i32 {
    4
}

fn default_dynamites() -> u32 {
    3
}

fn default_path_length() -> usize {
    4
}

fn default_enemy_speed() -> i32 {
    1
}

fn default_enemy_health() -> i32 {
    1
}

fn default_hidden_chance() -> f64 {
    0.9
}

fn default_hidden_weights() -> BTreeMap<HiddenItemKind, f64> {
    BTreeMap::from([
        (HiddenItemKind::AddDynamite, 0.6),
        (HiddenItemKind::AddHealth, 0.1),
        (HiddenItemKind::Damage, 0.3),
    ])
}

impl LevelMetadata {
    pub(crate) fn parse(json_str: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json_str)?)
    }
}

/// Cells marked `K` (key under a cracked wall) and `D` (door on ground).
#[derive(Debug, Default)]
pub(crate) struct Markers {
    pub(crate) keys: Vec<GridPosition>,
    pub(crate) doors: Vec<GridPosition>,
}

impl Grid {
    pub(crate) fn from_csv(csv_str: &str, biome: Biome) -> Result<(Self, Markers), LoadError> {
        let mut tiles: Vec<Vec<Tile>> = Vec::new();
        let mut markers = Markers::default();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(csv_str.as_bytes());

        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let mut line = Vec::with_capacity(record.len());
            for (col, field) in record.iter().enumerate() {
                let cell = GridPosition::new(row as i32, col as i32);
                let tile = match field.trim() {
                    "#" => Tile::Wall,
                    "+" => Tile::CrackedWall,
                    "." => Tile::Ground,
                    "K" => {
                        markers.keys.push(cell);
                        Tile::CrackedWall
                    }
                    "D" => {
                        markers.doors.push(cell);
                        Tile::Ground
                    }
                    other => {
                        return Err(LoadError::UnknownSymbol {
                            symbol: other.to_string(),
                            row,
                            col,
                        });
                    }
                };
                line.push(tile);
            }
            tiles.push(line);
        }

        if tiles.first().is_none_or(Vec::is_empty) {
            return Err(LoadError::EmptyGrid);
        }
        Ok((Grid::new(tiles, biome), markers))
    }
}
