//! Level layouts: where they come from and how they become entities
//!
//! A map is a grid of characters, one per 10x10 pixel tile:
//!
//! | char | archetype |
//! |------|-----------|
//! | `J` | player start |
//! | `P` / `V` | platform / vertical platform (also a nav anchor) |
//! | `Z` | zombie |
//! | `F` | food |
//! | `B` | bullet pickup |
//! | `D` | door |
//! | `K` | key |
//! | `C` | cabinet |
//! | `E` | decorative object |
//! | `N<d>` | NPC with speaker id `d` (blank = 0) |
//! | `S<d>` | speech point with index `d` |
//! | `G` | gold bonus |
//! | `\|` | fireball |
//! | `0` | spikeball |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec2;
use thiserror::Error;

use super::ecs::{Entity, Registry};
use super::nav::{Action, NavGraph, VertexId};
use super::spawn;
use crate::consts::*;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no {kind} data for level {level}")]
    Missing { kind: &'static str, level: u32 },
    #[error("map for level {0} is empty")]
    EmptyMap(u32),
}

/// Source of per-level map and dialog text
pub trait LevelData {
    fn map_source(&self, level: u32) -> Result<String, DataError>;
    fn dialog_source(&self, level: u32) -> Result<String, DataError>;
}

/// Level files under a data directory: `levels/level<n>.txt` and
/// `dialog/level<n>.txt`
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn map_path(&self, level: u32) -> PathBuf {
        self.root.join("levels").join(format!("level{level}.txt"))
    }

    pub fn dialog_path(&self, level: u32) -> PathBuf {
        self.root.join("dialog").join(format!("level{level}.txt"))
    }

    fn read(path: &Path) -> Result<String, DataError> {
        std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl LevelData for DataDir {
    fn map_source(&self, level: u32) -> Result<String, DataError> {
        Self::read(&self.map_path(level))
    }

    fn dialog_source(&self, level: u32) -> Result<String, DataError> {
        Self::read(&self.dialog_path(level))
    }
}

/// Level text held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLevels {
    maps: HashMap<u32, String>,
    dialogs: HashMap<u32, String>,
}

impl MemoryLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, level: u32, map: &str) -> Self {
        self.maps.insert(level, map.to_string());
        self
    }

    pub fn with_dialog(mut self, level: u32, dialog: &str) -> Self {
        self.dialogs.insert(level, dialog.to_string());
        self
    }
}

impl LevelData for MemoryLevels {
    fn map_source(&self, level: u32) -> Result<String, DataError> {
        self.maps.get(&level).cloned().ok_or(DataError::Missing {
            kind: "map",
            level,
        })
    }

    fn dialog_source(&self, level: u32) -> Result<String, DataError> {
        self.dialogs.get(&level).cloned().ok_or(DataError::Missing {
            kind: "dialog",
            level,
        })
    }
}

/// Split map text into rows of tile characters
pub fn parse_map(source: &str) -> Vec<Vec<char>> {
    source
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().collect())
        .collect()
}

/// Load and parse the map for `level`
pub fn load_map(data: &dyn LevelData, level: u32) -> Result<Vec<Vec<char>>, DataError> {
    let grid = parse_map(&data.map_source(level)?);
    if grid.iter().all(|row| row.is_empty()) {
        return Err(DataError::EmptyMap(level));
    }
    Ok(grid)
}

fn digit_after(row: &[char], j: usize) -> Option<u32> {
    row.get(j + 1).and_then(|c| c.to_digit(10))
}

/// Create the entities described by `grid` and rebuild `nav` from its
/// platforms.
///
/// Zombies are created after everything else and the player last, so they
/// draw in front. Returns the player.
pub fn instantiate_map(
    registry: &mut Registry,
    nav: &mut NavGraph,
    grid: &[Vec<char>],
    level: u32,
) -> Entity {
    nav.clear();
    spawn::create_background(registry, level);

    let mut player_pos = Vec2::ZERO;
    let mut zombies = Vec::new();
    let anchor_drop = PLATFORM_HEIGHT / 2.0 + (ZOMBIE_SIZE.y * 0.6) / 2.0;

    for (i, row) in grid.iter().enumerate() {
        // Walk edges only join anchors within the same row
        let mut latest: Option<VertexId> = None;
        let mut j = 0;
        while j < row.len() {
            let pos = Vec2::new(j as f32 * TILE_SIZE, i as f32 * TILE_SIZE);
            match row[j] {
                'J' => player_pos = pos,
                tok @ ('P' | 'V') => {
                    let anchor_pos = Vec2::new(pos.x, pos.y - anchor_drop);
                    let anchor = nav.add_vertex(anchor_pos);
                    if let Some(prev) = latest {
                        let near = nav
                            .vertex(prev)
                            .is_some_and(|p| p.distance(anchor_pos) <= NAV_EDGE_DISTANCE);
                        if near {
                            nav.add_edge(anchor, prev, Action::Walk);
                            nav.add_edge(prev, anchor, Action::Walk);
                        }
                    }
                    latest = Some(anchor);
                    if tok == 'P' {
                        spawn::create_platform(registry, pos);
                    } else {
                        spawn::create_platform_vert(registry, pos);
                    }
                }
                'Z' => zombies.push(pos),
                'F' => {
                    spawn::create_food(registry, pos);
                }
                'B' => {
                    spawn::create_bullet(registry, pos);
                }
                'D' => {
                    spawn::create_door(registry, pos);
                }
                'K' => {
                    spawn::create_key(registry, pos);
                }
                'C' => {
                    spawn::create_cabinet(registry, pos);
                }
                'E' => {
                    spawn::create_object(registry, pos);
                }
                'N' => {
                    let id = digit_after(row, j).unwrap_or(0);
                    spawn::create_npc(registry, pos, id);
                    j += 1;
                }
                'S' => {
                    match digit_after(row, j) {
                        Some(index) => {
                            spawn::create_speech_point(registry, pos, index);
                        }
                        None => log::warn!("speech point at row {i} col {j} has no index"),
                    }
                    j += 1;
                }
                'G' => {
                    spawn::create_gold(registry, pos);
                }
                '|' => {
                    spawn::create_fireball(registry, pos);
                }
                '0' => {
                    spawn::create_spikeball(registry, pos);
                }
                _ => {}
            }
            j += 1;
        }
    }

    for pos in zombies {
        spawn::create_zombie(registry, pos);
    }

    spawn::create_player(registry, player_pos)
}
