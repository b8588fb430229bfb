//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Spatial components for positioning and the room graph

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Room an entity currently occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub room: Entity,
}

impl Location {
    pub fn new(room: Entity) -> Self {
        Self { room }
    }
}

/// Room flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomFlag {
    /// Attacks are forbidden here
    Peaceful,
    /// Entering kills
    DeathTrap,
    /// Sheltered from the weather
    Indoors,
}

/// Room component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Room {
    pub room_flags: Vec<RoomFlag>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(mut self, flag: RoomFlag) -> Self {
        if !self.room_flags.contains(&flag) {
            self.room_flags.push(flag);
        }
        self
    }

    pub fn has_flag(&self, flag: RoomFlag) -> bool {
        self.room_flags.contains(&flag)
    }
}

/// Compass directions for exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single exit from a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitData {
    pub direction: Direction,
    pub dest: Entity,
    pub closed: bool,
    pub locked: bool,
}

impl ExitData {
    pub fn new(direction: Direction, dest: Entity) -> Self {
        Self {
            direction,
            dest,
            closed: false,
            locked: false,
        }
    }

    /// Whether something can walk through right now
    pub fn is_passable(&self) -> bool {
        !self.closed && !self.locked
    }
}

/// Exits of a room
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Exits {
    pub exits: Vec<ExitData>,
}

impl Exits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the exit in the given direction
    pub fn set(&mut self, exit: ExitData) {
        self.exits.retain(|e| e.direction != exit.direction);
        self.exits.push(exit);
    }

    pub fn get(&self, direction: Direction) -> Option<&ExitData> {
        self.exits.iter().find(|e| e.direction == direction)
    }

    pub fn get_mut(&mut self, direction: Direction) -> Option<&mut ExitData> {
        self.exits.iter_mut().find(|e| e.direction == direction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExitData> {
        self.exits.iter()
    }
}
