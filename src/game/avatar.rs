// Player avatars spawned for joined players

use crate::engine::entity::EntitySpawner;
use glam::Vec2;
use log::info;

/// Unique identifier for an avatar
pub type AvatarId = u32;

/// Horizontal distance between spawn points of neighbouring slots
const SPAWN_SPACING: f32 = 2.0;

/// The on-screen stand-in for a joined player
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    /// Unique identifier
    pub id: AvatarId,
    /// Slot of the player controlling this avatar
    pub player_index: usize,
    /// World position
    pub position: Vec2,
}

impl Avatar {
    /// Display label
    pub fn label(&self) -> String {
        format!("Player {}", self.player_index)
    }
}

/// Owns every avatar in the game
#[derive(Debug, Default)]
pub struct AvatarWorld {
    avatars: Vec<Avatar>,
    next_id: AvatarId,
}

impl AvatarWorld {
    pub fn new() -> Self {
        Self {
            avatars: Vec::new(),
            next_id: 0,
        }
    }

    /// Where the avatar for a slot appears
    pub fn spawn_point(player_index: usize) -> Vec2 {
        Vec2::new(player_index as f32 * SPAWN_SPACING, 0.0)
    }

    /// Get an avatar by ID
    pub fn get(&self, id: AvatarId) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.id == id)
    }

    /// Get an avatar by player slot
    pub fn get_by_player(&self, player_index: usize) -> Option<&Avatar> {
        self.avatars.iter().find(|a| a.player_index == player_index)
    }

    pub fn count(&self) -> usize {
        self.avatars.len()
    }

    /// One-line summary of every avatar, for logging
    pub fn describe(&self) -> String {
        self.avatars
            .iter()
            .map(|a| format!("{} @ ({:.1}, {:.1})", a.label(), a.position.x, a.position.y))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl EntitySpawner for AvatarWorld {
    type Handle = AvatarId;

    fn spawn(&mut self, player_index: usize) -> AvatarId {
        let id = self.next_id;
        self.next_id += 1;

        let position = Self::spawn_point(player_index);
        self.avatars.push(Avatar {
            id,
            player_index,
            position,
        });
        info!("Spawned avatar {} for player {}", id, player_index);

        id
    }

    fn despawn(&mut self, id: AvatarId) {
        if let Some(pos) = self.avatars.iter().position(|a| a.id == id) {
            let avatar = self.avatars.remove(pos);
            info!("Despawned avatar {} ({})", avatar.id, avatar.label());
        }
    }

    fn translate(&mut self, id: &AvatarId, delta: Vec2) {
        if let Some(avatar) = self.avatars.iter_mut().find(|a| a.id == *id) {
            avatar.position += delta;
        }
    }
}
