// Seam between the input layer and whatever owns player entities

use glam::Vec2;

/// Creates, moves and destroys the entity that represents a joined player
pub trait EntitySpawner {
    /// Handle identifying a spawned entity
    type Handle;

    /// Spawn an entity for the player in slot `player_index`
    fn spawn(&mut self, player_index: usize) -> Self::Handle;

    /// Destroy a previously spawned entity
    fn despawn(&mut self, handle: Self::Handle);

    /// Move an entity by `delta` world units
    fn translate(&mut self, handle: &Self::Handle, delta: Vec2);
}
