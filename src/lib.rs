// Local multiplayer device assignment
//
// Devices join as players when they are plugged in or first used, leave when
// they are unplugged, and drive the movement and fire state of the player
// they belong to. The keyboard and mouse join together as one player.

pub mod engine;
pub mod game;
