// Game-side pieces driven by the input layer
//
// - Avatars spawned and moved for joined players

pub mod avatar;

pub use avatar::{Avatar, AvatarId, AvatarWorld};
