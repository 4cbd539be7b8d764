// Engine modules: input assignment, entity seam, frame timing

pub mod entity;
pub mod game_loop;
pub mod input;
