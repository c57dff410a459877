pub(crate) mod campaign;
pub(crate) mod clock;
pub(crate) mod direction;
pub(crate) mod entity;
pub(crate) mod error;
pub(crate) mod grid;
pub(crate) mod input;
pub(crate) mod levels;
pub(crate) mod position;
pub(crate) mod render;
pub(crate) mod storage;
pub(crate) mod world;

pub mod game_app;

pub use error::LoadError;
