pub mod behavior;
pub mod collision;
pub mod horror;
pub mod player;
pub mod resources;
pub mod spawn;
