pub mod clock;
pub mod constants;
pub mod deferred;
pub mod game_loop;
pub mod input;
pub mod layout;
pub mod outcome;
pub mod snapshot;
pub mod spatial;
pub mod state;
pub mod systems;
