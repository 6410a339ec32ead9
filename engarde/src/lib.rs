pub use cards::*;
pub use config::*;
pub use deck::*;
pub use errors::*;
pub use game::*;
pub use history::*;
pub use phase::*;
pub use piste::*;
pub use player_state::*;
pub use protocol_types::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod cards;
mod config;
mod deck;
mod errors;
mod game;
mod history;
mod phase;
mod piste;
mod player_state;
mod protocol_types;
mod visualization;
