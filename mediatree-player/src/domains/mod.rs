pub mod library;
pub mod player;
pub mod playlist;
pub mod progress;
