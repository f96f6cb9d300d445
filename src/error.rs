//! Crate-level error type

use thiserror::Error;

use crate::embed::EmbedError;
use crate::persistence::StoreError;
use crate::settings::SettingsError;
use crate::sim::grid::GridError;

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Unknown game: {0}")]
    UnknownGame(String),
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
