//! Business logic services.

pub mod favorites;

pub use favorites::{
    AddOneOutcome, FavoritesService, RemoveAllOutcome, RemoveOneOutcome,
};
