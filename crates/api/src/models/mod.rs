//! Domain types for the favorites service.

pub mod favorite;
pub mod session;

pub use favorite::{Campsite, FavoriteDocument, FavoritesView};
pub use session::{CurrentUser, keys as session_keys};
