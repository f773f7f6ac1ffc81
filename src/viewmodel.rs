//! 视图模型层
//!
//! 每个界面对应一个视图模型，通过 `watch` 通道推送 `UiState`。

pub mod catalog_list;
pub mod favorites;
pub mod game_details;
pub mod game_list;
pub mod scope;
pub mod state;

pub use catalog_list::{CollectionsViewModel, GenresViewModel, PublishersViewModel};
pub use favorites::FavoritesViewModel;
pub use game_details::{GameDetailsScreen, GameDetailsViewModel};
pub use game_list::{FeedSource, GameFeed, GameListViewModel};
pub use scope::ViewModelScope;
pub use state::UiState;
