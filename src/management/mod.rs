mod auth;
mod covers;

pub use auth::TokenManager;
pub use covers::CoverError;
pub use covers::CoverFolders;
pub use covers::save_cover;
pub use covers::save_covers;
