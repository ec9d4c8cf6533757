mod auth;
mod clock;
mod playlist;
mod session;

pub use auth::TokenManager;
pub use auth::TokenStatus;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use playlist::PLAYLIST_CREATED_MESSAGE;
pub use playlist::PLAYLIST_DESCRIPTION;
pub use playlist::PLAYLIST_NAME;
pub use playlist::PlaylistBuilder;
pub use session::MemorySessionStore;
pub use session::SessionStore;
