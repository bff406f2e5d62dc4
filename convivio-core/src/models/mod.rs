pub mod user;
pub mod profile;
pub mod post;

// Re-export per comodità
pub use post::{Comment, Like, Post};
pub use profile::{Education, Experience, Profile, Social};
pub use user::{User, UserRef};
