//! convivio-core: tipi condivisi tra client e server (modelli, DTO HTTP, errori, utilità).
//! Niente I/O o dipendenze non compatibili con WASM.

pub mod models;
pub mod protocol;
pub mod error;
pub mod utils;

// Re-export utili per ridurre i percorsi nei crate client/server
pub use error::Error;
pub use models::{
    post::{Comment, Like, Post},
    profile::{Education, Experience, Profile, Social},
    user::{User, UserRef},
};
pub use protocol::http::{
    AddCommentRequest, AddEducationRequest, AddExperienceRequest, ApiMessage, CommentsResponse,
    CreatePostRequest, LikesResponse, ListPostsResponse, ListProfilesResponse, LoginRequest,
    LoginResponse, RegisterRequest, RegisterResponse, SkillsInput, UpsertProfileRequest,
};
pub use utils::{new_id, normalize_https, now_timestamp, strip_html};
