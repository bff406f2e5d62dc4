pub mod http;

// Re-export comodi
pub use http::{
    AddCommentRequest, AddEducationRequest, AddExperienceRequest, ApiMessage, CommentsResponse,
    CreatePostRequest, LikesResponse, ListPostsResponse, ListProfilesResponse, LoginRequest,
    LoginResponse, RegisterRequest, RegisterResponse, SkillsInput, UpsertProfileRequest,
};
