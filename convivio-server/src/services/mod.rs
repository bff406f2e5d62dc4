pub mod users;
pub mod profiles;
pub mod posts;
