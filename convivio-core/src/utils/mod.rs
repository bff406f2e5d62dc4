pub mod ids;
pub mod time;
pub mod sanitize;
pub mod urls;

pub use ids::new_id;
pub use sanitize::strip_html;
pub use time::now_timestamp;
pub use urls::normalize_https;
