pub mod delete;
pub mod detail_get;
pub mod patch;
pub mod post;
pub mod utils;

pub use delete::drink_delete;
pub use detail_get::drinks_detail_get;
pub use patch::drink_patch;
pub use post::drinks_post;
