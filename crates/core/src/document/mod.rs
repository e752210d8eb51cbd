pub mod id;
pub mod model;
pub mod validate;

pub use id::{new_page_id, style_block_key, PublicId};
pub use model::{Owner, PageRecord, PublishedPage, PublishedSite};
pub use validate::{validate_page_name, ValidationError};
