mod cover;
mod sanitize;
mod validate;

pub mod book;

pub use book::{BookInput, BookView};
pub use cover::cover_url;
pub use sanitize::sanitize_notes;
pub use validate::{
    validate_date_read, validate_date_read_on, validate_id, validate_isbn, validate_rating,
};
