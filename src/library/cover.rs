/// Open Library cover endpoint; `default=false` makes missing covers 404.
const COVER_URL_TEMPLATE: &str = "https://covers.openlibrary.org/b/isbn/{isbn}-L.jpg?default=false";

/// Build the large cover image URL for an ISBN.
///
/// The ISBN is not checked, so a malformed value yields a URL the
/// client will fail to load.
pub fn cover_url(isbn: &str) -> String {
    COVER_URL_TEMPLATE.replace("{isbn}", isbn)
}
