//! HTTP request handlers.

use crate::db::{SortOrder, UpdateOutcome};
use crate::error::Result;
use crate::library::{BookInput, BookView, cover_url, validate_id, validate_isbn};
use crate::render::{BookForm, DetailPage, FindPage, FormMode, ListPage, MessagePage};
use crate::server::AppState;
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

/// Covers are only previewed from this host; anything else is rebuilt.
const COVER_HOST_PREFIX: &str = "https://covers.openlibrary.org/";

/// `?sort=` query on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    sort: Option<SortOrder>,
}

/// Form carrying an ISBN (`search` is accepted for older forms).
#[derive(Debug, Deserialize)]
pub struct IsbnForm {
    #[serde(default, alias = "search")]
    isbn: String,
}

/// Form posted from the cover preview.
#[derive(Debug, Deserialize)]
pub struct AddPageForm {
    #[serde(default)]
    isbn: String,
    #[serde(default, rename = "imageUrl")]
    image_url: String,
}

/// Form carrying a book ID.
#[derive(Debug, Deserialize)]
pub struct IdForm {
    #[serde(default)]
    id: String,
}

/// Edit form: an ID plus every book field.
#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    isbn: String,
    #[serde(default)]
    rating: String,
    #[serde(default)]
    date_read: String,
    #[serde(default)]
    notes: String,
}

impl EditForm {
    fn book_input(&self) -> BookInput {
        BookInput {
            isbn: self.isbn.clone(),
            rating: self.rating.clone(),
            date_read: self.date_read.clone(),
            notes: self.notes.clone(),
        }
    }
}

fn list_response(state: &AppState, order: SortOrder) -> Result<Html<String>> {
    let books = state
        .db
        .list_books(order)?
        .into_iter()
        .map(BookView::from)
        .collect();

    Ok(Html(ListPage::sorted(order, books).render(state.title())))
}

fn duplicate_response(state: &AppState, isbn: &str) -> Response {
    tracing::info!(isbn = %isbn, "Duplicate ISBN rejected");
    Html(MessagePage::duplicate(isbn).render(state.title())).into_response()
}

// ============================================================================
// LISTS
// ============================================================================

/// Book list, newest additions first unless `?sort=` says otherwise.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    list_response(&state, query.sort.unwrap_or_default())
}

/// Books by rating.
pub async fn list_best(State(state): State<AppState>) -> Result<Html<String>> {
    list_response(&state, SortOrder::Best)
}

/// Books by read date, latest first.
pub async fn list_newest(State(state): State<AppState>) -> Result<Html<String>> {
    list_response(&state, SortOrder::Newest)
}

/// Books by read date, earliest first.
pub async fn list_oldest(State(state): State<AppState>) -> Result<Html<String>> {
    list_response(&state, SortOrder::Oldest)
}

/// Exact ISBN search.
pub async fn search_book(
    State(state): State<AppState>,
    Form(form): Form<IsbnForm>,
) -> Result<Html<String>> {
    let isbn = validate_isbn(form.isbn.trim())?;
    let books = state
        .db
        .find_books_by_isbn(isbn)?
        .into_iter()
        .map(BookView::from)
        .collect();

    let page = ListPage {
        heading: format!("Results for ISBN {}", isbn),
        books,
    };
    Ok(Html(page.render(state.title())))
}

/// Single book detail.
pub async fn read_page(
    State(state): State<AppState>,
    Form(form): Form<IdForm>,
) -> Result<Html<String>> {
    let id = validate_id(&form.id)?;
    let book = state.db.get_book(id)?.map(BookView::from);
    Ok(Html(DetailPage { book }.render(state.title())))
}

// ============================================================================
// ADD FLOW
// ============================================================================

/// Empty ISBN lookup form.
pub async fn find_page(State(state): State<AppState>) -> Html<String> {
    Html(FindPage::default().render(state.title()))
}

/// Lookup form with the cover preview for a submitted ISBN.
pub async fn find_book(
    State(state): State<AppState>,
    Form(form): Form<IsbnForm>,
) -> Result<Html<String>> {
    let isbn = validate_isbn(form.isbn.trim())?;

    let page = FindPage {
        isbn: isbn.to_string(),
        image_url: Some(cover_url(isbn)),
    };
    Ok(Html(page.render(state.title())))
}

/// Add form, or the duplicate notice when the ISBN is already recorded.
pub async fn add_page(
    State(state): State<AppState>,
    Form(form): Form<AddPageForm>,
) -> Result<Response> {
    let isbn = validate_isbn(form.isbn.trim())?;

    if state.db.isbn_exists(isbn)? {
        return Ok(duplicate_response(&state, isbn));
    }

    let image_url = if form.image_url.starts_with(COVER_HOST_PREFIX) {
        form.image_url
    } else {
        cover_url(isbn)
    };

    let page = BookForm {
        mode: FormMode::Add,
        isbn: isbn.to_string(),
        image_url,
        rating: String::new(),
        date_read: String::new(),
        notes: String::new(),
    };
    Ok(Html(page.render(state.title())).into_response())
}

/// Validate, sanitize and insert a book.
pub async fn add_book(
    State(state): State<AppState>,
    Form(input): Form<BookInput>,
) -> Result<Response> {
    let book = input.validate()?;

    match state.db.insert_book(&book)? {
        Some(id) => {
            tracing::info!(id, isbn = %book.isbn, "Book added");
            Ok(Redirect::to("/").into_response())
        }
        None => Ok(duplicate_response(&state, &book.isbn)),
    }
}

// ============================================================================
// EDIT / DELETE
// ============================================================================

/// Edit form pre-filled from the submitted fields.
///
/// When only an ID is posted the stored record fills the form instead.
pub async fn edit_page(
    State(state): State<AppState>,
    Form(form): Form<EditForm>,
) -> Result<Html<String>> {
    let id = validate_id(&form.id)?;

    let page = if form.isbn.trim().is_empty() {
        let Some(book) = state.db.get_book(id)?.map(BookView::from) else {
            return Ok(Html(DetailPage { book: None }.render(state.title())));
        };
        BookForm {
            mode: FormMode::Edit(id),
            isbn: book.isbn,
            image_url: book.cover_url,
            rating: book.rating.to_string(),
            date_read: book.date_read_value,
            notes: book.notes,
        }
    } else {
        let isbn = form.isbn.trim().to_string();
        BookForm {
            mode: FormMode::Edit(id),
            image_url: cover_url(&isbn),
            isbn,
            rating: form.rating,
            date_read: form.date_read,
            notes: form.notes,
        }
    };

    Ok(Html(page.render(state.title())))
}

/// Validate, sanitize and replace a book.
pub async fn edit_book(
    State(state): State<AppState>,
    Form(form): Form<EditForm>,
) -> Result<Response> {
    let id = validate_id(&form.id)?;
    let book = form.book_input().validate()?;

    match state.db.update_book(id, &book)? {
        UpdateOutcome::Updated => {
            tracing::info!(id, isbn = %book.isbn, "Book updated");
        }
        UpdateOutcome::NotFound => {
            tracing::debug!(id, "Edit for missing book ignored");
        }
        UpdateOutcome::Duplicate => return Ok(duplicate_response(&state, &book.isbn)),
    }

    Ok(Redirect::to("/").into_response())
}

/// Delete a book.
pub async fn delete_book(
    State(state): State<AppState>,
    Form(form): Form<IdForm>,
) -> Result<Redirect> {
    let id = validate_id(&form.id)?;
    let deleted = state.db.delete_book(id)?;
    tracing::info!(id, deleted, "Book delete requested");
    Ok(Redirect::to("/"))
}

// ============================================================================
// JSON API
// ============================================================================

/// Stats response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    book_count: i64,
    average_rating: Option<f64>,
}

/// All books as JSON.
pub async fn api_books(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BookView>>> {
    let books = state
        .db
        .list_books(query.sort.unwrap_or_default())?
        .into_iter()
        .map(BookView::from)
        .collect();
    Ok(Json(books))
}

/// Library statistics.
pub async fn api_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    Ok(Json(StatsResponse {
        book_count: state.db.count_books()?,
        average_rating: state.db.average_rating()?,
    }))
}
