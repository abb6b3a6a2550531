//! HTML page rendering from typed view models.
//!
//! Every interpolated value goes through [`escape_html`], including notes
//! that were already sanitized on write.

use crate::db::SortOrder;
use crate::library::BookView;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared layout.
fn layout(site_title: &str, page_title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{page_title} - {site_title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; }}
        h1 a {{ color: #333; text-decoration: none; }}
        nav a {{ margin-right: 0.8rem; color: #0066cc; }}
        .book {{ display: flex; gap: 1rem; background: #f5f5f5; padding: 1rem; border-radius: 8px; margin: 1rem 0; }}
        .book img {{ width: 96px; }}
        .notes {{ white-space: pre-wrap; }}
        .message {{ background: #fff4e5; padding: 1rem; border-radius: 8px; }}
        form.inline {{ display: inline; }}
    </style>
</head>
<body>
    <h1><a href="/">{site_title}</a></h1>
    <nav>
        <a href="/">Recent</a>
        <a href="/best">Best</a>
        <a href="/newest">Newest</a>
        <a href="/oldest">Oldest</a>
        <a href="/find-page">Add a book</a>
        <form class="inline" method="post" action="/search-book">
            <input name="isbn" placeholder="Search by ISBN" inputmode="numeric">
            <button type="submit">Search</button>
        </form>
    </nav>
{content}
</body>
</html>"#,
        site_title = escape_html(site_title),
        page_title = escape_html(page_title),
        content = content,
    )
}

fn cover_img(url: &str, isbn: &str) -> String {
    format!(
        r#"<img src="{}" alt="Cover of ISBN {}" loading="lazy">"#,
        escape_html(url),
        escape_html(isbn)
    )
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        escape_html(value)
    )
}

/// Book list (home, sorted views, search results).
#[derive(Debug, Clone)]
pub struct ListPage {
    /// Page heading.
    pub heading: String,
    /// Books to show, already ordered.
    pub books: Vec<BookView>,
}

impl ListPage {
    /// List page for a sort order.
    pub fn sorted(order: SortOrder, books: Vec<BookView>) -> Self {
        Self {
            heading: order.heading().to_string(),
            books,
        }
    }

    /// Render the page.
    pub fn render(&self, site_title: &str) -> String {
        let mut content = format!("    <h2>{}</h2>\n", escape_html(&self.heading));

        if self.books.is_empty() {
            content.push_str("    <p>No books found.</p>\n");
        }

        for book in &self.books {
            let date = book.date_read.as_deref().unwrap_or("Unknown date");
            content.push_str(&format!(
                r#"    <div class="book">
        {cover}
        <div>
            <p><strong>ISBN {isbn}</strong></p>
            <p>Rating: {rating}/10</p>
            <p>Read: {date}</p>
            <p class="notes">{notes}</p>
            <form class="inline" method="post" action="/read-page">{id}<button type="submit">Read</button></form>
            <form class="inline" method="post" action="/edit-page">{id}{edit_fields}<button type="submit">Edit</button></form>
            <form class="inline" method="post" action="/delete-book">{id}<button type="submit">Delete</button></form>
        </div>
    </div>
"#,
                cover = cover_img(&book.cover_url, &book.isbn),
                isbn = escape_html(&book.isbn),
                rating = escape_html(&book.rating_display),
                date = escape_html(date),
                notes = escape_html(&book.notes),
                id = hidden("id", &book.id.to_string()),
                edit_fields = [
                    hidden("isbn", &book.isbn),
                    hidden("rating", &book.rating.to_string()),
                    hidden("date_read", &book.date_read_value),
                    hidden("notes", &book.notes),
                ]
                .concat(),
            ));
        }

        layout(site_title, &self.heading, &content)
    }
}

/// ISBN lookup form with optional cover preview.
#[derive(Debug, Clone, Default)]
pub struct FindPage {
    /// ISBN searched for, empty on first visit.
    pub isbn: String,
    /// Cover preview URL once an ISBN was submitted.
    pub image_url: Option<String>,
}

impl FindPage {
    /// Render the page.
    pub fn render(&self, site_title: &str) -> String {
        let mut content = format!(
            r#"    <h2>Find a book</h2>
    <form method="post" action="/find-book">
        <input name="isbn" value="{}" placeholder="ISBN" inputmode="numeric" maxlength="13" required>
        <button type="submit">Find</button>
    </form>
"#,
            escape_html(&self.isbn)
        );

        if let Some(url) = &self.image_url {
            content.push_str(&format!(
                r#"    <div class="book">
        {cover}
        <form method="post" action="/add-page">
            {isbn}{image}
            <button type="submit">Add this book</button>
        </form>
    </div>
"#,
                cover = cover_img(url, &self.isbn),
                isbn = hidden("isbn", &self.isbn),
                image = hidden("imageUrl", url),
            ));
        }

        layout(site_title, "Find a book", &content)
    }
}

/// Whether a [`BookForm`] creates or edits a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Submit to `/add-book`.
    Add,
    /// Submit to `/edit-book` for the given ID.
    Edit(i64),
}

/// Add/edit form for one book.
#[derive(Debug, Clone)]
pub struct BookForm {
    /// Target of the form.
    pub mode: FormMode,
    /// ISBN.
    pub isbn: String,
    /// Cover preview URL.
    pub image_url: String,
    /// Rating text.
    pub rating: String,
    /// Date read, `YYYY-MM-DD`.
    pub date_read: String,
    /// Notes text.
    pub notes: String,
}

impl BookForm {
    /// Render the page.
    pub fn render(&self, site_title: &str) -> String {
        let (title, action, id_field) = match self.mode {
            FormMode::Add => ("Add a book", "/add-book", String::new()),
            FormMode::Edit(id) => ("Edit book", "/edit-book", hidden("id", &id.to_string())),
        };

        let content = format!(
            r#"    <h2>{title}</h2>
    <div class="book">
        {cover}
        <form method="post" action="{action}">
            {id_field}
            <p><label>ISBN <input name="isbn" value="{isbn}" inputmode="numeric" maxlength="13" required></label></p>
            <p><label>Rating <input name="rating" type="number" min="0" max="10" step="any" value="{rating}" required></label></p>
            <p><label>Date read <input name="date_read" type="date" value="{date_read}" required></label></p>
            <p><label>Notes<br><textarea name="notes" rows="8" cols="60">{notes}</textarea></label></p>
            <button type="submit">Save</button>
        </form>
    </div>
"#,
            title = title,
            cover = cover_img(&self.image_url, &self.isbn),
            action = action,
            id_field = id_field,
            isbn = escape_html(&self.isbn),
            rating = escape_html(&self.rating),
            date_read = escape_html(&self.date_read),
            notes = escape_html(&self.notes),
        );

        layout(site_title, title, &content)
    }
}

/// Single-book detail view.
#[derive(Debug, Clone)]
pub struct DetailPage {
    /// The book, `None` when the ID matched nothing.
    pub book: Option<BookView>,
}

impl DetailPage {
    /// Render the page.
    pub fn render(&self, site_title: &str) -> String {
        let Some(book) = &self.book else {
            return layout(site_title, "Book", "    <p>No books found.</p>\n");
        };

        let content = format!(
            r#"    <h2>ISBN {isbn}</h2>
    <div class="book">
        {cover}
        <div>
            <p>Rating: {rating}/10</p>
            <p>Read: {date}</p>
        </div>
    </div>
    <h3>Notes</h3>
    <p class="notes">{notes}</p>
"#,
            isbn = escape_html(&book.isbn),
            cover = cover_img(&book.cover_url, &book.isbn),
            rating = escape_html(&book.rating_display),
            date = escape_html(book.date_read.as_deref().unwrap_or("Unknown date")),
            notes = escape_html(&book.notes),
        );

        layout(site_title, &format!("ISBN {}", book.isbn), &content)
    }
}

/// Informational message, such as a duplicate ISBN notice.
#[derive(Debug, Clone)]
pub struct MessagePage {
    /// Message text.
    pub message: String,
}

impl MessagePage {
    /// Notice shown when an ISBN is already recorded.
    pub fn duplicate(isbn: &str) -> Self {
        Self {
            message: format!("A book with ISBN {} already exists.", isbn),
        }
    }

    /// Render the page.
    pub fn render(&self, site_title: &str) -> String {
        let content = format!(
            "    <p class=\"message\">{}</p>\n    <p><a href=\"/\">Back to the list</a></p>\n",
            escape_html(&self.message)
        );
        layout(site_title, "Notice", &content)
    }
}
