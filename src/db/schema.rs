use crate::db::*;
use crate::error::{AppError, Result};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::Arc;

const BOOK_COLUMNS: &str = "id, isbn, rating, date_read, notes";

/// Result of an update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The row was replaced.
    Updated,
    /// Another row already holds the requested ISBN.
    Duplicate,
    /// No row with this ID.
    NotFound,
}

/// Database wrapper for thread-safe access.
///
/// Every operation holds the connection lock only for its own duration.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Open in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.initialize_schema()?;
        Ok(db)
    }

    /// Close the database.
    ///
    /// The connection is only closed explicitly when this is the last
    /// handle; otherwise it closes when the remaining clones drop.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => mutex
                .into_inner()
                .close()
                .map_err(|(_, e)| AppError::Database(format!("Failed to close database: {}", e))),
            Err(_) => {
                tracing::debug!("Database still shared, deferring close");
                Ok(())
            }
        }
    }

    /// Initialize database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            -- ISBN uniqueness is checked by the application, not the schema
            CREATE TABLE IF NOT EXISTS book (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                isbn TEXT NOT NULL,
                rating REAL NOT NULL,
                date_read TEXT,
                notes TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_book_isbn ON book(isbn);
            "#,
        )
        .map_err(|e| AppError::Database(format!("Failed to initialize schema: {}", e)))?;

        Ok(())
    }

    fn row_to_book(row: &Row<'_>) -> rusqlite::Result<StoredBook> {
        Ok(StoredBook {
            id: row.get(0)?,
            isbn: row.get(1)?,
            rating: row.get(2)?,
            date_read: parse_stored_date(row.get(3)?),
            notes: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    }

    fn query_books(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<StoredBook>> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| AppError::Database(format!("Failed to prepare query: {}", e)))?;

        let books = stmt
            .query_map(params, Self::row_to_book)
            .map_err(|e| AppError::Database(format!("Failed to query books: {}", e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AppError::Database(format!("Failed to collect books: {}", e)))?;

        Ok(books)
    }

    fn isbn_taken(conn: &Connection, isbn: &str, except_id: Option<i64>) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM book WHERE isbn = ?1 AND id IS NOT ?2)",
            params![isbn, except_id],
            |row| row.get(0),
        )
        .map_err(|e| AppError::Database(format!("Failed to check ISBN: {}", e)))
    }

    // ========== READ OPERATIONS ==========

    /// List every book in the given order.
    pub fn list_books(&self, order: SortOrder) -> Result<Vec<StoredBook>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM book ORDER BY {}",
            BOOK_COLUMNS,
            order.order_by()
        );
        Self::query_books(&conn, &sql, [])
    }

    /// Find books by ISBN.
    pub fn find_books_by_isbn(&self, isbn: &str) -> Result<Vec<StoredBook>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM book WHERE isbn = ?1 ORDER BY id DESC",
            BOOK_COLUMNS
        );
        Self::query_books(&conn, &sql, params![isbn])
    }

    /// Get a book by ID.
    pub fn get_book(&self, id: i64) -> Result<Option<StoredBook>> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {} FROM book WHERE id = ?1", BOOK_COLUMNS),
            params![id],
            Self::row_to_book,
        )
        .optional()
        .map_err(|e| AppError::Database(format!("Failed to get book: {}", e)))
    }

    /// Check whether any book has this ISBN.
    pub fn isbn_exists(&self, isbn: &str) -> Result<bool> {
        let conn = self.conn.lock();
        Self::isbn_taken(&conn, isbn, None)
    }

    /// Count books.
    pub fn count_books(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row("SELECT COUNT(*) FROM book", [], |row| row.get(0))
            .map_err(|e| AppError::Database(format!("Failed to count books: {}", e)))
    }

    /// Average rating over all books, `None` when empty.
    pub fn average_rating(&self) -> Result<Option<f64>> {
        let conn = self.conn.lock();
        conn.query_row("SELECT AVG(rating) FROM book", [], |row| row.get(0))
            .map_err(|e| AppError::Database(format!("Failed to average ratings: {}", e)))
    }

    // ========== WRITE OPERATIONS ==========

    /// Insert a book unless its ISBN is already present.
    ///
    /// Returns the generated ID, or `None` for a duplicate ISBN.
    pub fn insert_book(&self, book: &NewBook) -> Result<Option<i64>> {
        let conn = self.conn.lock();

        if Self::isbn_taken(&conn, &book.isbn, None)? {
            return Ok(None);
        }

        conn.execute(
            "INSERT INTO book (isbn, rating, date_read, notes) VALUES (?1, ?2, ?3, ?4)",
            params![
                book.isbn,
                book.rating,
                book.date_read.format(DATE_FORMAT).to_string(),
                book.notes,
            ],
        )
        .map_err(|e| AppError::Database(format!("Failed to insert book: {}", e)))?;

        Ok(Some(conn.last_insert_rowid()))
    }

    /// Replace all fields of a book.
    pub fn update_book(&self, id: i64, book: &NewBook) -> Result<UpdateOutcome> {
        let conn = self.conn.lock();

        if Self::isbn_taken(&conn, &book.isbn, Some(id))? {
            return Ok(UpdateOutcome::Duplicate);
        }

        let rows = conn
            .execute(
                "UPDATE book SET isbn = ?1, rating = ?2, date_read = ?3, notes = ?4 WHERE id = ?5",
                params![
                    book.isbn,
                    book.rating,
                    book.date_read.format(DATE_FORMAT).to_string(),
                    book.notes,
                    id,
                ],
            )
            .map_err(|e| AppError::Database(format!("Failed to update book: {}", e)))?;

        Ok(if rows > 0 {
            UpdateOutcome::Updated
        } else {
            UpdateOutcome::NotFound
        })
    }

    /// Delete a book.
    pub fn delete_book(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let rows = conn
            .execute("DELETE FROM book WHERE id = ?1", params![id])
            .map_err(|e| AppError::Database(format!("Failed to delete book: {}", e)))?;
        Ok(rows > 0)
    }
}
