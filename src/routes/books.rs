// SPDX-License-Identifier: MIT

//! Book CRUD routes. Everything here sits behind the auth gate, and
//! every database access is scoped to the authenticated owner.

use crate::error::{success, AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::book::DEFAULT_COVER;
use crate::models::Book;
use crate::services::covers::{CoverUpload, MAX_COVER_BYTES};
use crate::time_utils::{format_utc_rfc3339, now_rfc3339};
use crate::validation::{self, BookForm, NewBook};
use crate::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

/// Book routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/books", post(create_book).get(list_books))
        .route(
            "/books/{book_id}",
            get(get_book).patch(update_book).delete(delete_book),
        )
}

#[derive(Serialize)]
struct BookData {
    book: Book,
}

// ─── Create ──────────────────────────────────────────────────

/// Create a book from a multipart payload (fields + optional cover).
async fn create_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (form, cover) = read_book_form(multipart).await?;
    let fields = validation::validate_create_book(form)?;

    if state.db.title_exists(&user.user_id, &fields.title).await? {
        return Err(AppError::Duplicate("Book already exists!".to_string()));
    }
    if state.db.get_user(&user.user_id).await?.is_none() {
        return Err(AppError::NotFound("User was not found!".to_string()));
    }

    let cover_name = match &cover {
        Some(upload) => state.covers.store(upload).await?,
        None => DEFAULT_COVER.to_string(),
    };

    let book = build_book(&user.user_id, fields, cover_name);
    state.db.insert_book(&book).await?;

    tracing::info!(user_id = %user.user_id, book_id = %book.id, "Book created");

    Ok((StatusCode::CREATED, success(BookData { book })))
}

fn build_book(owner_id: &str, fields: NewBook, cover: String) -> Book {
    let now = now_rfc3339();
    Book {
        id: uuid::Uuid::new_v4().to_string(),
        title: fields.title,
        author: fields.author,
        notes: fields.notes,
        conclusion: fields.conclusion,
        rate: fields.rate,
        status: fields.status,
        pages: fields.pages,
        start_date: fields
            .start_date
            .map(format_utc_rfc3339)
            .unwrap_or_else(|| now.clone()),
        end_date: fields.end_date.map(format_utc_rfc3339),
        cover,
        user_id: owner_id.to_string(),
        created_at: now.clone(),
        updated_at: now,
    }
}

// ─── List ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    /// Pagination: page number (1-indexed)
    page: Option<String>,
    /// Pagination: items per page
    limit: Option<String>,
    /// Case-insensitive match against title/author
    search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookPage {
    books: Vec<Book>,
    total_books: usize,
    total_pages: usize,
    page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_query: Option<String>,
}

/// Coerce raw query values, defaulting on anything non-numeric and
/// clamping into bounds.
fn page_params(page: Option<&str>, limit: Option<&str>) -> (usize, usize) {
    let page = page
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1) as usize;
    let limit = limit
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_LIMIT as i64)
        .clamp(1, MAX_LIMIT as i64) as usize;
    (page, limit)
}

/// Slice an already-ordered result set into one page.
///
/// A page past the end is an error, except that an empty result set
/// always yields an empty success page.
fn paginate(
    books: Vec<Book>,
    page: usize,
    limit: usize,
    search_query: Option<String>,
) -> Result<BookPage> {
    let total_books = books.len();
    if total_books == 0 {
        return Ok(BookPage {
            books: Vec::new(),
            total_books: 0,
            total_pages: 0,
            page: 1,
            search_query,
        });
    }

    let total_pages = total_books.div_ceil(limit);
    if page > total_pages {
        return Err(AppError::PageNotFound);
    }

    let start = (page - 1) * limit;
    let end = (start + limit).min(total_books);
    let books = books[start..end].to_vec();

    Ok(BookPage {
        books,
        total_books,
        total_pages,
        page,
        search_query,
    })
}

/// List the caller's books, most recently created first.
async fn list_books(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let (page, limit) = page_params(params.page.as_deref(), params.limit.as_deref());
    let search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    tracing::debug!(
        user_id = %user.user_id,
        page,
        limit,
        search = ?search,
        "Listing books"
    );

    let mut books = state.db.books_for_user(&user.user_id).await?;
    if let Some(ref needle) = search {
        books.retain(|b| b.matches_search(needle));
    }

    Ok(success(paginate(books, page, limit, search)?))
}

// ─── Get / Update / Delete ───────────────────────────────────

/// Fetch one book owned by the caller.
async fn get_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(book_id): Path<String>,
) -> Result<impl IntoResponse> {
    let book_id = parse_book_id(&book_id)?;

    let book = state
        .db
        .get_book_for_user(&book_id, &user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(success(BookData { book }))
}

/// Partially update a book; only provided fields change. A new cover
/// replaces the old file, which is removed after the record write.
async fn update_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(book_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let book_id = parse_book_id(&book_id)?;
    let (form, cover) = read_book_form(multipart).await?;
    let patch = validation::validate_update_book(form)?;

    if patch.is_empty() && cover.is_none() {
        return Err(AppError::BadRequest(
            "No valid fields provided for update".to_string(),
        ));
    }

    let mut book = state
        .db
        .get_book_for_user(&book_id, &user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    let mut replaced_cover = None;
    if let Some(upload) = &cover {
        let new_name = state.covers.store(upload).await?;
        replaced_cover = Some(std::mem::replace(&mut book.cover, new_name));
    }

    patch.apply(&mut book);
    book.updated_at = now_rfc3339();
    state.db.update_book(&book).await?;

    // Post-commit cleanup; never blocks the update result.
    if let Some(previous) = replaced_cover {
        state.covers.remove(&previous).await;
    }

    tracing::info!(user_id = %user.user_id, book_id = %book.id, "Book updated");

    Ok(success(BookData { book }))
}

/// Delete a book owned by the caller.
async fn delete_book(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(book_id): Path<String>,
) -> Result<impl IntoResponse> {
    let book_id = parse_book_id(&book_id)?;

    let Some(book) = state
        .db
        .delete_book_for_user(&book_id, &user.user_id)
        .await?
    else {
        return Err(AppError::NotFound("Book was not found".to_string()));
    };

    state.covers.remove(&book.cover).await;

    tracing::info!(user_id = %user.user_id, book_id = %book.id, "Book deleted");

    Ok(success(serde_json::Value::Null))
}

fn parse_book_id(raw: &str) -> Result<String> {
    uuid::Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::BadRequest("Please provide a correct book Id".to_string()))
}

// ─── Multipart parsing ───────────────────────────────────────

/// Read book fields and the optional `cover` image out of a multipart
/// body. The cover is validated (image content type, size cap) but
/// kept in memory; unknown fields are ignored.
async fn read_book_form(mut multipart: Multipart) -> Result<(BookForm, Option<CoverUpload>)> {
    let mut form = BookForm::default();
    let mut cover = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "cover" {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let extension: String = content_type
                .strip_prefix("image/")
                .unwrap_or_default()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect();
            if extension.is_empty() {
                return Err(AppError::BadRequest("Only image allowed".to_string()));
            }

            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if bytes.len() > MAX_COVER_BYTES {
                return Err(AppError::BadRequest(
                    "Cover image cannot exceed 5 MB".to_string(),
                ));
            }

            cover = Some(CoverUpload {
                bytes: bytes.to_vec(),
                extension,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        match name.as_str() {
            "title" => form.title = Some(value),
            "author" => form.author = Some(value),
            "notes" => form.notes = Some(value),
            "conclusion" => form.conclusion = Some(value),
            "rate" => form.rate = Some(value),
            "status" => form.status = Some(value),
            "pages" => form.pages = Some(value),
            "startDate" => form.start_date = Some(value),
            "endDate" => form.end_date = Some(value),
            _ => {}
        }
    }

    Ok((form, cover))
}
