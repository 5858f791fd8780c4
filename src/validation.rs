// SPDX-License-Identifier: MIT

//! Declarative request validation.
//!
//! Field rules live on the request types as `validator` derives. Book
//! payloads arrive as multipart text fields, so a coercion pass (trim,
//! integer parse, date parse, enum membership) runs first and collects
//! its own failures; derive rules and cross-field checks are merged in
//! afterwards so a response always carries the complete list of
//! violations, not just the first.

use crate::error::{AppError, FieldError};
use crate::models::ReadingStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

// ─── Register / Login ────────────────────────────────────────

/// Registration payload (JSON).
///
/// Fields default to empty strings so a missing field surfaces as a
/// rule violation alongside the others instead of a deserialize error.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 50, message = "First Name must be between 2 and 50 characters"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 2, max = 50, message = "Last Name must be between 2 and 50 characters"))]
    pub last_name: String,

    #[serde(default)]
    #[validate(
        email(message = "Please provide a valid email address"),
        length(max = 255, message = "Email must be less than 255 characters")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    #[serde(default)]
    pub confirm_password: String,
}

/// Login payload (JSON).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(
        email(message = "Please provide a valid email address"),
        length(max = 255, message = "Email must be less than 255 characters")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
}

/// Validate a registration payload, including the name-charset and
/// password-confirmation rules that have no derive equivalent.
pub fn validate_register(req: &RegisterRequest) -> Result<(), AppError> {
    let mut errors = collect_errors(req.validate());

    if !req.first_name.is_empty() && !is_letters_and_spaces(&req.first_name) {
        errors.push(FieldError::new(
            "firstName",
            "First Name can only contain letters and spaces",
        ));
    }
    if !req.last_name.is_empty() && !is_letters_and_spaces(&req.last_name) {
        errors.push(FieldError::new(
            "lastName",
            "Last Name can only contain letters and spaces",
        ));
    }
    if req.password != req.confirm_password {
        errors.push(FieldError::new("confirmPassword", "Password does not match!"));
    }

    finish(errors)
}

/// Validate a login payload.
pub fn validate_login(req: &LoginRequest) -> Result<(), AppError> {
    finish(collect_errors(req.validate()))
}

fn is_letters_and_spaces(value: &str) -> bool {
    value.chars().all(|c| c.is_alphabetic() || c.is_whitespace())
}

// ─── Book payloads ───────────────────────────────────────────

/// Raw book fields as read from a multipart form. Everything is a
/// string until coercion.
#[derive(Debug, Default)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub notes: Option<String>,
    pub conclusion: Option<String>,
    pub rate: Option<String>,
    pub status: Option<String>,
    pub pages: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Coerced book fields; `None` means the field was not provided.
/// Used directly as the partial-update payload.
#[derive(Debug, Default, Validate)]
pub struct BookPatch {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Author name must be between 1-100 characters"))]
    pub author: Option<String>,

    #[validate(length(max = 3000, message = "Notes cannot exceed 3000 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 1000, message = "Conclusion cannot exceed 1000 characters"))]
    pub conclusion: Option<String>,

    #[validate(range(min = 0, max = 5, message = "Rating must be between 0-5"))]
    pub rate: Option<i64>,

    pub status: Option<ReadingStatus>,

    #[validate(range(min = 0, message = "Pages must be a positive number"))]
    pub pages: Option<i64>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl BookPatch {
    /// True when no field was provided at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.notes.is_none()
            && self.conclusion.is_none()
            && self.rate.is_none()
            && self.status.is_none()
            && self.pages.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Overlay the provided fields onto an existing record.
    pub fn apply(self, book: &mut crate::models::Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(notes) = self.notes {
            book.notes = notes;
        }
        if let Some(conclusion) = self.conclusion {
            book.conclusion = conclusion;
        }
        if let Some(rate) = self.rate {
            book.rate = rate as u8;
        }
        if let Some(status) = self.status {
            book.status = status;
        }
        if let Some(pages) = self.pages {
            book.pages = pages as u32;
        }
        if let Some(start_date) = self.start_date {
            book.start_date = crate::time_utils::format_utc_rfc3339(start_date);
        }
        if let Some(end_date) = self.end_date {
            book.end_date = Some(crate::time_utils::format_utc_rfc3339(end_date));
        }
    }
}

/// Fully validated fields for a new book. Defaults are applied when the
/// record is built.
#[derive(Debug)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub notes: String,
    pub conclusion: String,
    pub rate: u8,
    pub status: ReadingStatus,
    pub pages: u32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Validate fields for creating a book. Title is required; everything
/// else falls back to its default.
pub fn validate_create_book(form: BookForm) -> Result<NewBook, AppError> {
    let (patch, mut errors) = coerce(form);

    if patch.title.is_none() {
        errors.push(FieldError::new("title", "Title is required"));
    }

    errors.extend(collect_errors(patch.validate()));
    check_date_order(&patch, &mut errors);
    finish(errors)?;

    Ok(NewBook {
        title: patch.title.unwrap_or_default(),
        author: patch.author.unwrap_or_default(),
        notes: patch.notes.unwrap_or_default(),
        conclusion: patch.conclusion.unwrap_or_default(),
        rate: patch.rate.unwrap_or(0) as u8,
        status: patch.status.unwrap_or_default(),
        pages: patch.pages.unwrap_or(0) as u32,
        start_date: patch.start_date,
        end_date: patch.end_date,
    })
}

/// Validate fields for a partial update. All fields are optional; the
/// caller decides what an entirely empty patch means.
pub fn validate_update_book(form: BookForm) -> Result<BookPatch, AppError> {
    let (patch, mut errors) = coerce(form);

    errors.extend(collect_errors(patch.validate()));
    check_date_order(&patch, &mut errors);
    finish(errors)?;

    Ok(patch)
}

/// Coerce raw form strings into typed fields, collecting one error per
/// failed coercion.
fn coerce(form: BookForm) -> (BookPatch, Vec<FieldError>) {
    let mut patch = BookPatch::default();
    let mut errors = Vec::new();

    patch.title = form.title.map(|v| v.trim().to_string());
    patch.author = form.author.map(|v| v.trim().to_string());
    patch.notes = form.notes.map(|v| v.trim().to_string());
    patch.conclusion = form.conclusion.map(|v| v.trim().to_string());

    if let Some(raw) = form.rate {
        match raw.trim().parse::<i64>() {
            Ok(rate) => patch.rate = Some(rate),
            Err(_) => errors.push(FieldError::new("rate", "Rating must be between 0-5")),
        }
    }

    if let Some(raw) = form.status {
        match ReadingStatus::parse(raw.trim()) {
            Some(status) => patch.status = Some(status),
            None => errors.push(FieldError::new(
                "status",
                "Status must be: to-read, reading, finished, or abandoned",
            )),
        }
    }

    if let Some(raw) = form.pages {
        match raw.trim().parse::<i64>() {
            Ok(pages) => patch.pages = Some(pages),
            Err(_) => errors.push(FieldError::new("pages", "Pages must be a positive number")),
        }
    }

    if let Some(raw) = form.start_date {
        match parse_iso_datetime(raw.trim()) {
            Some(date) => patch.start_date = Some(date),
            None => errors.push(FieldError::new("startDate", "Start date must be a valid date")),
        }
    }

    if let Some(raw) = form.end_date {
        match parse_iso_datetime(raw.trim()) {
            Some(date) => patch.end_date = Some(date),
            None => errors.push(FieldError::new("endDate", "End date must be a valid date")),
        }
    }

    (patch, errors)
}

/// Cross-field rule: endDate must not precede startDate when both
/// appear in one payload.
fn check_date_order(patch: &BookPatch, errors: &mut Vec<FieldError>) {
    if let (Some(start), Some(end)) = (patch.start_date, patch.end_date) {
        if end < start {
            errors.push(FieldError::new(
                "endDate",
                "End date cannot be before start date",
            ));
        }
    }
}

/// Accept RFC 3339 datetimes or plain `YYYY-MM-DD` dates.
fn parse_iso_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}

// ─── Shared plumbing ─────────────────────────────────────────

/// Flatten derive output into field errors with wire-format names.
fn collect_errors(result: Result<(), ValidationErrors>) -> Vec<FieldError> {
    let Err(validation_errors) = result else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (field, errors) in validation_errors.field_errors() {
        for error in errors.iter() {
            let message = error
                .message
                .clone()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            out.push(FieldError::new(api_field_name(field.as_ref()), message));
        }
    }
    out
}

/// Map Rust field names to the camelCase wire names used in requests.
fn api_field_name(field: &str) -> &str {
    match field {
        "first_name" => "firstName",
        "last_name" => "lastName",
        "confirm_password" => "confirmPassword",
        "start_date" => "startDate",
        "end_date" => "endDate",
        other => other,
    }
}

/// Sort for deterministic output and wrap non-empty lists.
fn finish(mut errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        return Ok(());
    }
    errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    errors.dedup();
    Err(AppError::Validation(errors))
}
