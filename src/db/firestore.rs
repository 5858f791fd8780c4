// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, looked up by id or email)
//! - Books (per-user records; every query is scoped by owner)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Book, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts unauthenticated connections; skip real
        // credential resolution entirely when it is configured.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by document ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a user by email. Emails are stored lowercased, so the
    /// caller passes the lowercased form.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let mut users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field("email").eq(email)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.pop())
    }

    /// Persist a newly registered user.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Unscoped read of all users. Diagnostic only; the route serving
    /// this is gated behind a config flag.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Book Operations ─────────────────────────────────────────

    /// Get a book only if it belongs to `user_id`. Absence and
    /// ownership mismatch are indistinguishable to the caller.
    pub async fn get_book_for_user(
        &self,
        book_id: &str,
        user_id: &str,
    ) -> Result<Option<Book>, AppError> {
        let book: Option<Book> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::BOOKS)
            .obj()
            .one(book_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(book.filter(|b| b.user_id == user_id))
    }

    /// All books owned by a user, most recently created first.
    pub async fn books_for_user(&self, user_id: &str) -> Result<Vec<Book>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::BOOKS)
            .filter(|q| q.for_all([q.field("userId").eq(user_id)]))
            .order_by([(
                "createdAt",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether the owner already has a book with this title,
    /// case-insensitively.
    pub async fn title_exists(&self, user_id: &str, title: &str) -> Result<bool, AppError> {
        // Firestore cannot match case-insensitively server-side; compare
        // against the owner's (small) collection here.
        let wanted = title.to_lowercase();
        let books = self.books_for_user(user_id).await?;
        Ok(books.iter().any(|b| b.title.to_lowercase() == wanted))
    }

    /// Persist a new book record.
    pub async fn insert_book(&self, book: &Book) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::BOOKS)
            .document_id(&book.id)
            .object(book)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Overwrite an existing book record. The caller has already
    /// resolved the record through an owner-scoped read.
    pub async fn update_book(&self, book: &Book) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::BOOKS)
            .document_id(&book.id)
            .object(book)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a book scoped by owner. Returns the removed record, or
    /// `None` when nothing matched both ids.
    pub async fn delete_book_for_user(
        &self,
        book_id: &str,
        user_id: &str,
    ) -> Result<Option<Book>, AppError> {
        let Some(book) = self.get_book_for_user(book_id, user_id).await? else {
            return Ok(None);
        };

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::BOOKS)
            .document_id(&book.id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some(book))
    }
}
