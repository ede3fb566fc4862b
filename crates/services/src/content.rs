//! The content service.
//!
//! CRUD over the entries collection. The collection is a chronological
//! stack: every mutator maintains newest-first ordering, and ids are
//! compared as decimal strings because that is how the glue layer hands
//! them over.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::Mutex;
use tracing::debug;

use domains::{Comment, Entry, EntryRepo, Result, User};

use crate::identity::content_id;
use crate::DATE_FORMAT;

/// Keeps entries having an exact match of `keyword` against any of their
/// keywords. An empty keyword matches nothing: entries carry no empty
/// keywords by construction.
pub fn filter_posts(entries: &[Entry], keyword: &str) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| entry.keywords.iter().any(|candidate| candidate == keyword))
        .cloned()
        .collect()
}

pub struct ContentService {
    repo: Arc<dyn EntryRepo>,
    // Held for every full load-mutate-save cycle on the entries collection.
    write_lock: Mutex<()>,
}

impl ContentService {
    pub fn new(repo: Arc<dyn EntryRepo>) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns a newest-first snapshot of all entries.
    pub async fn list_posts(&self) -> Result<Vec<Entry>> {
        self.repo.load().await
    }

    /// Linear scan by decimal-string-compared id.
    pub async fn get_post(&self, id: &str) -> Result<Option<Entry>> {
        let entries = self.repo.load().await?;
        Ok(entries.into_iter().find(|entry| entry.id.to_string() == id))
    }

    /// Creates a post for an authenticated author.
    ///
    /// Returns the new id, or 0 (and writes nothing) when the caller is
    /// unauthenticated or the text is empty after trimming. An empty title
    /// is auto-filled as `Post #<count+1>`.
    pub async fn create_post(
        &self,
        author: Option<&User>,
        title: &str,
        text: &str,
        keywords: Vec<String>,
    ) -> Result<u32> {
        let Some(author) = author else {
            return Ok(0);
        };
        if text.trim().is_empty() {
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.repo.load().await?;
        let date = Local::now().format(DATE_FORMAT).to_string();
        let title = if title.is_empty() {
            format!("Post #{}", entries.len() + 1)
        } else {
            title.to_string()
        };
        let id = content_id(&[&date, &author.username, text]);
        entries.insert(
            0,
            Entry {
                title,
                text: text.to_string(),
                author: author.username.clone(),
                author_id: author.id,
                date,
                id,
                comments: Vec::new(),
                keywords: keywords.into_iter().filter(|k| !k.is_empty()).collect(),
            },
        );
        self.repo.replace_all(&entries).await?;
        debug!(id, "post created");
        Ok(id)
    }

    /// Applies edits to an author's own post.
    ///
    /// Preserves the original id and comments, refreshes the date, and moves
    /// the post to the front of the collection, as if newly created. Returns
    /// false (and writes nothing) when the caller is unauthenticated, is not
    /// the owner, the post does not exist, or the new text trims to empty.
    pub async fn update_post(
        &self,
        author: Option<&User>,
        post_id: &str,
        title: &str,
        text: &str,
        keywords: Vec<String>,
    ) -> Result<bool> {
        let Some(author) = author else {
            return Ok(false);
        };
        if text.trim().is_empty() {
            return Ok(false);
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.repo.load().await?;
        let Some(index) = entries
            .iter()
            .position(|entry| entry.id.to_string() == post_id && entry.author_id == author.id)
        else {
            return Ok(false);
        };

        let date = Local::now().format(DATE_FORMAT).to_string();
        // Auto-title counts the post being edited, like creation would.
        let title = if title.is_empty() {
            format!("Post #{}", entries.len() + 1)
        } else {
            title.to_string()
        };
        let old = entries.remove(index);
        entries.insert(
            0,
            Entry {
                title,
                text: text.to_string(),
                author: author.username.clone(),
                author_id: author.id,
                date,
                id: old.id,
                comments: old.comments,
                keywords: keywords.into_iter().filter(|k| !k.is_empty()).collect(),
            },
        );
        self.repo.replace_all(&entries).await?;
        debug!(id = old.id, "post updated");
        Ok(true)
    }

    /// Deletes an author's own post, preserving the relative order of the
    /// remaining entries.
    pub async fn delete_post(&self, author: Option<&User>, post_id: &str) -> Result<bool> {
        let Some(author) = author else {
            return Ok(false);
        };

        let _guard = self.write_lock.lock().await;
        let mut entries = self.repo.load().await?;
        let Some(index) = entries
            .iter()
            .position(|entry| entry.id.to_string() == post_id && entry.author_id == author.id)
        else {
            return Ok(false);
        };
        let removed = entries.remove(index);
        self.repo.replace_all(&entries).await?;
        debug!(id = removed.id, "post deleted");
        Ok(true)
    }

    /// Prepends a comment to the addressed post.
    ///
    /// Empty text is a no-op, as is an unknown or unparsable post id. The
    /// author defaults to "Anonymous".
    pub async fn add_comment(&self, post_id: &str, text: &str, author: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let author = if author.is_empty() { "Anonymous" } else { author };
        // Ids are never 0, so a parse failure can match no post.
        let target = post_id.parse::<u32>().unwrap_or(0);

        let _guard = self.write_lock.lock().await;
        let mut entries = self.repo.load().await?;
        if let Some(entry) = entries.iter_mut().find(|entry| entry.id == target) {
            let date = Local::now().format(DATE_FORMAT).to_string();
            let comment = Comment {
                text: text.to_string(),
                author: author.to_string(),
                date: date.clone(),
                verified: false,
                id: content_id(&[&date, author, text]),
            };
            entry.comments.insert(0, comment);
            self.repo.replace_all(&entries).await?;
        }
        Ok(())
    }

    /// Marks a comment as verified on behalf of any authenticated user.
    ///
    /// Returns whether a matching (post, comment) pair was found; `verified`
    /// only ever transitions false -> true.
    pub async fn verify_comment(
        &self,
        moderator: Option<&User>,
        post_id: &str,
        comment_id: &str,
    ) -> Result<bool> {
        if moderator.is_none() {
            return Ok(false);
        }

        let _guard = self.write_lock.lock().await;
        let mut entries = self.repo.load().await?;
        let Some(entry_index) = entries
            .iter()
            .position(|entry| entry.id.to_string() == post_id)
        else {
            return Ok(false);
        };
        let Some(comment_index) = entries[entry_index]
            .comments
            .iter()
            .position(|comment| comment.id.to_string() == comment_id)
        else {
            return Ok(false);
        };
        entries[entry_index].comments[comment_index].verified = true;
        self.repo.replace_all(&entries).await?;
        Ok(true)
    }
}
