use crate::{
    models::comment::Comment,
    services::repository::Repository,
    storage::{KeyValueStore, StorageError, keys},
};

impl<B: KeyValueStore> Repository<B> {
    /// Appends a comment. Neither the task nor the author is checked.
    pub async fn create_comment(
        &self,
        task_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<Comment, StorageError> {
        let mut comments = self.comments();
        let comment = Comment {
            id: Self::new_id(),
            task_id: task_id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            created_at: jiff::Timestamp::now(),
        };

        comments.push(comment.clone());
        self.storage().write(keys::COMMENTS, &comments)?;

        tracing::info!(comment_id = %comment.id, task_id, user_id, "created comment");
        Ok(comment)
    }

    /// Comments of one task, in insertion order
    pub async fn list_comments(&self, task_id: &str) -> Vec<Comment> {
        self.comments()
            .into_iter()
            .filter(|c| c.task_id == task_id)
            .collect()
    }
}
