use crate::{
    models::{project::Project, user::User},
    services::{repository::Repository, seed::CURRENT_USER_ID},
    storage::{KeyValueStore, keys},
};

impl<B: KeyValueStore> Repository<B> {
    pub async fn list_users(&self) -> Vec<User> {
        self.users()
    }

    pub async fn list_projects(&self) -> Vec<Project> {
        self.projects()
    }

    /// The local identity, or `None` if it does not match a stored user
    pub async fn get_current_user(&self) -> Option<User> {
        let current_user_id: String = self
            .storage()
            .read(keys::CURRENT_USER, CURRENT_USER_ID.to_string());
        self.users().into_iter().find(|u| u.id == current_user_id)
    }
}
