use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use models::ids::new_id;
use models::user::{self, EmergencyContact, User, MAX_EMERGENCY_CONTACTS};

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// File-backed user store. The entire user mapping lives in one JSON blob,
/// keyed by user id, and is rewritten on every mutating call.
#[derive(Clone)]
pub struct UserStore {
    store: Arc<JsonMapStore<String, User>>,
}

impl UserStore {
    /// Open the store from the given blob path. Creates the file if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String, User>::open(path).await?;
        Ok(Arc::new(Self { store }))
    }

    /// Register a new user. Email uniqueness is case-sensitive with no
    /// normalization; duplicates are rejected before anything is written.
    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        user::validate_email(email)?;
        user::validate_name(name)?;

        let user = self
            .store
            .update_map(|users| {
                if users.values().any(|u| u.email == email) {
                    return Err(ServiceError::Validation("Email already registered".into()));
                }
                let user = User {
                    id: new_id(),
                    email: email.to_string(),
                    name: name.to_string(),
                    password: password.to_string(),
                    emergency_contacts: Vec::new(),
                };
                users.insert(user.id.clone(), user.clone());
                Ok(user)
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "user_created");
        Ok(user)
    }

    pub async fn get(&self, id: &str) -> Option<User> {
        self.store.get(&id.to_string()).await
    }

    /// Linear scan over the mapping; emails are unique by construction.
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.store.find(|u| u.email == email).await
    }

    /// Append a contact to the user's list, preserving insertion order.
    /// Fails when the user is absent or already holds the maximum of five.
    pub async fn add_contact(
        &self,
        user_id: &str,
        name: &str,
        phone: &str,
    ) -> Result<EmergencyContact, ServiceError> {
        let user_id = user_id.to_string();
        let contact = self
            .store
            .update_map(move |users| {
                let user = users
                    .get_mut(&user_id)
                    .ok_or_else(|| ServiceError::not_found("user"))?;
                if user.emergency_contacts.len() >= MAX_EMERGENCY_CONTACTS {
                    return Err(ServiceError::Validation(format!(
                        "Could not add contact (max {} reached)",
                        MAX_EMERGENCY_CONTACTS
                    )));
                }
                let contact = EmergencyContact {
                    id: new_id(),
                    name: name.to_string(),
                    phone: phone.to_string(),
                };
                user.emergency_contacts.push(contact.clone());
                Ok(contact)
            })
            .await?;
        Ok(contact)
    }

    /// Remove a contact by id, splicing the list at its index. `Ok(false)`
    /// when the user or the contact does not exist; the list is untouched.
    pub async fn remove_contact(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<bool, ServiceError> {
        let user_id = user_id.to_string();
        self.store
            .update_map(move |users| {
                let Some(user) = users.get_mut(&user_id) else {
                    return Ok(false);
                };
                let Some(index) = user.contact_index(contact_id) else {
                    return Ok(false);
                };
                user.emergency_contacts.remove(index);
                Ok(true)
            })
            .await
    }

    #[cfg(test)]
    pub(crate) async fn user_count(&self) -> usize {
        self.store.len().await
    }
}
