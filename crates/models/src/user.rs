use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Upper bound on emergency contacts per user.
pub const MAX_EMERGENCY_CONTACTS: usize = 5;

/// Full user record as persisted in the users blob. The password is stored
/// verbatim; this service makes no hashing guarantee by contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    pub phone: String,
}

/// User as exposed over HTTP, without the password field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            emergency_contacts: self.emergency_contacts.clone(),
        }
    }

    pub fn contact_index(&self, contact_id: &str) -> Option<usize> {
        self.emergency_contacts.iter().position(|c| c.id == contact_id)
    }
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}
