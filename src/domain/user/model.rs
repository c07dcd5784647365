//! User domain entity and its write/read shapes

use chrono::NaiveDate;
use uuid::Uuid;

use super::age::{age_on, display_date};

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: i64,
}

/// A fully-populated user candidate that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: i64,
}

impl NewUser {
    /// Attach a permanent identity to the candidate.
    pub fn with_id(self, id: Uuid) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number,
        }
    }
}

/// Partial user payload used by upsert.
///
/// Every field is optional. Empty strings are treated the same as absent
/// values: they are neither validated nor written. Inserting through an upsert
/// is the exception for `email`, see [`UserPatch::to_new_user`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<i64>,
}

impl UserPatch {
    pub fn first_name(&self) -> Option<&str> {
        non_empty(&self.first_name)
    }

    pub fn last_name(&self) -> Option<&str> {
        non_empty(&self.last_name)
    }

    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }

    /// `true` when the patch would not touch any column.
    pub fn is_empty(&self) -> bool {
        self.first_name().is_none()
            && self.last_name().is_none()
            && self.email().is_none()
            && self.date_of_birth.is_none()
            && self.phone_number.is_none()
    }

    /// Overwrite the fields of `user` that are present in the patch.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(first_name) = self.first_name() {
            user.first_name = first_name.to_string();
        }
        if let Some(last_name) = self.last_name() {
            user.last_name = Some(last_name.to_string());
        }
        if let Some(email) = self.email() {
            user.email = email.to_string();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.date_of_birth = date_of_birth;
        }
        if let Some(phone_number) = self.phone_number {
            user.phone_number = phone_number;
        }
    }

    /// Build an insert candidate from the patch.
    ///
    /// Fails with a message naming the first required field that is missing.
    /// A first name made only of whitespace counts as missing. An empty email
    /// is carried through so the strict rules can reject it.
    pub fn to_new_user(&self) -> Result<NewUser, String> {
        let first_name = self
            .first_name()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| "Cannot insert user without a valid firstname.".to_string())?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| "Cannot insert user without email.".to_string())?;
        let date_of_birth = self
            .date_of_birth
            .ok_or_else(|| "Cannot insert user without date of birth.".to_string())?;
        let phone_number = self
            .phone_number
            .ok_or_else(|| "Cannot insert user without phone number.".to_string())?;

        Ok(NewUser {
            first_name: first_name.to_string(),
            last_name: self.last_name().map(str::to_string),
            email: email.to_string(),
            date_of_birth,
            phone_number,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Read projection of a user with derived display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub user: User,
    pub age: i32,
    pub date_of_birth_display: String,
}

impl UserDetails {
    /// Derive age and formatted birth date relative to `today`.
    pub fn from_user(user: User, today: NaiveDate) -> Self {
        let age = age_on(user.date_of_birth, today);
        let date_of_birth_display = display_date(user.date_of_birth);
        Self {
            user,
            age,
            date_of_birth_display,
        }
    }
}
