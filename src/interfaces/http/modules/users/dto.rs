//! User DTOs
//!
//! Wire shapes use camelCase field names.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{NewUser, User, UserDetails, UserPatch};

/// Birth date from `YYYY-MM-DD`, a local datetime or RFC 3339. Any time of
/// day is dropped.
fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date()))
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn deserialize_birth_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_birth_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

fn deserialize_optional_birth_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_birth_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw))),
        None => Ok(None),
    }
}

/// Stored user, as returned by create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    /// ISO date, `YYYY-MM-DD`
    pub date_of_birth: NaiveDate,
    pub phone_number: i64,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            date_of_birth: u.date_of_birth,
            phone_number: u.phone_number,
        }
    }
}

/// User with the fields derived at read time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: i64,
    /// Whole years as of today
    pub age: i32,
    /// Birth date as `MMM dd, yyyy`
    #[serde(rename = "dateOfBirthAsString")]
    pub date_of_birth_as_string: String,
}

impl From<UserDetails> for UserDetailsDto {
    fn from(d: UserDetails) -> Self {
        Self {
            id: d.user.id,
            first_name: d.user.first_name,
            last_name: d.user.last_name,
            email: d.user.email,
            date_of_birth: d.user.date_of_birth,
            phone_number: d.user.phone_number,
            age: d.age,
            date_of_birth_as_string: d.date_of_birth_display,
        }
    }
}

/// Create user request
///
/// Missing `firstName`/`email` deserialize as empty and are reported by
/// the field rules instead of as a parse error.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "The firstName field is required."))]
    pub first_name: String,
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "The email field is required."))]
    pub email: String,
    #[serde(deserialize_with = "deserialize_birth_date")]
    pub date_of_birth: NaiveDate,
    pub phone_number: i64,
}

impl From<CreateUserRequest> for NewUser {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            date_of_birth: r.date_of_birth,
            phone_number: r.phone_number,
        }
    }
}

/// Upsert request, every field optional
///
/// Echoed back as the body of a 201 when the upsert inserts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_birth_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<i64>,
}

impl From<UpsertUserRequest> for UserPatch {
    fn from(r: UpsertUserRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            date_of_birth: r.date_of_birth,
            phone_number: r.phone_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_user() -> User {
        User {
            id: Uuid::nil(),
            first_name: "John".into(),
            last_name: None,
            email: "john@doe.com".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 2).unwrap(),
            phone_number: 1234567890,
        }
    }

    #[test]
    fn details_serialize_with_wire_names() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dto = UserDetailsDto::from(UserDetails::from_user(sample_user(), today));

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "firstName": "John",
                "lastName": null,
                "email": "john@doe.com",
                "dateOfBirth": "2000-01-02",
                "phoneNumber": 1234567890,
                "age": 23,
                "dateOfBirthAsString": "Jan 02, 2000"
            })
        );
    }

    #[test]
    fn create_request_defaults_missing_names_to_empty() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "dateOfBirth": "2000-01-02",
            "phoneNumber": 1234567890
        }))
        .unwrap();

        assert_eq!(req.first_name, "");
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn upsert_request_maps_to_patch() {
        let req: UpsertUserRequest =
            serde_json::from_value(json!({"email": "jane@doe.com", "phoneNumber": 9876543210i64}))
                .unwrap();

        let patch = UserPatch::from(req);
        assert_eq!(patch.email.as_deref(), Some("jane@doe.com"));
        assert_eq!(patch.phone_number, Some(9876543210));
        assert!(patch.first_name.is_none());
        assert!(patch.date_of_birth.is_none());
    }

    #[test]
    fn birth_date_accepts_a_datetime() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "firstName": "John",
            "email": "john@doe.com",
            "dateOfBirth": "1990-01-02T00:00:00",
            "phoneNumber": 1234567890
        }))
        .unwrap();
        assert_eq!(req.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 2).unwrap());

        let req: UpsertUserRequest =
            serde_json::from_value(json!({"dateOfBirth": "1990-01-02T23:15:00.250+02:00"}))
                .unwrap();
        assert_eq!(req.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 2));
    }

    #[test]
    fn birth_date_rejects_garbage() {
        let result: Result<UpsertUserRequest, _> =
            serde_json::from_value(json!({"dateOfBirth": "02/01/1990"}));
        assert!(result.is_err());

        let req: UpsertUserRequest = serde_json::from_value(json!({"dateOfBirth": null})).unwrap();
        assert!(req.date_of_birth.is_none());
    }
}
