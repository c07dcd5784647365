//! Field validation rules for user writes
//!
//! Both validators evaluate every rule in a fixed order and keep a single
//! message: a later failing rule replaces the message of an earlier one.
//! Callers only ever see the last failure.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use super::age::years_before;
use super::model::{NewUser, UserPatch};

pub const MIN_AGE_YEARS: u32 = 18;
pub const MAX_AGE_YEARS: u32 = 150;

const PHONE_MIN: i64 = 1_000_000_000;
const PHONE_MAX_EXCLUSIVE: i64 = 10_000_000_000;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Exactly ten decimal digits.
pub fn is_valid_phone_number(phone_number: i64) -> bool {
    (PHONE_MIN..PHONE_MAX_EXCLUSIVE).contains(&phone_number)
}

/// Strict validation for a complete candidate (creation and upsert-insert).
pub fn validate_new_user(user: &NewUser, today: NaiveDate) -> Result<(), String> {
    let mut error = None;

    if user.date_of_birth > years_before(today, MIN_AGE_YEARS) {
        error = Some("User's age is under 18.");
    }

    if user.date_of_birth < years_before(today, MAX_AGE_YEARS) {
        error = Some("User is too old to be alive.");
    }

    if user.email.is_empty() || !is_valid_email(&user.email) {
        error = Some("Invalid email.");
    }

    if !is_valid_phone_number(user.phone_number) {
        error = Some("Invalid phone number.");
    }

    into_result(error)
}

/// Partial validation for a patch: only present fields are checked.
///
/// Unlike [`validate_new_user`] there is no upper age bound here.
pub fn validate_user_patch(patch: &UserPatch, today: NaiveDate) -> Result<(), String> {
    let mut error = None;

    if patch.first_name().is_some_and(|v| v.trim().is_empty()) {
        error = Some("Firstname must have characters other than whitespaces.");
    }

    if patch.last_name().is_some_and(|v| v.trim().is_empty()) {
        error = Some("LastName must have characters other than whitespaces.");
    }

    if patch.email().is_some_and(|v| !is_valid_email(v)) {
        error = Some("Invalid email.");
    }

    if patch
        .date_of_birth
        .is_some_and(|dob| dob > years_before(today, MIN_AGE_YEARS))
    {
        error = Some("Invalid date of birth.");
    }

    if patch
        .phone_number
        .is_some_and(|phone| !is_valid_phone_number(phone))
    {
        error = Some("Invalid phone number.");
    }

    into_result(error)
}

fn into_result(error: Option<&str>) -> Result<(), String> {
    match error {
        Some(message) => Err(message.to_string()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn valid_user() -> NewUser {
        NewUser {
            first_name: "John".into(),
            last_name: Some("Doe".into()),
            email: "john@doe.com".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 2).unwrap(),
            phone_number: 1234567890,
        }
    }

    #[test]
    fn valid_user_passes() {
        assert_eq!(validate_new_user(&valid_user(), today()), Ok(()));
    }

    #[test]
    fn eighteenth_birthday_is_accepted() {
        let mut user = valid_user();
        user.date_of_birth = years_before(today(), 18);
        assert!(validate_new_user(&user, today()).is_ok());

        user.date_of_birth = user.date_of_birth.succ_opt().unwrap();
        assert_eq!(
            validate_new_user(&user, today()),
            Err("User's age is under 18.".into())
        );
    }

    #[test]
    fn too_old_is_rejected() {
        let mut user = valid_user();
        user.date_of_birth = years_before(today(), 150);
        assert!(validate_new_user(&user, today()).is_ok());

        user.date_of_birth = user.date_of_birth.pred_opt().unwrap();
        assert_eq!(
            validate_new_user(&user, today()),
            Err("User is too old to be alive.".into())
        );
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
        assert!(!is_valid_email("john@com"));
        assert!(!is_valid_email("john doe@mail.com"));
        assert!(!is_valid_email("@mail.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn phone_bounds() {
        assert!(is_valid_phone_number(1_000_000_000));
        assert!(is_valid_phone_number(9_999_999_999));
        assert!(!is_valid_phone_number(999_999_999));
        assert!(!is_valid_phone_number(10_000_000_000));
        assert!(!is_valid_phone_number(123));
        assert!(!is_valid_phone_number(-1_234_567_890));
    }

    #[test]
    fn last_failing_rule_wins() {
        let user = NewUser {
            first_name: "John".into(),
            last_name: None,
            email: "john@com".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            phone_number: 0,
        };
        assert_eq!(
            validate_new_user(&user, today()),
            Err("Invalid phone number.".into())
        );

        let user = NewUser {
            phone_number: 1234567890,
            ..user
        };
        assert_eq!(validate_new_user(&user, today()), Err("Invalid email.".into()));
    }

    #[test]
    fn empty_patch_is_valid() {
        assert_eq!(validate_user_patch(&UserPatch::default(), today()), Ok(()));
    }

    #[test]
    fn patch_rules_apply_only_to_present_fields() {
        let patch = UserPatch {
            first_name: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(
            validate_user_patch(&patch, today()),
            Err("Firstname must have characters other than whitespaces.".into())
        );

        let patch = UserPatch {
            last_name: Some("\t".into()),
            ..Default::default()
        };
        assert_eq!(
            validate_user_patch(&patch, today()),
            Err("LastName must have characters other than whitespaces.".into())
        );

        let patch = UserPatch {
            date_of_birth: Some(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap()),
            ..Default::default()
        };
        assert_eq!(
            validate_user_patch(&patch, today()),
            Err("Invalid date of birth.".into())
        );
    }

    #[test]
    fn patch_has_no_upper_age_bound() {
        let patch = UserPatch {
            date_of_birth: Some(NaiveDate::from_ymd_opt(1800, 1, 1).unwrap()),
            ..Default::default()
        };
        assert_eq!(validate_user_patch(&patch, today()), Ok(()));
    }

    #[test]
    fn patch_last_failing_rule_wins() {
        let patch = UserPatch {
            first_name: Some(" ".into()),
            email: Some("nope".into()),
            phone_number: Some(42),
            ..Default::default()
        };
        assert_eq!(
            validate_user_patch(&patch, today()),
            Err("Invalid phone number.".into())
        );
    }
}
