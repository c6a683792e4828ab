//! Configuration validation logic.

use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};
use crate::feed::{
    FeedKind, FRIEND_PLACEHOLDERS, PROFILE_PICTURE_PLACEHOLDERS, REALMOJI_PLACEHOLDERS,
};
use crate::template::Template;

/// E.164 phone number: leading plus, country code, up to 15 digits.
const PHONE_PATTERN: &str = r"^\+[1-9]\d{6,14}$";

/// Minimum passcode length.
const MIN_OTP_LENGTH: usize = 4;

/// Maximum passcode length.
const MAX_OTP_LENGTH: usize = 8;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_url("api.base_url", &config.api.base_url)?;
    validate_url("api.auth_url", &config.api.auth_url)?;

    if config.api.timeout_seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "api.timeout_seconds".to_string(),
            message: "Timeout must be greater than zero".to_string(),
        });
    }

    validate_date_format(&config.options.date_format)?;

    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(())
}

/// Validate a chrono format string used for dates in paths.
pub fn validate_date_format(format: &str) -> Result<()> {
    if format.is_empty() {
        return Err(Error::ConfigValidation {
            field: "options.date_format".to_string(),
            message: "Date format must not be empty".to_string(),
        });
    }

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::ConfigValidation {
            field: "options.date_format".to_string(),
            message: format!("'{}' is not a valid date format", format),
        });
    }

    Ok(())
}

/// Validate a phone number before requesting a passcode.
///
/// Returns the number without spaces or dashes, as it should be sent.
pub fn validate_phone_number(phone_number: &str) -> Result<String> {
    let pattern = Regex::new(PHONE_PATTERN).map_err(|e| Error::Config(e.to_string()))?;

    let compact: String = phone_number
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if !pattern.is_match(&compact) {
        return Err(Error::InvalidPhone(format!(
            "'{}' must be in international format, e.g. +33612345678",
            phone_number
        )));
    }

    Ok(compact)
}

/// Validate a one-time passcode before sending it.
pub fn validate_otp_code(code: &str) -> Result<()> {
    let code = code.trim();

    if code.len() < MIN_OTP_LENGTH
        || code.len() > MAX_OTP_LENGTH
        || !code.chars().all(|c| c.is_ascii_digit())
    {
        return Err(Error::InvalidOtp(format!(
            "expected {} to {} digits",
            MIN_OTP_LENGTH, MAX_OTP_LENGTH
        )));
    }

    Ok(())
}

/// Check every placeholder of the feed's templates before any request is made.
pub fn validate_templates(
    kind: FeedKind,
    save_location: &Template,
    realmoji_location: Option<&Template>,
    instant_realmoji_location: Option<&Template>,
) -> Result<()> {
    save_location.validate(kind.save_placeholders())?;

    if !kind.saves_realmojis() {
        let field = match (realmoji_location, instant_realmoji_location) {
            (Some(_), _) => Some("realmoji_location"),
            (None, Some(_)) => Some("instant_realmoji_location"),
            (None, None) => None,
        };
        if let Some(field) = field {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: format!(
                    "realmojis are only saved for the {} feed, not {}",
                    FeedKind::FriendsV1,
                    kind
                ),
            });
        }
    }

    for template in [realmoji_location, instant_realmoji_location]
        .into_iter()
        .flatten()
    {
        template.validate(REALMOJI_PLACEHOLDERS)?;
    }

    Ok(())
}

/// Check the friends list templates.
pub fn validate_friends_templates(save_location: &Template, picture_name: &Template) -> Result<()> {
    save_location.validate(FRIEND_PLACEHOLDERS)?;
    picture_name.validate(PROFILE_PICTURE_PLACEHOLDERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { field, .. }) if field == "api.base_url"
        ));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_seconds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_date_format() {
        assert!(validate_date_format("%Y-%m-%d").is_ok());
        assert!(validate_date_format("%Q").is_err());
        assert!(validate_date_format("").is_err());
    }

    #[test]
    fn test_valid_phone_number() {
        assert!(validate_phone_number("+33612345678").is_ok());
        assert_eq!(
            validate_phone_number(" +1 415-555-0100 ").unwrap(),
            "+14155550100"
        );
    }

    #[test]
    fn test_invalid_phone_number() {
        assert!(matches!(
            validate_phone_number("not-a-number"),
            Err(Error::InvalidPhone(_))
        ));
        assert!(validate_phone_number("0612345678").is_err());
    }

    #[test]
    fn test_otp_code() {
        assert!(validate_otp_code("123456").is_ok());
        assert!(validate_otp_code("0000").is_ok());
        assert!(matches!(validate_otp_code("12ab"), Err(Error::InvalidOtp(_))));
        assert!(validate_otp_code("123").is_err());
    }

    #[test]
    fn test_templates_checked_against_feed() {
        let save: Template = "/mem/{date}".parse().unwrap();
        assert!(validate_templates(FeedKind::Memories, &save, None, None).is_ok());

        let save: Template = "/mem/{user}/{date}".parse().unwrap();
        assert!(matches!(
            validate_templates(FeedKind::Memories, &save, None, None),
            Err(Error::UnknownPlaceholder { name, .. }) if name == "user"
        ));
    }

    #[test]
    fn test_realmoji_templates_checked() {
        let save: Template = "/f/{user}/{post_id}".parse().unwrap();
        let realmoji: Template = "/r/{user}_{emoji_id}_{date}".parse().unwrap();
        let instant: Template = "/r/{post_id}/{bogus}".parse().unwrap();

        assert!(validate_templates(FeedKind::FriendsV1, &save, Some(&realmoji), None).is_ok());
        assert!(validate_templates(FeedKind::FriendsV1, &save, Some(&realmoji), Some(&instant)).is_err());
    }

    #[test]
    fn test_realmoji_templates_rejected_for_other_feeds() {
        let save: Template = "/f/{user}/{post_id}".parse().unwrap();
        let realmoji: Template = "/r/{user}_{emoji_id}".parse().unwrap();

        assert!(matches!(
            validate_templates(FeedKind::Friends, &save, Some(&realmoji), None),
            Err(Error::ConfigValidation { field, .. }) if field == "realmoji_location"
        ));

        let save: Template = "/mem/{date}".parse().unwrap();
        assert!(matches!(
            validate_templates(FeedKind::Memories, &save, None, Some(&realmoji)),
            Err(Error::ConfigValidation { field, .. }) if field == "instant_realmoji_location"
        ));
    }

    #[test]
    fn test_friends_templates() {
        let save: Template = "friends/{user}".parse().unwrap();
        let picture: Template = "{date}_profile_picture".parse().unwrap();
        assert!(validate_friends_templates(&save, &picture).is_ok());

        let save: Template = "friends/{post_id}".parse().unwrap();
        assert!(matches!(
            validate_friends_templates(&save, &picture),
            Err(Error::UnknownPlaceholder { name, .. }) if name == "post_id"
        ));

        let save: Template = "friends/{user}/{date}".parse().unwrap();
        assert!(validate_friends_templates(&save, &picture).is_err());
    }
}
