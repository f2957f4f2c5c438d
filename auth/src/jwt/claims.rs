use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Claims carried by an access token.
///
/// `user_id` is the subject, `iat`/`exp` are Unix timestamps in seconds.
/// Tokens minted elsewhere may encode `user_id` as a float (`7.0`); any
/// integral JSON number is accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(deserialize_with = "integral_number")]
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Build claims for `user_id` issued at `now` and valid for `ttl`.
    ///
    /// A negative `ttl` yields claims that are already expired.
    pub fn for_user(user_id: i64, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// A token is only live while `now` is strictly before `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

fn integral_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntegralVisitor;

    impl<'de> de::Visitor<'de> for IntegralVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integral number")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
        }

        // 2^63 is exactly representable, i64::MAX is not.
        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
                Ok(value as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(IntegralVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let now = Utc::now();
        let claims = Claims::for_user(42, now, Duration::minutes(15));

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_for_user_negative_ttl() {
        let now = Utc::now();
        let claims = Claims::for_user(1, now, Duration::seconds(-1));

        assert!(claims.exp < claims.iat);
        assert!(claims.is_expired(now.timestamp()));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            user_id: 1,
            iat: 900,
            exp: 1000,
        };

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_wire_format_uses_user_id_key() {
        let claims = Claims {
            user_id: 7,
            iat: 1,
            exp: 2,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["user_id"], 7);
        assert_eq!(value["iat"], 1);
        assert_eq!(value["exp"], 2);
    }

    #[test]
    fn test_user_id_accepts_integral_floats_only() {
        let claims: Claims =
            serde_json::from_str(r#"{"user_id": 7.0, "iat": 1, "exp": 2}"#).unwrap();
        assert_eq!(claims.user_id, 7);

        for user_id in ["7.5", "\"7\"", "1e300", "true"] {
            let json = format!(r#"{{"user_id": {user_id}, "iat": 1, "exp": 2}}"#);
            assert!(
                serde_json::from_str::<Claims>(&json).is_err(),
                "{user_id} should be rejected"
            );
        }
    }
}
