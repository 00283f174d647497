//! Validated identifier value objects.
//!
//! Room and user identifiers arrive from URL path segments and request
//! bodies. They are converted into these newtypes at the boundary so the
//! rest of the server never handles raw strings.

use std::fmt;

use thiserror::Error;

/// Maximum accepted length for room and user identifiers.
pub const MAX_ID_LENGTH: usize = 64;

/// Validation errors for identifier value objects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("room id must not be empty")]
    EmptyRoomId,
    #[error("room id must not exceed {MAX_ID_LENGTH} characters")]
    RoomIdTooLong,
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("user id must not exceed {MAX_ID_LENGTH} characters")]
    UserIdTooLong,
}

/// Identifier of a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyRoomId);
        }
        if value.chars().count() > MAX_ID_LENGTH {
            return Err(DomainError::RoomIdTooLong);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier of one connected client within a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyUserId);
        }
        if value.chars().count() > MAX_ID_LENGTH {
            return Err(DomainError::UserIdTooLong);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_accepts_normal_value() {
        // テスト項目: 通常の文字列から RoomId を作成できる
        // given (前提条件):
        let value = "room-1".to_string();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "room-1");
    }

    #[test]
    fn test_room_id_rejects_empty_value() {
        // テスト項目: 空文字列の RoomId は拒否される
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::EmptyRoomId));
    }

    #[test]
    fn test_room_id_rejects_too_long_value() {
        // テスト項目: 長すぎる RoomId は拒否される
        // given (前提条件):
        let value = "r".repeat(MAX_ID_LENGTH + 1);

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::RoomIdTooLong));
    }

    #[test]
    fn test_user_id_rejects_empty_value() {
        // テスト項目: 空文字列の UserId は拒否される
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = UserId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(DomainError::EmptyUserId));
    }

    #[test]
    fn test_user_id_accepts_max_length_value() {
        // テスト項目: 上限ちょうどの長さの UserId は受け入れられる
        // given (前提条件):
        let value = "u".repeat(MAX_ID_LENGTH);

        // when (操作):
        let result = UserId::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
