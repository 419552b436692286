/*
 * Responsibility
 * - 検証済みトークンの claims を型付きで読む値オブジェクト
 * - 欠けているキーはゼロ値 (None / 空) を返す。エラーにはしない
 */
use serde_json::{Map, Value};

/// Raw decoded claims map, attached to the request extensions alongside
/// [`Claims`]. Both are present together or absent together.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtPayload(pub Map<String, Value>);

/// Decoded identity assertion carried by a verified bearer token.
///
/// Built once per request by the JWT middleware and dropped at request end.
/// All accessors are pure reads over the decoded map; missing keys read as
/// `None` (or an empty role list), never as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    payload: Map<String, Value>,
}

impl Claims {
    pub fn new(payload: Map<String, Value>) -> Self {
        Self { payload }
    }

    /// The decoded map, exactly as the token carried it.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Caller principal name (`sub`).
    pub fn subject(&self) -> Option<&str> {
        self.payload.get("sub").and_then(Value::as_str)
    }

    /// Caller numeric identity (`uid`), distinct from `sub`.
    pub fn user_id(&self) -> Option<i64> {
        self.payload.get("uid").and_then(Value::as_i64)
    }

    /// Role tags (`roles`), in token order. An absent claim reads as no roles.
    pub fn roles(&self) -> Vec<&str> {
        self.payload
            .get("roles")
            .and_then(Value::as_array)
            .map(|roles| roles.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Exact, case-sensitive membership test over `roles`.
    pub fn has_role(&self, role: &str) -> bool {
        self.payload
            .get("roles")
            .and_then(Value::as_array)
            .is_some_and(|roles| roles.iter().any(|v| v.as_str() == Some(role)))
    }
}
