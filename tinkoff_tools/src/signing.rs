//! Request signing.
//!
//! Every call to the gateway carries a `Token`: the terminal password is added to the request's scalar fields under
//! the key `Password`, the fields are sorted by key (byte order), their *values* are concatenated without a separator,
//! and the SHA-256 digest of the result is hex encoded.
//!
//! Only scalars take part. Nested blocks such as `Receipt` or `DATA` would produce a different string on every
//! platform, so [`SignedFields`] cannot hold them at all.
use std::{collections::BTreeMap, fmt::Display};

use sha2::{Digest, Sha256};
use tpay_common::{MinorUnits, Secret};

/// The key under which the terminal password is mixed into the signed fields.
pub const PASSWORD_FIELD: &str = "Password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
}

impl Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Text(s) => f.write_str(s),
            ScalarValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<MinorUnits> for ScalarValue {
    fn from(value: MinorUnits) -> Self {
        Self::Integer(value.value())
    }
}

/// The flat set of scalar request fields that a token is computed over. Keys are kept sorted, so insertion order
/// never affects the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedFields {
    fields: BTreeMap<String, ScalarValue>,
}

impl SignedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Into<String>, V: Into<ScalarValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<K: Into<String>, V: Into<ScalarValue>>(&mut self, key: K, value: V) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ScalarValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The string that gets hashed: all values in key order, no separators.
    fn concatenated_values(&self) -> String {
        self.fields.values().map(ScalarValue::to_string).collect()
    }
}

impl<K: Into<String>, V: Into<ScalarValue>> FromIterator<(K, V)> for SignedFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = Self::new();
        iter.into_iter().for_each(|(k, v)| result.insert(k, v));
        result
    }
}

/// Computes the request token for `fields` using the terminal password `secret`.
///
/// A `Password` entry already present in `fields` is replaced by the secret.
pub fn sign(fields: &SignedFields, secret: &Secret<String>) -> String {
    let mut fields = fields.clone();
    fields.insert(PASSWORD_FIELD, secret.reveal().as_str());
    let digest = Sha256::digest(fields.concatenated_values().as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signs_sorted_values() {
        let fields = SignedFields::new().with("TerminalKey", "TestTerminal").with("OrderId", "1042");
        // "1042" + "secret" + "TestTerminal"
        let token = sign(&fields, &Secret::from("secret"));
        assert_eq!(token, "3839e6814356f551e57d9822c663ccf233c31e6786543e8080065e23bc78f9f1");
    }

    #[test]
    fn signs_integers_and_unicode_text() {
        let fields = SignedFields::new()
            .with("TerminalKey", "TinkoffBankTest")
            .with("Amount", 19200_i64)
            .with("OrderId", "21090")
            .with("Description", "Подарочная карта на 1000 рублей");
        let token = sign(&fields, &Secret::from("usaf8fw8fsw21g"));
        assert_eq!(token, "44a2c8230d1154e7e67c36eceb381690a6c5ee4e969353d79e319fceca64285f");
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let secret = Secret::from("secret");
        let a: SignedFields =
            [("TerminalKey", "T"), ("OrderId", "1"), ("Description", "d"), ("SuccessURL", "s")].into_iter().collect();
        let b: SignedFields =
            [("SuccessURL", "s"), ("Description", "d"), ("OrderId", "1"), ("TerminalKey", "T")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(sign(&a, &secret), sign(&b, &secret));
    }

    #[test]
    fn password_field_is_always_the_secret() {
        let secret = Secret::from("secret");
        let plain = SignedFields::new().with("OrderId", "1042");
        let spoofed = plain.clone().with(PASSWORD_FIELD, "not-the-secret");
        assert_eq!(sign(&plain, &secret), sign(&spoofed, &secret));
    }

    #[test]
    fn token_is_lowercase_hex() {
        let token = sign(&SignedFields::new(), &Secret::from("x"));
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
