use serde::{Deserialize, Serialize};

/// The query string of the checkout and callback routes: `?serial=<order serial>`.
///
/// A missing serial deserializes as an empty string, which the payment APIs treat as an unknown order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerialQuery {
    #[serde(default)]
    pub serial: String,
}

impl SerialQuery {
    /// Reads the serial from a raw query string. Query strings that cannot be parsed at all yield an empty serial.
    pub fn from_query_string(query: &str) -> Self {
        actix_web::web::Query::<SerialQuery>::from_query(query).map(|q| q.into_inner()).unwrap_or_default()
    }
}
