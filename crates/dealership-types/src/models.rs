use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dealerships are owned by the dealer service. Only the fields this service
/// reads are typed; everything else is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dealer {
    pub id: i64,
    #[serde(default)]
    pub state: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// A review as served by the dealer service. `sentiment` is never stored
/// upstream; it is filled in per read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub review: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealership: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
