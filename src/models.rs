use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl Activity {
    /// Remaining capacity. Negative when the server has over-allocated.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Activity name to activity, in the order the server lists them.
pub type Catalog = IndexMap<String, Activity>;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keeps_wire_order() {
        let catalog: Catalog = serde_json::from_str(
            r#"{
                "Zeta Club": {"description": "z", "schedule": "Mon", "max_participants": 3, "participants": []},
                "Alpha Club": {"description": "a", "schedule": "Tue", "max_participants": 2, "participants": ["a@x.com"]}
            }"#,
        )
        .unwrap();
        let names: Vec<_> = catalog.keys().map(String::as_str).collect();
        assert_eq!(names, ["Zeta Club", "Alpha Club"]);
        assert_eq!(catalog["Alpha Club"].spots_left(), 1);
    }

    #[test]
    fn activity_without_participants_is_rejected() {
        let parsed = serde_json::from_str::<Catalog>(
            r#"{"Chess Club": {"description": "d", "schedule": "Mon", "max_participants": 2}}"#,
        );
        assert!(parsed.is_err());
    }
}
