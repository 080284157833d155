use serde::{Deserialize, Serialize};

// Serializable, comparable, explicit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Separator the identifier normalizer collapses foreign characters to.
    pub id_separator: String,
    /// Joins the type prefix and the normalized key: `user-kore`.
    pub type_separator: String,
}

impl MapperConfig {
    pub fn v0() -> Self {
        Self {
            id_separator: "_".into(),
            type_separator: "-".into(),
        }
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::v0()
    }
}
