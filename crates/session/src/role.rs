use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the three views is showing. Exactly one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Viewer,
    Advertiser,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Viewer, Role::Advertiser, Role::Admin];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Viewer => "Viewer",
            Role::Advertiser => "Advertiser",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_viewer() {
        assert_eq!(Role::default(), Role::Viewer);
        assert_eq!(Role::ALL.len(), 3);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
