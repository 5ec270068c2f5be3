//! Stock ledger models

use serde::{Deserialize, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "IN",
            MovementDirection::Out => "OUT",
        }
    }

    pub fn parse(value: &str) -> Option<MovementDirection> {
        match value {
            "IN" => Some(MovementDirection::In),
            "OUT" => Some(MovementDirection::Out),
            _ => None,
        }
    }
}
