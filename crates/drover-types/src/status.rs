use std::fmt;

use serde::{Deserialize, Serialize};

/// Sex classification recorded at intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Bull,
    Heifer,
    Steer,
    FreeMartin,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bull => "bull",
            Self::Heifer => "heifer",
            Self::Steer => "steer",
            Self::FreeMartin => "free_martin",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle status of a tracked animal.
///
/// The loose intended lifecycle is Feeding → Shipped → {Alive, Sold,
/// Deceased}, but any status is directly settable through a ledger patch.
/// The only strictly enforced transition is Feeding → Shipped inside the
/// load-transfer engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalfStatus {
    Feeding,
    Shipped,
    Alive,
    Deceased,
    Sold,
}

impl CalfStatus {
    /// Every status, in lifecycle order. Used by per-ranch rollups.
    pub const ALL: [CalfStatus; 5] = [
        Self::Feeding,
        Self::Shipped,
        Self::Alive,
        Self::Deceased,
        Self::Sold,
    ];

    /// Returns `true` for statuses an animal is not expected to leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deceased | Self::Sold)
    }

    /// The derived sell status for this lifecycle status.
    pub fn sell_status(&self) -> SellStatus {
        match self {
            Self::Sold => SellStatus::Sold,
            _ => SellStatus::Open,
        }
    }
}

impl fmt::Display for CalfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Feeding => "feeding",
            Self::Shipped => "shipped",
            Self::Alive => "alive",
            Self::Deceased => "deceased",
            Self::Sold => "sold",
        };
        write!(f, "{s}")
    }
}

/// Derived open/sold flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellStatus {
    Open,
    Sold,
}

/// Calf type bucket. Serialized as the bare digit the intake sheets use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalfType {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl fmt::Display for CalfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "1"),
            Self::Two => write!(f, "2"),
        }
    }
}

/// Post-arrival exception recorded against a calf-load linkage row.
///
/// These are paperwork annotations for reporting. Setting one never
/// changes the animal's ledger status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalStatus {
    Doa,
    Issue,
    NotInLoad,
}

impl fmt::Display for ArrivalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Doa => "doa",
            Self::Issue => "issue",
            Self::NotInLoad => "not_in_load",
        };
        write!(f, "{s}")
    }
}

/// Classification of movement-history records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Intake,
    LoadTransfer,
    RanchTransfer,
    StatusChange,
    Death,
    ShippedOut,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Intake => "intake",
            Self::LoadTransfer => "load_transfer",
            Self::RanchTransfer => "ranch_transfer",
            Self::StatusChange => "status_change",
            Self::Death => "death",
            Self::ShippedOut => "shipped_out",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&CalfStatus::Feeding).unwrap(),
            "\"feeding\""
        );
        let parsed: CalfStatus = serde_json::from_str("\"deceased\"").unwrap();
        assert_eq!(parsed, CalfStatus::Deceased);
    }

    #[test]
    fn calf_type_serializes_as_digit() {
        assert_eq!(serde_json::to_string(&CalfType::One).unwrap(), "\"1\"");
        let parsed: CalfType = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(parsed, CalfType::Two);
    }

    #[test]
    fn sell_status_derivation() {
        assert_eq!(CalfStatus::Sold.sell_status(), SellStatus::Sold);
        assert_eq!(CalfStatus::Feeding.sell_status(), SellStatus::Open);
        assert_eq!(CalfStatus::Deceased.sell_status(), SellStatus::Open);
    }

    #[test]
    fn terminal_statuses() {
        assert!(CalfStatus::Deceased.is_terminal());
        assert!(CalfStatus::Sold.is_terminal());
        assert!(!CalfStatus::Shipped.is_terminal());
    }

    #[test]
    fn movement_kind_display() {
        assert_eq!(format!("{}", MovementKind::LoadTransfer), "load_transfer");
        assert_eq!(format!("{}", MovementKind::ShippedOut), "shipped_out");
    }

    #[test]
    fn arrival_status_snake_case() {
        assert_eq!(
            serde_json::to_string(&ArrivalStatus::NotInLoad).unwrap(),
            "\"not_in_load\""
        );
    }
}
