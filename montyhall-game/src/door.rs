//! Door model: a prior probability of hiding the prize and an optional label.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MontyHallError, Result};

/// One door of an experiment.
///
/// A door either carries a validated probability or leaves it unspecified;
/// the experiment splits whatever mass the specified doors leave over
/// evenly across the unspecified ones, then checks that all doors sum to
/// one. Doors never change after the experiment is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DoorRepr", into = "DoorRepr")]
pub struct Door {
    probability: Option<f64>,
    label: Option<String>,
}

/// Wire form: a bare probability, or an object with optional fields.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DoorRepr {
    Probability(f64),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        probability: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl Door {
    /// Create a door with the given prior probability.
    ///
    /// # Errors
    ///
    /// Returns [`MontyHallError::InvalidProbability`] when the value is
    /// negative, above one, or not a number.
    pub fn new(probability: f64) -> Result<Self> {
        validate(probability)?;
        Ok(Self {
            probability: Some(probability),
            label: None,
        })
    }

    /// Door whose probability is assigned from the leftover mass when the
    /// experiment is built.
    #[must_use]
    pub const fn unspecified() -> Self {
        Self {
            probability: None,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Door carrying an equal share of `door_count` doors.
    pub(crate) fn uniform_share(door_count: usize) -> Self {
        Self {
            probability: Some(1.0 / crate::numbers::usize_to_f64(door_count.max(1))),
            label: None,
        }
    }

    /// Same door with `probability` filled in.
    pub(crate) fn assigned(&self, probability: f64) -> Result<Self> {
        validate(probability)?;
        Ok(Self {
            probability: Some(probability),
            label: self.label.clone(),
        })
    }

    /// Prior probability; `0.0` while the door is still unspecified.
    #[must_use]
    pub fn probability(&self) -> f64 {
        self.probability.unwrap_or(0.0)
    }

    #[must_use]
    pub const fn is_specified(&self) -> bool {
        self.probability.is_some()
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

fn validate(probability: f64) -> Result<()> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(MontyHallError::InvalidProbability { probability })
    }
}

impl TryFrom<DoorRepr> for Door {
    type Error = MontyHallError;

    fn try_from(repr: DoorRepr) -> Result<Self> {
        match repr {
            DoorRepr::Probability(probability) => Self::new(probability),
            DoorRepr::Detailed { probability, label } => {
                let door = match probability {
                    Some(probability) => Self::new(probability)?,
                    None => Self::unspecified(),
                };
                Ok(Self { label, ..door })
            }
        }
    }
}

impl From<Door> for DoorRepr {
    fn from(door: Door) -> Self {
        match (door.probability, door.label) {
            (Some(probability), None) => Self::Probability(probability),
            (probability, label) => Self::Detailed { probability, label },
        }
    }
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "door {label}")?,
            None => f.write_str("door")?,
        }
        match self.probability {
            Some(probability) => write!(f, " with probability {probability}"),
            None => f.write_str(" with unassigned probability"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_closed_unit_interval() {
        assert!(Door::new(0.0).is_ok());
        assert!(Door::new(1.0).is_ok());
        assert!((Door::new(0.25).unwrap().probability() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            Door::new(1.5),
            Err(MontyHallError::InvalidProbability { probability: 1.5 })
        );
        assert_eq!(
            Door::new(-0.1),
            Err(MontyHallError::InvalidProbability { probability: -0.1 })
        );
        assert!(matches!(
            Door::new(f64::NAN),
            Err(MontyHallError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn deserializes_through_validation() {
        let door: Door = serde_json::from_str("0.5").unwrap();
        assert!((door.probability() - 0.5).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Door>("2.0").is_err());
        assert_eq!(serde_json::to_string(&door).unwrap(), "0.5");
    }

    #[test]
    fn detailed_form_carries_label_and_optional_probability() {
        let door: Door = serde_json::from_str(r#"{"label": "goat pen"}"#).unwrap();
        assert!(!door.is_specified());
        assert_eq!(door.label(), Some("goat pen"));
        assert_eq!(
            serde_json::to_string(&door).unwrap(),
            r#"{"label":"goat pen"}"#
        );

        let door: Door = serde_json::from_str(r#"{"probability": 0.2, "label": "B"}"#).unwrap();
        assert!((door.probability() - 0.2).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Door>(r#"{"probability": -1.0}"#).is_err());
    }

    #[test]
    fn display_shows_label_and_probability() {
        let door = Door::new(0.5).unwrap().with_label("A");
        assert_eq!(door.to_string(), "door A with probability 0.5");
        assert_eq!(Door::new(0.25).unwrap().to_string(), "door with probability 0.25");
        assert_eq!(
            Door::unspecified().to_string(),
            "door with unassigned probability"
        );
    }

    #[test]
    fn assigned_keeps_label() {
        let door = Door::unspecified().with_label("C").assigned(0.3).unwrap();
        assert!(door.is_specified());
        assert_eq!(door.label(), Some("C"));
        assert!(Door::unspecified().assigned(1.2).is_err());
    }

    #[test]
    fn uniform_share_divides_mass() {
        assert!((Door::uniform_share(4).probability() - 0.25).abs() < f64::EPSILON);
    }
}
