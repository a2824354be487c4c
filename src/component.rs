//! Pipeline components, event phases and execution-unit device identity

use crate::error::TraceError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the three timed pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// ExecutionObjectPipeline
    Eop,
    /// ExecutionObject 0
    Eo1,
    /// ExecutionObject 1
    Eo2,
}

impl Component {
    /// All components, in display order
    pub const ALL: [Component; 3] = [Component::Eop, Component::Eo1, Component::Eo2];

    /// The two execution units, in label order
    pub const EXECUTION_UNITS: [Component; 2] = [Component::Eo1, Component::Eo2];

    /// Resolve a lowercase component name from a trace key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eop" => Some(Component::Eop),
            "eo1" => Some(Component::Eo1),
            "eo2" => Some(Component::Eo2),
            _ => None,
        }
    }

    /// Lowercase name as written in trace keys
    pub fn name(self) -> &'static str {
        match self {
            Component::Eop => "eop",
            Component::Eo1 => "eo1",
            Component::Eo2 => "eo2",
        }
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a timestamp marks the start or the end of an API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    End,
}

impl FromStr for Phase {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Phase::Start),
            "end" => Ok(Phase::End),
            other => Err(TraceError::InvalidPhase(other.to_string())),
        }
    }
}

/// Device family of an execution unit.
///
/// Code 0 is a DSP; every other code is treated as an EVE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceType {
    Dsp,
    Eve,
}

impl DeviceType {
    /// Map a trace device-type code to its family
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            DeviceType::Dsp
        } else {
            DeviceType::Eve
        }
    }

    /// Family prefix used in device labels
    pub fn family(self) -> &'static str {
        match self {
            DeviceType::Dsp => "DSP",
            DeviceType::Eve => "EVE",
        }
    }
}

/// Device type and 0-based device index recorded for an execution unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub device_type: DeviceType,
    pub id: i64,
}

impl DeviceInfo {
    /// Build from the raw device-type code and 0-based index
    pub fn new(type_code: i64, id: i64) -> Self {
        Self {
            device_type: DeviceType::from_code(type_code),
            id,
        }
    }

    /// Label with 1-based numbering, e.g. `EVE1` or `DSP2`
    pub fn label(&self) -> String {
        format!("{}{}", self.device_type.family(), self.id + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_names_round_trip() {
        for component in Component::ALL {
            assert_eq!(Component::from_name(component.name()), Some(component));
        }
        assert_eq!(Component::from_name("eo3"), None);
        assert_eq!(Component::from_name("EOP"), None);
    }

    #[test]
    fn test_component_slots_are_dense() {
        let slots: Vec<usize> = Component::ALL.iter().map(|c| c.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2]);
    }

    #[test]
    fn test_phase_parsing() {
        assert_eq!("start".parse::<Phase>().unwrap(), Phase::Start);
        assert_eq!("end".parse::<Phase>().unwrap(), Phase::End);
        let err = "stop".parse::<Phase>().unwrap_err();
        assert!(matches!(err, TraceError::InvalidPhase(p) if p == "stop"));
    }

    #[test]
    fn test_device_labels() {
        assert_eq!(DeviceInfo::new(1, 0).label(), "EVE1");
        assert_eq!(DeviceInfo::new(0, 1).label(), "DSP2");
        assert_eq!(DeviceInfo::new(7, 3).label(), "EVE4");
    }
}
