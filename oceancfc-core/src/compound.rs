use crate::errors::{CfcError, CfcResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chlorofluorocarbon tracer whose exchange is being modelled.
///
/// The set is closed: every coefficient table carries exactly one column per
/// variant, so adding a compound forces every table to be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Compound {
    Cfc11,
    Cfc12,
}

impl Compound {
    pub const ALL: [Compound; 2] = [Compound::Cfc11, Compound::Cfc12];

    pub fn name(&self) -> &'static str {
        match self {
            Compound::Cfc11 => "CFC-11",
            Compound::Cfc12 => "CFC-12",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Compound {
    type Err = CfcError;

    /// Accepts "CFC-11", "cfc11", "CFC_12", "F-12" and similar spellings.
    fn from_str(s: &str) -> CfcResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();
        match key.as_str() {
            "CFC11" | "F11" => Ok(Compound::Cfc11),
            "CFC12" | "F12" => Ok(Compound::Cfc12),
            _ => Err(CfcError::UnsupportedCompound(s.to_string())),
        }
    }
}

impl TryFrom<String> for Compound {
    type Error = CfcError;

    fn try_from(value: String) -> CfcResult<Self> {
        value.parse()
    }
}

impl From<Compound> for String {
    fn from(value: Compound) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spellings() {
        assert_eq!("CFC-11".parse::<Compound>().unwrap(), Compound::Cfc11);
        assert_eq!("cfc11".parse::<Compound>().unwrap(), Compound::Cfc11);
        assert_eq!("CFC_12".parse::<Compound>().unwrap(), Compound::Cfc12);
        assert_eq!("f-12".parse::<Compound>().unwrap(), Compound::Cfc12);
    }

    #[test]
    fn test_unsupported_compound() {
        let err = "CFC-113".parse::<Compound>().unwrap_err();
        assert!(matches!(err, CfcError::UnsupportedCompound(ref name) if name == "CFC-113"));
        assert!("SF6".parse::<Compound>().is_err());
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&Compound::Cfc12).unwrap();
        assert_eq!(json, "\"CFC-12\"");
        let parsed: Compound = serde_json::from_str("\"cfc-11\"").unwrap();
        assert_eq!(parsed, Compound::Cfc11);
        assert!(serde_json::from_str::<Compound>("\"HCFC-22\"").is_err());
    }
}
