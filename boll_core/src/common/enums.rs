use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Price field feeding the band statistic
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_round_trip_names() {
        for src in PriceSource::iter() {
            assert_eq!(PriceSource::from_str(&src.to_string()).unwrap(), src);
        }
        assert_eq!(PriceSource::Close.to_string(), "close");
    }

    #[test]
    fn test_parse() {
        assert_eq!(PriceSource::from_str("High").unwrap(), PriceSource::High);
        assert!(PriceSource::from_str("volume").is_err());
        assert!(PriceSource::from_str("").is_err());
    }

    #[test]
    fn test_serde() {
        let s = serde_json::to_string(&PriceSource::Low).unwrap();
        assert_eq!(s, "\"low\"");
        let src: PriceSource = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(src, PriceSource::Open);
    }
}
