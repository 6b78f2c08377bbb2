use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{
    boll_error::{BollError, Result},
    enums::PriceSource,
};
use crate::config::boll_config::BandConfig;

/// Raw text of the settings panel inputs, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub length: String,
    pub std_dev_multiplier: String,
    pub offset: String,
    pub source: String,
}

impl From<&BandConfig> for SettingsForm {
    fn from(config: &BandConfig) -> Self {
        Self {
            length: config.length.to_string(),
            std_dev_multiplier: config.std_dev_multiplier.to_string(),
            offset: config.offset.to_string(),
            source: config.source.to_string(),
        }
    }
}

impl TryFrom<&SettingsForm> for BandConfig {
    type Error = BollError;

    fn try_from(form: &SettingsForm) -> Result<Self> {
        let length: i64 = parse_field("length", &form.length)?;
        if length < 1 {
            return Err(BollError::invalid_config(format!(
                "length must be >= 1, got {}",
                length
            )));
        }
        let length = usize::try_from(length)
            .map_err(|_| BollError::invalid_config(format!("length {} is too large", length)))?;

        let source = PriceSource::from_str(form.source.trim()).map_err(|_| {
            BollError::invalid_config(format!("source: unknown value {:?}", form.source))
        })?;

        BandConfig::new(
            length,
            parse_field("std_dev_multiplier", &form.std_dev_multiplier)?,
            source,
            parse_field("offset", &form.offset)?,
        )
    }
}

fn parse_field<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        BollError::invalid_config(format!("{}: not a valid number {:?}", name, raw))
    })
}
