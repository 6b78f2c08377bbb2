use std::collections::HashMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::{
    boll_error::{BollError, ErrCode, Result},
    enums::PriceSource,
};

pub const DEFAULT_LENGTH: usize = 20;
pub const DEFAULT_STD_DEV_MULTIPLIER: f64 = 2.0;

/// Bollinger Band parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandConfig {
    /// Rolling window size, at least 1
    pub length: usize,
    /// Scale applied to the window's standard deviation
    pub std_dev_multiplier: f64,
    pub source: PriceSource,
    /// Positional shift of the computed bands, negative shifts towards the past
    pub offset: i64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            std_dev_multiplier: DEFAULT_STD_DEV_MULTIPLIER,
            source: PriceSource::Close,
            offset: 0,
        }
    }
}

impl BandConfig {
    pub fn new(
        length: usize,
        std_dev_multiplier: f64,
        source: PriceSource,
        offset: i64,
    ) -> Result<Self> {
        let config = Self {
            length,
            std_dev_multiplier,
            source,
            offset,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.length < 1 {
            return Err(BollError::invalid_config(format!(
                "length must be >= 1, got {}",
                self.length
            )));
        }
        if !self.std_dev_multiplier.is_finite() || self.std_dev_multiplier < 0.0 {
            return Err(BollError::invalid_config(format!(
                "std_dev_multiplier must be a finite non-negative number, got {}",
                self.std_dev_multiplier
            )));
        }
        Ok(())
    }

    /// Build a config from loosely typed key/value pairs.
    ///
    /// Missing keys keep their defaults. Unknown keys are rejected.
    pub fn from_map(conf: Option<HashMap<String, serde_json::Value>>) -> Result<Self> {
        let mut conf = ConfigWithCheck::new(conf.unwrap_or_default());
        let default = Self::default();

        let length = match conf.get::<i64>("length")? {
            Some(n) if n < 1 => {
                return Err(BollError::invalid_config(format!(
                    "length must be >= 1, got {}",
                    n
                )))
            }
            Some(n) => usize::try_from(n).map_err(|_| {
                BollError::invalid_config(format!("length {} does not fit in usize", n))
            })?,
            None => default.length,
        };

        let source = match conf.get::<String>("source")? {
            Some(s) => PriceSource::from_str(&s).map_err(|_| {
                BollError::invalid_config(format!("unknown source = {}", s))
            })?,
            None => default.source,
        };

        let config = Self {
            length,
            std_dev_multiplier: conf
                .get("std_dev_multiplier")?
                .unwrap_or(default.std_dev_multiplier),
            source,
            offset: conf.get("offset")?.unwrap_or(default.offset),
        };

        conf.check()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let map: HashMap<String, serde_json::Value> = serde_json::from_str(s)
            .map_err(|e| BollError::new(format!("malformed config: {}", e), ErrCode::ConfigError))?;
        Self::from_map(Some(map))
    }
}

/// Key/value bag that remembers which keys were consumed
struct ConfigWithCheck {
    conf: HashMap<String, serde_json::Value>,
}

impl ConfigWithCheck {
    fn new(conf: HashMap<String, serde_json::Value>) -> Self {
        Self { conf }
    }

    fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.conf.remove(key) {
            None => Ok(None),
            Some(v) => serde_json::from_value(v.clone()).map(Some).map_err(|e| {
                BollError::new(
                    format!("bad value for {}: {} ({})", key, v, e),
                    ErrCode::ConfigError,
                )
            }),
        }
    }

    fn check(&self) -> Result<()> {
        let mut keys: Vec<&String> = self.conf.keys().collect();
        keys.sort();
        match keys.first() {
            Some(k) => Err(BollError::new(
                format!("unknown para = {}", k),
                ErrCode::ParaError,
            )),
            None => Ok(()),
        }
    }
}
