use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for band computation and its collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(i32)]
pub enum ErrCode {
    // Config errors (0-99)
    #[strum(serialize = "_CONFIG_ERR_BEGIN")]
    ConfigErrBegin = 0,
    #[strum(serialize = "INVALID_CONFIGURATION")]
    InvalidConfiguration = 1,
    #[strum(serialize = "PARA_ERROR")]
    ParaError = 5,
    #[strum(serialize = "CONFIG_ERROR")]
    ConfigError = 17,
    #[strum(serialize = "_CONFIG_ERR_END")]
    ConfigErrEnd = 99,

    // KL data errors (200-299)
    #[strum(serialize = "_KL_ERR_BEGIN")]
    KlErrBegin = 200,
    #[strum(serialize = "KL_DATA_INVALID")]
    KlDataInvalid = 203,
    #[strum(serialize = "SRC_DATA_FORMAT_ERROR")]
    SrcDataFormatError = 218,
    #[strum(serialize = "_KL_ERR_END")]
    KlErrEnd = 299,
}

impl ErrCode {
    pub fn is_kldata_err(&self) -> bool {
        let code = *self as i32;
        code > Self::KlErrBegin as i32 && code < Self::KlErrEnd as i32
    }

    pub fn is_config_err(&self) -> bool {
        let code = *self as i32;
        code > Self::ConfigErrBegin as i32 && code < Self::ConfigErrEnd as i32
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{errcode}: {msg}")]
pub struct BollError {
    pub errcode: ErrCode,
    pub msg: String,
}

impl BollError {
    pub fn new(message: impl Into<String>, code: ErrCode) -> Self {
        Self {
            errcode: code,
            msg: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::InvalidConfiguration)
    }

    pub fn is_kldata_err(&self) -> bool {
        self.errcode.is_kldata_err()
    }

    pub fn is_config_err(&self) -> bool {
        self.errcode.is_config_err()
    }
}

pub type Result<T> = std::result::Result<T, BollError>;
