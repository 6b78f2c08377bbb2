pub mod common;
pub mod config;
pub mod kline;
pub mod math;

pub use common::boll_error::{BollError, ErrCode, Result};
pub use common::enums::PriceSource;
pub use config::boll_config::BandConfig;
pub use config::settings_form::SettingsForm;
pub use kline::price_point::PricePoint;
pub use math::boll::{compute, BandRow, BandSeries, BollMetric, BollModel};
