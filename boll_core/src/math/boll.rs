use std::collections::VecDeque;

use serde::Serialize;

use crate::common::boll_error::Result;
use crate::config::boll_config::BandConfig;
use crate::kline::price_point::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollMetric {
    pub up: f64,
    pub mid: f64,
    pub down: f64,
}

/// Rolling-window Bollinger model fed one price at a time.
#[derive(Debug, Clone)]
pub struct BollModel {
    period: usize,
    k: f64,
    prices: VecDeque<f64>,
}

impl BollModel {
    pub fn new(period: usize, k: f64) -> Self {
        Self {
            period,
            k,
            prices: VecDeque::with_capacity(period),
        }
    }

    pub fn from_config(config: &BandConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.length, config.std_dev_multiplier))
    }

    /// Push `price` and return the bands of the latest window, `None` while
    /// fewer than `period` prices have been seen.
    pub fn add(&mut self, price: f64) -> Option<BollMetric> {
        self.prices.push_back(price);
        if self.prices.len() > self.period {
            self.prices.pop_front();
        }
        if self.period == 0 || self.prices.len() < self.period {
            return None;
        }

        let n = self.period as f64;
        let mid = self.prices.iter().sum::<f64>() / n;

        // population variance, divided by the window size
        let variance = self.prices.iter().map(|&x| (x - mid).powi(2)).sum::<f64>() / n;

        let std_dev = variance.sqrt();

        Some(BollMetric {
            up: mid + self.k * std_dev,
            mid,
            down: mid - self.k * std_dev,
        })
    }

    pub fn reset(&mut self) {
        self.prices.clear();
    }
}

/// Row handed to the chart layer: one per input sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandRow {
    pub timestamp: i64,
    pub basis: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

/// Basis, upper and lower band aligned to the input series.
///
/// Positions without a value hold `f64::NAN`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BandSeries {
    pub basis: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BandSeries {
    pub fn len(&self) -> usize {
        self.basis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basis.is_empty()
    }

    pub fn metric(&self, i: usize) -> Option<BollMetric> {
        let mid = *self.basis.get(i)?;
        if mid.is_nan() {
            return None;
        }
        Some(BollMetric {
            up: *self.upper.get(i)?,
            mid,
            down: *self.lower.get(i)?,
        })
    }

    /// Pair every position with the timestamp of the matching sample.
    pub fn rows(&self, series: &[PricePoint]) -> Vec<BandRow> {
        series
            .iter()
            .enumerate()
            .map(|(i, p)| BandRow {
                timestamp: p.timestamp,
                basis: defined(self.basis.get(i)),
                upper: defined(self.upper.get(i)),
                lower: defined(self.lower.get(i)),
            })
            .collect()
    }

    fn shifted(&self, offset: i64) -> Self {
        Self {
            basis: shift(&self.basis, offset),
            upper: shift(&self.upper, offset),
            lower: shift(&self.lower, offset),
        }
    }
}

fn defined(v: Option<&f64>) -> Option<f64> {
    v.copied().filter(|x| !x.is_nan())
}

/// Compute Bollinger Bands over `series`.
///
/// The first `length - 1` positions are undefined, then the offset moves
/// every value `offset` positions later (earlier when negative) without
/// changing the total length.
pub fn compute(series: &[PricePoint], config: &BandConfig) -> Result<BandSeries> {
    let mut model = BollModel::from_config(config)?;

    let n = series.len();
    let mut bands = BandSeries {
        basis: Vec::with_capacity(n),
        upper: Vec::with_capacity(n),
        lower: Vec::with_capacity(n),
    };

    for point in series {
        match model.add(point.value(config.source)) {
            Some(m) => {
                bands.basis.push(m.mid);
                bands.upper.push(m.up);
                bands.lower.push(m.down);
            }
            None => {
                bands.basis.push(f64::NAN);
                bands.upper.push(f64::NAN);
                bands.lower.push(f64::NAN);
            }
        }
    }

    if config.offset == 0 {
        return Ok(bands);
    }
    Ok(bands.shifted(config.offset))
}

/// Positional shift into a new vector of the same length, padding with NaN.
fn shift(values: &[f64], offset: i64) -> Vec<f64> {
    let n = values.len();
    let k = usize::try_from(offset.unsigned_abs()).unwrap_or(usize::MAX).min(n);
    let mut out = Vec::with_capacity(n);
    if offset >= 0 {
        out.extend(std::iter::repeat(f64::NAN).take(k));
        out.extend_from_slice(&values[..n - k]);
    } else {
        out.extend_from_slice(&values[k..]);
        out.extend(std::iter::repeat(f64::NAN).take(k));
    }
    out
}
