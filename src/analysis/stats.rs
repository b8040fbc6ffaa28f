use rust_decimal::Decimal;
use serde::Serialize;

/// Minimum sample size for the quartile estimates.
pub const MIN_QUARTILE_SAMPLES: usize = 4;

/// Count, mean and range of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtentStats {
    pub count: usize,
    pub mean: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

impl ExtentStats {
    /// Returns `None` for an empty sample.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let values: Vec<Decimal> = values.into_iter().collect();
        let mean = mean(&values)?;
        let min = values.iter().copied().min()?;
        let max = values.iter().copied().max()?;
        Some(Self {
            count: values.len(),
            mean,
            min,
            max,
        })
    }

    /// The same statistics divided by `unit`, e.g. seconds to minutes.
    pub fn scaled(&self, unit: Decimal) -> Self {
        Self {
            count: self.count,
            mean: self.mean / unit,
            min: self.min / unit,
            max: self.max / unit,
        }
    }
}

/// Five-number summary plus mean.
///
/// `p25` and `p75` are nearest-rank picks at index `n/4` and `3n/4` of the
/// ascending sample and are only reported for at least four samples. The
/// median interpolates between the two middle values for even `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub count: usize,
    pub min: Decimal,
    pub p25: Option<Decimal>,
    pub median: Decimal,
    pub p75: Option<Decimal>,
    pub max: Decimal,
    pub mean: Decimal,
}

impl Distribution {
    /// Returns `None` for an empty sample.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut sorted: Vec<Decimal> = values.into_iter().collect();
        sorted.sort();

        let median = median_sorted(&sorted)?;
        let (p25, p75) = if sorted.len() >= MIN_QUARTILE_SAMPLES {
            (
                Some(sorted[sorted.len() / 4]),
                Some(sorted[sorted.len() * 3 / 4]),
            )
        } else {
            (None, None)
        };

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            p25,
            median,
            p75,
            max: sorted[sorted.len() - 1],
            mean: mean(&sorted)?,
        })
    }

    /// Distribution over the strictly positive values only. Zero and
    /// negative readings mean "no data" for market metrics such as TVL.
    pub fn of_positive<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Decimal>,
    {
        Self::from_values(values.into_iter().filter(|v| *v > Decimal::ZERO))
    }
}

pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let n = Decimal::from(values.len() as i64);
    match checked_sum(values.iter().copied()) {
        Some(sum) => Some(sum / n),
        // The running sum left the Decimal range; add up the shares instead.
        None => checked_sum(values.iter().map(|v| *v / n)),
    }
}

/// Sum of `values`, `None` if it leaves the Decimal range.
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Median of an ascending sample.
pub fn median_sorted(sorted: &[Decimal]) -> Option<Decimal> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => {
            let (lo, hi) = (sorted[n / 2 - 1], sorted[n / 2]);
            let two = Decimal::from(2);
            Some(match lo.checked_add(hi) {
                Some(sum) => sum / two,
                // Only same-sign values overflow, so `hi - lo` fits.
                None => lo + (hi - lo) / two,
            })
        }
    }
}

/// Median of an unsorted sample.
pub fn median<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    let mut sorted: Vec<Decimal> = values.into_iter().collect();
    sorted.sort();
    median_sorted(&sorted)
}

/// `numerator / denominator`, or zero when the denominator is zero or the
/// quotient does not fit in a Decimal.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}
