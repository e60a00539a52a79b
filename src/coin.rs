use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};

/// A monetary amount in the ledger.
/// Amounts are decimal quantities (outputs as small as a fraction of a coin exist),
/// so this wraps a float rather than an integer number of base units.
#[derive(Copy, Clone, PartialOrd, PartialEq, Debug, Serialize, Deserialize)]
pub struct Coin(f64);

impl Coin {
    pub const fn new(amount: f64) -> Self {
        Coin(amount)
    }

    pub fn zero() -> Self {
        Self::new(0.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Strictly greater than zero. A zero-valued output is not a spendable amount.
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }
}

impl Add for Coin {
    type Output = Coin;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Coin {
    type Output = Coin;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum<Coin> for Coin {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let mut sum = Self::zero();
        for el in iter {
            sum = sum.add(el);
        }
        sum
    }
}

impl From<f64> for Coin {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} SCR", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        assert_eq!(Coin::new(10.0) + Coin::new(5.0), Coin::new(15.0));
        assert_eq!(Coin::new(10.0) - Coin::new(5.0), Coin::new(5.0));
    }

    #[test]
    fn sum_over_iterator() {
        let total: Coin = vec![Coin::new(1.0), Coin::new(2.5), Coin::new(0.5)]
            .into_iter()
            .sum();
        assert_eq!(total, Coin::new(4.0));
    }

    #[test]
    fn positivity_boundary() {
        assert!(Coin::new(0.1).is_positive());
        assert!(!Coin::zero().is_positive());
        assert!(!Coin::new(-1.0).is_positive());
    }
}
