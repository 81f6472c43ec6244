//! The transaction record and the statistics derived from it.

use serde::{Deserialize, Serialize};

/// The integer type used for user IDs.
pub type UserId = i64;

/// A single row of an uploaded transactions table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// An opaque identifier, not required to be unique.
    pub transaction_id: String,
    /// The user that made the transaction.
    pub user_id: UserId,
    /// The product that was bought.
    pub product_id: i64,
    /// When the transaction happened. The format is not interpreted.
    pub timestamp: String,
    /// The amount of money involved in the transaction.
    pub transaction_amount: f64,
}

/// The maximum, minimum and mean transaction amount of a user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// The largest transaction amount.
    pub maximum: f64,
    /// The smallest transaction amount.
    pub minimum: f64,
    /// The unweighted arithmetic mean of the transaction amounts.
    pub mean: f64,
}

impl Statistics {
    /// Calculate the statistics of `amounts`.
    ///
    /// Returns `None` if `amounts` is empty.
    pub fn from_amounts(amounts: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut maximum = f64::NEG_INFINITY;
        let mut minimum = f64::INFINITY;

        for amount in amounts {
            count += 1;
            sum += amount;
            maximum = maximum.max(amount);
            minimum = minimum.min(amount);
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            maximum,
            minimum,
            mean: sum / count as f64,
        })
    }
}
