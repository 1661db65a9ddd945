use polars::prelude::*;

use crate::error::ValidationError;

/// Logical schema of the rate cache: `date, base, quote, rate`.
pub struct RateSchema;

impl RateSchema {
    /// Required columns, in stored order.
    pub const COLUMNS: [&'static str; 4] = ["date", "base", "quote", "rate"];

    /// Check that every required column is present. Column types are coerced
    /// later during normalization, so only presence is checked here.
    pub fn validate(df: &DataFrame) -> Result<(), ValidationError> {
        let actual = df.schema();
        for column in Self::COLUMNS {
            if !actual.contains(column) {
                return Err(ValidationError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }
}
