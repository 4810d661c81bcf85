//! The operation trait shared by every terraform command.

use crate::config::Configuration;
use crate::error::TerraformResult;

/// A terraform operation driven by a property bag.
pub trait TerraformOperation {
    type Output;

    /// Run the operation with `properties`.
    ///
    /// Failures from the underlying process are wrapped into
    /// [`crate::TerraformError`]; nothing is retried.
    fn execute(&self, properties: &Configuration) -> TerraformResult<Self::Output>;
}
