//! Chart renderer trait definitions for polymorphic chart types.

use tunechart_common::{FilterCriteria, Record, Result};

/// Something that can draw the filtered record set.
///
/// Renderers are invoked by the [`UpdateCoordinator`](crate::UpdateCoordinator)
/// with the same filtered slice, in registration order. The slice is shared
/// and must not be retained past the call.
pub trait ChartRenderer: Send + Sync {
    /// Name used in logs, reports and output file names.
    fn name(&self) -> &str;

    /// Draws the chart for `records`, which already satisfy `criteria`.
    fn render(&self, records: &[Record], criteria: &FilterCriteria) -> Result<()>;
}
