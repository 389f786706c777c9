//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Every template of the kind expanded
    pub const SUCCESS: &'static str = "✓";

    /// Some templates of the kind were skipped
    pub const WARNING: &'static str = "⚠";

    /// The run halted
    pub const ERROR: &'static str = "✗";

    /// Templates stored but never expanded
    pub const IDLE: &'static str = "-";

    pub fn get_kind_icon(templates: usize, instances: usize, skipped: usize) -> &'static str {
        if skipped > 0 {
            Self::WARNING
        } else if templates > 0 && instances == 0 {
            Self::IDLE
        } else {
            Self::SUCCESS
        }
    }

    pub fn get_status_text(skipped: usize) -> &'static str {
        if skipped == 0 {
            "Complete"
        } else {
            "Partial"
        }
    }
}
