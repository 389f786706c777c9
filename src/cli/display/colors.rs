//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Color for a kind row given how many templates were loaded and how many
    /// instances came out of them.
    pub fn get_kind_color(&self, templates: usize, instances: usize, skipped: usize) -> TableColor {
        if skipped > 0 {
            self.warning
        } else if templates == 0 {
            self.muted
        } else if instances > 0 {
            self.success
        } else {
            self.info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = ColorTheme::default();
        assert_eq!(theme.success, TableColor::Green);
        assert_eq!(theme.warning, TableColor::Yellow);
        assert_eq!(theme.error, TableColor::Red);
    }

    #[test]
    fn test_get_kind_color() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_kind_color(2, 10, 0), TableColor::Green);
        assert_eq!(theme.get_kind_color(2, 10, 1), TableColor::Yellow);
        assert_eq!(theme.get_kind_color(0, 0, 0), TableColor::DarkGrey);
        assert_eq!(theme.get_kind_color(1, 0, 0), TableColor::Cyan);
    }
}
