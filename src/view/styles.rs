//! Log view styling.

use ratatui::style::{Color, Modifier, Style};

/// Style for section headings in overlays.
pub fn section_header() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

/// Style for hints and de-emphasized text.
pub fn muted_text() -> Style {
    Style::default().fg(Color::DarkGray)
}

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Explicit setting, for tests.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== LogStyles =====

/// Styles for the parts of the screen.
#[derive(Debug, Clone, Copy)]
pub struct LogStyles {
    /// Header bar.
    pub header: Style,
    /// Timestamp prefix of a log line.
    pub prefix: Style,
    /// The unterminated line still being received.
    pub pending: Style,
    /// Border of the focused pane.
    pub focused_border: Style,
    /// Quick-send key labels.
    pub quick_key: Style,
    /// Informational status messages.
    pub info: Style,
    /// Error status messages and notice borders.
    pub error: Style,
}

impl LogStyles {
    /// Create styles honouring the color configuration.
    ///
    /// Without colors only modifiers (bold, dim, reversed) are used.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                header: Style::default().fg(Color::Black).bg(Color::Cyan),
                prefix: Style::default().fg(Color::DarkGray),
                pending: Style::default().add_modifier(Modifier::DIM),
                focused_border: Style::default().fg(Color::Yellow),
                quick_key: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                info: Style::default().fg(Color::Green),
                error: Style::default().fg(Color::Red),
            }
        } else {
            Self {
                header: Style::default().add_modifier(Modifier::REVERSED),
                prefix: Style::default(),
                pending: Style::default().add_modifier(Modifier::DIM),
                focused_border: Style::default().add_modifier(Modifier::BOLD),
                quick_key: Style::default().add_modifier(Modifier::BOLD),
                info: Style::default(),
                error: Style::default().add_modifier(Modifier::BOLD),
            }
        }
    }
}

impl Default for LogStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(no_color_env)]
    fn no_color_flag_disables_colors() {
        assert!(!ColorConfig::from_env_and_args(true).colors_enabled());
    }

    #[test]
    #[serial(no_color_env)]
    fn no_color_env_disables_colors() {
        std::env::set_var("NO_COLOR", "1");
        let config = ColorConfig::from_env_and_args(false);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled());
    }

    #[test]
    fn colorless_styles_have_no_foreground() {
        let styles = LogStyles::with_color_config(ColorConfig::new(false));
        assert_eq!(styles.error.fg, None);
        assert_eq!(styles.prefix.fg, None);
        assert_eq!(styles.header.bg, None);
    }

    #[test]
    fn colored_styles_mark_errors_red() {
        let styles = LogStyles::with_color_config(ColorConfig::new(true));
        assert_eq!(styles.error.fg, Some(Color::Red));
    }
}
