//! ANSI styling for report output.

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Marker for a positive finding or a successful action.
pub const OK_MARK: &str = "✓";
/// Marker for a negative finding or a failed action.
pub const FAIL_MARK: &str = "✗";
/// Marker for warnings and skipped actions.
pub const WARN_MARK: &str = "!";

/// Colour switch for every renderer.
///
/// With colour disabled the markers are still printed so plain output
/// stays readable in logs and pipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    pub const fn plain() -> Self {
        Self::new(false)
    }

    /// `NO_COLOR` (any non-empty value) or `--no-color` turns colour off.
    pub fn from_flags(no_color_flag: bool, no_color_env: Option<&str>) -> Self {
        let env_disables = no_color_env.is_some_and(|value| !value.is_empty());
        Self::new(!no_color_flag && !env_disables)
    }

    pub const fn color_enabled(self) -> bool {
        self.color
    }

    fn paint(self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// `✓ text` in green.
    pub fn ok(self, text: &str) -> String {
        self.paint(GREEN, &format!("{OK_MARK} {text}"))
    }

    /// `✗ text` in red.
    pub fn fail(self, text: &str) -> String {
        self.paint(RED, &format!("{FAIL_MARK} {text}"))
    }

    /// `! text` in yellow.
    pub fn warn(self, text: &str) -> String {
        self.paint(YELLOW, &format!("{WARN_MARK} {text}"))
    }

    /// Marker chosen by `ok`.
    pub fn status(self, ok: bool, text: &str) -> String {
        if ok { self.ok(text) } else { self.fail(text) }
    }

    pub fn bold(self, text: &str) -> String {
        self.paint(BOLD, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_keeps_markers() {
        let palette = Palette::plain();
        assert_eq!(palette.ok("driver found"), "✓ driver found");
        assert_eq!(palette.fail("driver missing"), "✗ driver missing");
        assert_eq!(palette.warn("skipped"), "! skipped");
        assert_eq!(palette.bold("Summary"), "Summary");
    }

    #[test]
    fn colour_wraps_in_ansi_codes() {
        let palette = Palette::new(true);
        assert_eq!(palette.ok("ok"), "\x1b[32m✓ ok\x1b[0m");
        assert_eq!(palette.fail("no"), "\x1b[31m✗ no\x1b[0m");
    }

    #[test]
    fn no_color_env_and_flag_disable_colour() {
        assert!(Palette::from_flags(false, None).color_enabled());
        assert!(!Palette::from_flags(true, None).color_enabled());
        assert!(!Palette::from_flags(false, Some("1")).color_enabled());
        assert!(Palette::from_flags(false, Some("")).color_enabled());
    }
}
