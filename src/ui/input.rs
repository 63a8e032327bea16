//! Sizing of the message input and its send button.

pub const DEFAULT_LINE_HEIGHT: f32 = 20.0;
pub const MAX_LINES: usize = 4;
/// Padding of the input container; the send button sits this far from its
/// bottom edge.
pub const CONTAINER_PADDING: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Hidden,
    Auto,
}

/// Box metrics of the input element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputMetrics {
    /// `None` (or zero) means the style did not set one.
    pub line_height: Option<f32>,
    pub padding_top: f32,
    pub padding_bottom: f32,
    /// Characters that fit on one visual line before the text wraps.
    pub columns: usize,
}

impl Default for InputMetrics {
    fn default() -> Self {
        Self {
            line_height: None,
            padding_top: 10.0,
            padding_bottom: 10.0,
            columns: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resize {
    pub height: f32,
    pub overflow: Overflow,
    /// Whether `height` differs from the current one by more than a pixel.
    pub changed: bool,
}

impl InputMetrics {
    pub fn line_height(&self) -> f32 {
        match self.line_height {
            Some(h) if h > 0.0 => h,
            _ => DEFAULT_LINE_HEIGHT,
        }
    }

    fn padding(&self) -> f32 {
        self.padding_top + self.padding_bottom
    }

    pub fn min_height(&self) -> f32 {
        self.line_height() + self.padding()
    }

    pub fn max_height(&self) -> f32 {
        self.line_height() * MAX_LINES as f32 + self.padding()
    }

    /// Visual lines `text` occupies, counting soft wraps.
    pub fn rows(&self, text: &str) -> usize {
        let columns = self.columns.max(1);
        text.split('\n')
            .map(|line| line.chars().count().div_ceil(columns).max(1))
            .sum()
    }

    /// Unclamped height the text needs.
    pub fn content_height(&self, text: &str) -> f32 {
        self.rows(text) as f32 * self.line_height() + self.padding()
    }

    pub fn autosize(&self, text: &str, current_height: f32) -> Resize {
        let content = self.content_height(text).max(self.min_height());
        let max = self.max_height();
        let height = content.min(max);

        Resize {
            height,
            overflow: if content > max {
                Overflow::Auto
            } else {
                Overflow::Hidden
            },
            changed: (current_height - height).abs() > 1.0,
        }
    }
}

pub fn send_button_visible(text: &str) -> bool {
    !text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let metrics = InputMetrics::default();
        assert_eq!(metrics.line_height(), 20.0);
        assert_eq!(metrics.min_height(), 40.0);
        assert_eq!(metrics.max_height(), 100.0);
    }

    #[test]
    fn single_line_never_shrinks_below_minimum() {
        let metrics = InputMetrics::default();
        let resize = metrics.autosize("", 0.0);
        assert_eq!(resize.height, metrics.min_height());
        assert_eq!(resize.overflow, Overflow::Hidden);
        assert!(resize.changed);
    }

    #[test]
    fn grows_per_line_up_to_the_cap() {
        let metrics = InputMetrics::default();
        assert_eq!(metrics.autosize("a\nb", 40.0).height, 60.0);
        assert_eq!(metrics.autosize("a\nb\nc\nd", 40.0).height, 100.0);

        let resize = metrics.autosize("a\nb\nc\nd\ne", 100.0);
        assert_eq!(resize.height, 100.0);
        assert_eq!(resize.overflow, Overflow::Auto);
        assert!(!resize.changed);
    }

    #[test]
    fn long_pastes_stay_within_bounds() {
        let metrics = InputMetrics {
            line_height: Some(18.0),
            padding_top: 4.0,
            padding_bottom: 6.0,
            columns: 12,
        };
        for len in [0usize, 1, 11, 12, 13, 47, 48, 49, 500, 20_000] {
            let text = "x".repeat(len);
            let resize = metrics.autosize(&text, 0.0);
            assert!(resize.height >= metrics.min_height(), "len {}", len);
            assert!(resize.height <= metrics.max_height(), "len {}", len);
        }
        let newlines = "\n".repeat(10_000);
        assert_eq!(metrics.autosize(&newlines, 0.0).height, metrics.max_height());
    }

    #[test]
    fn soft_wrapping() {
        let metrics = InputMetrics {
            columns: 10,
            ..Default::default()
        };
        assert_eq!(metrics.rows(""), 1);
        assert_eq!(metrics.rows("0123456789"), 1);
        assert_eq!(metrics.rows("0123456789a"), 2);
        assert_eq!(metrics.rows("abc\n\nabc"), 3);
    }

    #[test]
    fn small_differences_are_ignored() {
        let metrics = InputMetrics::default();
        assert!(!metrics.autosize("hi", 40.5).changed);
        assert!(metrics.autosize("hi", 42.0).changed);
    }

    #[test]
    fn unset_line_height_falls_back() {
        let metrics = InputMetrics {
            line_height: Some(0.0),
            ..Default::default()
        };
        assert_eq!(metrics.line_height(), DEFAULT_LINE_HEIGHT);
    }

    #[test]
    fn send_button_follows_trimmed_content() {
        assert!(!send_button_visible(""));
        assert!(!send_button_visible("  \n "));
        assert!(send_button_visible(" hi "));
    }
}
