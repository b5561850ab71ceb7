//! App-wide translation visibility
//!
//! Russian text is either shown plainly or obscured as a spoiler. The flag is
//! process-wide and defaults to off; game sessions never consult it.

use std::sync::atomic::{AtomicBool, Ordering};

static SHOW_TRANSLATIONS: AtomicBool = AtomicBool::new(false);

const SPOILER_CHAR: char = '░';

pub fn show_translations() -> bool {
    SHOW_TRANSLATIONS.load(Ordering::SeqCst)
}

pub fn set_show_translations(show: bool) {
    SHOW_TRANSLATIONS.store(show, Ordering::SeqCst);
}

/// Flips the preference and returns the new value
pub fn toggle_translations() -> bool {
    !SHOW_TRANSLATIONS.fetch_xor(true, Ordering::SeqCst)
}

/// Russian text as the presentation layer should print it
pub struct RuText;

impl RuText {
    pub fn render(text: &str) -> String {
        Self::render_with(text, show_translations())
    }

    pub fn render_with(text: &str, visible: bool) -> String {
        if visible {
            return text.to_string();
        }
        text.chars()
            .map(|c| if c.is_whitespace() { c } else { SPOILER_CHAR })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_hidden_keeps_word_shape() {
        assert_eq!(RuText::render_with("ехать в отпуск", false), "░░░░░ ░ ░░░░░░");
    }

    #[test]
    fn test_render_visible() {
        assert_eq!(RuText::render_with("обычно", true), "обычно");
    }

    #[test]
    fn test_toggle_roundtrip() {
        let initial = show_translations();
        let toggled = toggle_translations();
        assert_eq!(toggled, !initial);
        assert_eq!(show_translations(), toggled);
        set_show_translations(initial);
        assert_eq!(show_translations(), initial);
    }
}
