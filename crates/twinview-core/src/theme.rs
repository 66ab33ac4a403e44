// ── Theme subscription ──
//
// The viewer's light/dark display parameter. Producers publish through a
// `ThemeSource`; sessions hold a `watch::Receiver<Theme>`.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Class that marks the dark theme on a document root.
pub const DARK_THEME_CLASS: &str = "iui-theme-dark";

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Derive the theme from a whitespace-separated class attribute.
    pub fn from_class_list(classes: &str) -> Self {
        if classes.split_whitespace().any(|c| c == DARK_THEME_CLASS) {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

/// Publisher side of the theme signal.
///
/// Only distinct values are broadcast, so subscribers wake once per
/// actual change.
#[derive(Debug)]
pub struct ThemeSource {
    tx: watch::Sender<Theme>,
}

impl ThemeSource {
    pub fn new(initial: Theme) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Theme {
        *self.tx.borrow()
    }

    /// Publish a theme. Returns `true` if it differed from the current one.
    pub fn set(&self, theme: Theme) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == theme {
                false
            } else {
                *current = theme;
                true
            }
        })
    }

    /// Re-evaluate from a changed class attribute.
    pub fn observe_class_list(&self, classes: &str) -> bool {
        self.set(Theme::from_class_list(classes))
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }
}

impl Default for ThemeSource {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn dark_class_selects_dark_theme() {
        assert_eq!(Theme::from_class_list("iui-root iui-theme-dark"), Theme::Dark);
        assert_eq!(Theme::from_class_list("iui-theme-dark-ish"), Theme::Light);
        assert_eq!(Theme::from_class_list(""), Theme::Light);
    }

    #[tokio::test]
    async fn subscribers_see_only_real_changes() {
        let source = ThemeSource::new(Theme::Light);
        let mut rx = source.subscribe();

        assert!(!source.set(Theme::Light));
        assert!(!rx.has_changed().unwrap());

        assert!(source.observe_class_list("iui-theme-dark"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Theme::Dark);
        assert_eq!(source.current(), Theme::Dark);
    }
}
