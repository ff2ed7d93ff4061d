//! The set of live screens and the refresh ticker.
//!
//! An [`Application`] is a plain value owned by the host; there is no global
//! registry. The host routes backend events to the screen they belong to
//! through its [`ScreenId`] and calls [`Application::draw_all`] whenever the
//! backend asks for a frame or the refresh ticker fires.
//!
//! # Example
//!
//! ```ignore
//! let mut app = Application::new().with_refresh(DEFAULT_REFRESH_INTERVAL)?;
//! let main = app.add_screen(Screen::new(Size::new(1024, 768), "Main"));
//!
//! loop {
//!     // ... feed backend events into app.screen_mut(main) ...
//!     if app.wait_for_refresh(Duration::from_millis(100)) {
//!         app.draw_all(&mut renderer);
//!     }
//! }
//! ```

use std::time::Duration;

use slotmap::{SlotMap, new_key_type};
use trellis_core::logging::targets;
use trellis_core::{RefreshTicker, TickerError};
use trellis_render::Renderer;

use crate::screen::Screen;

new_key_type! {
    /// Handle of a screen owned by an [`Application`].
    pub struct ScreenId;
}

/// Owns every screen of the process plus the optional refresh ticker.
#[derive(Debug, Default)]
pub struct Application {
    screens: SlotMap<ScreenId, Screen>,
    order: Vec<ScreenId>,
    ticker: Option<RefreshTicker>,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a background ticker that requests a redraw every `interval`.
    pub fn with_refresh(mut self, interval: Duration) -> Result<Self, TickerError> {
        self.start_refresh(interval)?;
        Ok(self)
    }

    /// Start (or restart) the refresh ticker.
    pub fn start_refresh(&mut self, interval: Duration) -> Result<(), TickerError> {
        self.stop_refresh()?;
        self.ticker = Some(RefreshTicker::spawn(interval)?);
        tracing::debug!(target: targets::SCREEN, ?interval, "refresh ticker started");
        Ok(())
    }

    /// Stop the refresh ticker, if one is running.
    pub fn stop_refresh(&mut self) -> Result<(), TickerError> {
        match self.ticker.take() {
            Some(ticker) => ticker.stop(),
            None => Ok(()),
        }
    }

    pub fn ticker(&self) -> Option<&RefreshTicker> {
        self.ticker.as_ref()
    }

    /// Consume a pending tick without blocking. Always `false` without a ticker.
    pub fn refresh_due(&self) -> bool {
        self.ticker.as_ref().is_some_and(RefreshTicker::try_tick)
    }

    /// Block until the next tick or `timeout`. Returns `false` immediately
    /// without a ticker.
    pub fn wait_for_refresh(&self, timeout: Duration) -> bool {
        self.ticker.as_ref().is_some_and(|t| t.wait(timeout))
    }

    // =========================================================================
    // Screens
    // =========================================================================

    pub fn add_screen(&mut self, screen: Screen) -> ScreenId {
        let caption = screen.caption().to_owned();
        let id = self.screens.insert(screen);
        self.order.push(id);
        tracing::debug!(target: targets::SCREEN, ?id, %caption, "screen added");
        id
    }

    /// Remove a screen, handing it back to the caller.
    pub fn remove_screen(&mut self, id: ScreenId) -> Option<Screen> {
        self.order.retain(|&s| s != id);
        let screen = self.screens.remove(id);
        if screen.is_some() {
            tracing::debug!(target: targets::SCREEN, ?id, "screen removed");
        }
        screen
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.get(id)
    }

    pub fn screen_mut(&mut self, id: ScreenId) -> Option<&mut Screen> {
        self.screens.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Screen ids in the order they were added.
    pub fn screen_ids(&self) -> &[ScreenId] {
        &self.order
    }

    /// Screens in the order they were added.
    pub fn screens(&self) -> impl Iterator<Item = (ScreenId, &Screen)> {
        self.order
            .iter()
            .filter_map(|&id| self.screens.get(id).map(|s| (id, s)))
    }

    /// Run `f` on every visible screen, in the order they were added.
    ///
    /// Hosts with one render surface per screen draw through this.
    pub fn for_each_visible(&mut self, mut f: impl FnMut(ScreenId, &mut Screen)) {
        for &id in &self.order {
            if let Some(screen) = self.screens.get_mut(id) {
                if screen.is_visible() {
                    f(id, screen);
                }
            }
        }
    }

    /// Draw every visible screen through `renderer`; returns how many were
    /// drawn.
    pub fn draw_all(&mut self, renderer: &mut dyn Renderer) -> usize {
        let mut drawn = 0;
        self.for_each_visible(|_, screen| {
            screen.draw_all(&mut *renderer);
            drawn += 1;
        });
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Size;
    use trellis_render::RecordingRenderer;

    #[test]
    fn test_screens_keep_insertion_order() {
        let mut app = Application::new();
        let a = app.add_screen(Screen::new(Size::new(100, 100), "A"));
        let b = app.add_screen(Screen::new(Size::new(100, 100), "B"));
        let captions: Vec<&str> = app.screens().map(|(_, s)| s.caption()).collect();
        assert_eq!(captions, ["A", "B"]);
        assert_eq!(app.screen_ids(), &[a, b]);

        let removed = app.remove_screen(a).unwrap();
        assert_eq!(removed.caption(), "A");
        assert!(app.screen(a).is_none());
        assert_eq!(app.len(), 1);
        assert!(app.remove_screen(a).is_none());
    }

    #[test]
    fn test_draw_all_skips_hidden_screens() {
        let mut app = Application::new();
        app.add_screen(Screen::new(Size::new(100, 100), "Shown"));
        let hidden = app.add_screen(Screen::new(Size::new(100, 100), "Hidden"));
        app.screen_mut(hidden).unwrap().set_visible(false);

        let mut renderer = RecordingRenderer::new();
        assert_eq!(app.draw_all(&mut renderer), 1);
    }

    #[test]
    fn test_refresh_ticker_lifecycle() {
        let mut app = Application::new()
            .with_refresh(Duration::from_millis(5))
            .unwrap();
        assert!(app.wait_for_refresh(Duration::from_secs(2)));
        app.stop_refresh().unwrap();
        assert!(app.ticker().is_none());
        assert!(!app.refresh_due());
        assert!(!app.wait_for_refresh(Duration::from_millis(1)));
    }
}
