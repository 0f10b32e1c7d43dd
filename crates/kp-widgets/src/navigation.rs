#![forbid(unsafe_code)]

//! Section navigation.
//!
//! Wide viewports get a vertical rail of category buttons; narrow ones get a
//! compact pill that expands into a grid. Both highlight the active section
//! and both jump to a section by asking the host for a smooth scroll.

use kp_catalog::{Category, SectionId};
use kp_runtime::{Frame, HostEffect};
use serde::{Deserialize, Serialize};
use tracing::debug;
use web_time::Duration;

use crate::layout::LayoutProvider;
use crate::scroll_spy::ActiveSectionTracker;

/// Element ids written by [`Navigation::view`].
pub mod ids {
    use kp_catalog::Category;

    pub const DESKTOP: &str = "nav-desktop";
    pub const DESKTOP_TOP: &str = "nav-top";
    pub const MOBILE: &str = "nav-mobile";
    pub const PILL: &str = "nav-pill";
    pub const PILL_KEY: &str = "nav-pill-key";
    pub const PILL_SUFFIX: &str = "nav-pill-suffix";
    pub const PILL_BAR: &str = "nav-pill-bar";
    pub const EXPANDED: &str = "nav-expanded";
    pub const PROGRESS_COUNT: &str = "nav-progress-count";
    pub const PROGRESS_BAR: &str = "nav-progress-bar";
    pub const BACKDROP: &str = "nav-backdrop";

    /// Desktop rail button.
    #[must_use]
    pub fn rail_button(category: Category) -> String {
        format!("nav-btn-{}", category.key())
    }

    /// Expanded-grid button.
    #[must_use]
    pub fn grid_button(category: Category) -> String {
        format!("nav-grid-{}", category.key())
    }
}

/// Which navigation variant is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLayout {
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Viewport width at and above which the desktop rail is shown.
    pub desktop_min_width: f64,
    /// Gap left above a section after a jump.
    pub jump_offset: f64,
    /// How long scroll tracking stays pinned after a jump.
    pub pin_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            desktop_min_width: 1024.0,
            jump_offset: 80.0,
            pin_ms: 1000,
        }
    }
}

/// Navigation state: layout variant plus the mobile expanded flag.
#[derive(Debug, Clone)]
pub struct Navigation {
    config: NavigationConfig,
    layout: NavLayout,
    expanded: bool,
}

impl Navigation {
    #[must_use]
    pub fn new(config: NavigationConfig, viewport_width: f64) -> Self {
        let layout = Self::layout_for(&config, viewport_width);
        Self {
            config,
            layout,
            expanded: false,
        }
    }

    fn layout_for(config: &NavigationConfig, width: f64) -> NavLayout {
        if width >= config.desktop_min_width {
            NavLayout::Desktop
        } else {
            NavLayout::Mobile
        }
    }

    /// Re-pick the layout for a new viewport width.
    pub fn resize(&mut self, viewport_width: f64) {
        let layout = Self::layout_for(&self.config, viewport_width);
        if layout != self.layout {
            debug!(?layout, "navigation layout changed");
            self.layout = layout;
            if layout == NavLayout::Desktop {
                self.expanded = false;
            }
        }
    }

    #[must_use]
    pub fn layout(&self) -> NavLayout {
        self.layout
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn expand(&mut self) {
        if self.layout == NavLayout::Mobile {
            self.expanded = true;
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Scroll offset a jump to `section` lands on.
    #[must_use]
    pub fn jump_target(&self, section: SectionId, layout: &dyn LayoutProvider) -> Option<f64> {
        layout
            .document_top_of(section)
            .map(|top| (top - self.config.jump_offset).max(0.0))
    }

    /// Jump to `section`: mark it active, pin the tracker while the smooth
    /// scroll travels, and collapse the mobile grid.
    ///
    /// Returns the scroll effect for the host, or `None` when the section is
    /// not rendered.
    pub fn select(
        &mut self,
        section: SectionId,
        now: Duration,
        tracker: &mut ActiveSectionTracker,
        layout: &dyn LayoutProvider,
    ) -> Option<HostEffect> {
        let top = self.jump_target(section, layout)?;
        tracker.jump_to(section, now, Duration::from_millis(self.config.pin_ms));
        self.expanded = false;
        debug!(section = section.as_str(), top, "navigation jump");
        Some(HostEffect::ScrollTo { top, smooth: true })
    }

    /// Write navigation state for the given active section.
    pub fn view(&self, frame: &mut Frame, active: SectionId) {
        let desktop = self.layout == NavLayout::Desktop;
        frame
            .node(ids::DESKTOP)
            .style("display", if desktop { "flex" } else { "none" });
        frame
            .node(ids::MOBILE)
            .style("display", if desktop { "none" } else { "block" });

        for category in Category::ALL {
            let is_active = active == category.section();
            frame
                .node(ids::rail_button(category))
                .class_if("active", is_active)
                .attr("aria-current", if is_active { "true" } else { "false" });
            frame
                .node(ids::grid_button(category))
                .class_if("active", is_active);
        }

        let current = active.category();
        let width = format!("{}%", fmt_decimal(progress_percent(active)));
        frame
            .node(ids::PILL)
            .class_if("hidden", self.expanded);
        frame
            .node(ids::PILL_KEY)
            .text(current.map_or("9", Category::key));
        frame
            .node(ids::PILL_SUFFIX)
            .text(current.map_or("3D", Category::nav_suffix));
        frame.node(ids::PILL_BAR).style("width", width.clone());

        frame.node(ids::EXPANDED).class_if("open", self.expanded);
        frame.node(ids::BACKDROP).class_if("open", self.expanded);
        frame
            .node(ids::PROGRESS_COUNT)
            .text(format!("{} / {}", progress_position(active), Category::ALL.len()));
        frame.node(ids::PROGRESS_BAR).style("width", width);
    }
}

/// 1-based position of the active category, 0 for the hero.
#[must_use]
pub fn progress_position(active: SectionId) -> usize {
    active.category().map_or(0, |c| c.index() + 1)
}

/// Share of categories passed, in percent.
#[must_use]
pub fn progress_percent(active: SectionId) -> f64 {
    progress_position(active) as f64 / Category::ALL.len() as f64 * 100.0
}

/// Format a number with at most two decimals and no trailing zeros.
pub(crate) fn fmt_decimal(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StaticLayout;
    use crate::scroll_spy::ScrollSpyConfig;
    use kp_runtime::Observable;

    fn tracker() -> ActiveSectionTracker {
        ActiveSectionTracker::new(Observable::new(SectionId::Hero), ScrollSpyConfig::default())
    }

    #[test]
    fn layout_switches_at_breakpoint() {
        let mut nav = Navigation::new(NavigationConfig::default(), 1023.0);
        assert_eq!(nav.layout(), NavLayout::Mobile);
        nav.expand();
        assert!(nav.is_expanded());
        nav.resize(1024.0);
        assert_eq!(nav.layout(), NavLayout::Desktop);
        assert!(!nav.is_expanded());
        nav.expand();
        assert!(!nav.is_expanded(), "desktop has no expanded grid");
    }

    #[test]
    fn progress_counts_categories() {
        assert_eq!(progress_percent(SectionId::Hero), 0.0);
        assert_eq!(progress_position(Category::Cm9.section()), 1);
        assert!((progress_percent(Category::Cm60.section()) - 100.0).abs() < 1e-9);
        assert_eq!(fmt_decimal(progress_percent(Category::Cm12.section())), "22.22");
        assert_eq!(fmt_decimal(100.0), "100");
    }

    #[test]
    fn select_scrolls_above_section_and_pins_tracker() {
        let mut nav = Navigation::new(NavigationConfig::default(), 600.0);
        nav.expand();
        let mut t = tracker();
        let layout = StaticLayout::stacked(600.0, 800.0, 900.0, 700.0);
        let effect = nav.select(Category::Cm12.section(), Duration::ZERO, &mut t, &layout);
        assert_eq!(
            effect,
            Some(HostEffect::ScrollTo {
                top: 1600.0 - 80.0,
                smooth: true
            })
        );
        assert_eq!(t.active(), Category::Cm12.section());
        assert!(t.is_pinned());
        assert!(!nav.is_expanded());
    }

    #[test]
    fn select_hero_clamps_to_zero_and_missing_is_noop() {
        let mut nav = Navigation::new(NavigationConfig::default(), 1280.0);
        let mut t = tracker();
        let mut layout = StaticLayout::stacked(1280.0, 800.0, 900.0, 700.0);
        assert_eq!(
            nav.select(SectionId::Hero, Duration::ZERO, &mut t, &layout),
            Some(HostEffect::ScrollTo {
                top: 0.0,
                smooth: true
            })
        );
        layout.remove_section(Category::Cm40.section());
        assert_eq!(
            nav.select(Category::Cm40.section(), Duration::ZERO, &mut t, &layout),
            None
        );
        assert_eq!(t.active(), SectionId::Hero);
    }

    #[test]
    fn view_highlights_active_and_fills_pill() {
        let nav = Navigation::new(NavigationConfig::default(), 400.0);
        let mut frame = Frame::new();
        nav.view(&mut frame, Category::Cm40.section());
        assert!(frame.has_class(&ids::rail_button(Category::Cm40), "active"));
        assert!(!frame.has_class(&ids::rail_button(Category::Cm9), "active"));
        assert_eq!(frame.text(ids::PILL_KEY), Some("40"));
        assert_eq!(frame.text(ids::PILL_SUFFIX), Some("DekorPlast"));
        assert_eq!(frame.text(ids::PROGRESS_COUNT), Some("8 / 9"));
        assert_eq!(frame.style(ids::DESKTOP, "display"), Some("none"));

        let mut frame = Frame::new();
        nav.view(&mut frame, SectionId::Hero);
        assert_eq!(frame.text(ids::PILL_KEY), Some("9"));
        assert_eq!(frame.text(ids::PILL_SUFFIX), Some("3D"));
        assert_eq!(frame.style(ids::PILL_BAR, "width"), Some("0%"));
    }
}
