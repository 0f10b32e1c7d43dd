#![forbid(unsafe_code)]

//! Layout queries.
//!
//! Widgets never read the DOM. They ask a [`LayoutProvider`] for the current
//! scroll sample and for section bounds, so the browser binding can answer
//! with `getBoundingClientRect` while tests answer from a table.

use std::collections::BTreeMap;

use kp_catalog::SectionId;
use kp_core::{Rect, ScrollSample, Size};

/// Source of live layout geometry.
pub trait LayoutProvider {
    /// Current scroll position and viewport size.
    fn scroll(&self) -> ScrollSample;

    /// Viewport-relative bounds of a section, or `None` when the section is
    /// not rendered.
    fn bounds_of(&self, section: SectionId) -> Option<Rect>;

    /// Document-relative top edge of a section (`offsetTop`).
    fn document_top_of(&self, section: SectionId) -> Option<f64> {
        let scroll_top = self.scroll().scroll_top;
        self.bounds_of(section).map(|r| r.top() + scroll_top)
    }

    /// The host reported a scroll. Providers that read geometry live ignore
    /// this; in-memory ones store it.
    fn observe_scroll(&mut self, _sample: ScrollSample) {}

    /// The host reported a viewport resize.
    fn observe_resize(&mut self, _size: Size) {}
}

impl<L: LayoutProvider + ?Sized> LayoutProvider for &L {
    fn scroll(&self) -> ScrollSample {
        (**self).scroll()
    }

    fn bounds_of(&self, section: SectionId) -> Option<Rect> {
        (**self).bounds_of(section)
    }

    fn document_top_of(&self, section: SectionId) -> Option<f64> {
        (**self).document_top_of(section)
    }
}

/// In-memory layout: sections as document-space bands plus a scroll sample.
///
/// Used by tests and by the native runner, where there is no DOM.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    scroll: ScrollSample,
    width: f64,
    /// Document-space `(top, height)` per section.
    sections: BTreeMap<SectionId, (f64, f64)>,
}

impl StaticLayout {
    /// An empty layout with the given viewport.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            scroll: ScrollSample::new(0.0, viewport_height, viewport_height),
            width: viewport_width,
            sections: BTreeMap::new(),
        }
    }

    /// Stack every section back to back, each `height` pixels tall, with the
    /// hero `hero_height` tall.
    #[must_use]
    pub fn stacked(viewport_width: f64, viewport_height: f64, hero_height: f64, height: f64) -> Self {
        let mut layout = Self::new(viewport_width, viewport_height);
        let mut top = 0.0;
        for id in SectionId::ALL {
            let h = if id.is_hero() { hero_height } else { height };
            layout.set_section(id, top, h);
            top += h;
        }
        layout
    }

    /// Place a section at a document-space band. Grows the document to fit.
    pub fn set_section(&mut self, section: SectionId, top: f64, height: f64) {
        self.sections.insert(section, (top, height));
        let bottom = top + height;
        if bottom > self.scroll.document_height {
            self.scroll.document_height = bottom;
        }
    }

    /// Remove a section, as if it were not rendered.
    pub fn remove_section(&mut self, section: SectionId) {
        self.sections.remove(&section);
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll.scroll_top = scroll_top;
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.width = width;
        self.scroll.viewport_height = height;
    }

    pub fn set_document_height(&mut self, height: f64) {
        self.scroll.document_height = height;
    }

    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        self.width
    }
}

impl LayoutProvider for StaticLayout {
    fn scroll(&self) -> ScrollSample {
        self.scroll
    }

    fn observe_scroll(&mut self, sample: ScrollSample) {
        self.scroll.scroll_top = sample.scroll_top;
        self.scroll.viewport_height = sample.viewport_height;
        if sample.document_height > 0.0 {
            self.scroll.document_height = sample.document_height;
        }
    }

    fn observe_resize(&mut self, size: Size) {
        self.set_viewport(size.width, size.height);
    }

    fn bounds_of(&self, section: SectionId) -> Option<Rect> {
        self.sections
            .get(&section)
            .map(|&(top, height)| Rect::new(0.0, top - self.scroll.scroll_top, self.width, height))
    }

    fn document_top_of(&self, section: SectionId) -> Option<f64> {
        self.sections.get(&section).map(|&(top, _)| top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kp_catalog::Category;

    #[test]
    fn bounds_are_viewport_relative() {
        let mut layout = StaticLayout::new(1200.0, 800.0);
        let s12 = Category::Cm12.section();
        layout.set_section(s12, 1000.0, 800.0);
        layout.set_scroll_top(600.0);
        assert_eq!(layout.bounds_of(s12), Some(Rect::new(0.0, 400.0, 1200.0, 800.0)));
        assert_eq!(layout.document_top_of(s12), Some(1000.0));
        assert_eq!(layout.scroll().document_height, 1800.0);
        assert_eq!(layout.bounds_of(SectionId::Hero), None);
    }

    #[test]
    fn stacked_layout_places_sections_in_order() {
        let layout = StaticLayout::stacked(1200.0, 800.0, 900.0, 700.0);
        assert_eq!(layout.document_top_of(SectionId::Hero), Some(0.0));
        assert_eq!(layout.document_top_of(Category::Cm9.section()), Some(900.0));
        assert_eq!(layout.document_top_of(Category::Cm12.section()), Some(1600.0));
        assert_eq!(layout.scroll().document_height, 900.0 + 9.0 * 700.0);
    }

    #[test]
    fn default_document_top_uses_scroll() {
        struct Fixed;
        impl LayoutProvider for Fixed {
            fn scroll(&self) -> ScrollSample {
                ScrollSample::new(250.0, 800.0, 4000.0)
            }
            fn bounds_of(&self, _: SectionId) -> Option<Rect> {
                Some(Rect::new(0.0, -50.0, 10.0, 10.0))
            }
        }
        assert_eq!(Fixed.document_top_of(SectionId::Hero), Some(200.0));
    }

    #[test]
    fn static_layout_follows_host_reports() {
        let mut layout = StaticLayout::stacked(1200.0, 800.0, 800.0, 800.0);
        layout.observe_scroll(ScrollSample::new(900.0, 700.0, 0.0));
        assert_eq!(layout.scroll(), ScrollSample::new(900.0, 700.0, 8000.0));
        layout.observe_resize(Size::new(390.0, 844.0));
        assert_eq!(layout.viewport_width(), 390.0);
        assert_eq!(layout.scroll().viewport_height, 844.0);
    }
}
