#![forbid(unsafe_code)]

//! The `data-action` vocabulary.
//!
//! Every interactive element in the page markup carries a `data-action`
//! attribute. The host forwards it verbatim with clicks and pointer events;
//! this module turns it back into a typed [`Action`]. The markup renders
//! actions through [`Action`]'s `Display`, so both directions share one
//! grammar:
//!
//! ```text
//! nav:<section>              jump to a section (hero included)
//! nav-expand | nav-collapse  mobile grid open / backdrop close
//! explore                    hero call-to-action and scroll indicator
//! scroll-top                 floating scroll-to-top button
//! carousel:<section>         carousel surface (hover, drag)
//! carousel-prev:<section>    carousel arrows
//! carousel-next:<section>
//! bullet:<section>:<i>       pagination bullet
//! slide:<section>:<i>        slide (drag start, click-to-open)
//! lightbox-*                 close, prev, next, zoom-in, zoom-out, stage
//! reload                     fallback reload button
//! ```

use std::fmt;
use std::str::FromStr;

use kp_catalog::{Category, ParseSectionError, SectionId};
use thiserror::Error;

/// Errors from parsing a `data-action` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("empty action")]
    Empty,
    #[error("unknown action: {0:?}")]
    Unknown(String),
    #[error(transparent)]
    Section(#[from] ParseSectionError),
    #[error("section {0:?} has no carousel")]
    NoCarousel(String),
    #[error("bad slide index in {0:?}")]
    BadIndex(String),
}

/// A typed `data-action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Navigate(SectionId),
    ExpandNav,
    CollapseNav,
    Explore,
    ScrollTop,
    Carousel(Category),
    CarouselPrev(Category),
    CarouselNext(Category),
    Bullet(Category, usize),
    Slide(Category, usize),
    LightboxClose,
    LightboxPrev,
    LightboxNext,
    LightboxZoomIn,
    LightboxZoomOut,
    /// The lightbox image area (pull-to-close surface).
    LightboxStage,
    Reload,
}

impl Action {
    /// The carousel this action targets, if any.
    #[must_use]
    pub const fn carousel(self) -> Option<Category> {
        match self {
            Action::Carousel(c)
            | Action::CarouselPrev(c)
            | Action::CarouselNext(c)
            | Action::Bullet(c, _)
            | Action::Slide(c, _) => Some(c),
            _ => None,
        }
    }
}

fn carousel_section(raw: &str, value: &str) -> Result<Category, ActionParseError> {
    let section: SectionId = value.parse()?;
    section
        .category()
        .ok_or_else(|| ActionParseError::NoCarousel(raw.to_owned()))
}

fn indexed(raw: &str, rest: &str) -> Result<(Category, usize), ActionParseError> {
    let (section, index) = rest
        .rsplit_once(':')
        .ok_or_else(|| ActionParseError::BadIndex(raw.to_owned()))?;
    let index = index
        .parse()
        .map_err(|_| ActionParseError::BadIndex(raw.to_owned()))?;
    Ok((carousel_section(raw, section)?, index))
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ActionParseError::Empty);
        }
        let action = match raw {
            "nav-expand" => Action::ExpandNav,
            "nav-collapse" => Action::CollapseNav,
            "explore" => Action::Explore,
            "scroll-top" => Action::ScrollTop,
            "lightbox-close" => Action::LightboxClose,
            "lightbox-prev" => Action::LightboxPrev,
            "lightbox-next" => Action::LightboxNext,
            "lightbox-zoom-in" => Action::LightboxZoomIn,
            "lightbox-zoom-out" => Action::LightboxZoomOut,
            "lightbox-stage" => Action::LightboxStage,
            "reload" => Action::Reload,
            _ => {
                let (verb, rest) = raw
                    .split_once(':')
                    .ok_or_else(|| ActionParseError::Unknown(raw.to_owned()))?;
                match verb {
                    "nav" => Action::Navigate(rest.parse()?),
                    "carousel" => Action::Carousel(carousel_section(raw, rest)?),
                    "carousel-prev" => Action::CarouselPrev(carousel_section(raw, rest)?),
                    "carousel-next" => Action::CarouselNext(carousel_section(raw, rest)?),
                    "bullet" => {
                        let (c, i) = indexed(raw, rest)?;
                        Action::Bullet(c, i)
                    }
                    "slide" => {
                        let (c, i) = indexed(raw, rest)?;
                        Action::Slide(c, i)
                    }
                    _ => return Err(ActionParseError::Unknown(raw.to_owned())),
                }
            }
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Navigate(s) => write!(f, "nav:{s}"),
            Action::ExpandNav => f.write_str("nav-expand"),
            Action::CollapseNav => f.write_str("nav-collapse"),
            Action::Explore => f.write_str("explore"),
            Action::ScrollTop => f.write_str("scroll-top"),
            Action::Carousel(c) => write!(f, "carousel:{}", c.section()),
            Action::CarouselPrev(c) => write!(f, "carousel-prev:{}", c.section()),
            Action::CarouselNext(c) => write!(f, "carousel-next:{}", c.section()),
            Action::Bullet(c, i) => write!(f, "bullet:{}:{i}", c.section()),
            Action::Slide(c, i) => write!(f, "slide:{}:{i}", c.section()),
            Action::LightboxClose => f.write_str("lightbox-close"),
            Action::LightboxPrev => f.write_str("lightbox-prev"),
            Action::LightboxNext => f.write_str("lightbox-next"),
            Action::LightboxZoomIn => f.write_str("lightbox-zoom-in"),
            Action::LightboxZoomOut => f.write_str("lightbox-zoom-out"),
            Action::LightboxStage => f.write_str("lightbox-stage"),
            Action::Reload => f.write_str("reload"),
        }
    }
}
