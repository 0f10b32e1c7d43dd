#![forbid(unsafe_code)]

//! Static page markup.
//!
//! The page is rendered to HTML once, at mount time. Everything dynamic is
//! then driven through DOM patches against the element ids declared by the
//! widgets' `ids` modules, so this is the single place those ids meet the
//! markup. All text goes through [`html_escape`].

use kp_catalog::content::{
    BRAND, BUSINESS_HOURS, CATALOG_BADGE, COLLECTION, COPYRIGHT, CTA_LABEL, FALLBACK_MESSAGE,
    FALLBACK_RELOAD, FALLBACK_TITLE, FOOTER_COLUMNS, NAV_PROGRESS, NAV_SELECT_CATEGORY, NAV_TOP_LABEL,
    PHONE_DISPLAY, PHONE_HREF, PRODUCT_LINE, TAP_HINT,
};
use kp_catalog::{Category, SectionId, products};
use kp_widgets::{carousel, error_boundary, lightbox, navigation, scroll_to_top};

use crate::action::Action;

/// Ids of elements owned by the markup itself.
pub mod ids {
    /// Particle canvas.
    pub const CANVAS: &str = "particles";
}

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

fn action_attr(action: Action) -> String {
    format!(" data-action=\"{}\"", html_escape(&action.to_string()))
}

/// Render the complete page body: the app shell plus the fallback screen.
#[must_use]
pub fn render_page() -> String {
    let mut out = String::with_capacity(64 * 1024);
    out.push_str(&format!("<div id=\"{}\" class=\"app\">\n", error_boundary::ids::APP));
    out.push_str(&format!(
        "<canvas id=\"{}\" class=\"particles\" aria-hidden=\"true\"></canvas>\n",
        ids::CANVAS
    ));
    render_navigation(&mut out);
    out.push_str("<main>\n");
    render_hero(&mut out);
    for category in Category::ALL {
        render_section(&mut out, category);
    }
    out.push_str("</main>\n");
    render_footer(&mut out);
    render_scroll_to_top(&mut out);
    render_lightbox(&mut out);
    out.push_str("</div>\n");
    render_fallback(&mut out);
    out
}

fn render_navigation(out: &mut String) {
    out.push_str(&format!(
        "<nav id=\"{}\" class=\"nav-rail\" aria-label=\"{}\">\n",
        navigation::ids::DESKTOP,
        html_escape(NAV_SELECT_CATEGORY)
    ));
    for category in Category::ALL {
        out.push_str(&format!(
            "  <button id=\"{}\" class=\"nav-btn\" title=\"{}\"{}>{}</button>\n",
            navigation::ids::rail_button(category),
            html_escape(category.nav_label()),
            action_attr(Action::Navigate(category.section())),
            html_escape(category.key()),
        ));
    }
    out.push_str(&format!(
        "  <button id=\"{}\" class=\"nav-btn nav-top\"{}>{}</button>\n",
        navigation::ids::DESKTOP_TOP,
        action_attr(Action::Navigate(SectionId::Hero)),
        html_escape(NAV_TOP_LABEL)
    ));
    out.push_str("</nav>\n");

    out.push_str(&format!("<div id=\"{}\" class=\"nav-mobile\">\n", navigation::ids::MOBILE));
    out.push_str(&format!(
        "  <button id=\"{}\" class=\"nav-pill\"{}><span id=\"{}\">9</span><span id=\"{}\">3D</span>\
         <span class=\"nav-bar\"><span id=\"{}\"></span></span></button>\n",
        navigation::ids::PILL,
        action_attr(Action::ExpandNav),
        navigation::ids::PILL_KEY,
        navigation::ids::PILL_SUFFIX,
        navigation::ids::PILL_BAR,
    ));
    out.push_str(&format!(
        "  <div id=\"{}\" class=\"nav-backdrop\"{}></div>\n",
        navigation::ids::BACKDROP,
        action_attr(Action::CollapseNav)
    ));
    out.push_str(&format!(
        "  <div id=\"{}\" class=\"nav-expanded\">\n    <h3>{}</h3>\n    <div class=\"nav-grid\">\n",
        navigation::ids::EXPANDED,
        html_escape(NAV_SELECT_CATEGORY)
    ));
    for category in Category::ALL {
        out.push_str(&format!(
            "      <button id=\"{}\" class=\"nav-grid-btn\"{}><strong>{}</strong><small>{}</small></button>\n",
            navigation::ids::grid_button(category),
            action_attr(Action::Navigate(category.section())),
            html_escape(category.key()),
            html_escape(category.nav_label()),
        ));
    }
    out.push_str(&format!(
        "    </div>\n    <div class=\"nav-progress\"><span>{}</span><span id=\"{}\">0 / {}</span>\
         <span class=\"nav-bar\"><span id=\"{}\"></span></span></div>\n  </div>\n</div>\n",
        html_escape(NAV_PROGRESS),
        navigation::ids::PROGRESS_COUNT,
        Category::ALL.len(),
        navigation::ids::PROGRESS_BAR,
    ));
}

fn render_hero(out: &mut String) {
    out.push_str(&format!("<section id=\"{}\" class=\"hero\">\n", SectionId::Hero));
    out.push_str(&format!("  <h1 class=\"brand\">{}</h1>\n", html_escape(BRAND)));
    out.push_str(&format!("  <p class=\"badge\">{}</p>\n", html_escape(CATALOG_BADGE)));
    out.push_str(&format!("  <p class=\"collection\">{}</p>\n", html_escape(COLLECTION)));
    out.push_str(&format!(
        "  <button class=\"cta\"{}>{}</button>\n",
        action_attr(Action::Explore),
        html_escape(CTA_LABEL)
    ));
    out.push_str(&format!(
        "  <a class=\"phone\" href=\"{}\">{}</a>\n",
        html_escape(PHONE_HREF),
        html_escape(PHONE_DISPLAY)
    ));
    out.push_str(&format!(
        "  <button class=\"scroll-indicator\" aria-label=\"{}\"{}></button>\n",
        html_escape(CTA_LABEL),
        action_attr(Action::Explore)
    ));
    out.push_str("</section>\n");
}

fn render_section(out: &mut String, category: Category) {
    let section = category.section();
    let items = products(category);
    out.push_str(&format!("<section id=\"{section}\" class=\"catalog-section\">\n"));
    out.push_str(&format!("  <h2>{}</h2>\n", html_escape(category.title())));
    out.push_str(&format!("  <p class=\"subtitle\">{}</p>\n", html_escape(category.subtitle())));
    out.push_str(&format!("  <div class=\"carousel\"{}>\n", action_attr(Action::Carousel(category))));
    out.push_str(&format!(
        "    <div id=\"{}\" class=\"carousel-track\">\n",
        carousel::ids::track(category)
    ));
    for (i, product) in items.iter().enumerate() {
        out.push_str(&format!(
            "      <div id=\"{}\" class=\"slide\"{}>\n",
            carousel::ids::slide(product.id),
            action_attr(Action::Slide(category, i))
        ));
        out.push_str(&format!(
            "        <div id=\"{}\" class=\"skeleton\"></div>\n",
            carousel::ids::skeleton(product.id)
        ));
        out.push_str(&format!(
            "        <img id=\"{}\" data-product=\"{}\" src=\"{}\" alt=\"{}\" loading=\"lazy\" draggable=\"false\">\n",
            carousel::ids::image(product.id),
            html_escape(product.id),
            html_escape(product.image),
            html_escape(product.name),
        ));
        out.push_str(&format!(
            "        <div class=\"caption\"><span>{}</span><span class=\"code\">{}</span></div>\n",
            html_escape(product.name),
            html_escape(product.code)
        ));
        out.push_str(&format!("        <span class=\"tap-hint\">{}</span>\n      </div>\n", html_escape(TAP_HINT)));
    }
    out.push_str("    </div>\n");
    out.push_str(&format!(
        "    <button id=\"{}\" class=\"carousel-prev\" aria-label=\"prev\"{}></button>\n",
        carousel::ids::prev_button(category),
        action_attr(Action::CarouselPrev(category))
    ));
    out.push_str(&format!(
        "    <button id=\"{}\" class=\"carousel-next\" aria-label=\"next\"{}></button>\n",
        carousel::ids::next_button(category),
        action_attr(Action::CarouselNext(category))
    ));
    out.push_str("    <div class=\"pagination\">");
    for i in 0..items.len() {
        out.push_str(&format!(
            "<span id=\"{}\" class=\"bullet\"{}></span>",
            carousel::ids::bullet(category, i),
            action_attr(Action::Bullet(category, i))
        ));
    }
    out.push_str("</div>\n  </div>\n</section>\n");
}

fn render_footer(out: &mut String) {
    out.push_str("<footer class=\"footer\">\n");
    out.push_str(&format!(
        "  <div class=\"footer-brand\"><strong>{}</strong><p>{}</p></div>\n",
        html_escape(BRAND),
        html_escape(PRODUCT_LINE)
    ));
    for column in FOOTER_COLUMNS {
        out.push_str(&format!("  <div class=\"footer-column\"><h4>{}</h4>", html_escape(column.heading)));
        for line in column.lines {
            out.push_str(&format!("<p>{}</p>", html_escape(line)));
        }
        out.push_str("</div>\n");
    }
    out.push_str(&format!(
        "  <p class=\"hours\">{}</p>\n  <p class=\"copyright\">{}</p>\n</footer>\n",
        html_escape(BUSINESS_HOURS),
        html_escape(COPYRIGHT)
    ));
}

fn render_scroll_to_top(out: &mut String) {
    out.push_str(&format!(
        "<button id=\"{}\" class=\"scroll-top\" aria-hidden=\"true\"{}>\
         <svg viewBox=\"0 0 48 48\"><circle id=\"{}\" cx=\"24\" cy=\"24\" r=\"20\" fill=\"none\"></circle></svg>\
         </button>\n",
        scroll_to_top::ids::BUTTON,
        action_attr(Action::ScrollTop),
        scroll_to_top::ids::RING
    ));
}

fn render_lightbox(out: &mut String) {
    out.push_str(&format!(
        "<div id=\"{}\" class=\"lightbox\" aria-hidden=\"true\" style=\"display:none\">\n",
        lightbox::ids::ROOT
    ));
    out.push_str(&format!("  <div class=\"lightbox-backdrop\"{}></div>\n", action_attr(Action::LightboxClose)));
    out.push_str(&format!(
        "  <div class=\"lightbox-stage\"{}><img id=\"{}\" alt=\"\" draggable=\"false\"></div>\n",
        action_attr(Action::LightboxStage),
        lightbox::ids::IMAGE
    ));
    for (class, action, id) in [
        ("lightbox-close", Action::LightboxClose, None),
        ("lightbox-prev", Action::LightboxPrev, None),
        ("lightbox-next", Action::LightboxNext, None),
        ("lightbox-zoom-in", Action::LightboxZoomIn, Some(lightbox::ids::ZOOM_IN)),
        ("lightbox-zoom-out", Action::LightboxZoomOut, Some(lightbox::ids::ZOOM_OUT)),
    ] {
        let id = id.map(|id| format!(" id=\"{id}\"")).unwrap_or_default();
        out.push_str(&format!("  <button{id} class=\"{class}\"{}></button>\n", action_attr(action)));
    }
    out.push_str(&format!(
        "  <div class=\"lightbox-info\"><span id=\"{}\"></span><span id=\"{}\"></span><span id=\"{}\"></span></div>\n</div>\n",
        lightbox::ids::CAPTION,
        lightbox::ids::CODE,
        lightbox::ids::COUNTER
    ));
}

fn render_fallback(out: &mut String) {
    out.push_str(&format!(
        "<div id=\"{}\" class=\"error-fallback\" style=\"display:none\">\n",
        error_boundary::ids::FALLBACK
    ));
    out.push_str(&format!("  <h2>{}</h2>\n", html_escape(FALLBACK_TITLE)));
    out.push_str(&format!("  <p>{}</p>\n", html_escape(FALLBACK_MESSAGE)));
    out.push_str(&format!("  <pre id=\"{}\"></pre>\n", error_boundary::ids::DETAIL));
    out.push_str(&format!(
        "  <button class=\"reload\"{}>{}</button>\n</div>\n",
        action_attr(Action::Reload),
        html_escape(FALLBACK_RELOAD)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use kp_catalog::product_count;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn every_section_is_rendered_once() {
        let html = render_page();
        for section in SectionId::ALL {
            assert_eq!(count(&html, &format!("<section id=\"{section}\"")), 1, "{section}");
        }
    }

    #[test]
    fn every_product_has_slide_image_and_bullet() {
        let html = render_page();
        assert_eq!(count(&html, "class=\"slide\""), product_count());
        assert_eq!(count(&html, "class=\"bullet\""), product_count());
        assert!(html.contains("id=\"img-x12-4\""));
        assert!(html.contains("data-action=\"slide:section-60:0\""));
    }

    #[test]
    fn text_is_escaped() {
        let html = render_page();
        assert!(html.contains("Katalogni ko&#x27;rish"));
        assert!(!html.contains("ko'rish"));
    }

    #[test]
    fn widget_ids_are_present() {
        let html = render_page();
        for id in [
            lightbox::ids::ROOT,
            lightbox::ids::COUNTER,
            scroll_to_top::ids::RING,
            navigation::ids::PILL_BAR,
            error_boundary::ids::FALLBACK,
            error_boundary::ids::DETAIL,
            ids::CANVAS,
        ] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
        for category in Category::ALL {
            assert!(html.contains(&format!("id=\"{}\"", navigation::ids::rail_button(category))));
            assert!(html.contains(&format!("id=\"{}\"", carousel::ids::track(category))));
        }
    }

    #[test]
    fn fallback_sits_outside_the_app_shell() {
        let html = render_page();
        let app_end = html.rfind("</div>\n<div id=\"error-fallback\"").expect("fallback after app");
        assert!(app_end > html.find("id=\"lightbox\"").expect("lightbox"));
    }
}
