use dioxus::prelude::*;
use once_cell::sync::OnceCell;

// Navbar stylesheet, also inlined for packaged native builds.
const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Platforms register a `NavBuilder` providing fully constructed `Link`
/// elements, so this crate never needs to know each platform's `Route` enum.
///
/// Each closure receives the label text and returns a link that already
/// contains it as its child. When no builder is registered, `AppNavbar`
/// falls back to whatever raw `children` were passed.
pub struct NavBuilder {
    pub analyze: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

#[component]
pub fn AppNavbar(children: Element) -> Element {
    let internal_nav: Option<VNode> = NAV_BUILDER.get().and_then(|b| {
        let analyze = (b.analyze)("Analyze");
        rsx! {
            nav { class: "navbar__links", {analyze} }
        }
        .ok()
    });

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header {
            id: "navbar",
            class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "Sheetsense" }
                    }
                    span { class: "navbar__brand-subtitle", "Excel business intelligence" }
                }

                if let Some(nav) = internal_nav {
                    {nav}
                } else {
                    nav { class: "navbar__links", {children} }
                }
            }
        }
    }
}
