//! Shared UI crate for Sheetsense. Cross-platform logic and views live here.

pub mod analysis;
pub mod core;
pub mod views;

pub mod components {
    // Application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
