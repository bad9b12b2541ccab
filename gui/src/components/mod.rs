// GUI components module
pub mod inquiry_form;
pub mod nav;
pub mod pages;
pub mod price_estimate;
pub mod recommendations;
pub mod theme_provider;
pub mod theme_toggle;
