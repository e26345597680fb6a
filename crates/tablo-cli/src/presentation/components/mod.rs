mod browser;

pub use browser::BrowserComponent;
