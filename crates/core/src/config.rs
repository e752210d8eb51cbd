use std::time::Duration;

/// Quiet period after the last edit before a debounced save.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Interval of the fallback save of the selected page.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_millis(60_000);

pub const DEFAULT_PAGE_NAME: &str = "Home";

pub const DEFAULT_PAGE_MARKUP: &str = "<section class=\"placeholder\"><h1>Welcome</h1>\
<p>Drag blocks here to start building your page.</p></section>";

/// Settings of one editing session.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub save_debounce: Duration,
    pub autosave_interval: Duration,
    /// Base of the public URL returned by publishing, without trailing slash.
    pub public_base_url: String,
    pub default_page_name: String,
    pub default_page_markup: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            save_debounce: SAVE_DEBOUNCE,
            autosave_interval: AUTOSAVE_INTERVAL,
            public_base_url: "http://localhost:3030".to_string(),
            default_page_name: DEFAULT_PAGE_NAME.to_string(),
            default_page_markup: DEFAULT_PAGE_MARKUP.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Public URL of a published site.
    pub fn site_url(&self, public_id: &str) -> String {
        format!("{}/sites/{public_id}", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_url_joins_without_double_slash() {
        let config = EditorConfig::default().with_public_base_url("https://sites.example.com/");
        assert_eq!(
            config.site_url("abc"),
            "https://sites.example.com/sites/abc"
        );
    }
}
