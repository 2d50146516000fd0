//! Tree building options.

/// Options for building the output tree.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Public URL prefix under which the image directory will be served
    pub base_media_url: Option<String>,

    /// URL used for images without a base URL or without an asset
    pub placeholder_url: String,

    /// Page title (defaults to the document title)
    pub title: Option<String>,

    /// Value of the image widgets' `image_size` setting
    pub image_size: String,
}

impl TreeOptions {
    /// Create new tree options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the media base URL. An empty string clears it.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_media_url = if url.trim().is_empty() {
            None
        } else {
            Some(url)
        };
        self
    }

    /// Set the placeholder image URL.
    pub fn with_placeholder(mut self, url: impl Into<String>) -> Self {
        self.placeholder_url = url.into();
        self
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the image size setting.
    pub fn with_image_size(mut self, size: impl Into<String>) -> Self {
        self.image_size = size.into();
        self
    }

    /// Public URL of a stored image file.
    ///
    /// `None` when no base URL is configured.
    pub fn media_url(&self, filename: &str) -> Option<String> {
        self.base_media_url
            .as_deref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), filename))
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            base_media_url: None,
            placeholder_url: String::new(),
            title: None,
            image_size: "full".to_string(),
        }
    }
}
