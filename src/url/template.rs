use crate::UrlError;
use url::Url;

/// Placeholder replaced by the profile identifier
pub const ID_PLACEHOLDER: &str = "{id}";

/// A validated profile URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUrlTemplate {
    template: String,
}

impl ProfileUrlTemplate {
    /// Parses and validates a template
    ///
    /// The template must contain the `{id}` placeholder and must render to an
    /// absolute HTTP(S) URL.
    ///
    /// # Arguments
    ///
    /// * `template` - The template string
    ///
    /// # Returns
    ///
    /// * `Ok(ProfileUrlTemplate)` - A usable template
    /// * `Err(UrlError)` - Missing placeholder, unparsable URL or wrong scheme
    ///
    /// # Examples
    ///
    /// ```
    /// use swimmer_crawler::url::ProfileUrlTemplate;
    ///
    /// let template = ProfileUrlTemplate::parse("https://lpin.ro/sportivi/detalii/{id}").unwrap();
    /// assert_eq!(template.render(17), "https://lpin.ro/sportivi/detalii/17");
    /// ```
    pub fn parse(template: &str) -> Result<Self, UrlError> {
        if !template.contains(ID_PLACEHOLDER) {
            return Err(UrlError::MissingPlaceholder(template.to_string()));
        }

        let sample = template.replace(ID_PLACEHOLDER, "0");
        let url = Url::parse(&sample).map_err(|e| UrlError::Parse(format!("{}: {}", template, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        Ok(Self {
            template: template.to_string(),
        })
    }

    /// Renders the URL for one identifier
    pub fn render(&self, id: u64) -> String {
        self.template.replace(ID_PLACEHOLDER, &id.to_string())
    }

    /// Returns the raw template string
    pub fn as_str(&self) -> &str {
        &self.template
    }
}
