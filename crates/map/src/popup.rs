//! Marker popups rendered through handlebars.
//!
//! Every interpolated value is HTML-escaped. Website links are only emitted
//! for `http` and `https` URLs.

use crate::error::Result;
use clinicfinder_search::RankedClinic;
use handlebars::Handlebars;
use serde::Serialize;

const POPUP_TEMPLATE_NAME: &str = "popup";

const POPUP_TEMPLATE: &str = r#"<div class="clinic-popup">
  <strong class="name">{{name}}</strong>{{#if verified}} <span class="verified" title="Verified">&#10003;</span>{{/if}}
  {{#if distance}}<div class="distance">{{distance}}</div>{{/if}}
  {{#if address}}<div class="address">{{address}}</div>{{/if}}
  {{#if website}}<a class="website" href="{{website}}" target="_blank" rel="noopener noreferrer">Website</a>{{/if}}
</div>"#;

/// Popup content for one clinic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub name: String,
    pub verified: bool,
    /// Only finite distances are shown
    pub distance_miles: Option<f64>,
    pub address: String,
    pub website: Option<String>,
}

impl Popup {
    pub fn from_ranked(ranked: &RankedClinic<'_>) -> Self {
        let clinic = ranked.clinic;
        Self {
            name: clinic.name.clone(),
            verified: clinic.verified,
            distance_miles: ranked.distance.is_finite().then_some(ranked.distance.miles),
            address: clinic.address.clone(),
            website: clinic.url.as_deref().and_then(safe_link),
        }
    }
}

#[derive(Serialize)]
struct PopupContext<'a> {
    name: &'a str,
    verified: bool,
    distance: Option<String>,
    address: &'a str,
    website: Option<&'a str>,
}

/// Compiled popup template.
pub struct PopupRenderer {
    registry: Handlebars<'static>,
}

impl PopupRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(POPUP_TEMPLATE_NAME, POPUP_TEMPLATE)
            .map_err(Box::new)?;
        Ok(Self { registry })
    }

    pub fn render(&self, popup: &Popup) -> Result<String> {
        let context = PopupContext {
            name: &popup.name,
            verified: popup.verified,
            distance: popup.distance_miles.map(format_miles),
            address: &popup.address,
            website: popup.website.as_deref(),
        };
        Ok(self.registry.render(POPUP_TEMPLATE_NAME, &context)?)
    }
}

/// `12.3 mi`, or `< 0.1 mi` for very close clinics.
pub fn format_miles(miles: f64) -> String {
    if miles < 0.1 {
        "< 0.1 mi".to_string()
    } else {
        format!("{miles:.1} mi")
    }
}

fn safe_link(url: &str) -> Option<String> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn popup() -> Popup {
        Popup {
            name: "Corktown Health".into(),
            verified: true,
            distance_miles: Some(3.14159),
            address: "1726 Howard St".into(),
            website: Some("https://corktownhealth.org".into()),
        }
    }

    #[test]
    fn test_renders_all_fields() {
        let html = PopupRenderer::new().unwrap().render(&popup()).unwrap();
        assert!(html.contains("Corktown Health"));
        assert!(html.contains("class=\"verified\""));
        assert!(html.contains("3.1 mi"));
        assert!(html.contains("1726 Howard St"));
        assert!(html.contains("href=\"https://corktownhealth.org\""));
    }

    #[test]
    fn test_omits_missing_fields() {
        let mut p = popup();
        p.verified = false;
        p.distance_miles = None;
        p.website = None;
        let html = PopupRenderer::new().unwrap().render(&p).unwrap();
        assert!(!html.contains("verified"));
        assert!(!html.contains("distance"));
        assert!(!html.contains("href"));
    }

    #[test]
    fn test_escapes_html() {
        let mut p = popup();
        p.name = "<script>alert(1)</script>".into();
        let html = PopupRenderer::new().unwrap().render(&p).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_safe_link() {
        assert_eq!(safe_link(" https://a.org "), Some("https://a.org".into()));
        assert_eq!(safe_link("HTTP://a.org"), Some("HTTP://a.org".into()));
        assert_eq!(safe_link("javascript:alert(1)"), None);
        assert_eq!(safe_link("a.org"), None);
    }

    #[test]
    fn test_format_miles() {
        assert_eq!(format_miles(0.05), "< 0.1 mi");
        assert_eq!(format_miles(35.46), "35.5 mi");
    }
}
