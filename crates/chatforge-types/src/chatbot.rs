use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Accent color used when the user has not picked one.
pub const DEFAULT_PRIMARY_COLOR: &str = "#007bff";

/// Industries offered by the wizard's industry picker.
pub const INDUSTRIES: [&str; 8] = [
    "Technology",
    "Healthcare",
    "E-commerce",
    "Education",
    "Finance",
    "Real Estate",
    "Hospitality",
    "Other",
];

/// Kind of website the chatbot will be embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebsiteType {
    Portfolio,
    Ecommerce,
    Business,
}

impl WebsiteType {
    pub const ALL: [WebsiteType; 3] = [
        WebsiteType::Portfolio,
        WebsiteType::Ecommerce,
        WebsiteType::Business,
    ];

    /// Label shown in pickers.
    pub fn label(&self) -> &'static str {
        match self {
            WebsiteType::Portfolio => "Portfolio",
            WebsiteType::Ecommerce => "E-commerce",
            WebsiteType::Business => "Business",
        }
    }
}

impl fmt::Display for WebsiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebsiteType::Portfolio => write!(f, "portfolio"),
            WebsiteType::Ecommerce => write!(f, "ecommerce"),
            WebsiteType::Business => write!(f, "business"),
        }
    }
}

impl FromStr for WebsiteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "portfolio" => Ok(WebsiteType::Portfolio),
            "ecommerce" | "e-commerce" => Ok(WebsiteType::Ecommerce),
            "business" => Ok(WebsiteType::Business),
            other => Err(format!("invalid website type: '{other}'")),
        }
    }
}

impl Default for WebsiteType {
    fn default() -> Self {
        WebsiteType::Portfolio
    }
}

/// Primary job of the chatbot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Support,
    Leads,
    Faq,
}

impl Purpose {
    pub const ALL: [Purpose; 3] = [Purpose::Support, Purpose::Leads, Purpose::Faq];

    pub fn label(&self) -> &'static str {
        match self {
            Purpose::Support => "Customer Support",
            Purpose::Leads => "Lead Generation",
            Purpose::Faq => "FAQ Assistant",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Support => write!(f, "support"),
            Purpose::Leads => write!(f, "leads"),
            Purpose::Faq => write!(f, "faq"),
        }
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "support" => Ok(Purpose::Support),
            "leads" => Ok(Purpose::Leads),
            "faq" => Ok(Purpose::Faq),
            other => Err(format!("invalid purpose: '{other}'")),
        }
    }
}

impl Default for Purpose {
    fn default() -> Self {
        Purpose::Support
    }
}

/// Communication tone of the chatbot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Friendly,
    Professional,
}

impl Tone {
    pub const ALL: [Tone; 2] = [Tone::Friendly, Tone::Professional];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Friendly => "Friendly & Casual",
            Tone::Professional => "Professional & Formal",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Friendly => write!(f, "friendly"),
            Tone::Professional => write!(f, "professional"),
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "friendly" => Ok(Tone::Friendly),
            "professional" => Ok(Tone::Professional),
            other => Err(format!("invalid tone: '{other}'")),
        }
    }
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Friendly
    }
}

/// Optional capabilities from the fixed feature catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    Appointment,
    Faq,
    LeadCapture,
    ProductInfo,
    LiveChat,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Appointment,
        Feature::Faq,
        Feature::LeadCapture,
        Feature::ProductInfo,
        Feature::LiveChat,
    ];

    /// Stable identifier used in exported configs.
    pub fn id(&self) -> &'static str {
        match self {
            Feature::Appointment => "appointment",
            Feature::Faq => "faq",
            Feature::LeadCapture => "leadCapture",
            Feature::ProductInfo => "productInfo",
            Feature::LiveChat => "liveChat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feature::Appointment => "Appointment Booking",
            Feature::Faq => "FAQ Answering",
            Feature::LeadCapture => "Lead Capture",
            Feature::ProductInfo => "Product Information",
            Feature::LiveChat => "Live Chat Handoff",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Feature {
    type Err = String;

    /// Accepts the camelCase id as well as kebab/snake spellings
    /// (`leadCapture`, `lead-capture`, `lead_capture`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "appointment" => Ok(Feature::Appointment),
            "faq" => Ok(Feature::Faq),
            "leadcapture" => Ok(Feature::LeadCapture),
            "productinfo" => Ok(Feature::ProductInfo),
            "livechat" => Ok(Feature::LiveChat),
            _ => Err(format!("invalid feature: '{s}'")),
        }
    }
}

/// Ordered set of selected features.
///
/// Keeps the order in which features were switched on and never holds the
/// same feature twice. Duplicate ids in deserialized input are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Feature>", into = "Vec<Feature>")]
pub struct FeatureSet(Vec<Feature>);

impl FeatureSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Flip membership of `feature`. Returns `true` if it is now selected.
    pub fn toggle(&mut self, feature: Feature) -> bool {
        if let Some(pos) = self.0.iter().position(|f| *f == feature) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(feature);
            true
        }
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.0.iter()
    }
}

impl From<Vec<Feature>> for FeatureSet {
    fn from(features: Vec<Feature>) -> Self {
        let mut set = FeatureSet::new();
        for feature in features {
            if !set.contains(feature) {
                set.0.push(feature);
            }
        }
        set
    }
}

impl From<FeatureSet> for Vec<Feature> {
    fn from(set: FeatureSet) -> Self {
        set.0
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        FeatureSet::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Everything the wizard collects about a chatbot.
///
/// Serialized with camelCase keys; the exported `chatbot-config.json` is
/// exactly this shape. Created with defaults at session start, edited
/// field by field, and only read by prompt construction and the embed
/// packager.
///
/// `Debug` is implemented by hand so the credential never reaches logs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatbotConfig {
    pub website_type: WebsiteType,
    pub purpose: Purpose,
    pub tone: Tone,
    pub company_name: String,
    pub chatbot_name: String,
    pub website_url: String,
    pub industry: String,
    pub primary_color: String,
    pub features: FeatureSet,
    /// Provider credential. Embedded verbatim in exported widgets.
    pub api_key: String,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            website_type: WebsiteType::default(),
            purpose: Purpose::default(),
            tone: Tone::default(),
            company_name: String::new(),
            chatbot_name: String::new(),
            website_url: String::new(),
            industry: String::new(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            features: FeatureSet::new(),
            api_key: String::new(),
        }
    }
}

impl fmt::Debug for ChatbotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatbotConfig")
            .field("website_type", &self.website_type)
            .field("purpose", &self.purpose)
            .field("tone", &self.tone)
            .field("company_name", &self.company_name)
            .field("chatbot_name", &self.chatbot_name)
            .field("website_url", &self.website_url)
            .field("industry", &self.industry)
            .field("primary_color", &self.primary_color)
            .field("features", &self.features)
            .field("api_key", &mask_credential(&self.api_key))
            .finish()
    }
}

impl ChatbotConfig {
    /// Whether a usable credential is present.
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Set one field from its string form.
    ///
    /// Field names are matched ignoring case, `_` and `-`, so both
    /// `companyName` and `company_name` work. Features are changed with
    /// [`FeatureSet::toggle`] instead.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), ConfigError> {
        let key: String = field
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "websitetype" => {
                self.website_type = value.parse().map_err(ConfigError::InvalidValue)?;
            }
            "purpose" => self.purpose = value.parse().map_err(ConfigError::InvalidValue)?,
            "tone" => self.tone = value.parse().map_err(ConfigError::InvalidValue)?,
            "companyname" => self.company_name = value.to_string(),
            "chatbotname" => self.chatbot_name = value.to_string(),
            "websiteurl" => self.website_url = value.to_string(),
            "industry" => self.industry = value.to_string(),
            "primarycolor" => {
                if !is_valid_hex_color(value) {
                    return Err(ConfigError::InvalidColor(value.to_string()));
                }
                self.primary_color = value.to_string();
            }
            "apikey" => self.api_key = value.to_string(),
            "features" => {
                return Err(ConfigError::InvalidValue(
                    "features are changed one at a time with toggle-feature".to_string(),
                ));
            }
            _ => return Err(ConfigError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

/// Whether `value` is a CSS hex color of the form `#rgb` or `#rrggbb`.
pub fn is_valid_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Mask a credential for display: `gsk_...wxyz`, or `(not set)`.
pub fn mask_credential(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChatbotConfig::default();
        assert_eq!(config.website_type, WebsiteType::Portfolio);
        assert_eq!(config.purpose, Purpose::Support);
        assert_eq!(config.tone, Tone::Friendly);
        assert_eq!(config.primary_color, "#007bff");
        assert!(config.features.is_empty());
        assert!(!config.has_credential());
    }

    #[test]
    fn test_config_json_shape() {
        let mut config = ChatbotConfig::default();
        config.features.toggle(Feature::LeadCapture);
        let json = serde_json::to_value(&config).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in [
            "websiteType",
            "purpose",
            "tone",
            "companyName",
            "chatbotName",
            "websiteUrl",
            "industry",
            "primaryColor",
            "features",
            "apiKey",
        ] {
            assert!(keys.contains(&key), "missing key {key}");
        }
        assert_eq!(json["features"], serde_json::json!(["leadCapture"]));
        assert_eq!(json["websiteType"], "portfolio");
    }

    #[test]
    fn test_config_deserialize_partial_uses_defaults() {
        let config: ChatbotConfig =
            serde_json::from_str(r#"{"companyName":"Acme","tone":"professional"}"#).unwrap();
        assert_eq!(config.company_name, "Acme");
        assert_eq!(config.tone, Tone::Professional);
        assert_eq!(config.primary_color, DEFAULT_PRIMARY_COLOR);
    }

    #[test]
    fn test_feature_toggle_is_set_like() {
        let mut set = FeatureSet::new();
        assert!(set.toggle(Feature::Faq));
        assert!(set.toggle(Feature::LiveChat));
        assert_eq!(set.len(), 2);

        // Toggling a present id removes it
        assert!(!set.toggle(Feature::Faq));
        assert!(!set.contains(Feature::Faq));
        assert_eq!(set.len(), 1);

        // And toggling it again re-adds it at the end
        assert!(set.toggle(Feature::Faq));
        let order: Vec<Feature> = set.iter().copied().collect();
        assert_eq!(order, vec![Feature::LiveChat, Feature::Faq]);
    }

    #[test]
    fn test_feature_set_deserialize_drops_duplicates() {
        let set: FeatureSet = serde_json::from_str(r#"["faq","faq","liveChat"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Feature::Faq));
        assert!(set.contains(Feature::LiveChat));
    }

    #[test]
    fn test_feature_from_str_spellings() {
        assert_eq!("leadCapture".parse::<Feature>().unwrap(), Feature::LeadCapture);
        assert_eq!("lead-capture".parse::<Feature>().unwrap(), Feature::LeadCapture);
        assert_eq!("PRODUCT_INFO".parse::<Feature>().unwrap(), Feature::ProductInfo);
        assert!("newsletter".parse::<Feature>().is_err());
    }

    #[test]
    fn test_enum_roundtrip() {
        for wt in WebsiteType::ALL {
            assert_eq!(wt.to_string().parse::<WebsiteType>().unwrap(), wt);
        }
        for p in Purpose::ALL {
            assert_eq!(p.to_string().parse::<Purpose>().unwrap(), p);
        }
        for t in Tone::ALL {
            assert_eq!(t.to_string().parse::<Tone>().unwrap(), t);
        }
        for f in Feature::ALL {
            assert_eq!(f.id().parse::<Feature>().unwrap(), f);
        }
    }

    #[test]
    fn test_set_field() {
        let mut config = ChatbotConfig::default();
        config.set_field("companyName", "Acme").unwrap();
        config.set_field("chatbot_name", "Alex").unwrap();
        config.set_field("purpose", "leads").unwrap();
        config.set_field("primary-color", "#ff0000").unwrap();
        assert_eq!(config.company_name, "Acme");
        assert_eq!(config.chatbot_name, "Alex");
        assert_eq!(config.purpose, Purpose::Leads);
        assert_eq!(config.primary_color, "#ff0000");
    }

    #[test]
    fn test_set_field_rejects_bad_input() {
        let mut config = ChatbotConfig::default();
        assert!(matches!(
            config.set_field("color", "#fff"),
            Err(ConfigError::UnknownField(_))
        ));
        assert!(matches!(
            config.set_field("tone", "sarcastic"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            config.set_field("primaryColor", "red"),
            Err(ConfigError::InvalidColor(_))
        ));
        assert_eq!(config.primary_color, DEFAULT_PRIMARY_COLOR);
    }

    #[test]
    fn test_is_valid_hex_color() {
        assert!(is_valid_hex_color("#007bff"));
        assert!(is_valid_hex_color("#FFF"));
        assert!(!is_valid_hex_color("007bff"));
        assert!(!is_valid_hex_color("#12345"));
        assert!(!is_valid_hex_color("#gggggg"));
    }

    #[test]
    fn test_debug_masks_credential() {
        let config = ChatbotConfig {
            api_key: "gsk_abcdefghijklmnop".to_string(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_abcdefghijklmnop"));
        assert!(debug.contains("gsk_...mnop"));
    }

    #[test]
    fn test_mask_credential() {
        assert_eq!(mask_credential(""), "(not set)");
        assert_eq!(mask_credential("   "), "(not set)");
        assert_eq!(mask_credential("short"), "****");
    }
}
