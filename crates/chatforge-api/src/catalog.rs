//! The fixed option catalog shown by `chatforge catalog` and `GET /catalog`.

use serde::Serialize;

use chatforge_types::chatbot::{
    DEFAULT_PRIMARY_COLOR, Feature, INDUSTRIES, Purpose, Tone, WebsiteType,
};

#[derive(Debug, Serialize)]
pub struct CatalogOption {
    pub id: String,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub website_types: Vec<CatalogOption>,
    pub purposes: Vec<CatalogOption>,
    pub tones: Vec<CatalogOption>,
    pub features: Vec<CatalogOption>,
    pub industries: Vec<&'static str>,
    pub default_primary_color: &'static str,
}

fn option(id: impl ToString, label: &'static str) -> CatalogOption {
    CatalogOption {
        id: id.to_string(),
        label,
    }
}

pub fn catalog() -> Catalog {
    Catalog {
        website_types: WebsiteType::ALL.iter().map(|v| option(v, v.label())).collect(),
        purposes: Purpose::ALL.iter().map(|v| option(v, v.label())).collect(),
        tones: Tone::ALL.iter().map(|v| option(v, v.label())).collect(),
        features: Feature::ALL.iter().map(|v| option(v.id(), v.label())).collect(),
        industries: INDUSTRIES.to_vec(),
        default_primary_color: DEFAULT_PRIMARY_COLOR,
    }
}
