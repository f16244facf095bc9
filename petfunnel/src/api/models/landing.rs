//! Public landing page content.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LandingFeature {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LandingContent {
    pub title: String,
    pub subtitle: String,
    pub features: Vec<LandingFeature>,
    pub cta_label: String,
    /// Where the call to action leads
    pub cta_target: String,
    /// Shown in the footer
    pub disclaimer: String,
}
