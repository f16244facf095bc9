use axum::Json;

use super::registrations::REGISTRATION_PAGE;
use crate::api::models::landing::{LandingContent, LandingFeature};

fn feature(title: &str, description: &str) -> LandingFeature {
    LandingFeature {
        title: title.to_string(),
        description: description.to_string(),
    }
}

/// Content of the public landing page
#[utoipa::path(
    get,
    path = "/api/landing",
    tag = "landing",
    responses(
        (status = 200, description = "Landing page content", body = LandingContent),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_landing() -> Json<LandingContent> {
    Json(LandingContent {
        title: "Pesquisa Tutores & Pets".to_string(),
        subtitle: "Conte como é a rotina de cuidados com os seus animais. Leva cerca de dois minutos.".to_string(),
        features: vec![
            feature("Rápido", "Doze perguntas curtas, a maioria de múltipla escolha."),
            feature("Sem custo", "Participar é gratuito. No final há uma doação opcional para ONGs de proteção animal."),
            feature("Seus dados", "Usamos seus contatos apenas para falar sobre esta pesquisa."),
        ],
        cta_label: "Quero participar".to_string(),
        cta_target: REGISTRATION_PAGE.to_string(),
        disclaimer: "Iniciativa independente, sem vínculo com qualquer órgão de governo.".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_test_app;
    use serde_json::Value;

    #[tokio::test]
    async fn test_landing_points_at_registration() {
        let (server, _store) = create_test_app().await;

        let response = server.get("/api/landing").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["cta_target"], "/cadastro");
        assert_eq!(body["features"].as_array().unwrap().len(), 3);
    }
}
