//! Public business details for the marketing site.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SiteInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: String,
    pub whatsapp_url: String,
    /// reCAPTCHA site key, absent when the challenge is off.
    pub captcha_site_key: Option<String>,
}

/// GET /api/v1/site-info
pub async fn get_site_info(State(state): State<AppState>) -> Json<DataResponse<SiteInfo>> {
    let business = &state.config.business;
    Json(DataResponse {
        data: SiteInfo {
            phone: business.phone.clone(),
            email: business.email.clone(),
            address: business.address.clone(),
            hours: business.hours.clone(),
            whatsapp_url: business.whatsapp_link(),
            captcha_site_key: state.config.captcha.site_key.clone(),
        },
    })
}
