//! Request/response types for the site content endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::{error::ApiError, handlers::required_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SettingRow {
    pub id: i64,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactRow {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Public landing page payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SiteData {
    pub settings: Vec<SettingRow>,
    pub contacts: Vec<ContactRow>,
    #[serde(rename = "sliderImgList")]
    pub slider_img_list: Vec<String>,
}

/// Control panel payload: the site data plus the signed-in administrator.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardData {
    pub settings: Vec<SettingRow>,
    pub contacts: Vec<ContactRow>,
    #[serde(rename = "sliderImgList")]
    pub slider_img_list: Vec<String>,
    pub login: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSiteRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub facebook: Option<String>,
    #[serde(rename = "isCalculatorVisible")]
    pub is_calculator_visible: Option<bool>,
}

/// A fully validated settings update; every field is written in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUpdate {
    pub email: String,
    pub phone: String,
    pub facebook: String,
    pub calculator_visible: bool,
}

impl SiteUpdate {
    /// Stored representation of the calculator flag.
    #[must_use]
    pub const fn calculator_visible_value(&self) -> &'static str {
        if self.calculator_visible { "true" } else { "false" }
    }
}

impl TryFrom<UpdateSiteRequest> for SiteUpdate {
    type Error = ApiError;

    fn try_from(request: UpdateSiteRequest) -> Result<Self, Self::Error> {
        let (Some(email), Some(phone), Some(facebook), Some(calculator_visible)) = (
            required_text(request.email),
            required_text(request.phone),
            required_text(request.facebook),
            request.is_calculator_visible,
        ) else {
            return Err(ApiError::validation("missing data to update"));
        };

        Ok(Self {
            email,
            phone,
            facebook,
            calculator_visible,
        })
    }
}
