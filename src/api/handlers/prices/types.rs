//! Request/response types for the price list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::{error::ApiError, handlers::required_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceList {
    #[serde(rename = "ceilingMaterials")]
    pub ceiling_materials: Vec<PriceItem>,
    pub services: Vec<PriceItem>,
}

/// Body of the create and update requests; `id` is only read on update.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PriceRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeletePriceRequest {
    pub id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

/// Validated catalog row contents.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceFields {
    pub name: String,
    pub price: f64,
    pub description: String,
}

impl PriceRequest {
    /// Validate the row contents, leaving `id` to the caller.
    ///
    /// # Errors
    /// Returns `ValidationError` when a field is missing, blank, or the price is
    /// negative or not finite.
    pub fn fields(self) -> Result<(Option<i64>, PriceFields), ApiError> {
        let (Some(name), Some(price), Some(description)) = (
            required_text(self.name),
            self.price,
            required_text(self.description),
        ) else {
            return Err(ApiError::validation(
                "name, price and description are required",
            ));
        };

        if !price.is_finite() || price < 0.0 {
            return Err(ApiError::validation("price must be a non-negative number"));
        }

        Ok((
            self.id,
            PriceFields {
                name,
                price,
                description,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PriceRequest {
        PriceRequest {
            id: Some(3),
            name: Some("Satin".to_string()),
            price: Some(250.0),
            description: Some("Matte satin film".to_string()),
        }
    }

    #[test]
    fn complete_request() -> Result<(), ApiError> {
        let (id, fields) = request().fields()?;
        assert_eq!(id, Some(3));
        assert_eq!(fields.name, "Satin");
        assert!((fields.price - 250.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn zero_price_is_allowed() {
        let request = PriceRequest {
            price: Some(0.0),
            ..request()
        };
        assert!(request.fields().is_ok());
    }

    #[test]
    fn invalid_requests() {
        let cases = [
            PriceRequest {
                name: None,
                ..request()
            },
            PriceRequest {
                description: Some(String::new()),
                ..request()
            },
            PriceRequest {
                price: None,
                ..request()
            },
            PriceRequest {
                price: Some(-1.0),
                ..request()
            },
            PriceRequest {
                price: Some(f64::INFINITY),
                ..request()
            },
        ];

        for case in cases {
            assert!(matches!(case.fields(), Err(ApiError::ValidationError(_))));
        }
    }

    #[test]
    fn price_list_field_names() -> serde_json::Result<()> {
        let list = PriceList {
            ceiling_materials: vec![],
            services: vec![],
        };
        let json = serde_json::to_value(&list)?;
        assert!(json.get("ceilingMaterials").is_some());
        assert!(json.get("services").is_some());
        Ok(())
    }
}
