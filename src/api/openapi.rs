use super::handlers::{
    auth::{self, require_admin},
    health, prices, site, slider,
};
use axum::middleware;
use utoipa::openapi::{
    Contact, InfoBuilder, License, OpenApiBuilder, Tag,
    security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Name of the cookie security scheme referenced by the admin routes.
const SESSION_SCHEME: &str = "userLogin";

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Routes anyone may call.
fn public_router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(health::health))
        .routes(routes!(site::site_data))
        .routes(routes!(auth::login::login))
        .routes(routes!(prices::list_prices))
}

/// Routes behind the admin session gate. The gate runs before any handler here.
fn admin_router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(site::admin_dashboard))
        .routes(routes!(site::update_site))
        .routes(routes!(
            prices::create_material,
            prices::update_material,
            prices::delete_material
        ))
        .routes(routes!(
            prices::create_service,
            prices::update_service,
            prices::delete_service
        ))
        .routes(routes!(slider::upload_slider_image))
        .routes(routes!(slider::delete_slider_image))
        .route_layer(middleware::from_fn(require_admin))
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints to [`public_router`] or [`admin_router`] via `.routes(routes!(...))`
/// so they are both served and included in the generated `OpenAPI` spec.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .merge(public_router())
        .merge(admin_router());

    let openapi = router.get_openapi_mut();
    openapi
        .components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            SESSION_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_SCHEME))),
        );

    openapi.tags = Some(vec![
        tag("site", "Public site content and the control panel"),
        tag("auth", "Administrator login"),
        tag("prices", "Material and service price lists"),
        tag("slider", "Slider image management"),
        tag("health", "Service health"),
    ]);

    router
}

fn tag(name: &str, description: &str) -> Tag {
    let mut tag = Tag::new(name);
    tag.description = Some(description.to_string());
    tag
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    OpenApiBuilder::new().info(info).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    match author.split_once('<') {
        Some((name, email)) => (
            non_empty(name.trim()),
            non_empty(email.trim_end_matches('>').trim()),
        ),
        None => (non_empty(author.trim()), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Showroom"));
            assert_eq!(contact.email.as_deref(), Some("team@showroom.dev"));
        }

        let license = spec.info.license;
        assert!(license.is_some());
        if let Some(license) = license {
            assert_eq!(license.identifier.as_deref(), Some("BSD-3-Clause"));
        }
    }

    #[test]
    fn openapi_paths() {
        let spec = openapi();
        for path in [
            "/",
            "/login",
            "/admin",
            "/admin/site",
            "/prices",
            "/prices/material",
            "/prices/service",
            "/admin/sliderImage",
            "/admin/sliderImage/{imageName}",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn openapi_declares_cookie_scheme() {
        let spec = openapi();
        let components = spec.components.unwrap_or_default();
        assert!(components.security_schemes.contains_key(SESSION_SCHEME));
    }

    #[test]
    fn parse_author_forms() {
        assert_eq!(
            parse_author("Team Showroom <team@showroom.dev>"),
            (Some("Team Showroom"), Some("team@showroom.dev"))
        );
        assert_eq!(parse_author("Solo"), (Some("Solo"), None));
        assert_eq!(parse_author("<only@mail>"), (None, Some("only@mail")));
    }
}
