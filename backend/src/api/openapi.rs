//! OpenAPI specification generated from handler annotations via utoipa.

use utoipa::OpenApi;

/// Top-level OpenAPI document. Handler modules contribute their own
/// `#[derive(OpenApi)]` structs, merged in [`build_openapi`].
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Registry API",
        description = "Employee records with an append-only audit table.",
        version = "0.1.0",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    components(schemas(ErrorResponse))
)]
pub struct ApiDoc;

/// Standard error response body returned by all endpoints on failure.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "NOT_FOUND", "PERSISTENCE_ERROR")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Build the merged OpenAPI document from all handler modules.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(super::handlers::employees::EmployeesApiDoc::openapi());
    doc.merge(super::handlers::health::HealthApiDoc::openapi());
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_is_valid() {
        let spec = build_openapi();
        assert_eq!(spec.info.title, "Employee Registry API");

        let paths: Vec<&str> = spec.paths.paths.keys().map(String::as_str).collect();
        for expected in ["/api/v1/employees", "/api/v1/employees/{id}", "/health", "/ready"] {
            assert!(paths.contains(&expected), "Missing path {expected}, got {paths:?}");
        }

        let schemas = &spec.components.as_ref().unwrap().schemas;
        for expected in ["Employee", "EmployeeRequest", "ErrorResponse", "HealthResponse"] {
            assert!(schemas.contains_key(expected), "Missing schema {expected}");
        }

        let json = serde_json::to_string(&spec).expect("Spec should serialize to JSON");
        assert!(json.contains("jobTitle"));
    }

    #[test]
    fn test_employee_item_path_has_all_methods() {
        let spec = build_openapi();
        let item = &spec.paths.paths["/api/v1/employees/{id}"];
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());

        let collection = &spec.paths.paths["/api/v1/employees"];
        assert!(collection.post.is_some());
    }
}
