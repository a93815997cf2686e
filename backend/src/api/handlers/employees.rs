//! Employee handlers.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::extractors::{ApiJson, ApiPath};
use crate::api::middleware::tracing::CorrelationId;
use crate::api::openapi::ErrorResponse;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::employee::{Employee, EmployeeRequest};

/// Path the employee routes are nested under.
pub const EMPLOYEES_PATH: &str = "/api/v1/employees";

#[derive(OpenApi)]
#[openapi(
    paths(get_employee, create_employee, update_employee, delete_employee),
    components(schemas(Employee, EmployeeRequest)),
    tags((name = "employees", description = "Employee records"))
)]
pub struct EmployeesApiDoc;

/// Create employee routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::post(create_employee))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

fn correlation(id: &Option<Extension<CorrelationId>>) -> Option<&str> {
    id.as_ref().map(|Extension(id)| id.as_str())
}

/// Get an employee by ID
#[utoipa::path(
    get,
    path = "/{id}",
    context_path = "/api/v1/employees",
    tag = "employees",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    )
)]
pub async fn get_employee(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Employee>> {
    let employee = state.employees.get(id).await?;
    Ok(Json(employee))
}

/// Create an employee
#[utoipa::path(
    post,
    path = "",
    context_path = "/api/v1/employees",
    tag = "employees",
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = Employee,
            headers(("Location" = String, description = "URL of the new employee"))),
        (status = 400, description = "Invalid payload or write rejected", body = ErrorResponse),
        (status = 502, description = "Audit write failed (strict policy)", body = ErrorResponse)
    )
)]
pub async fn create_employee(
    State(state): State<SharedState>,
    correlation_id: Option<Extension<CorrelationId>>,
    ApiJson(payload): ApiJson<EmployeeRequest>,
) -> Result<impl IntoResponse> {
    let employee = state
        .employees
        .create(payload, correlation(&correlation_id))
        .await?;

    let location = format!("{}/{}", EMPLOYEES_PATH, employee.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(employee),
    ))
}

/// Update an employee's updatable fields
#[utoipa::path(
    put,
    path = "/{id}",
    context_path = "/api/v1/employees",
    tag = "employees",
    params(("id" = i32, Path, description = "Employee ID")),
    request_body = EmployeeRequest,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 502, description = "Audit write failed (strict policy)", body = ErrorResponse)
    )
)]
pub async fn update_employee(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i32>,
    correlation_id: Option<Extension<CorrelationId>>,
    ApiJson(payload): ApiJson<EmployeeRequest>,
) -> Result<StatusCode> {
    state
        .employees
        .update(id, payload, correlation(&correlation_id))
        .await?;
    Ok(StatusCode::OK)
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/{id}",
    context_path = "/api/v1/employees",
    tag = "employees",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 502, description = "Audit write failed (strict policy)", body = ErrorResponse)
    )
)]
pub async fn delete_employee(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i32>,
    correlation_id: Option<Extension<CorrelationId>>,
) -> Result<StatusCode> {
    state
        .employees
        .delete(id, correlation(&correlation_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
