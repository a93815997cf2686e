//! Test fixtures and data factories for employee tests

#![allow(dead_code)]

use serde_json::{json, Value};

/// Employee payloads used across tests
pub struct TestEmployee;

impl TestEmployee {
    /// The canonical example: Ana, RH analyst
    pub fn ana() -> Value {
        json!({
            "name": "Ana",
            "address": "Rua A",
            "department": "RH",
            "jobTitle": "Analista",
            "salary": 3000
        })
    }

    pub fn bruno() -> Value {
        json!({
            "name": "Bruno",
            "address": "Av. Paulista 1000",
            "department": "Financeiro",
            "jobTitle": "Contador",
            "salary": 5200.5
        })
    }

    pub fn carla() -> Value {
        json!({
            "name": "Carla",
            "address": "Rua das Flores 12",
            "department": "TI",
            "jobTitle": "Desenvolvedora",
            "salary": 7000
        })
    }

    /// Update payload that changes every field of `ana()`
    pub fn ana_moved() -> Value {
        json!({
            "name": "Ana Souza",
            "address": "Rua B, 45",
            "department": "TI",
            "jobTitle": "Coordenadora",
            "salary": 8000
        })
    }
}
