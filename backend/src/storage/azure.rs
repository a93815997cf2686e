//! Azure Table Storage backend for the audit log.
//!
//! Talks to the Table service REST API directly, signing each request with
//! SharedKeyLite.
//!
//! ## Configuration
//!
//! ```bash
//! AUDIT_BACKEND=azure_table
//! AUDIT_STORAGE_CONNECTION_STRING="DefaultEndpointsProtocol=https;AccountName=myaccount;AccountKey=base64key;EndpointSuffix=core.windows.net"
//! AUDIT_TABLE_NAME=EmployeeAuditLog
//!
//! # Local Azurite
//! AUDIT_STORAGE_CONNECTION_STRING="UseDevelopmentStorage=true"
//! ```

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Method, StatusCode};
use sha2::Sha256;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::audit_log::AuditLogEntry;
use crate::storage::AuditStore;

type HmacSha256 = Hmac<Sha256>;

const API_VERSION: &str = "2019-02-02";
const ACCEPT_NO_METADATA: &str = "application/json;odata=nometadata";

const DEV_ACCOUNT_NAME: &str = "devstoreaccount1";
const DEV_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_TABLE_ENDPOINT: &str = "http://127.0.0.1:10002/devstoreaccount1";

/// Azure Table Storage configuration
#[derive(Clone)]
pub struct AzureTableConfig {
    /// Storage account name
    pub account_name: String,
    /// Storage account access key (base64 encoded)
    pub account_key: String,
    /// Table service endpoint, e.g. `https://myaccount.table.core.windows.net`
    pub table_endpoint: String,
    /// Table holding audit entries
    pub table_name: String,
}

redacted_debug!(AzureTableConfig {
    show account_name,
    redact account_key,
    show table_endpoint,
    show table_name,
});

impl AzureTableConfig {
    /// Parse a storage account connection string.
    ///
    /// Supports `AccountName`/`AccountKey` with either an explicit
    /// `TableEndpoint` or `DefaultEndpointsProtocol` + `EndpointSuffix`, and
    /// `UseDevelopmentStorage=true` for Azurite.
    pub fn from_connection_string(connection_string: &str, table_name: &str) -> Result<Self> {
        validate_table_name(table_name)?;

        let mut account_name = None;
        let mut account_key = None;
        let mut table_endpoint = None;
        let mut protocol = "https".to_string();
        let mut suffix = "core.windows.net".to_string();
        let mut development = false;

        for part in connection_string.split(';').filter(|p| !p.trim().is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                AppError::Config(format!("Malformed connection string segment: {}", part))
            })?;
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "accountname" => account_name = Some(value),
                "accountkey" => account_key = Some(value),
                "tableendpoint" => table_endpoint = Some(value),
                "defaultendpointsprotocol" => protocol = value,
                "endpointsuffix" => suffix = value,
                "usedevelopmentstorage" => development = value.eq_ignore_ascii_case("true"),
                "sharedaccesssignature" => {
                    return Err(AppError::Config(
                        "SharedAccessSignature connection strings are not supported".to_string(),
                    ))
                }
                _ => {}
            }
        }

        if development {
            return Ok(Self {
                account_name: DEV_ACCOUNT_NAME.to_string(),
                account_key: DEV_ACCOUNT_KEY.to_string(),
                table_endpoint: table_endpoint.unwrap_or_else(|| DEV_TABLE_ENDPOINT.to_string()),
                table_name: table_name.to_string(),
            });
        }

        let account_name = account_name.ok_or_else(|| {
            AppError::Config("Connection string is missing AccountName".to_string())
        })?;
        let account_key = account_key.ok_or_else(|| {
            AppError::Config("Connection string is missing AccountKey".to_string())
        })?;
        let table_endpoint = table_endpoint
            .unwrap_or_else(|| format!("{}://{}.table.{}", protocol, account_name, suffix));

        Ok(Self {
            account_name,
            account_key,
            table_endpoint: table_endpoint.trim_end_matches('/').to_string(),
            table_name: table_name.to_string(),
        })
    }
}

/// Table names: 3-63 alphanumeric characters, starting with a letter.
pub fn validate_table_name(name: &str) -> Result<()> {
    let valid = (3..=63).contains(&name.len())
        && name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
        && !name.eq_ignore_ascii_case("tables");
    if valid {
        Ok(())
    } else {
        Err(AppError::Config(format!("Invalid audit table name: {}", name)))
    }
}

/// Quote and percent-encode a key for use inside an entity address.
fn encode_key(key: &str) -> String {
    urlencoding::encode(&key.replace('\'', "''")).into_owned()
}

/// Azure Table Storage audit store
pub struct AzureTableStore {
    config: AzureTableConfig,
    client: reqwest::Client,
    decoded_key: Vec<u8>,
    /// Path component of the endpoint (non-empty for path-style endpoints like Azurite)
    base_path: String,
}

impl AzureTableStore {
    pub fn new(config: AzureTableConfig) -> Result<Self> {
        let decoded_key = BASE64.decode(&config.account_key).map_err(|e| {
            AppError::Config(format!("Invalid storage AccountKey (not valid base64): {}", e))
        })?;

        let endpoint = reqwest::Url::parse(&config.table_endpoint).map_err(|e| {
            AppError::Config(format!(
                "Invalid table endpoint {}: {}",
                config.table_endpoint, e
            ))
        })?;
        let base_path = endpoint.path().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Storage(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            decoded_key,
            base_path,
        })
    }

    /// Resource path of an entity, relative to the endpoint.
    fn entity_path(&self, partition_key: &str, row_key: &str) -> String {
        format!(
            "{}(PartitionKey='{}',RowKey='{}')",
            self.config.table_name,
            encode_key(partition_key),
            encode_key(row_key)
        )
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.config.table_endpoint, resource)
    }

    /// SharedKeyLite authorization header for a resource at `date`.
    ///
    /// String to sign: `{x-ms-date}\n/{account}{endpoint path}/{resource}`.
    fn authorization(&self, resource: &str, date: &str) -> Result<String> {
        let canonicalized_resource =
            format!("/{}{}/{}", self.config.account_name, self.base_path, resource);
        let string_to_sign = format!("{}\n{}", date, canonicalized_resource);

        let mut mac = HmacSha256::new_from_slice(&self.decoded_key)
            .map_err(|e| AppError::Storage(format!("Failed to create HMAC: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        Ok(format!("SharedKeyLite {}:{}", self.config.account_name, signature))
    }

    fn signed_request(
        &self,
        method: Method,
        resource: &str,
        now: DateTime<Utc>,
    ) -> Result<reqwest::RequestBuilder> {
        let date_str = now.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let auth_header = self.authorization(resource, &date_str)?;

        Ok(self
            .client
            .request(method, self.url(resource))
            .header("Authorization", auth_header)
            .header("x-ms-date", &date_str)
            .header("x-ms-version", API_VERSION)
            .header("Accept", ACCEPT_NO_METADATA)
            .header("DataServiceVersion", "3.0;NetFx")
            .header("MaxDataServiceVersion", "3.0;NetFx"))
    }

    async fn create_table(&self) -> Result<()> {
        let response = self
            .signed_request(Method::POST, "Tables", Utc::now())?
            .header("Content-Type", "application/json")
            .header("Prefer", "return-no-content")
            .json(&serde_json::json!({ "TableName": self.config.table_name }))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Azure create table failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(table = %self.config.table_name, "Created audit table");
            return Ok(());
        }
        if status == StatusCode::CONFLICT {
            tracing::debug!(table = %self.config.table_name, "Audit table already exists");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Storage(format!(
            "Azure create table failed with status {}: {}",
            status, body
        )))
    }

    /// Insert-or-replace; returns the raw status so callers can react to 404.
    async fn put_entity(&self, entry: &AuditLogEntry) -> Result<StatusCode> {
        let resource = self.entity_path(&entry.partition_key, &entry.row_key);
        let response = self
            .signed_request(Method::PUT, &resource, Utc::now())?
            .header("Content-Type", "application/json")
            .json(&entry.to_table_entity())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Azure upsert failed: {}", e)))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(status);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Storage(format!(
            "Azure upsert failed with status {}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl AuditStore for AzureTableStore {
    async fn ensure_table(&self) -> Result<()> {
        self.create_table().await
    }

    async fn upsert(&self, entry: &AuditLogEntry) -> Result<()> {
        let status = self.put_entity(entry).await?;
        if status != StatusCode::NOT_FOUND {
            return Ok(());
        }

        // The table was dropped after startup: recreate it and try once more.
        tracing::warn!(
            table = %self.config.table_name,
            "Audit table missing on upsert, recreating"
        );
        self.create_table().await?;

        let status = self.put_entity(entry).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::Storage(format!(
                "Audit table {} not found after recreation",
                self.config.table_name
            )));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let resource = format!("Tables('{}')", self.config.table_name);
        let response = self
            .signed_request(Method::GET, &resource, Utc::now())?
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Azure table unreachable: {}", e)))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(AppError::Storage(format!(
                "Audit table {} does not exist",
                self.config.table_name
            ))),
            s => Err(AppError::Storage(format!("Azure table returned status {}", s))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "azure_table"
    }
}
