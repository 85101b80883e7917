// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Object storage for progress photos.
//!
//! Production talks to Cloudflare R2 through its S3-compatible API with
//! SigV4-signed requests. Without credentials the store is unconfigured and
//! uploads are recorded under a local placeholder path instead.

use crate::config::R2Config;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const KEY_PREFIX: &str = "photos";
const REGION: &str = "auto";
const SERVICE: &str = "s3";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Photo storage backend shared through `AppState`.
#[derive(Clone)]
pub enum ObjectStore {
    R2(R2Store),
    /// Process-local store used by tests and the memory database backend.
    Memory(MemoryStore),
    /// No credentials: files are not stored, only their metadata.
    Unconfigured,
}

impl ObjectStore {
    pub fn from_config(r2: Option<&R2Config>) -> Self {
        match r2 {
            Some(cfg) => {
                tracing::info!(bucket = %cfg.bucket, "R2 photo storage configured");
                ObjectStore::R2(R2Store::new(cfg.clone()))
            }
            None => {
                tracing::warn!("R2 credentials not configured; photos get placeholder URLs");
                ObjectStore::Unconfigured
            }
        }
    }

    pub fn memory() -> Self {
        ObjectStore::Memory(MemoryStore::default())
    }

    /// Store `bytes` under a fresh key derived from a UUID and the upload time.
    /// Only the extension of `file_name` is kept.
    pub async fn put(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        match self {
            ObjectStore::R2(r2) => {
                let key = object_key(file_name, Uuid::new_v4(), Utc::now());
                r2.put(&key, bytes, content_type).await?;
                Ok(StoredObject {
                    url: r2.url_for(&key),
                    key,
                })
            }
            ObjectStore::Memory(mem) => {
                let key = object_key(file_name, Uuid::new_v4(), Utc::now());
                mem.objects.insert(key.clone(), bytes);
                Ok(StoredObject {
                    url: format!("memory://{}", key),
                    key,
                })
            }
            ObjectStore::Unconfigured => Ok(StoredObject {
                key: String::new(),
                url: format!("/uploads/{}", file_name),
            }),
        }
    }

    /// Delete the object a stored URL points at.
    pub async fn delete(&self, url: &str) -> Result<(), AppError> {
        let Some(key) = key_from_url(url) else {
            return Ok(());
        };
        match self {
            ObjectStore::R2(r2) => r2.delete(&key).await,
            ObjectStore::Memory(mem) => {
                mem.objects.remove(&key);
                Ok(())
            }
            ObjectStore::Unconfigured => Ok(()),
        }
    }
}

/// `photos/{uuid}_{unix}{.ext}`; the extension is lowercased and must be short
/// and alphanumeric, otherwise it is dropped.
pub fn object_key(file_name: &str, id: Uuid, now: DateTime<Utc>) -> String {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("{}/{}_{}{}", KEY_PREFIX, id, now.timestamp(), ext)
}

/// Recover the object key from a URL produced by [`ObjectStore::put`].
pub fn key_from_url(url: &str) -> Option<String> {
    let name = url.trim_end_matches('/').rsplit('/').next()?;
    if name.is_empty() || url.starts_with("/uploads/") {
        return None;
    }
    Some(format!("{}/{}", KEY_PREFIX, name))
}

/// In-memory object map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    objects: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Cloudflare R2 client (S3 API, path-style addressing).
#[derive(Clone)]
pub struct R2Store {
    http: reqwest::Client,
    endpoint: String,
    config: R2Config,
}

impl R2Store {
    pub fn new(config: R2Config) -> Self {
        let endpoint = format!("https://{}.r2.cloudflarestorage.com", config.account_id);
        Self::with_endpoint(config, endpoint)
    }

    /// Use a custom S3-compatible endpoint (e.g. a local test server).
    pub fn with_endpoint(config: R2Config, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            config,
        }
    }

    fn url_for(&self, key: &str) -> String {
        if self.config.public_url.is_empty() {
            self.object_url(key)
        } else {
            format!("{}/{}", self.config.public_url, key)
        }
    }

    fn canonical_uri(&self, key: &str) -> String {
        let mut uri = format!("/{}", urlencoding::encode(&self.config.bucket));
        for segment in key.split('/') {
            uri.push('/');
            uri.push_str(&urlencoding::encode(segment));
        }
        uri
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}{}", self.endpoint, self.canonical_uri(key))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let payload_hash = hex::encode(Sha256::digest(&bytes));
        let request = self
            .signed(reqwest::Method::PUT, key, &payload_hash, Utc::now())?
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;
        check_response(response).await
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let payload_hash = hex::encode(Sha256::digest(b""));
        let response = self
            .signed(reqwest::Method::DELETE, key, &payload_hash, Utc::now())?
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Delete request failed: {}", e)))?;
        check_response(response).await
    }

    fn signed(
        &self,
        method: reqwest::Method,
        key: &str,
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<reqwest::RequestBuilder, AppError> {
        let url = self.object_url(key);
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| AppError::Storage(format!("Invalid object URL {}: {}", url, e)))?;
        let host = match (parsed.host_str(), parsed.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => return Err(AppError::Storage(format!("Object URL has no host: {}", url))),
        };

        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let authorization = authorization_header(
            &self.config.access_key_id,
            &self.config.secret_access_key,
            method.as_str(),
            &self.canonical_uri(key),
            &host,
            payload_hash,
            now,
        )?;

        Ok(self
            .http
            .request(method, parsed)
            .header("x-amz-date", amz_date)
            .header("x-amz-content-sha256", payload_hash)
            .header(reqwest::header::AUTHORIZATION, authorization))
    }
}

async fn check_response(response: reqwest::Response) -> Result<(), AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Storage(format!(
        "Object storage returned {}: {}",
        status, body
    )))
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// SigV4 signing key for one day, region and service.
pub fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>, AppError> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), date.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, service.as_bytes())?;
    hmac(&k_service, b"aws4_request")
}

/// `Authorization` header value for a request without a query string.
pub fn authorization_header(
    access_key_id: &str,
    secret: &str,
    method: &str,
    canonical_uri: &str,
    host: &str,
    payload_hash: &str,
    now: DateTime<Utc>,
) -> Result<String, AppError> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let scope = format!("{}/{}/{}/aws4_request", date, REGION, SERVICE);

    let canonical_request = format!(
        "{method}\n{canonical_uri}\n\nhost:{host}\nx-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n\n{SIGNED_HEADERS}\n{payload_hash}"
    );
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let key = signing_key(secret, &date, REGION, SERVICE)?;
    let signature = hex::encode(hmac(&key, string_to_sign.as_bytes())?);

    Ok(format!(
        "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
        access_key_id, scope, SIGNED_HEADERS, signature
    ))
}
