//! Saved diets: the `dietas` table and its two backends.
//!
//! [`PostgrestDietStore`] talks to a Supabase project over PostgREST.
//! [`InMemoryDietStore`] keeps rows in process and backs the server when no
//! Supabase project is configured.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::types::MealSlot;

const TABLE: &str = "dietas";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("diet not found: {0}")]
    NotFound(String),
}

/// A meal row inside `comidas`: the recipe plus its day and slot tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DietMeal {
    #[serde(flatten)]
    pub meal: MealSlot,
    pub tipo: String,
    pub dia: String,
    #[serde(rename = "diaNumero")]
    pub dia_numero: u8,
}

/// Insert payload for `dietas`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewDiet {
    #[serde(rename = "paciente_id")]
    pub patient_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha_inicio")]
    pub start_date: NaiveDate,
    #[serde(rename = "fecha_fin", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "calorias")]
    pub calories: u32,
    #[serde(rename = "comidas", default)]
    pub meals: Vec<DietMeal>,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredDiet {
    pub id: String,
    #[serde(flatten)]
    pub diet: NewDiet,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait DietStore: Send + Sync + 'static {
    async fn create(&self, diet: NewDiet) -> Result<StoredDiet, StoreError>;

    /// Diets for one patient, newest `fecha_inicio` first.
    async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<StoredDiet>, StoreError>;

    async fn delete(&self, diet_id: &str) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct InMemoryDietStore {
    rows: Mutex<HashMap<String, StoredDiet>>,
}

impl InMemoryDietStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DietStore for InMemoryDietStore {
    async fn create(&self, diet: NewDiet) -> Result<StoredDiet, StoreError> {
        let stored = StoredDiet {
            id: Uuid::new_v4().to_string(),
            diet,
            created_at: Utc::now(),
        };
        self.rows
            .lock()
            .await
            .insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<StoredDiet>, StoreError> {
        let rows = self.rows.lock().await;
        let mut out: Vec<StoredDiet> = rows
            .values()
            .filter(|d| d.diet.patient_id == patient_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.diet
                .start_date
                .cmp(&a.diet.start_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(out)
    }

    async fn delete(&self, diet_id: &str) -> Result<(), StoreError> {
        self.rows
            .lock()
            .await
            .remove(diet_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(diet_id.to_string()))
    }
}

/// PostgREST-backed store for `{base}/rest/v1/dietas`.
#[derive(Clone)]
pub struct PostgrestDietStore {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl PostgrestDietStore {
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url)
    }

    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let key = self.api_key.expose_secret();
        let invalid = |_| StoreError::Status {
            status: 0,
            message: "store key is not a valid header value".into(),
        };
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %message, "store request failed");
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DietStore for PostgrestDietStore {
    async fn create(&self, diet: NewDiet) -> Result<StoredDiet, StoreError> {
        let resp = self
            .client
            .post(self.table_url())
            .headers(self.headers()?)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .json(&diet)
            .send()
            .await?;
        let rows: Vec<StoredDiet> = Self::check(resp).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| StoreError::Status {
            status: 201,
            message: "insert returned no rows".into(),
        })
    }

    async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<StoredDiet>, StoreError> {
        let resp = self
            .client
            .get(self.table_url())
            .headers(self.headers()?)
            .query(&[
                ("select", "*".to_string()),
                ("paciente_id", format!("eq.{patient_id}")),
                ("order", "fecha_inicio.desc".to_string()),
            ])
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn delete(&self, diet_id: &str) -> Result<(), StoreError> {
        let resp = self
            .client
            .delete(self.table_url())
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{diet_id}"))])
            .send()
            .await?;
        let removed: Vec<serde_json::Value> = Self::check(resp).await?.json().await?;
        if removed.is_empty() {
            return Err(StoreError::NotFound(diet_id.to_string()));
        }
        Ok(())
    }
}
