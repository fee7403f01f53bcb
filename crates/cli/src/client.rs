//! Cliente HTTP do servidor BrisaDB (`/get`, `/set`, `/delete`, `/query`).

use std::time::Duration;

use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("endereço inválido: {0}")]
    InvalidAddress(String),
    #[error("chave não encontrada: {0}")]
    KeyNotFound(String),
    #[error("erro do servidor ({status}): {message}")]
    Server { status: StatusCode, message: String },
    #[error("falha na comunicação com o servidor: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct GetResponse {
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

pub struct Client {
    base: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(host: &str, port: u16) -> Result<Self, ClientError> {
        let raw = format!("http://{host}:{port}/");
        let base = Url::parse(&raw).map_err(|_| ClientError::InvalidAddress(raw))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .no_proxy()
            .build()?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn get(&self, key: &str) -> Result<Value, ClientError> {
        debug!("GET {key}");
        let resp = self.http.get(self.endpoint(&["get", key])).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::KeyNotFound(key.to_string()));
        }
        let body: GetResponse = check(resp).await?.json().await?;
        Ok(body.value)
    }

    pub async fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), ClientError> {
        debug!("SET {key} (ttl {ttl:?})");
        let body = json!({ "key": key, "value": value, "ttl": ttl.as_secs_f64() });
        let resp = self.http.post(self.endpoint(&["set"])).json(&body).send().await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), ClientError> {
        debug!("DELETE {key}");
        let resp = self.http.delete(self.endpoint(&["delete", key])).send().await?;
        check(resp).await?;
        Ok(())
    }

    /// Envia a consulta textual para `/query` e devolve o JSON do resultado.
    pub async fn query(&self, query: &str) -> Result<Value, ClientError> {
        debug!("consulta: {query}");
        let resp = self
            .http
            .get(self.endpoint(&["query"]))
            .query(&[("q", query)])
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Monta a URL do endpoint. Cada segmento é codificado, então chaves
    /// com `/` ou `?` chegam intactas.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Converte respostas não-2xx em `ClientError::Server`, usando o campo
/// `error` do corpo quando existir.
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => "resposta inesperada".to_string(),
    };
    debug!("erro do servidor ({status}): {message}");
    Err(ClientError::Server { status, message })
}
