use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};

use crate::error::{AppError, Result};

/// Thin HTTP wrapper over the depot server's endpoints. All methods return
/// the server's text body; a non-success status becomes [`AppError::Server`]
/// carrying the server's reason.
pub struct DepotClient {
    base: String,
    http: Client,
}

impl DepotClient {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_owned();
        DepotClient {
            base,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn ping(&self) -> Result<String> {
        self.get("/ping").await
    }

    pub async fn list(&self) -> Result<String> {
        self.get("/list").await
    }

    pub async fn word_count(&self) -> Result<String> {
        self.get("/wc").await
    }

    pub async fn frequent_words(
        &self,
        order: &str,
        limit: Option<u64>,
    ) -> Result<String> {
        let mut request = self
            .http
            .get(self.endpoint("/fw"))
            .query(&[("order", order)]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        text_or_error(request.send().await?).await
    }

    pub async fn add(&self, paths: &[PathBuf]) -> Result<String> {
        log::debug!("Uploading {} file(s)", paths.len());
        let form = build_files_form(paths).await?;
        let response = self
            .http
            .post(self.endpoint("/add"))
            .multipart(form)
            .send()
            .await?;
        text_or_error(response).await
    }

    pub async fn remove(&self, path: &Path) -> Result<String> {
        let form = build_files_form(&[path.to_path_buf()]).await?;
        let response = self
            .http
            .delete(self.endpoint("/delete"))
            .multipart(form)
            .send()
            .await?;
        text_or_error(response).await
    }

    pub async fn update(&self, path: &Path) -> Result<String> {
        let form = build_files_form(&[path.to_path_buf()]).await?;
        let response = self
            .http
            .put(self.endpoint("/update"))
            .multipart(form)
            .send()
            .await?;
        text_or_error(response).await
    }

    async fn get(&self, path: &str) -> Result<String> {
        text_or_error(self.http.get(self.endpoint(path)).send().await?).await
    }
}

async fn text_or_error(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(AppError::Server {
            status,
            reason: body.trim_end().to_owned(),
        })
    }
}

async fn build_files_form(paths: &[PathBuf]) -> Result<Form> {
    let mut form = Form::new();
    for path in paths {
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            AppError::FileRead {
                path: path.display().to_string(),
                source,
            }
        })?;
        let part = Part::bytes(bytes).file_name(display_name(path));
        form = form.part("files", part);
    }
    Ok(form)
}

/// The name the server will store the upload under.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_doubled_slashes() {
        let client = DepotClient::new("http://localhost:2021/");
        assert_eq!(client.endpoint("/ping"), "http://localhost:2021/ping");

        let client = DepotClient::new("http://localhost:2021");
        assert_eq!(client.endpoint("/wc"), "http://localhost:2021/wc");
    }

    #[test]
    fn display_name_strips_directories() {
        assert_eq!(display_name(Path::new("dir/sub/file.txt")), "file.txt");
        assert_eq!(display_name(Path::new("file.txt")), "file.txt");
    }
}
