//! Remote locale resources.
//!
//! Resource files can be served from any HTTP location, e.g. a raw file host
//! mirroring the `locales/` directory. Any transport error or non-2xx status
//! is returned as an error; nothing is retried.

use crate::i18n::{BundleError, LocaleRegistry, MessageBundle};
use futures::future::try_join_all;
use tracing::{debug, info};

/// Download a single resource file.
pub async fn fetch_resource(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, BundleError> {
    debug!("Fetching locale resource from {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| BundleError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BundleError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|source| BundleError::Fetch {
        url: url.to_string(),
        source,
    })?;

    Ok(bytes.to_vec())
}

/// Build a bundle from `<base_url>/active.<locale>.toml` for every registered
/// locale. All files are downloaded concurrently and the first failure wins.
pub async fn fetch_bundle(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<MessageBundle, BundleError> {
    let base = base_url.trim_end_matches('/');

    let downloads = LocaleRegistry::get().list().into_iter().map(|locale| {
        let filename = locale.resource_file;
        let url = format!("{}/{}", base, filename);
        async move { fetch_resource(client, &url).await.map(|bytes| (filename, bytes)) }
    });
    let files = try_join_all(downloads).await?;

    let mut bundle = MessageBundle::new();
    for (filename, bytes) in &files {
        bundle.load(bytes, filename)?;
    }

    info!("Loaded {} locale files from {}", files.len(), base);
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn serve(server: &MockServer, file: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/locales/{}", file)))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_resource_success() {
        let server = MockServer::start().await;
        serve(&server, "active.en.toml", 200, "required = \"x\"").await;

        let client = reqwest::Client::new();
        let url = format!("{}/locales/active.en.toml", server.uri());
        let bytes = fetch_resource(&client, &url).await.unwrap();

        assert_eq!(bytes, b"required = \"x\"");
    }

    #[tokio::test]
    async fn test_fetch_resource_non_success_status() {
        let server = MockServer::start().await;
        serve(&server, "active.en.toml", 404, "not found").await;

        let client = reqwest::Client::new();
        let url = format!("{}/locales/active.en.toml", server.uri());
        let err = fetch_resource(&client, &url).await.unwrap_err();

        assert!(matches!(err, BundleError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_bundle_loads_every_locale() {
        let server = MockServer::start().await;
        serve(&server, "active.en.toml", 200, "required = \"{field} is required\"").await;
        serve(&server, "active.es.toml", 200, "required = \"{field} es obligatorio\"").await;

        let client = reqwest::Client::new();
        let base = format!("{}/locales/", server.uri());
        let bundle = fetch_bundle(&client, &base).await.unwrap();

        assert_eq!(bundle.locales(), vec!["en", "es"]);
        assert_eq!(bundle.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_bundle_fails_if_any_locale_fails() {
        let server = MockServer::start().await;
        serve(&server, "active.en.toml", 200, "required = \"{field} is required\"").await;
        serve(&server, "active.es.toml", 500, "").await;

        let client = reqwest::Client::new();
        let base = format!("{}/locales", server.uri());
        let err = fetch_bundle(&client, &base).await.unwrap_err();

        assert!(matches!(err, BundleError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_bundle_rejects_malformed_remote_file() {
        let server = MockServer::start().await;
        serve(&server, "active.en.toml", 200, "<html>oops</html>").await;
        serve(&server, "active.es.toml", 200, "required = \"x\"").await;

        let client = reqwest::Client::new();
        let base = format!("{}/locales", server.uri());
        let err = fetch_bundle(&client, &base).await.unwrap_err();

        assert!(matches!(err, BundleError::Parse { .. }));
    }
}
