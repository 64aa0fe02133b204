//! Catalog assembly across a repository's releases
//!
//! Drives the transport over the releases listing, resolves each
//! release's assets, and collects the records the mode accepts. Order
//! follows the API response; catalogs are never re-sorted.

use tracing::{debug, warn};
use updraft_core::{build_record, Asset, CatalogEntry, Mode, Release};

use crate::fetch::ReleaseClient;

/// Fetch a release's asset list
///
/// The description is returned either way; it does not depend on the
/// asset fetch succeeding.
pub async fn resolve_release<'a>(
    client: &ReleaseClient,
    release: &'a Release,
) -> (Option<Vec<Asset>>, &'a str) {
    let assets = client.fetch_json(&release.assets_url).await;
    (assets, release.description())
}

/// Assemble the catalog for one (device, mode) pair
///
/// An absent releases listing yields an empty catalog. A release whose
/// asset fetch fails contributes zero entries. An asset with a malformed
/// timestamp is skipped with a warning; the rest of the release still
/// lands in the catalog.
pub async fn assemble_catalog(
    client: &ReleaseClient,
    owner: &str,
    repo: &str,
    mode: Mode,
    device: &str,
) -> Vec<CatalogEntry> {
    let url = client.releases_url(owner, repo);
    let releases: Vec<Release> = match client.fetch_json(&url).await {
        Some(releases) => releases,
        None => return Vec::new(),
    };

    let mut catalog = Vec::new();
    for release in &releases {
        let release_name = release.display_name();
        let (assets, desc) = resolve_release(client, release).await;
        let Some(assets) = assets else {
            warn!(release = %release_name, "No asset list for release, skipping");
            continue;
        };

        for asset in &assets {
            match build_record(asset, release_name, mode, device, desc) {
                Ok(Some(entry)) => catalog.push(entry),
                Ok(None) => {}
                Err(e) => {
                    warn!(release = %release_name, asset = %asset.name, error = %e, "Skipping asset");
                }
            }
        }
    }

    debug!(
        owner = %owner,
        repo = %repo,
        mode = %mode,
        device = %device,
        entries = catalog.len(),
        "Catalog assembled"
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned responses keyed by request path until the test ends
    ///
    /// Unknown paths get a 404. Responses close the connection so the
    /// client never reuses a socket the handler already finished with.
    fn spawn_server(listener: TcpListener, routes: HashMap<String, (&'static str, String)>) {
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = [0u8; 2048];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();
                let (status, body) = routes
                    .get(&path)
                    .cloned()
                    .unwrap_or(("404 Not Found", "not found".to_string()));
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
    }

    async fn serve_routes(routes: HashMap<String, (&'static str, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        spawn_server(listener, routes);
        base
    }

    /// Serve a releases listing at `/repos/o/r/releases` plus asset
    /// listings; the releases body is built after binding so it can embed
    /// absolute asset URLs.
    async fn serve_repo(
        releases_status: &'static str,
        releases_body: impl FnOnce(&str) -> String,
        assets: Vec<(&'static str, &'static str, String)>,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let mut routes = HashMap::new();
        routes.insert(
            "/repos/o/r/releases".to_string(),
            (releases_status, releases_body(&base)),
        );
        for (path, status, body) in assets {
            routes.insert(path.to_string(), (status, body));
        }

        spawn_server(listener, routes);
        base
    }

    #[tokio::test]
    async fn test_assembles_matching_kernel_records() {
        let assets_body = json!([
            {
                "name": "devicex_kernelsu_v2.zip",
                "id": 7,
                "size": 1024,
                "updated_at": "2023-05-01T12:00:00Z",
                "browser_download_url": "http://x/y"
            },
            {
                "name": "otherdevice_v2.zip",
                "id": 8,
                "size": 2048,
                "updated_at": "2023-05-01T12:00:00Z",
                "browser_download_url": "http://x/z"
            }
        ])
        .to_string();

        let base = serve_repo(
            "200 OK",
            |base| {
                json!([
                    {"name": "v2", "body": "notes", "assets_url": format!("{base}/assets/1")}
                ])
                .to_string()
            },
            vec![("/assets/1", "200 OK", assets_body)],
        )
        .await;

        let client = ReleaseClient::new(&base).unwrap();
        let catalog = assemble_catalog(&client, "o", "r", Mode::Kernel, "devicex").await;

        assert_eq!(catalog.len(), 1);
        let entry = &catalog[0];
        assert_eq!(entry.filename, "DEVICEX_KERNELSU_V2");
        assert_eq!(entry.tag, "KernelSU");
        assert_eq!(entry.version, "v2");
        assert_eq!(entry.desc.as_deref(), Some("notes"));
        assert_eq!(entry.datetime, 1682942400.0);
    }

    #[tokio::test]
    async fn test_rate_limited_listing_yields_empty_catalog() {
        let mut routes = HashMap::new();
        routes.insert(
            "/repos/o/r/releases".to_string(),
            ("403 Forbidden", "rate limit exceeded".to_string()),
        );
        let base = serve_routes(routes).await;

        let client = ReleaseClient::new(&base).unwrap();
        let catalog = assemble_catalog(&client, "o", "r", Mode::Kernel, "devicex").await;
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_failed_asset_fetch_skips_release() {
        let base = serve_repo(
            "200 OK",
            |base| {
                json!([
                    {"name": "v1", "body": "", "assets_url": format!("{base}/assets/1")},
                    {"name": "v2", "body": "", "assets_url": format!("{base}/assets/2")}
                ])
                .to_string()
            },
            vec![
                ("/assets/1", "500 Internal Server Error", "boom".to_string()),
                (
                    "/assets/2",
                    "200 OK",
                    json!([
                        {
                            "name": "devicex_v2.zip",
                            "id": 9,
                            "size": 10,
                            "updated_at": "2023-05-01T12:00:00Z",
                            "browser_download_url": "http://x/q"
                        }
                    ])
                    .to_string(),
                ),
            ],
        )
        .await;

        let client = ReleaseClient::new(&base).unwrap();
        let catalog = assemble_catalog(&client, "o", "r", Mode::Kernel, "devicex").await;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].version, "v2");
        assert_eq!(catalog[0].tag, "Original");
    }

    #[tokio::test]
    async fn test_bad_timestamp_skips_only_that_asset() {
        let base = serve_repo(
            "200 OK",
            |base| {
                json!([
                    {"name": "v1", "body": "", "assets_url": format!("{base}/assets/1")}
                ])
                .to_string()
            },
            vec![(
                "/assets/1",
                "200 OK",
                json!([
                    {
                        "name": "devicex_broken.zip",
                        "id": 1,
                        "size": 10,
                        "updated_at": "not-a-timestamp",
                        "browser_download_url": "http://x/a"
                    },
                    {
                        "name": "devicex_good.zip",
                        "id": 2,
                        "size": 20,
                        "updated_at": "2023-05-01T12:00:00Z",
                        "browser_download_url": "http://x/b"
                    }
                ])
                .to_string(),
            )],
        )
        .await;

        let client = ReleaseClient::new(&base).unwrap();
        let catalog = assemble_catalog(&client, "o", "r", Mode::Kernel, "devicex").await;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].filename, "DEVICEX_GOOD");
    }
}
