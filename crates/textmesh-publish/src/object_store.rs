//! HTTP object store publisher

use crate::publisher::{PublishedArtifact, Publisher};
use crate::slug::artifact_filename;
use std::time::Duration;
use textmesh_core::{ContentHash, Result, TextMeshError};

/// Content type sent with every upload
pub const GLB_CONTENT_TYPE: &str = "model/gltf-binary";

/// Connection details for an object store bucket
#[derive(Debug, Clone)]
pub struct ObjectStoreSettings {
    /// Base URL of the store, e.g. `https://blob.example.com`
    pub endpoint: String,
    pub bucket: String,
    /// Sent as a bearer token when set
    pub api_key: Option<String>,
    /// Public base for artifact URIs; defaults to `<endpoint>/<bucket>`
    pub public_url: Option<String>,
    pub timeout: Duration,
}

/// Uploads artifacts with a single `PUT <endpoint>/<bucket>/<filename>`
pub struct ObjectStorePublisher {
    settings: ObjectStoreSettings,
}

impl ObjectStorePublisher {
    pub fn new(settings: ObjectStoreSettings) -> Result<Self> {
        if settings.endpoint.trim().is_empty() || settings.bucket.trim().is_empty() {
            return Err(TextMeshError::Config(
                "Object store needs both an endpoint and a bucket".to_string(),
            ));
        }
        Ok(Self { settings })
    }

    fn bucket_url(&self) -> String {
        format!(
            "{}/{}",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.bucket.trim_matches('/')
        )
    }

    fn object_url(&self, filename: &str) -> String {
        format!("{}/{}", self.bucket_url(), filename)
    }

    /// Public URI for an uploaded object
    pub fn uri_for(&self, filename: &str) -> String {
        let base = match &self.settings.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => self.bucket_url(),
        };
        format!("{}/{}", base, filename)
    }

    fn upload(&self, url: &str, bytes: &[u8]) -> Result<()> {
        let agent = build_agent(self.settings.timeout);
        let request = self.with_auth(agent.put(url).header("Content-Type", GLB_CONTENT_TYPE));

        request.send(bytes).map_err(|e| match e {
            ureq::Error::StatusCode(code) => {
                TextMeshError::Persistence(format!("Object store returned HTTP {} for {}", code, url))
            }
            other => TextMeshError::Persistence(format!("Upload to {} failed: {}", url, other)),
        })?;
        Ok(())
    }

    fn with_auth<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.settings.api_key {
            Some(key) => request.header("Authorization", &format!("Bearer {}", key)),
            None => request,
        }
    }
}

impl Publisher for ObjectStorePublisher {
    fn name(&self) -> &str {
        "object_store"
    }

    fn publish(&self, bytes: &[u8], text: &str) -> Result<PublishedArtifact> {
        let filename = artifact_filename(text);
        let url = self.object_url(&filename);
        self.upload(&url, bytes)?;

        let artifact = PublishedArtifact {
            uri: self.uri_for(&filename),
            filename,
            size_bytes: bytes.len() as u64,
            content_hash: ContentHash::from_bytes(bytes),
        };
        tracing::info!(
            url = %url,
            bytes = artifact.size_bytes,
            hash = %artifact.content_hash.to_prefixed_hex(),
            "artifact uploaded"
        );
        Ok(artifact)
    }

    fn list(&self) -> Result<Vec<String>> {
        Err(TextMeshError::Persistence(
            "Listing is not supported by the object store backend".to_string(),
        ))
    }

    fn remove(&self, filename: &str) -> Result<()> {
        let url = self.object_url(filename);
        let agent = build_agent(self.settings.timeout);
        match self.with_auth(agent.delete(&url)).call() {
            Ok(_) | Err(ureq::Error::StatusCode(404)) => {
                tracing::info!(url = %url, "artifact removed");
                Ok(())
            }
            Err(ureq::Error::StatusCode(code)) => Err(TextMeshError::Persistence(format!(
                "Object store returned HTTP {} deleting {}",
                code, url
            ))),
            Err(other) => Err(TextMeshError::Persistence(format!(
                "Delete of {} failed: {}",
                url, other
            ))),
        }
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    config.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    fn settings(endpoint: String) -> ObjectStoreSettings {
        ObjectStoreSettings {
            endpoint,
            bucket: "labels".to_string(),
            api_key: Some("secret".to_string()),
            public_url: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// Accept one request, hand its raw text back and answer with `status`
    fn serve_once(status: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                stream
                    .set_read_timeout(Some(Duration::from_millis(500)))
                    .unwrap();
                let mut raw = Vec::new();
                let mut buf = [0u8; 4096];
                while let Ok(n) = stream.read(&mut buf) {
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&buf[..n]);
                    let text = String::from_utf8_lossy(&raw);
                    if text.contains("\r\n\r\n") && text.ends_with("payload") {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = tx.send(String::from_utf8_lossy(&raw).to_string());
            }
        });
        (format!("http://{}", addr), rx)
    }

    #[test]
    fn test_put_upload() {
        let (endpoint, rx) = serve_once("200 OK");
        let publisher = ObjectStorePublisher::new(settings(endpoint.clone())).unwrap();
        let artifact = publisher.publish(b"payload", "Hi There").unwrap();

        assert!(artifact.filename.starts_with("label-hi-there-"));
        assert_eq!(artifact.uri, format!("{}/labels/{}", endpoint, artifact.filename));

        let request = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with(&format!("PUT /labels/{} ", artifact.filename)));
        assert!(lower.contains("content-type: model/gltf-binary"));
        assert!(lower.contains("authorization: bearer secret"));
        assert!(request.ends_with("payload"));
    }

    #[test]
    fn test_rejected_upload_is_persistence_error() {
        let (endpoint, _rx) = serve_once("403 Forbidden");
        let publisher = ObjectStorePublisher::new(settings(endpoint)).unwrap();
        let err = publisher.publish(b"payload", "Hi").unwrap_err();
        assert!(matches!(err, TextMeshError::Persistence(_)));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_remove_sends_delete() {
        let (endpoint, rx) = serve_once("204 No Content");
        let publisher = ObjectStorePublisher::new(settings(endpoint)).unwrap();
        publisher.remove("label-hi-0000abcd.glb").unwrap();

        let request = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(request.starts_with("DELETE /labels/label-hi-0000abcd.glb "));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
    }

    #[test]
    fn test_public_url_override() {
        let mut s = settings("https://blob.example.com/".to_string());
        s.public_url = Some("https://cdn.example.com/labels/".to_string());
        let publisher = ObjectStorePublisher::new(s).unwrap();
        assert_eq!(publisher.uri_for("a.glb"), "https://cdn.example.com/labels/a.glb");
        assert_eq!(
            publisher.object_url("a.glb"),
            "https://blob.example.com/labels/a.glb"
        );
    }

    #[test]
    fn test_listing_unsupported() {
        let publisher = ObjectStorePublisher::new(settings("https://blob.example.com".to_string())).unwrap();
        assert!(publisher.list().is_err());
    }

    #[test]
    fn test_missing_bucket_rejected() {
        let mut s = settings("https://blob.example.com".to_string());
        s.bucket = String::new();
        assert!(matches!(ObjectStorePublisher::new(s), Err(TextMeshError::Config(_))));
    }
}
