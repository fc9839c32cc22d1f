//! Tests for the TheTVDB client against a mock server.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tvdb_client::{ResourcePool, TvdbClient, TvdbConfig, TvdbError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TvdbClient {
    let config = TvdbConfig::new("TESTKEY").with_base_url(server.uri());
    TvdbClient::new(config, ResourcePool::new(1)).unwrap()
}

// =============================================================================
// Updates Feed Tests
// =============================================================================

mod updates_feed {
    use super::*;

    #[tokio::test]
    async fn test_server_time() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Updates.php"))
            .and(query_param("type", "none"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<?xml version=\"1.0\"?><Items><Time>1361923300</Time></Items>"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let time = client.server_time(&CancellationToken::new()).await.unwrap();

        assert_eq!(time, "1361923300");
    }

    #[tokio::test]
    async fn test_updates_since() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Updates.php"))
            .and(query_param("type", "all"))
            .and(query_param("time", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<Items><Time>150</Time><Series>80348</Series><Series>75760</Series></Items>",
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let updates = client
            .updates_since("100", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(updates.time.as_deref(), Some("150"));
        assert_eq!(updates.series, vec!["80348", "75760"]);
    }

    #[tokio::test]
    async fn test_server_error_is_not_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Updates.php"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client
            .server_time(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(!err.is_timed_out());
        match err {
            TvdbError::ServerError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            e => panic!("Expected ServerError, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_slow_response_classified_as_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Updates.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<Items><Time>1</Time></Items>")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let config = TvdbConfig::new("TESTKEY")
            .with_base_url(mock_server.uri())
            .with_timeout(Duration::from_millis(200));
        let client = TvdbClient::new(config, ResourcePool::new(1)).unwrap();

        let err = client
            .server_time(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_timed_out(), "expected timeout, got: {:?}", err);
    }

    #[tokio::test]
    async fn test_cancelled_before_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<Items/>"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let client = client_for(&mock_server);
        let result = client.server_time(&cancel).await;

        assert!(matches!(result, Err(TvdbError::Cancelled)));
    }

    #[tokio::test]
    async fn test_gzip_requested() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Updates.php"))
            .and(wiremock::matchers::header_regex("accept-encoding", "gzip"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<Items><Time>9</Time></Items>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert_eq!(client.server_time(&CancellationToken::new()).await.unwrap(), "9");
    }
}

// =============================================================================
// Download Tests
// =============================================================================

mod download {
    use super::*;

    async fn mount_document(server: &MockServer, doc_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(doc_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_download_series_writes_documents() {
        let mock_server = MockServer::start().await;
        mount_document(&mock_server, "/api/TESTKEY/series/80348/all/en.xml", "<Data>series</Data>").await;
        mount_document(&mock_server, "/api/TESTKEY/series/80348/banners.xml", "<Banners/>").await;
        mount_document(&mock_server, "/api/TESTKEY/series/80348/actors.xml", "<Actors/>").await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&mock_server);

        client
            .download_series("80348", dir.path(), &CancellationToken::new())
            .await
            .unwrap();

        let series = std::fs::read_to_string(dir.path().join("en.xml")).unwrap();
        assert_eq!(series, "<Data>series</Data>");
        assert!(dir.path().join("banners.xml").exists());
        assert!(dir.path().join("actors.xml").exists());
        assert!(!dir.path().join("en.xml.part").exists());
    }

    #[tokio::test]
    async fn test_download_missing_series_fails_without_partial_file() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&mock_server);

        let err = client
            .download_series("999", dir.path(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TvdbError::ServerError { status: 404, .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_redownload_overwrites_existing_files() {
        let mock_server = MockServer::start().await;
        mount_document(&mock_server, "/api/TESTKEY/series/1/all/en.xml", "<Data>new</Data>").await;
        mount_document(&mock_server, "/api/TESTKEY/series/1/banners.xml", "<Banners/>").await;
        mount_document(&mock_server, "/api/TESTKEY/series/1/actors.xml", "<Actors/>").await;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.xml"), "<Data>old</Data>").unwrap();

        let client = client_for(&mock_server);
        client
            .download_series("1", dir.path(), &CancellationToken::new())
            .await
            .unwrap();

        let series = std::fs::read_to_string(dir.path().join("en.xml")).unwrap();
        assert_eq!(series, "<Data>new</Data>");
    }
}
