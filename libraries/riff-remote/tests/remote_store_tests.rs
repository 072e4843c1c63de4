//! Tests for the remote playlist store against a mock REST table.

use riff_core::{PlaylistId, PlaylistStore, SongId, SyncError, UserId};
use riff_remote::{RemoteConfig, RemotePlaylistStore, RemoteStoreError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE: &str = "/rest/v1/playlists";

fn owner() -> UserId {
    UserId::new("user-1")
}

fn store_for(server: &MockServer) -> RemotePlaylistStore {
    let config = RemoteConfig::new(server.uri(), "anon-key").with_access_token("user-jwt");
    RemotePlaylistStore::new(config).unwrap()
}

// =============================================================================
// Construction
// =============================================================================

mod construction {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let store = RemotePlaylistStore::new(RemoteConfig::new("https://db.test/", "key")).unwrap();
        assert_eq!(store.url(), "https://db.test");
        assert!(!store.is_authenticated());
    }

    #[test]
    fn empty_url_rejected() {
        match RemotePlaylistStore::new(RemoteConfig::new("", "key")) {
            Err(RemoteStoreError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl, got: {:?}", other.err()),
        }
    }

    #[test]
    fn non_http_scheme_rejected() {
        assert!(matches!(
            RemotePlaylistStore::new(RemoteConfig::new("ftp://db.test", "key")),
            Err(RemoteStoreError::InvalidUrl(_))
        ));
    }

    #[test]
    fn missing_api_key_rejected() {
        assert!(matches!(
            RemotePlaylistStore::new(RemoteConfig::new("https://db.test", "  ")),
            Err(RemoteStoreError::AuthRequired)
        ));
    }
}

// =============================================================================
// Listing
// =============================================================================

mod listing {
    use super::*;

    #[tokio::test]
    async fn list_filters_by_owner_in_creation_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(TABLE))
            .and(query_param("user_id", "eq.user-1"))
            .and(query_param("order", "created_at.asc"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer user-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Road Trip", "song_ids": ["2", "3"] },
                { "id": 5, "name": "Empty", "song_ids": null }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let playlists = store_for(&server).list(Some(&owner())).await.unwrap();

        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].id, PlaylistId::new("1"));
        assert_eq!(playlists[0].name, "Road Trip");
        assert_eq!(playlists[0].song_ids, vec![SongId::new("2"), SongId::new("3")]);
        assert!(playlists[1].is_empty());
    }

    #[tokio::test]
    async fn list_without_owner_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let playlists = store_for(&server).list(None).await.unwrap();
        assert!(playlists.is_empty());
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(TABLE))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "JWT expired"
            })))
            .mount(&server)
            .await;

        let result = store_for(&server).list(Some(&owner())).await;
        assert_eq!(result, Err(SyncError::Unauthenticated));
    }

    #[tokio::test]
    async fn server_error_is_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(TABLE))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        match store_for(&server).fetch(&owner()).await {
            Err(RemoteStoreError::ServerError { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("Internal Server Error"));
            }
            other => panic!("Expected ServerError, got: {:?}", other),
        }

        let result = store_for(&server).list(Some(&owner())).await;
        assert!(matches!(result, Err(SyncError::Network(_))));
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(TABLE))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&server)
            .await;

        assert!(matches!(
            store_for(&server).fetch(&owner()).await,
            Err(RemoteStoreError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_server() {
        let config = RemoteConfig::new("http://127.0.0.1:9", "anon-key");
        let store = RemotePlaylistStore::new(config).unwrap();

        match store.fetch(&owner()).await {
            Err(RemoteStoreError::ServerUnreachable(_) | RemoteStoreError::Request(_)) => {}
            other => panic!("Expected ServerUnreachable or Request error, got: {:?}", other),
        }
    }
}

// =============================================================================
// Writes
// =============================================================================

mod writes {
    use super::*;

    #[tokio::test]
    async fn create_posts_trimmed_name_for_owner() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TABLE))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!({
                "name": "Focus",
                "user_id": "user-1",
                "song_ids": []
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                { "id": 12, "name": "Focus", "song_ids": [] }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let playlist = store_for(&server)
            .create(Some(&owner()), "  Focus ")
            .await
            .unwrap();

        assert_eq!(playlist.id, PlaylistId::new("12"));
        assert_eq!(playlist.name, "Focus");
        assert!(playlist.is_empty());
    }

    #[tokio::test]
    async fn create_rejections_make_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert_eq!(
            store.create(None, "Focus").await,
            Err(SyncError::Unauthenticated)
        );
        assert!(matches!(
            store.create(Some(&owner()), "   ").await,
            Err(SyncError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn update_membership_patches_song_ids() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(TABLE))
            .and(query_param("id", "eq.7"))
            .and(body_json(json!({ "song_ids": ["3", "1"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 7, "name": "Gym", "song_ids": ["3", "1"] }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let songs = ["3", "1", "3"].map(SongId::new);
        store_for(&server)
            .update_membership(&PlaylistId::new("7"), &songs)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(TABLE))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let missing = PlaylistId::new("404");
        assert_eq!(
            store_for(&server).update_membership(&missing, &[]).await,
            Err(SyncError::PlaylistNotFound(missing))
        );
    }

    #[tokio::test]
    async fn delete_by_id() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(TABLE))
            .and(query_param("id", "eq.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 7, "name": "Gym" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server)
            .delete(&PlaylistId::new("7"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_of_missing_row_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(TABLE))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let missing = PlaylistId::new("gone");
        assert_eq!(
            store_for(&server).delete(&missing).await,
            Err(SyncError::PlaylistNotFound(missing))
        );
    }
}
