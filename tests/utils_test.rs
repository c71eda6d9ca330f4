use std::collections::BTreeMap;

use sporlcover::config::{Credentials, CredentialsError, Endpoints};
use sporlcover::download::is_valid_url;
use sporlcover::types::{AlbumRecord, AlbumTableRow, Artist, CoverOutcome, CoverSummary};
use sporlcover::utils::*;

// Helper function to create a test album record
fn create_test_record(name: &str, artist: &str, release_date: &str, tracks: u32) -> AlbumRecord {
    AlbumRecord {
        name: name.to_string(),
        artist: artist.to_string(),
        release_date: release_date.to_string(),
        url: format!("https://open.spotify.com/album/{}", name.to_lowercase()),
        image_url: Some(format!("https://i.scdn.co/image/{}", name.to_lowercase())),
        total_tracks: tracks,
    }
}

fn create_test_artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    // RFC 7636 appendix B
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    assert_eq!(
        generate_code_challenge(verifier),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );

    // Should be base64-encoded (URL-safe, no padding)
    let challenge = generate_code_challenge(&generate_code_verifier());
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_state() {
    let state = generate_state();
    assert_eq!(state.len(), 16);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_is_released_in_uses_literal_year_prefix() {
    assert!(is_released_in("2024-03-15", 2024));
    assert!(is_released_in("2024-12", 2024));
    assert!(is_released_in("2024", 2024));

    assert!(!is_released_in("2023-12-01", 2024));
    assert!(!is_released_in("", 2024));
    assert!(!is_released_in("unknown", 2024));
    assert!(!is_released_in("15-03-2024", 2024));
}

#[test]
fn test_current_year_is_plausible() {
    assert!(current_year() >= 2024);
}

#[test]
fn test_cover_file_name() {
    assert_eq!(
        cover_file_name("Tove Lo", "Dirt Femme"),
        "Tove Lo - Dirt Femme.jpg"
    );

    // path separators must not create sub directories
    assert_eq!(cover_file_name("AC/DC", "Power Up"), "AC_DC - Power Up.jpg");
    assert_eq!(cover_file_name("A\\B", "x/y"), "A_B - x_y.jpg");

    // sanitized names can collide with names that already used `_`
    assert_eq!(
        cover_file_name("AC/DC", "Power Up"),
        cover_file_name("AC_DC", "Power Up")
    );
}

#[test]
fn test_album_record_key_and_full_album() {
    let album = create_test_record("Dirt Femme", "Tove Lo", "2022-10-14", 12);
    assert_eq!(album.key(), "Dirt Femme by Tove Lo");
    assert!(album.is_full_album());

    let single = create_test_record("Borderline", "Tove Lo", "2024-01-05", 1);
    assert!(!single.is_full_album());
}

#[test]
fn test_album_table_rows_sorted_by_date_then_artist() {
    let mut albums = BTreeMap::new();
    for record in [
        create_test_record("Older", "Zed", "2024-01-05", 10),
        create_test_record("Newest", "Beta", "2024-06-01", 10),
        create_test_record("Same Day", "Alpha", "2024-03-01", 10),
        create_test_record("Same Day Too", "Charlie", "2024-03-01", 10),
    ] {
        albums.insert(record.key(), record);
    }

    let rows = album_table_rows(&albums);
    let order: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(order, vec!["Newest", "Same Day", "Same Day Too", "Older"]);
    assert_eq!(rows[0].link, "https://open.spotify.com/album/newest");
}

#[test]
fn test_sort_album_table_rows_empty() {
    let mut rows: Vec<AlbumTableRow> = Vec::new();
    sort_album_table_rows(&mut rows);
    assert!(rows.is_empty());
}

#[test]
fn test_artist_table_rows_sorts_and_filters() {
    let artists = vec![
        create_test_artist("3", "zola"),
        create_test_artist("1", "Arctic Monkeys"),
        create_test_artist("2", "Black Keys"),
    ];

    let rows = artist_table_rows(artists.clone(), None);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Arctic Monkeys", "Black Keys", "zola"]);

    let rows = artist_table_rows(artists, Some("KEYS"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "2");
}

#[test]
fn test_is_valid_url() {
    assert!(is_valid_url("https://i.scdn.co/image/ab67616d0000b273"));
    assert!(is_valid_url("http://127.0.0.1:8080/cover.jpg"));

    assert!(!is_valid_url("not a url"));
    assert!(!is_valid_url(""));
    assert!(!is_valid_url("/image/ab67616d0000b273"));
    assert!(!is_valid_url("mailto:someone@example.com"));
    assert!(!is_valid_url("file:///tmp/cover.jpg"));
}

#[test]
fn test_credentials_parse() {
    let credentials = Credentials::parse(
        r#"{"client_id": "id", "client_secret": "secret", "redirect_uri": "http://127.0.0.1:8888/callback"}"#,
    )
    .unwrap();
    assert_eq!(credentials.client_id, "id");
    assert_eq!(credentials.client_secret, "secret");

    let (host, port, path) = credentials.callback_binding().unwrap();
    assert_eq!(host, "127.0.0.1");
    assert_eq!(port, 8888);
    assert_eq!(path, "/callback");
}

#[test]
fn test_credentials_parse_rejects_missing_field() {
    let result = Credentials::parse(r#"{"client_id": "id", "client_secret": "secret"}"#);
    assert!(matches!(result, Err(CredentialsError::SerdeError(_))));
}

#[test]
fn test_callback_binding_default_port() {
    let credentials = Credentials {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://localhost/".to_string(),
    };
    let (host, port, path) = credentials.callback_binding().unwrap();
    assert_eq!(host, "localhost");
    assert_eq!(port, 80);
    assert_eq!(path, "/");

    let broken = Credentials {
        redirect_uri: "callback".to_string(),
        ..credentials
    };
    assert!(matches!(
        broken.callback_binding(),
        Err(CredentialsError::InvalidRedirectUri(_))
    ));
}

#[test]
fn test_callback_binding_rejects_health_route() {
    let credentials = Credentials {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://127.0.0.1:8888/health".to_string(),
    };
    assert!(matches!(
        credentials.callback_binding(),
        Err(CredentialsError::InvalidRedirectUri(_))
    ));

    // only the exact health route collides
    let nested = Credentials {
        redirect_uri: "http://127.0.0.1:8888/health/callback".to_string(),
        ..credentials
    };
    let (_, _, path) = nested.callback_binding().unwrap();
    assert_eq!(path, "/health/callback");
}

#[tokio::test]
async fn test_credentials_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Credentials::load(dir.path().join("config.json")).await;
    assert!(matches!(result, Err(CredentialsError::IoError(_))));
}

#[tokio::test]
async fn test_credentials_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"client_id": "a", "client_secret": "b", "redirect_uri": "http://127.0.0.1:9090/cb"}"#,
    )
    .unwrap();

    let credentials = Credentials::load(&path).await.unwrap();
    assert_eq!(credentials.redirect_uri, "http://127.0.0.1:9090/cb");
}

#[test]
fn test_default_endpoints() {
    let endpoints = Endpoints::default();
    assert_eq!(endpoints.api_url, "https://api.spotify.com/v1");
    assert_eq!(endpoints.auth_url, "https://accounts.spotify.com/authorize");
    assert_eq!(endpoints.token_url, "https://accounts.spotify.com/api/token");
}

#[test]
fn test_cover_summary_counts_outcomes() {
    let mut summary = CoverSummary::default();
    summary.record(&CoverOutcome::Saved { full_album: true });
    summary.record(&CoverOutcome::Saved { full_album: false });
    summary.record(&CoverOutcome::Skipped);
    summary.record(&CoverOutcome::Failed);

    assert_eq!(
        summary,
        CoverSummary {
            saved: 2,
            full_albums: 1,
            skipped: 1,
            failed: 1,
        }
    );
}
