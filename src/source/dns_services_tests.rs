// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `dns_services.rs`

#[cfg(test)]
mod tests {
    use super::super::{build_export_url, DnsServicesClient};
    use crate::source::{Authenticator, FetchError, IamAuthenticator, ZoneSource};
    use crate::sync_errors::SyncError;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EXPORT_PATH: &str = "/v1/instances/inst-1/dnszones/zone-1/export_resource_records";
    const EXPORT_BODY: &str = "$ORIGIN example.com.\nwww 300 IN A 10.0.0.10\n";

    fn client_for(server: &MockServer, auth: Authenticator) -> DnsServicesClient {
        DnsServicesClient::new(&format!("{}/v1", server.uri()), "inst-1", "zone-1", auth).unwrap()
    }

    #[test]
    fn test_build_export_url() {
        let url = build_export_url("https://api.dns-svcs.cloud.ibm.com/v1", "inst", "zone").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dns-svcs.cloud.ibm.com/v1/instances/inst/dnszones/zone/export_resource_records"
        );
    }

    #[test]
    fn test_build_export_url_tolerates_trailing_slash() {
        let url = build_export_url("https://api.dns-svcs.cloud.ibm.com/v1/", "inst", "zone").unwrap();
        assert_eq!(
            url.path(),
            "/v1/instances/inst/dnszones/zone/export_resource_records"
        );
    }

    #[test]
    fn test_build_export_url_encodes_identifiers() {
        let url = build_export_url("https://dns.test/v1", "a/b", "z?x").unwrap();
        assert_eq!(
            url.path(),
            "/v1/instances/a%2Fb/dnszones/z%3Fx/export_resource_records"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn test_build_export_url_rejects_bad_input() {
        assert!(matches!(
            build_export_url("not a url", "inst", "zone"),
            Err(SyncError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            build_export_url("mailto:dns@example.com", "inst", "zone"),
            Err(SyncError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            build_export_url("https://dns.test/v1", "", "zone"),
            Err(SyncError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            build_export_url("https://dns.test/v1", "inst", ""),
            Err(SyncError::ConfigInvalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_export_returns_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(EXPORT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(EXPORT_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Authenticator::NoAuth);
        let payload = client.export_zone().await.unwrap();

        assert_eq!(payload, EXPORT_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_export_sends_static_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(EXPORT_PATH))
            .and(header("authorization", "Bearer static-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EXPORT_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Authenticator::BearerToken("static-token".into()));
        assert!(client.export_zone().await.is_ok());
    }

    #[tokio::test]
    async fn test_export_with_iam_exchanges_api_key_once() {
        let server = MockServer::start().await;
        let expiration = chrono::Utc::now().timestamp() + 3600;

        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .and(body_string_contains("apikey=secret-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "iam-token",
                "token_type": "Bearer",
                "expires_in": 3600,
                "expiration": expiration,
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(EXPORT_PATH))
            .and(header("authorization", "Bearer iam-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EXPORT_BODY))
            .expect(2)
            .mount(&server)
            .await;

        let auth = Authenticator::Iam(IamAuthenticator::new("secret-key", &server.uri()));
        let client = client_for(&server, auth);

        assert!(client.export_zone().await.is_ok());
        assert!(client.export_zone().await.is_ok());
    }

    #[tokio::test]
    async fn test_export_non_ok_status_is_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(EXPORT_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_string("zone not found"))
            .mount(&server)
            .await;

        let client = client_for(&server, Authenticator::NoAuth);
        let err = client.export_zone().await.unwrap_err();

        match err {
            FetchError::UnexpectedStatus { status, body, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "zone not found");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_export_other_success_codes_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(EXPORT_PATH))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server, Authenticator::NoAuth);
        assert!(matches!(
            client.export_zone().await,
            Err(FetchError::UnexpectedStatus { status: 204, .. })
        ));
    }

    #[tokio::test]
    async fn test_export_connection_refused_is_transport_error() {
        let server = MockServer::start().await;
        let base = format!("{}/v1", server.uri());
        drop(server);

        let client = DnsServicesClient::new(&base, "inst-1", "zone-1", Authenticator::NoAuth).unwrap();
        assert!(matches!(
            client.export_zone().await,
            Err(FetchError::Transport { .. })
        ));
    }
}
