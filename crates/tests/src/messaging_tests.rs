use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use lingoroom_captions::Utterance;
use lingoroom_config::MessagingSettings;
use lingoroom_services::MessagingService;

type HmacSha256 = Hmac<Sha256>;

fn service() -> MessagingService {
    MessagingService::new(MessagingSettings {
        app_id: "424242".to_string(),
        key: "auth-key".to_string(),
        secret: "super-secret".to_string(),
        cluster: "mt1".to_string(),
        host: "channels.example.com".to_string(),
    })
}

fn reference_hmac(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn channel_auth_signature_matches_reference() {
    let auth = service().channel_auth("1234.5678", "private-daily");
    let expected = reference_hmac("super-secret", "1234.5678:private-daily");
    assert_eq!(auth.auth, format!("auth-key:{}", expected));
}

#[test]
fn publish_url_carries_the_signed_query() {
    let svc = service();
    let body = r#"{"name":"utterance","channel":"daily","data":"{}"}"#;
    let url = svc.signed_publish_url(body, 1_700_000_000);

    let body_digest = hex::encode(Sha256::digest(body.as_bytes()));
    let query = format!(
        "auth_key=auth-key&auth_timestamp=1700000000&auth_version=1.0&body_sha256={}",
        body_digest
    );
    let expected_signature = reference_hmac(
        "super-secret",
        &format!("POST\n/apps/424242/events\n{}", query),
    );

    assert_eq!(
        url,
        format!(
            "https://api-mt1.channels.example.com/apps/424242/events?{}&auth_signature={}",
            query, expected_signature
        )
    );
}

#[test]
fn utterance_serializes_with_wire_field_names() {
    let utterance = Utterance {
        sender: "A".to_string(),
        sender_id: "a-1".to_string(),
        message: "hello".to_string(),
        is_final: true,
    };
    let value = serde_json::to_value(&utterance).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "sender": "A",
            "senderId": "a-1",
            "message": "hello",
            "isFinal": true,
        })
    );
}
