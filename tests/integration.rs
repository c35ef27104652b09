use base64::Engine as _;
use pretty_assertions::assert_eq;
use promptshop::{
    ai::{ImageGenerationService, MockImageGenerationClient},
    models::GenerationResult,
    session::Session,
    upload::{encode_image_file, split_data_uri},
};
use std::io::Write as _;

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn write_png_fixture(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::with_suffix(".png").unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_generate_workflow_produces_renderable_data_uri() {
    let payload = base64::engine::general_purpose::STANDARD.encode([0xDE, 0xAD, 0xBE, 0xEF]);
    let mock = MockImageGenerationClient::new()
        .with_result(GenerationResult::new(payload.clone(), "image/png".to_string()));

    let mut session = Session::new(Box::new(mock.clone()));
    session.set_prompt("a lighthouse at dusk");
    assert!(session.submit().await);

    let data_uri = session.result().unwrap();
    let (media_type, extracted) = split_data_uri(data_uri).unwrap();
    assert_eq!(media_type, "image/png");
    assert_eq!(extracted, payload);

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(extracted)
        .unwrap();
    assert_eq!(decoded, [0xDE, 0xAD, 0xBE, 0xEF]);

    let calls = mock.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].edited);
}

#[tokio::test]
async fn test_edit_workflow_uses_selected_file() {
    let mut original = PNG_MAGIC.to_vec();
    original.extend_from_slice(&[0x01, 0x02, 0x03]);
    let file = write_png_fixture(&original);

    let mock = MockImageGenerationClient::new();
    let mut session = Session::new(Box::new(mock.clone()));

    session.select_image(file.path()).await;
    let upload = session.image().unwrap();
    assert_eq!(upload.media_type, "image/png");

    session.set_prompt("make it rain");
    assert!(session.submit().await);
    assert!(session.result().is_some());

    let calls = mock.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].edited);
    assert_eq!(calls[0].prompt, "make it rain");
}

#[tokio::test]
async fn test_service_failure_reaches_the_user_verbatim() {
    let mock = MockImageGenerationClient::new().with_failure("model is overloaded");
    let mut session = Session::new(Box::new(mock));

    session.set_prompt("a cat");
    session.submit().await;

    let error = session.error().unwrap();
    assert!(error.contains("model is overloaded"));
    assert!(session.result().is_none());
}

#[tokio::test]
async fn test_clear_starts_a_fresh_workflow() {
    let file = write_png_fixture(&PNG_MAGIC);

    let mock = MockImageGenerationClient::new();
    let mut session = Session::new(Box::new(mock.clone()));

    session.select_image(file.path()).await;
    session.set_prompt("first prompt");
    session.submit().await;
    assert!(session.result().is_some());

    session.clear();
    assert!(session.image().is_none());
    assert_eq!(session.prompt(), "");
    assert!(session.result().is_none());

    // A fresh text-only generation works after the reset.
    session.set_prompt("second prompt");
    session.submit().await;
    assert!(session.result().is_some());

    let calls = mock.recorded_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].edited);
    assert!(!calls[1].edited);
}

#[tokio::test]
async fn test_encoder_output_feeds_the_edit_call_directly() {
    let mut original = PNG_MAGIC.to_vec();
    original.extend_from_slice(&[0xAA, 0xBB]);
    let file = write_png_fixture(&original);

    let upload = encode_image_file(file.path()).await.unwrap();

    // The encoded upload is exactly what the service trait accepts.
    let mock = MockImageGenerationClient::new();
    mock.edit_image(&upload.data_uri, &upload.media_type, "sharpen")
        .await
        .unwrap();

    let (media_type, payload) = split_data_uri(&upload.data_uri).unwrap();
    assert_eq!(media_type, upload.media_type);
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    assert_eq!(decoded, original);
}
