use base64::{engine::general_purpose, Engine as _};
use mathscribe::capture::image_file_to_data_uri;
use mathscribe::solve::error::SolveError;
use std::io::Write;

fn sample_png_bytes() -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .expect("encode png");
    bytes
}

#[test]
fn png_upload_becomes_a_png_data_uri() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("upload.png");
    let bytes = sample_png_bytes();
    std::fs::write(&path, &bytes).expect("write png");

    let uri = image_file_to_data_uri(&path).expect("data uri");
    let payload = uri
        .strip_prefix("data:image/png;base64,")
        .expect("png data uri prefix");
    assert_eq!(
        general_purpose::STANDARD.decode(payload).expect("base64"),
        bytes
    );
}

#[test]
fn content_sniffing_beats_a_misleading_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("upload.dat");
    std::fs::write(&path, sample_png_bytes()).expect("write png");

    let uri = image_file_to_data_uri(&path).expect("data uri");
    assert!(uri.starts_with("data:image/png;base64,"));
}

#[test]
fn missing_file_is_unreadable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("not_there.png");
    assert_eq!(
        image_file_to_data_uri(&path),
        Err(SolveError::UnreadableFile)
    );
}

#[test]
fn empty_file_is_unreadable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.png");
    let mut file = std::fs::File::create(&path).expect("create");
    file.flush().expect("flush");
    drop(file);

    assert_eq!(
        image_file_to_data_uri(&path),
        Err(SolveError::UnreadableFile)
    );
}
