//! Test helpers for inbound HTTP components.

use actix_web::http::header::CONTENT_TYPE;
use actix_web::test::TestRequest;

const BOUNDARY: &str = "----account-console-test-boundary";

/// One part of a hand-built multipart body.
pub enum TestPart<'a> {
    /// Plain part carrying a JSON document.
    Json { name: &'a str, body: String },
    /// File part with a filename and content type.
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Encode `parts` as `multipart/form-data`.
pub fn multipart_body(parts: &[TestPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            TestPart::Json { name, body: json } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"\r\n\
                         Content-Type: application/json\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(json.as_bytes());
            }
            TestPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Attach a multipart body built from `parts` to `request`.
pub fn with_multipart(request: TestRequest, parts: &[TestPart<'_>]) -> TestRequest {
    request
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}
