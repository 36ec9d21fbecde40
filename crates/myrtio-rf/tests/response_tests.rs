//! Integration tests for the submitter response.

use heapless::String;
use myrtio_rf::response::ResponseHeaders;
use myrtio_rf::{IngestError, write_response};

fn render(result: Result<usize, IngestError>) -> String<192> {
    let mut out = String::new();
    write_response(&mut out, result).unwrap();
    out
}

fn body(response: &str) -> &str {
    response.split_once("\r\n\r\n").unwrap().1
}

#[test]
fn success_response_reports_count() {
    let response = render(Ok(3));

    assert_eq!(
        response.as_str(),
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/plain\r\n\
         Content-Length: 32\r\n\
         Connection: close\r\n\
         \r\n\
         Number of parsed commands    3\r\n"
    );
}

#[test]
fn count_is_right_aligned_in_four_columns() {
    assert_eq!(body(&render(Ok(0))), "Number of parsed commands    0\r\n");
    assert_eq!(body(&render(Ok(32))), "Number of parsed commands   32\r\n");
    assert_eq!(body(&render(Ok(12345))), "Number of parsed commands 12345\r\n");
}

#[test]
fn rejected_payload_gets_headers_only() {
    for error in [IngestError::MissingCommands, IngestError::Malformed] {
        let response = render(Err(error));

        assert_eq!(
            response.as_str(),
            "HTTP/1.1 400 Bad Request\r\n\
             Content-Type: text/plain\r\n\
             Content-Length: 0\r\n\
             Connection: close\r\n\
             \r\n"
        );
        assert_eq!(body(&response), "");
    }
}

#[test]
fn headers_without_length() {
    let mut out = String::<64>::new();
    ResponseHeaders::success().write_to(&mut out).unwrap();

    assert_eq!(
        out.as_str(),
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n"
    );
    assert_eq!(ResponseHeaders::bad_request().status(), 400);
}
