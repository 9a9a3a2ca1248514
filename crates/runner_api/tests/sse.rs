use runner_api::{decode_payload_line, SseStreamParser, MALFORMED_PAYLOAD_LINE};

#[test]
fn sse_framing_decodes_one_line_per_event() {
    let payload = concat!(
        "data: \"first line\"\n\n",
        "data: \"second line\"\n\n",
    );

    let lines = SseStreamParser::parse_frames(payload);
    assert_eq!(lines, vec!["first line", "second line"]);
}

#[test]
fn sse_parser_preserves_non_ascii_payloads() {
    let lines = SseStreamParser::parse_frames("data: \"Olá, Mundo!\"\n\n");
    assert_eq!(lines, vec!["Olá, Mundo!"]);
}

#[test]
fn sse_parser_substitutes_diagnostic_for_malformed_payloads() {
    let payload = concat!(
        "data: {broken-json\n\n",
        "data: \"still alive\"\n\n",
    );

    let lines = SseStreamParser::parse_frames(payload);
    assert_eq!(lines, vec![MALFORMED_PAYLOAD_LINE, "still alive"]);
}

#[test]
fn sse_parser_handles_split_frames_incrementally() {
    let mut parser = SseStreamParser::default();
    assert!(parser.feed(b"data: \"ab").is_empty());

    let lines = parser.feed(b"c\"\n\n");
    assert_eq!(lines, vec!["abc"]);
}

#[test]
fn sse_parser_skips_empty_data_frames() {
    let payload = concat!("data: \n\n", "data: \"done\"\n\n");
    let lines = SseStreamParser::parse_frames(payload);
    assert_eq!(lines, vec!["done"]);
}

#[test]
fn sse_parser_ignores_incomplete_trailing_bytes() {
    let mut parser = SseStreamParser::default();
    assert!(parser.feed(b"data: \"no terminator yet\"").is_empty());
    assert!(!parser.is_empty_buffer());
}

#[test]
fn decode_payload_line_requires_a_single_json_string() {
    assert_eq!(decode_payload_line("\"plain\""), "plain");
    assert_eq!(decode_payload_line("\"\""), "");
    assert_eq!(decode_payload_line("42"), MALFORMED_PAYLOAD_LINE);
    assert_eq!(
        decode_payload_line("{\"line\":\"wrapped\"}"),
        MALFORMED_PAYLOAD_LINE
    );
}
