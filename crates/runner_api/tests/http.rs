use runner_api::{RunnerApiClient, RunnerApiConfig};

fn client() -> RunnerApiClient {
    let config = RunnerApiConfig::new("https://runner.example.com");
    RunnerApiClient::new(config).expect("client")
}

#[test]
fn start_request_targets_start_endpoint() {
    let request = client()
        .build_start_request("exibir(1)")
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(request.method(), "POST");
    assert_eq!(request.url().as_str(), "https://runner.example.com/start");
    assert_eq!(
        request.headers().get("accept").map(|value| value.as_bytes()),
        Some("application/json".as_bytes())
    );
}

#[test]
fn input_request_targets_input_endpoint() {
    let request = client()
        .build_input_request("abc123", "hello")
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(request.method(), "POST");
    assert_eq!(request.url().as_str(), "https://runner.example.com/input");
}

#[test]
fn stream_request_is_a_get_with_event_stream_accept() {
    let request = client()
        .build_stream_request("abc123")
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(request.method(), "GET");
    assert_eq!(
        request.url().as_str(),
        "https://runner.example.com/stream?id=abc123"
    );
    assert_eq!(
        request.headers().get("accept").map(|value| value.as_bytes()),
        Some("text/event-stream".as_bytes())
    );
}

#[test]
fn extra_headers_are_applied_to_requests() {
    let config = RunnerApiConfig::new("https://runner.example.com")
        .with_user_agent("runner-console-tests")
        .insert_header("x-trace".to_string(), "1".to_string());
    let client = RunnerApiClient::new(config).expect("client");

    let request = client
        .build_start_request("exibir(1)")
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(
        request
            .headers()
            .get("user-agent")
            .map(|value| value.as_bytes()),
        Some("runner-console-tests".as_bytes())
    );
    assert_eq!(
        request.headers().get("x-trace").map(|value| value.as_bytes()),
        Some("1".as_bytes())
    );
}
