//! The canonical string-to-sign. Signer and verifier both build this
//! byte-for-byte, from raw request bytes only — no normalization, no
//! percent-decoding/re-encoding of path or query.

/// Strips everything from the first `:` onward, i.e. the port.
pub fn host_without_port(host_header: &str) -> &str {
    match host_header.find(':') {
        Some(idx) => &host_header[..idx],
        None => host_header,
    }
}

/// Builds the string signed by the client and checked by the server:
/// ```text
/// method "\n" host-without-port "\n" raw-path "\n" raw-query-string "\n"
/// request-id "\n" session-token-or-empty
/// ```
/// A pure function of its inputs: identical inputs always produce
/// identical bytes.
pub fn canonical_string(
    method: &str,
    host_header: &str,
    raw_path: &str,
    raw_query: &str,
    request_id: &str,
    session_token: Option<&str>,
) -> String {
    let host = host_without_port(host_header);
    let token = session_token.unwrap_or("");
    format!("{method}\n{host}\n{raw_path}\n{raw_query}\n{request_id}\n{token}")
}
