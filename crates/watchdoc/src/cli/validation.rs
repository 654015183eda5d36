/// Parse a TCP port, refusing 0.
///
/// Port 0 would bind an ephemeral port the browser launcher cannot know.
///
/// # Errors
///
/// Returns an error message if the value is not a number in `1..=65535`.
pub fn parse_port(s: &str) -> Result<u16, String> {
    let port: u16 = s
        .trim()
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535: '{}'", s))?;

    if port == 0 {
        return Err("Port must be between 1 and 65535".to_string());
    }

    Ok(port)
}

/// Parse a bind host. Only emptiness is rejected here; the address is
/// resolved once the whole configuration is merged.
pub fn parse_host(s: &str) -> Result<String, String> {
    let host = s.trim();
    if host.is_empty() {
        return Err("Host cannot be empty".to_string());
    }
    Ok(host.to_string())
}
