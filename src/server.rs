use crate::app::GusterApp;
use crate::page;
use rand::Rng;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

struct Request {
    method: String,
    path: String,
    query: Option<String>,
    headers: HashMap<String, String>,
}

/// Accept loop: one thread per connection, immutable app state behind `Arc`.
/// Visitor history rides in the form token, so handlers share nothing mutable.
pub fn run(app: GusterApp, host: &str, port: u16) -> Result<(), ServerError> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).map_err(|source| ServerError::Bind {
        addr: addr.clone(),
        source,
    })?;
    info!("Serving on http://{}", addr);

    let app = Arc::new(app);
    loop {
        match listener.accept() {
            Ok((stream, peer)) => {
                let app = Arc::clone(&app);
                thread::spawn(move || {
                    if let Err(err) = handle_connection(stream, &app) {
                        debug!("Request from {} not served: {}", peer, err);
                    }
                });
            }
            Err(err) => {
                warn!("Accept failed: {}", err);
                thread::sleep(Duration::from_millis(120));
            }
        }
    }
}

fn handle_connection(stream: TcpStream, app: &GusterApp) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let request = match parse_request(&mut reader) {
        Ok(request) => request,
        Err(err) => {
            debug!("Malformed request: {}", err);
            return Ok(());
        }
    };

    let mut stream = stream;
    if request.path != "/" {
        return write_response(
            &mut stream,
            "HTTP/1.1 404 Not Found",
            "text/plain; charset=utf-8",
            b"Not Found\n",
        );
    }

    match request.method.as_str() {
        "GET" => {
            let params = parse_form(request.query.as_deref().unwrap_or(""));
            let html = respond_page(app, &params, &mut rand::rng());
            write_response(
                &mut stream,
                "HTTP/1.1 200 OK",
                "text/html; charset=utf-8",
                html.as_bytes(),
            )
        }
        "POST" => {
            let length: usize = request
                .headers
                .get("content-length")
                .and_then(|value| value.parse().ok())
                .unwrap_or(0);
            let mut body = vec![0; length];
            reader.read_exact(&mut body)?;
            let params = parse_form(&String::from_utf8_lossy(&body));
            let html = respond_page(app, &params, &mut rand::rng());
            write_response(
                &mut stream,
                "HTTP/1.1 200 OK",
                "text/html; charset=utf-8",
                html.as_bytes(),
            )
        }
        "HEAD" => {
            let html = respond_page(app, &HashMap::new(), &mut rand::rng());
            write_head(
                &mut stream,
                "HTTP/1.1 200 OK",
                "text/html; charset=utf-8",
                html.len(),
            )
        }
        _ => write_response(
            &mut stream,
            "HTTP/1.1 405 Method Not Allowed",
            "text/plain; charset=utf-8",
            b"Method Not Allowed\n",
        ),
    }
}

/// Pick the next image and nickname for one request and render the page with
/// the updated recency token embedded.
fn respond_page(app: &GusterApp, params: &HashMap<String, String>, rng: &mut impl Rng) -> String {
    let previous_nickname = params
        .get("previous_nickname")
        .map(String::as_str)
        .filter(|value| !value.is_empty());
    let recent = parse_recent(params.get("recent_images").map(String::as_str));

    let image_url = app.pick_image(&recent, rng).map(str::to_string);
    let nickname = app.pick_nickname(previous_nickname, rng).map(str::to_string);
    let updated_recent = app.update_recent(&recent, image_url.as_deref());

    page::render_page(image_url.as_deref(), nickname.as_deref(), &updated_recent)
}

fn parse_request(reader: &mut impl BufRead) -> Result<Request, String> {
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .map_err(|err| format!("failed to read request line: {err}"))?;
    if request_line.trim().is_empty() {
        return Err("empty request".to_string());
    }

    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| "missing request method".to_string())?
        .to_string();
    let target = parts
        .next()
        .ok_or_else(|| "missing request path".to_string())?;
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    };

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|err| format!("failed to read header line: {err}"))?;
        if line == "\r\n" || line == "\n" || line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    Ok(Request {
        method,
        path,
        query,
        headers,
    })
}

/// Decode an application/x-www-form-urlencoded string (also used for the URL
/// query). Undecodable values are kept raw rather than dropped.
fn parse_form(raw: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in raw.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let key = decode_component(key);
        let value = decode_component(value);
        params.insert(key, value);
    }
    params
}

fn decode_component(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => plus_decoded,
    }
}

/// The recency token is untrusted round-tripped state: anything that is not a
/// JSON array of strings collapses to an empty history.
fn parse_recent(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(raw) else {
        return Vec::new();
    };
    values
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn write_response(
    stream: &mut impl Write,
    status_line: &str,
    content_type: &str,
    body: &[u8],
) -> std::io::Result<()> {
    let header = format!(
        "{status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(header.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()
}

fn write_head(
    stream: &mut impl Write,
    status_line: &str,
    content_type: &str,
    content_length: usize,
) -> std::io::Result<()> {
    let header = format!(
        "{status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(header.as_bytes())?;
    stream.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    #[test]
    fn test_parse_request_splits_path_and_query() {
        let raw = "GET /?previous_nickname=Gus HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let request = parse_request(&mut Cursor::new(raw)).unwrap();

        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/");
        assert_eq!(request.query.as_deref(), Some("previous_nickname=Gus"));
        assert_eq!(request.headers.get("host").map(String::as_str), Some("localhost"));
    }

    #[test]
    fn test_parse_request_rejects_empty_input() {
        assert!(parse_request(&mut Cursor::new("")).is_err());
        assert!(parse_request(&mut Cursor::new("\r\n")).is_err());
    }

    #[test]
    fn test_parse_form_decodes_plus_and_percent() {
        let params = parse_form("previous_nickname=Magic+Head&token=a%26b");

        assert_eq!(
            params.get("previous_nickname").map(String::as_str),
            Some("Magic Head")
        );
        assert_eq!(params.get("token").map(String::as_str), Some("a&b"));
    }

    #[test]
    fn test_parse_form_skips_bare_keys() {
        let params = parse_form("flag&key=value");
        assert_eq!(params.len(), 1);
        assert!(params.contains_key("key"));
    }

    #[test]
    fn test_parse_recent_accepts_string_arrays_only() {
        assert_eq!(
            parse_recent(Some(r#"["https://a.jpg","https://b.jpg"]"#)),
            vec!["https://a.jpg".to_string(), "https://b.jpg".to_string()]
        );
        // Non-string elements are dropped, not rejected wholesale
        assert_eq!(
            parse_recent(Some(r#"["https://a.jpg", 3, null]"#)),
            vec!["https://a.jpg".to_string()]
        );
    }

    #[test]
    fn test_parse_recent_is_permissive_about_garbage() {
        assert!(parse_recent(None).is_empty());
        assert!(parse_recent(Some("")).is_empty());
        assert!(parse_recent(Some("not json")).is_empty());
        assert!(parse_recent(Some(r#"{"a":1}"#)).is_empty());
    }

    #[test]
    fn test_respond_page_round_trips_history() {
        let app = GusterApp::new(
            vec![
                "https://a.jpg".to_string(),
                "https://b.jpg".to_string(),
                "https://c.jpg".to_string(),
            ],
            vec!["Gus".to_string()],
            10,
        );
        let mut params = HashMap::new();
        params.insert(
            "recent_images".to_string(),
            r#"["https://a.jpg","https://b.jpg"]"#.to_string(),
        );
        let mut rng = StdRng::seed_from_u64(9);

        let html = respond_page(&app, &params, &mut rng);

        // Only c remains eligible; the token now carries all three
        assert!(html.contains("src=\"https://c.jpg\""));
        assert!(html.contains("https://a.jpg&quot;,&quot;https://b.jpg&quot;,&quot;https://c.jpg"));
    }

    #[test]
    fn test_respond_page_with_empty_app_renders_empty_state() {
        let app = GusterApp::default();
        let mut rng = StdRng::seed_from_u64(1);

        let html = respond_page(&app, &HashMap::new(), &mut rng);

        assert!(html.contains("No images available"));
        assert!(html.contains("No nicknames found"));
    }

    #[test]
    fn test_write_response_sets_content_length() {
        let mut sink = Vec::new();
        write_response(
            &mut sink,
            "HTTP/1.1 200 OK",
            "text/html; charset=utf-8",
            b"hello",
        )
        .unwrap();

        let raw = String::from_utf8(sink).unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(raw.contains("Content-Length: 5\r\n"));
        assert!(raw.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn test_write_head_has_no_body() {
        let mut sink = Vec::new();
        write_head(&mut sink, "HTTP/1.1 200 OK", "text/html; charset=utf-8", 120).unwrap();

        let raw = String::from_utf8(sink).unwrap();
        assert!(raw.contains("Content-Length: 120\r\n"));
        assert!(raw.ends_with("\r\n\r\n"));
    }
}
