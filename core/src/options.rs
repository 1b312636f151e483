//! URL string to `RequestDescriptor` translation.

use url::Url;

use crate::http::{HttpMethod, RequestDescriptor, Scheme};

/// Translate `url` into a descriptor.
///
/// `use_https` decides the scheme; whatever scheme the URL text names is
/// ignored. The port is the one written in the URL, or 0 when there is none.
/// Input that does not parse as an absolute URL yields an empty host.
pub fn get_options_from_url_string(url: &str, use_https: bool) -> RequestDescriptor {
    let scheme = Scheme::from_https_flag(use_https);

    let Ok(parsed) = Url::parse(url) else {
        log::trace!("unparseable url {url:?}, using empty descriptor");
        return RequestDescriptor {
            host: String::new(),
            port: 0,
            path: if url.starts_with('/') { url.to_string() } else { String::new() },
            scheme,
            method: HttpMethod::Get,
        };
    };

    let mut path = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }

    RequestDescriptor {
        host: parsed.host_str().map(strip_brackets).unwrap_or_default().to_string(),
        port: parsed.port().or_else(|| written_port(url)).unwrap_or(0),
        path,
        scheme,
        method: HttpMethod::Get,
    }
}

// `Url::port` hides a port equal to the scheme's well-known one.
fn written_port(url: &str) -> Option<u16> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '\\', '?', '#']).next()?;
    let host_port = authority.rsplit('@').next()?;
    let (_, port) = host_port.rsplit_once(':')?;
    if port.contains(']') {
        return None;
    }
    port.parse().ok()
}

fn strip_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}
