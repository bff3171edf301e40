use axum::http::{HeaderMap, Method, Uri, header};

/// Header carrying the correlation id of a request
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Read-only view over the inbound request
#[derive(Debug, Clone)]
pub struct RequestView {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    id: Option<String>,
}

impl RequestView {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, `None` when missing or not visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Correlation id: the `x-request-id` header wins over an assigned id
    pub fn id(&self) -> Option<&str> {
        self.header(REQUEST_ID_HEADER)
            .filter(|id| !id.is_empty())
            .or(self.id.as_deref())
    }

    /// Pick the candidate the client prefers according to `Accept`.
    ///
    /// Candidates are short names (`json`, `html`, `jsonapi`, `text`) or full
    /// media types. Returns `None` when the header is missing or refuses every
    /// candidate.
    pub fn accepts<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        let accept = self.header(header::ACCEPT.as_str())?;
        negotiate(accept, candidates)
    }
}

fn media_type_for(candidate: &str) -> &str {
    match candidate {
        "json" => "application/json",
        "jsonapi" => "application/vnd.api+json",
        "html" => "text/html",
        "text" => "text/plain",
        other => other,
    }
}

#[derive(Debug)]
struct MediaRange<'h> {
    kind: &'h str,
    subtype: &'h str,
    quality: f32,
}

impl MediaRange<'_> {
    /// 0 = no match, higher = more specific
    fn specificity(&self, media_type: &str) -> u8 {
        let Some((kind, subtype)) = media_type.split_once('/') else {
            return 0;
        };
        match (self.kind, self.subtype) {
            ("*", "*") => 1,
            (k, "*") if k.eq_ignore_ascii_case(kind) => 2,
            (k, s) if k.eq_ignore_ascii_case(kind) && s.eq_ignore_ascii_case(subtype) => 3,
            _ => 0,
        }
    }
}

fn parse_accept(header: &str) -> Vec<MediaRange<'_>> {
    header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';').map(str::trim);
            let (kind, subtype) = parts.next()?.split_once('/')?;
            let quality = parts
                .filter_map(|param| param.split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
                .and_then(|(_, value)| value.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(MediaRange {
                kind: kind.trim(),
                subtype: subtype.trim(),
                quality,
            })
        })
        .collect()
}

fn negotiate<'a>(accept: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let ranges = parse_accept(accept);
    let mut best: Option<(&'a str, f32, u8)> = None;

    for &candidate in candidates {
        let media_type = media_type_for(candidate);
        // The most specific matching range decides the quality for a type.
        let matched = ranges
            .iter()
            .map(|range| (range.specificity(media_type), range.quality))
            .filter(|(specificity, _)| *specificity > 0)
            .max_by_key(|(specificity, _)| *specificity);

        let Some((specificity, quality)) = matched else {
            continue;
        };
        if quality <= 0.0 {
            continue;
        }

        let better = match best {
            None => true,
            Some((_, best_quality, best_specificity)) => {
                quality > best_quality
                    || (quality == best_quality && specificity > best_specificity)
            }
        };
        if better {
            best = Some((candidate, quality, specificity));
        }
    }

    best.map(|(candidate, _, _)| candidate)
}
