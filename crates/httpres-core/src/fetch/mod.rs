//! Single HTTP GET against a resource descriptor.
//!
//! Uses the curl crate (libcurl) with one easy handle per request. The body
//! is never buffered: it is pushed chunk by chunk into a [`BodySink`], which
//! sees the final response head before the first byte and may decline the
//! body altogether.

mod parse;
mod sink;

pub use sink::{BodyDisposition, BodySink, WriteSink};

use crate::config::Settings;
use crate::error::{ResourceError, Result};
use crate::source::{BasicAuth, Source};
use curl::easy::{Auth, Easy, List};
use std::cell::RefCell;
use std::str;
use std::time::Duration;

/// Status and headers of the final response (after redirects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u32,
    /// Header lines in arrival order, values trimmed.
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Entity tag exactly as sent, if present and non-empty.
    pub fn etag(&self) -> Option<&str> {
        self.header("etag").filter(|v| !v.is_empty())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_modified(&self) -> bool {
        self.status == 304
    }
}

/// Prepared GET for one resource. Holds only validated configuration; every
/// call to [`Fetcher::get`] opens a fresh connection.
#[derive(Debug, Clone)]
pub struct Fetcher {
    url: String,
    header_lines: Vec<String>,
    basic_auth: Option<BasicAuth>,
    timeout: Duration,
    connect_timeout: Duration,
    follow_redirects: bool,
    max_redirections: u32,
    user_agent: String,
}

/// Per-transfer bookkeeping shared with the curl write callback.
#[derive(Default)]
struct Exchange {
    head: Option<ResponseHead>,
    skipped: bool,
    failure: Option<ResourceError>,
}

impl Fetcher {
    /// Validates `source` against `settings`. Nothing touches the network here.
    ///
    /// Timeout problems surface first, then URL, then header problems.
    pub fn new(source: &Source, settings: &Settings) -> Result<Self> {
        let timeout = source.timeout_or(settings.default_timeout()?)?;
        validate_url(&source.url)?;
        let header_lines = source
            .header_lines()?
            .into_iter()
            .map(|(name, value)| curl_header_line(name, value))
            .collect();

        let connect_timeout = if timeout.is_zero() {
            settings.connect_timeout()
        } else {
            settings.connect_timeout().min(timeout)
        };

        Ok(Self {
            url: source.url.trim().to_string(),
            header_lines,
            basic_auth: source.basic_auth.clone(),
            timeout,
            connect_timeout,
            follow_redirects: settings.follow_redirects,
            max_redirections: settings.max_redirections,
            user_agent: settings.user_agent.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Overall timeout; zero means none.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Performs one GET. With `if_none_match`, the request carries
    /// `If-None-Match` so the server may answer 304.
    ///
    /// 2xx and 304 responses are handed to `sink`; any other final status
    /// fails without reading the body. Runs in the current thread.
    pub fn get(&self, if_none_match: Option<&str>, sink: &mut dyn BodySink) -> Result<ResponseHead> {
        let mut easy = self.prepare(if_none_match)?;
        let header_lines: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let mut exchange = Exchange::default();

        tracing::debug!(
            url = %self.url,
            conditional = if_none_match.is_some(),
            timeout = ?self.timeout,
            "GET"
        );

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        header_lines.borrow_mut().push(s.trim_end().to_string());
                    }
                    true
                })
                .map_err(|e| self.request_error(e))?;
            transfer
                .write_function(|data| {
                    if exchange.head.is_none() {
                        match self.open(&header_lines.borrow(), sink) {
                            Ok((head, BodyDisposition::Read)) => exchange.head = Some(head),
                            Ok((head, BodyDisposition::Skip)) => {
                                exchange.head = Some(head);
                                exchange.skipped = true;
                                return Ok(0); // abort transfer
                            }
                            Err(e) => {
                                exchange.failure = Some(e);
                                return Ok(0);
                            }
                        }
                    }
                    match sink.on_chunk(data) {
                        Ok(()) => Ok(data.len()),
                        Err(e) => {
                            exchange.failure = Some(e);
                            Ok(0)
                        }
                    }
                })
                .map_err(|e| self.request_error(e))?;
            transfer.perform()
        };

        if let Some(failure) = exchange.failure {
            return Err(failure);
        }
        if let Err(e) = performed {
            if !(exchange.skipped && e.is_write_error()) {
                return Err(self.transfer_error(e));
            }
        }

        let head = match exchange.head {
            Some(head) => head,
            // No body bytes arrived (304 or empty body): the sink still sees the head.
            None => self.open(&header_lines.into_inner(), sink)?.0,
        };
        tracing::debug!(
            url = %self.url,
            status = head.status,
            etag = head.etag().unwrap_or(""),
            skipped = exchange.skipped,
            "response"
        );
        Ok(head)
    }

    /// Parses the final head, rejects unexpected statuses, and asks the sink
    /// what to do with the body.
    fn open(&self, lines: &[String], sink: &mut dyn BodySink) -> Result<(ResponseHead, BodyDisposition)> {
        let head = parse::parse_head(lines);
        if !head.is_success() && !head.is_not_modified() {
            return Err(ResourceError::HttpStatus {
                url: self.url.clone(),
                code: head.status,
            });
        }
        let disposition = sink.on_head(&head)?;
        Ok((head, disposition))
    }

    fn prepare(&self, if_none_match: Option<&str>) -> Result<Easy> {
        let setopt = |e: curl::Error| self.request_error(e);

        let mut easy = Easy::new();
        easy.url(&self.url).map_err(setopt)?;
        easy.get(true).map_err(setopt)?;
        easy.follow_location(self.follow_redirects).map_err(setopt)?;
        if self.follow_redirects {
            easy.max_redirections(self.max_redirections).map_err(setopt)?;
        }
        easy.connect_timeout(self.connect_timeout).map_err(setopt)?;
        easy.timeout(self.timeout).map_err(setopt)?;
        easy.useragent(&self.user_agent).map_err(setopt)?;

        if let Some(auth) = &self.basic_auth {
            let mut scheme = Auth::new();
            scheme.basic(true);
            easy.http_auth(&scheme).map_err(setopt)?;
            easy.username(&auth.user).map_err(setopt)?;
            easy.password(&auth.password).map_err(setopt)?;
        }

        let mut list = List::new();
        for line in &self.header_lines {
            list.append(line).map_err(setopt)?;
        }
        if let Some(tag) = if_none_match {
            if tag.bytes().any(|b| b == b'\r' || b == b'\n' || b == 0) {
                return Err(ResourceError::InvalidHeader {
                    name: "If-None-Match".to_string(),
                    reason: "value contains CR, LF or NUL".to_string(),
                });
            }
            list.append(&format!("If-None-Match: {}", tag)).map_err(setopt)?;
        }
        easy.http_headers(list).map_err(setopt)?;

        Ok(easy)
    }

    fn request_error(&self, source: curl::Error) -> ResourceError {
        ResourceError::Request {
            url: self.url.clone(),
            source,
        }
    }

    fn transfer_error(&self, source: curl::Error) -> ResourceError {
        if source.is_operation_timedout() {
            ResourceError::Timeout {
                url: self.url.clone(),
                timeout: self.timeout,
                source,
            }
        } else if source.is_url_malformed() || source.is_unsupported_protocol() {
            self.request_error(source)
        } else {
            ResourceError::Network {
                url: self.url.clone(),
                source,
            }
        }
    }
}

fn validate_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| ResourceError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ResourceError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// libcurl drops a header given as `Name:`; `Name;` sends it with an empty value.
fn curl_header_line(name: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{};", name)
    } else {
        format!("{}: {}", name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn new_applies_settings_and_source_timeout() {
        let mut source = Source::new("https://example.com/file");
        source.timeout = Some("45s".to_string());
        let fetcher = Fetcher::new(&source, &Settings::default()).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(45));
        assert_eq!(fetcher.connect_timeout, Duration::from_secs(30));
        assert_eq!(fetcher.url(), "https://example.com/file");
    }

    #[test]
    fn connect_timeout_capped_by_overall_timeout() {
        let mut source = Source::new("http://example.com/");
        source.timeout = Some("2s".to_string());
        let fetcher = Fetcher::new(&source, &Settings::default()).unwrap();
        assert_eq!(fetcher.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn default_timeout_is_five_minutes() {
        let fetcher = Fetcher::new(&Source::new("http://example.com/"), &Settings::default()).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn timeout_error_wins_over_url_error() {
        let mut source = Source::new("not a url");
        source.timeout = Some("5 parsecs".to_string());
        let err = Fetcher::new(&source, &Settings::default()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn rejects_bad_urls() {
        for url in ["not a url", "ftp://example.com/file", "/relative/path"] {
            let err = Fetcher::new(&Source::new(url), &Settings::default()).unwrap_err();
            assert_eq!(err.class(), ErrorClass::RequestConstruction, "{url}");
        }
    }

    #[test]
    fn header_lines_formatted_for_curl() {
        let mut source = Source::new("http://example.com/");
        source.headers.insert(
            "X-Multi".to_string(),
            vec!["one".to_string(), "two".to_string()],
        );
        source.headers.insert("X-Empty".to_string(), vec![String::new()]);
        let fetcher = Fetcher::new(&source, &Settings::default()).unwrap();
        assert_eq!(
            fetcher.header_lines,
            vec!["X-Empty;", "X-Multi: one", "X-Multi: two"]
        );
    }

    #[test]
    fn response_head_helpers() {
        let head = ResponseHead {
            status: 204,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("ETag".to_string(), "\"1\"".to_string()),
            ],
        };
        assert!(head.is_success());
        assert!(!head.is_not_modified());
        assert_eq!(head.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(head.etag(), Some("\"1\""));
        assert_eq!(head.header("missing"), None);
    }
}
