//! # Credential Link Codec
//!
//! Packs a list of [`SelectedCredential`]s into the single persisted
//! `credentialLink` string and unpacks it again.
//!
//! ## Encoded form
//!
//! A JSON array of tokens, one per credential, each `"<fileId>,<json body>"`.
//! A credential whose body is unknown is written as its bare `fileId`. An
//! empty list encodes as the empty string, never `"[]"`.
//!
//! ## Decoding
//!
//! Stored resumes carry several historical token grammars. Each token is
//! matched against [`GRAMMARS`] in order and the first matcher that claims
//! it decides the result:
//!
//! 1. [`Grammar::Wrapped`] — `{"fileId": …, "credentialLink": …}`; the inner
//!    link is decoded with grammars 2–5.
//! 2. [`Grammar::IdPrefixed`] — `<bare-id>,{…}`.
//! 3. [`Grammar::Located`] — `<locator>,{…}` where the locator is a URL or
//!    any other non-bare prefix; the body's own id is preferred.
//! 4. [`Grammar::Bare`] — a JSON object carrying `id` or `credentialId`.
//! 5. [`Grammar::PlainId`] — anything else, an identifier without a body.
//!
//! A matcher that claims a token but cannot parse it yields a
//! [`LinkError`]; that token is dropped and decoding continues.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::credential::{RawCredential, SelectedCredential};
use crate::dedupe::dedupe;

/// Why a single token could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The embedded credential body is not a JSON object.
    #[error("credential body is not a valid JSON object: {0}")]
    MalformedJson(String),

    /// A bare credential body carries neither `id` nor `credentialId`.
    #[error("credential body has no id or credentialId")]
    MissingIdentifier,

    /// The outer field looks like a JSON array but does not parse.
    #[error("credential link list is not a valid JSON array: {0}")]
    MalformedList(String),

    /// The outer array contains something other than a string or object.
    #[error("unexpected {0} element in credential link list")]
    UnexpectedElement(&'static str),

    /// The token is empty.
    #[error("empty credential link token")]
    EmptyToken,
}

/// The decode grammars, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    Wrapped,
    IdPrefixed,
    Located,
    Bare,
    PlainId,
}

/// A token matched against one grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLink {
    /// `{"fileId": …, "credentialLink": …}` around an inner link.
    Wrapped {
        file_id: String,
        inner: Box<DecodedLink>,
    },
    /// `<id>,{…}`: the id is both locator and dedup key.
    IdPrefixed {
        id: String,
        credential: RawCredential,
    },
    /// `<locator>,{…}`: the locator is only a fallback.
    Located {
        locator: String,
        credential: RawCredential,
    },
    /// `{…}` with its own identifier.
    Bare {
        id: String,
        credential: RawCredential,
    },
    /// An identifier with no embedded body.
    PlainId(String),
}

impl DecodedLink {
    /// Which grammar produced this link.
    pub fn grammar(&self) -> Grammar {
        match self {
            Self::Wrapped { .. } => Grammar::Wrapped,
            Self::IdPrefixed { .. } => Grammar::IdPrefixed,
            Self::Located { .. } => Grammar::Located,
            Self::Bare { .. } => Grammar::Bare,
            Self::PlainId(_) => Grammar::PlainId,
        }
    }

    /// Convert into the in-memory attachment record.
    pub fn into_selected(self) -> SelectedCredential {
        match self {
            Self::Wrapped { file_id, inner } => {
                let mut selected = inner.into_selected();
                if !file_id.is_empty() {
                    selected.file_id = file_id;
                }
                selected
            }
            Self::IdPrefixed { id, credential } | Self::Bare { id, credential } => {
                SelectedCredential::new(id.clone(), id, Some(credential))
            }
            Self::Located {
                locator,
                credential,
            } => {
                let id = credential
                    .identifier()
                    .map(str::to_owned)
                    .unwrap_or(locator);
                SelectedCredential::new(id.clone(), id, Some(credential))
            }
            Self::PlainId(id) => SelectedCredential::reference(id),
        }
    }
}

/// A token that was dropped during decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedToken {
    /// Position of the token in the stored list.
    pub position: usize,
    /// The token text (or element JSON).
    pub token: String,
    /// Why it was dropped.
    pub error: LinkError,
}

/// Full decode result: the credentials that parsed plus the tokens dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    pub credentials: Vec<SelectedCredential>,
    pub malformed: Vec<MalformedToken>,
}

impl DecodeReport {
    /// True when every token decoded.
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

/// A grammar matcher: `None` when the token is not in its grammar.
pub type Matcher = fn(&str) -> Option<Result<DecodedLink, LinkError>>;

/// Token grammars in the order they are tried.
pub const GRAMMARS: [(Grammar, Matcher); 5] = [
    (Grammar::Wrapped, match_wrapped as Matcher),
    (Grammar::IdPrefixed, match_id_prefixed as Matcher),
    (Grammar::Located, match_located as Matcher),
    (Grammar::Bare, match_bare as Matcher),
    (Grammar::PlainId, match_plain_id as Matcher),
];

/// Encode a credential list into the persisted `credentialLink` form.
///
/// The list is deduplicated first. Credentials with neither a resolvable
/// `fileId` nor a body are skipped.
pub fn encode(items: &[SelectedCredential]) -> String {
    let tokens: Vec<Value> = dedupe(items)
        .iter()
        .filter_map(encode_token)
        .map(Value::String)
        .collect();
    if tokens.is_empty() {
        return String::new();
    }
    Value::Array(tokens).to_string()
}

fn encode_token(item: &SelectedCredential) -> Option<String> {
    match (item.resolved_file_id(), &item.credential) {
        (Some(file_id), Some(body)) => Some(format!("{file_id},{}", body.to_json())),
        (None, Some(body)) => Some(body.to_json()),
        (Some(file_id), None) => Some(file_id.to_string()),
        (None, None) => None,
    }
}

/// Decode a persisted `credentialLink`, logging and dropping malformed tokens.
pub fn decode(stored: &str) -> Vec<SelectedCredential> {
    let report = decode_with_report(stored);
    for m in &report.malformed {
        tracing::warn!(
            position = m.position,
            error = %m.error,
            "dropping malformed credential link token"
        );
    }
    report.credentials
}

/// Decode a persisted `credentialLink`, returning dropped tokens alongside.
pub fn decode_with_report(stored: &str) -> DecodeReport {
    let mut report = DecodeReport::default();
    for (position, token) in split_tokens(stored).into_iter().enumerate() {
        let parsed = token.and_then(|t| match parse_token(&t) {
            Ok(link) => Ok(link),
            Err(error) => Err((t, error)),
        });
        match parsed {
            Ok(link) => {
                tracing::debug!(position, grammar = ?link.grammar(), "decoded credential link token");
                report.credentials.push(link.into_selected());
            }
            Err((token, error)) => report.malformed.push(MalformedToken {
                position,
                token,
                error,
            }),
        }
    }
    report
}

/// Split the outer field into single tokens.
///
/// The normal case is a JSON array of strings. A JSON string literal and a
/// lone unquoted token are accepted as one-element lists.
fn split_tokens(stored: &str) -> Vec<Result<String, (String, LinkError)>> {
    let trimmed = stored.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.starts_with('[') {
        return match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(elements) => elements
                .into_iter()
                .filter(|e| !e.is_null())
                .map(|element| match element {
                    Value::String(s) => Ok(s),
                    Value::Object(_) => Ok(element.to_string()),
                    Value::Array(_) => Err((element.to_string(), LinkError::UnexpectedElement("array"))),
                    Value::Bool(_) => Err((element.to_string(), LinkError::UnexpectedElement("boolean"))),
                    Value::Number(n) => Ok(n.to_string()),
                    Value::Null => Err((String::new(), LinkError::UnexpectedElement("null"))),
                })
                .collect(),
            Err(e) => vec![Err((trimmed.to_string(), LinkError::MalformedList(e.to_string())))],
        };
    }
    if trimmed.starts_with('"') {
        if let Ok(Value::String(s)) = serde_json::from_str::<Value>(trimmed) {
            return vec![Ok(s)];
        }
    }
    vec![Ok(trimmed.to_string())]
}

/// Decode one token with the full grammar list.
pub fn parse_token(token: &str) -> Result<DecodedLink, LinkError> {
    parse_with(token, &GRAMMARS)
}

fn parse_with(token: &str, grammars: &[(Grammar, Matcher)]) -> Result<DecodedLink, LinkError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(LinkError::EmptyToken);
    }
    grammars
        .iter()
        .find_map(|(_, matcher)| matcher(token))
        .unwrap_or(Err(LinkError::EmptyToken))
}

fn parse_object(text: &str) -> Result<Map<String, Value>, LinkError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(LinkError::MalformedJson(format!("expected object, got {other}"))),
        Err(e) => Err(LinkError::MalformedJson(e.to_string())),
    }
}

fn bare_from_object(map: Map<String, Value>) -> Result<DecodedLink, LinkError> {
    let credential = RawCredential::new(Value::Object(map));
    let id = credential
        .identifier()
        .map(str::to_owned)
        .ok_or(LinkError::MissingIdentifier)?;
    Ok(DecodedLink::Bare { id, credential })
}

/// An identifier that needs no further interpretation: ASCII alphanumerics
/// plus `-`, `_` and `.`. Drive file ids and store keys qualify; URLs and
/// `urn:` identifiers do not.
fn is_bare_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn match_wrapped(token: &str) -> Option<Result<DecodedLink, LinkError>> {
    if !token.starts_with('{') {
        return None;
    }
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(token) else {
        return None;
    };
    if !map.contains_key("fileId") || !map.contains_key("credentialLink") {
        return None;
    }
    let file_id = map
        .get("fileId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let inner = match map.get("credentialLink") {
        Some(Value::String(s)) if s.trim().is_empty() && !file_id.is_empty() => {
            Ok(DecodedLink::PlainId(file_id.clone()))
        }
        Some(Value::String(s)) => parse_with(s, &GRAMMARS[1..]),
        Some(Value::Object(inner)) => bare_from_object(inner.clone()),
        _ if !file_id.is_empty() => Ok(DecodedLink::PlainId(file_id.clone())),
        _ => Err(LinkError::EmptyToken),
    };
    Some(inner.map(|inner| DecodedLink::Wrapped {
        file_id,
        inner: Box::new(inner),
    }))
}

fn match_id_prefixed(token: &str) -> Option<Result<DecodedLink, LinkError>> {
    let (prefix, rest) = token.split_once(',')?;
    let prefix = prefix.trim();
    let rest = rest.trim_start();
    if !is_bare_identifier(prefix) || !rest.starts_with('{') {
        return None;
    }
    Some(parse_object(rest).map(|map| DecodedLink::IdPrefixed {
        id: prefix.to_string(),
        credential: RawCredential::new(Value::Object(map)),
    }))
}

fn match_located(token: &str) -> Option<Result<DecodedLink, LinkError>> {
    // A token opening with `{` is a bare body; its nested `,{` is not a locator split.
    if token.starts_with('{') || !token.contains(",{") {
        return None;
    }
    let (locator, rest) = token.split_once(',')?;
    let locator = locator.trim().to_string();
    Some(parse_object(rest.trim_start()).and_then(|map| {
        let credential = RawCredential::new(Value::Object(map));
        if locator.is_empty() && credential.identifier().is_none() {
            return Err(LinkError::MissingIdentifier);
        }
        Ok(DecodedLink::Located {
            locator,
            credential,
        })
    }))
}

fn match_bare(token: &str) -> Option<Result<DecodedLink, LinkError>> {
    if !token.starts_with('{') {
        return None;
    }
    Some(parse_object(token).and_then(bare_from_object))
}

fn match_plain_id(token: &str) -> Option<Result<DecodedLink, LinkError>> {
    Some(Ok(DecodedLink::PlainId(token.to_string())))
}
