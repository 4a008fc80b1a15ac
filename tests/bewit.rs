use hawk_server::{
    Authenticator, Credentials, CredentialsFn, Error, FixedClock, InvalidBewit, Key,
    MemoryNonceStore, RequestBuilder, Unauthorized, SHA256,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use url::Url;

const NOW: i64 = 1356420407;

fn load(id: &str) -> Result<Credentials, failure::Error> {
    if id == "123456" {
        Ok(Credentials::new(
            id,
            Key::new("werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn", SHA256)?,
        ))
    } else {
        Err(failure::format_err!("no credentials for {}", id))
    }
}

type TestAuthenticator =
    Authenticator<CredentialsFn<fn(&str) -> Result<Credentials, failure::Error>>, MemoryNonceStore>;

fn authenticator(now: i64) -> TestAuthenticator {
    Authenticator::builder(
        CredentialsFn(load as fn(&str) -> _),
        MemoryNonceStore::new(Duration::from_secs(120)),
    )
    .time_provider(FixedClock(now))
    .build()
    .unwrap()
}

fn rejection<T: std::fmt::Debug>(result: Result<T, Error>) -> Unauthorized {
    match result {
        Err(Error::Unauthorized(reason)) => reason,
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[test]
fn bewit_from_url() {
    let credentials = load("123456").unwrap();
    let mut url = Url::parse("http://example.com:8080/resource/4?a=1&b=2").unwrap();
    let bewit = RequestBuilder::from_url("GET", &url)
        .unwrap()
        .ext("some-app-data")
        .request()
        .make_bewit(&credentials, NOW + 300)
        .unwrap();
    let query = format!("a=1&b=2&bewit={}", bewit.to_str());
    url.set_query(Some(&query));

    let resource = &url[url::Position::BeforePath..url::Position::AfterQuery];
    let response = authenticator(NOW)
        .authenticate_bewit("example.com", 8080, resource)
        .unwrap();
    assert_eq!(response.credentials.id, "123456");
    assert_eq!(response.artifacts.method(), "GET");
    assert_eq!(response.artifacts.resource(), "/resource/4?a=1&b=2");
    assert_eq!(response.artifacts.ts(), NOW + 300);
    assert_eq!(response.artifacts.ext(), Some("some-app-data"));
}

#[test]
fn known_bewit() {
    let resource = "/resource/4?a=1&b=2&bewit=MTIzNDU2XDEzNTY0MjA3MDdcK0lUL1pkN1VyYjE5WGwzOUNwK01z\
                    cjBqS1craUhEL20zYm5xTm9oUzFJQT1cc29tZS1hcHAtZGF0YQ";
    let response = authenticator(NOW)
        .authenticate_bewit("example.com", 8080, resource)
        .unwrap();
    assert_eq!(response.artifacts.ext(), Some("some-app-data"));

    // the same bewit is bound to the port it was made for
    assert_eq!(
        rejection(authenticator(NOW).authenticate_bewit("example.com", 8000, resource)),
        Unauthorized::BadMac
    );
}

#[test]
fn bewit_in_middle_of_query() {
    let credentials = load("123456").unwrap();
    let bewit = RequestBuilder::new("GET", "example.com", 443, "/files?x=1&y=2")
        .request()
        .make_bewit(&credentials, NOW + 10)
        .unwrap();
    let resource = format!("/files?x=1&bewit={}&y=2", bewit.to_str());
    let response = authenticator(NOW)
        .authenticate_bewit("example.com", 443, &resource)
        .unwrap();
    assert_eq!(response.artifacts.resource(), "/files?x=1&y=2");
    assert_eq!(response.artifacts.ext(), None);
}

#[test]
fn expired_bewit() {
    let credentials = load("123456").unwrap();
    let bewit = RequestBuilder::new("GET", "example.com", 443, "/files")
        .request()
        .make_bewit(&credentials, NOW - 1)
        .unwrap();
    let resource = format!("/files?bewit={}", bewit.to_str());
    assert_eq!(
        rejection(authenticator(NOW).authenticate_bewit("example.com", 443, &resource)),
        Unauthorized::AccessExpired
    );
}

#[test]
fn tampered_resource() {
    let credentials = load("123456").unwrap();
    let bewit = RequestBuilder::new("GET", "example.com", 443, "/files/1")
        .request()
        .make_bewit(&credentials, NOW + 60)
        .unwrap();
    let resource = format!("/files/2?bewit={}", bewit.to_str());
    assert_eq!(
        rejection(authenticator(NOW).authenticate_bewit("example.com", 443, &resource)),
        Unauthorized::BadMac
    );
}

#[test]
fn unknown_id() {
    let other = Credentials::new(
        "654321",
        Key::new("werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn", SHA256).unwrap(),
    );
    let bewit = RequestBuilder::new("GET", "example.com", 443, "/files")
        .request()
        .make_bewit(&other, NOW + 60)
        .unwrap();
    let resource = format!("/files?bewit={}", bewit.to_str());
    match authenticator(NOW).authenticate_bewit("example.com", 443, &resource) {
        Err(Error::Credentials(e)) => assert_eq!(e.to_string(), "no credentials for 654321"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn malformed_bewits() {
    let auth = authenticator(NOW);
    assert_eq!(
        rejection(auth.authenticate_bewit("example.com", 443, "/files")),
        Unauthorized::MalformedResource
    );
    assert_eq!(
        rejection(auth.authenticate_bewit("example.com", 443, "/files?bewit=")),
        Unauthorized::MalformedResource
    );
    assert_eq!(
        rejection(auth.authenticate_bewit("example.com", 443, "/files?bewit=%%%")),
        Unauthorized::InvalidBewit(InvalidBewit::Encoding)
    );
    assert_eq!(
        rejection(auth.authenticate_bewit("example.com", 443, "/files?bewit=YWJj")),
        Unauthorized::InvalidBewit(InvalidBewit::Format)
    );
    assert_eq!(
        rejection(auth.authenticate_bewit("example.com", 443, "/files?bewit=a&bewit=b")),
        Unauthorized::InvalidBewit(InvalidBewit::Multiple)
    );
}

#[test]
fn rejection_reasons() {
    assert_eq!(
        Unauthorized::InvalidBewit(InvalidBewit::Exp).to_string(),
        "invalid bewit: bad exp"
    );
    assert_eq!(
        Unauthorized::MalformedResource.to_string(),
        "malformed resource or missing bewit"
    );
    assert_eq!(Unauthorized::AccessExpired.to_string(), "access expired");
}
