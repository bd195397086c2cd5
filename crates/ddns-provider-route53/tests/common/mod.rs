//! In-process fakes for Route53 and the IP-echo service
//!
//! Each fake is a `TcpListener` on 127.0.0.1 that answers one request per
//! connection with a canned response and records what it received.

#![allow(dead_code)]

use ddns_provider_route53::{CredentialProvider, Credentials, Route53Factory, Route53Settings};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const NS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

/// A request seen by a fake server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// How the fake Route53 answers
#[derive(Debug, Clone)]
pub struct FakeRoute53Behavior {
    /// Zone pages as (id, name) lists; every page but the last is truncated
    pub zone_pages: Vec<Vec<(&'static str, &'static str)>>,
    /// Answer ChangeResourceRecordSets with 403
    pub deny_changes: bool,
}

impl FakeRoute53Behavior {
    pub fn single_page(zones: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            zone_pages: vec![zones],
            deny_changes: false,
        }
    }
}

/// A running fake Route53 endpoint
pub struct FakeRoute53 {
    pub endpoint_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeRoute53 {
    pub async fn start(behavior: FakeRoute53Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let Some(request) = read_request(&mut socket).await else {
                    continue;
                };
                let (status, body) = route53_response(&behavior, &request);
                recorded.lock().unwrap().push(request);
                write_response(&mut socket, status, "text/xml", &body).await;
            }
        });

        Self {
            endpoint_url,
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// ChangeResourceRecordSets requests received so far
    pub fn change_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST" && r.path.contains("/rrset"))
            .collect()
    }

    /// ListHostedZones requests received so far
    pub fn list_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "GET" && r.path.starts_with("/2013-04-01/hostedzone"))
            .collect()
    }

    /// A factory wired to this endpoint with static test credentials
    pub fn factory(&self, dry_run: bool) -> Route53Factory {
        Route53Factory::new(
            CredentialProvider::Static(Credentials::new(
                "AKIDEXAMPLE",
                "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
                None,
                None,
                "test",
            )),
            Route53Settings {
                region: Some("us-east-1".to_string()),
                endpoint_url: Some(self.endpoint_url.clone()),
                dry_run,
            },
        )
    }
}

fn route53_response(behavior: &FakeRoute53Behavior, request: &RecordedRequest) -> (&'static str, String) {
    if request.method == "POST" && request.path.contains("/rrset") {
        if behavior.deny_changes {
            return ("403 Forbidden", error_xml("AccessDenied", "User is not authorized to perform route53:ChangeResourceRecordSets"));
        }
        return ("200 OK", change_xml());
    }

    if request.method == "GET" && request.path.starts_with("/2013-04-01/hostedzone") {
        let page = request
            .path
            .split("marker=PAGE")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        return ("200 OK", list_xml(behavior, page));
    }

    ("404 Not Found", error_xml("NotFound", "unknown route"))
}

fn list_xml(behavior: &FakeRoute53Behavior, page: usize) -> String {
    let zones = behavior.zone_pages.get(page).cloned().unwrap_or_default();
    let truncated = page + 1 < behavior.zone_pages.len();

    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><ListHostedZonesResponse xmlns="{NS}"><HostedZones>"#
    );
    for (i, (id, name)) in zones.iter().enumerate() {
        xml.push_str(&format!(
            "<HostedZone><Id>{id}</Id><Name>{name}</Name><CallerReference>ref-{page}-{i}</CallerReference>\
             <Config><PrivateZone>false</PrivateZone></Config><ResourceRecordSetCount>2</ResourceRecordSetCount></HostedZone>"
        ));
    }
    xml.push_str("</HostedZones>");
    if page > 0 {
        xml.push_str(&format!("<Marker>PAGE{page}</Marker>"));
    }
    xml.push_str(&format!("<IsTruncated>{truncated}</IsTruncated>"));
    if truncated {
        xml.push_str(&format!("<NextMarker>PAGE{}</NextMarker>", page + 1));
    }
    xml.push_str("<MaxItems>100</MaxItems></ListHostedZonesResponse>");
    xml
}

fn change_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><ChangeResourceRecordSetsResponse xmlns="{NS}"><ChangeInfo><Id>/change/C2682N5HXP0BZ4</Id><Status>PENDING</Status><SubmittedAt>2026-10-16T12:00:00.000Z</SubmittedAt><Comment>Automated update from DDNS Job</Comment></ChangeInfo></ChangeResourceRecordSetsResponse>"#
    )
}

fn error_xml(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><ErrorResponse xmlns="{NS}"><Error><Type>Sender</Type><Code>{code}</Code><Message>{message}</Message></Error><RequestId>6f1b2a9e-0000-4000-8000-000000000000</RequestId></ErrorResponse>"#
    )
}

/// A running fake IP-echo service that always answers with `body`
pub struct FakeIpEcho {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeIpEcho {
    pub async fn start(body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/?format=text", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let Some(request) = read_request(&mut socket).await else {
                    continue;
                };
                recorded.lock().unwrap().push(request);
                write_response(&mut socket, "200 OK", "text/plain", body).await;
            }
        });

        Self { url, requests }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    Some(RecordedRequest { method, path, body })
}

async fn write_response(socket: &mut TcpStream, status: &str, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nx-amzn-RequestId: 6f1b2a9e-0000-4000-8000-000000000000\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}
