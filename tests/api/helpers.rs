use std::net::TcpListener;
use std::time::Duration;

use reqwest::{Client, Method, Response};

use secrecy::Secret;

use serde_json::{json, Value};

use url::Url;

use wiremock::MockServer;

use showroom::app;
use showroom::client::{CrmClient, EmailClient, LeadNotifier};
use showroom::crypto::SigningKey;
use showroom::repo::Store;

pub const ADMIN_EMAIL: &str = "admin@showroom.test";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub email_server: MockServer,
    pub crm_server: MockServer,
    /// Secret the app signs admin tokens with
    pub secret_key: Secret<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        use rand::{distributions::Alphanumeric, Rng};

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let secret_key = {
            let rand_key: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(32)
                .map(char::from)
                .collect();
            Secret::new(rand_key)
        };
        let signing_key = SigningKey::new(&secret_key, chrono::Duration::hours(1))
            .expect("Failed to create crypto signing key");

        let email_server = MockServer::start().await;
        let crm_server = MockServer::start().await;

        let email_client = {
            let sender = "test@test.com"
                .parse()
                .expect("Failed to parse sender email address");
            let api_base_url =
                Url::parse(&email_server.uri()).expect("Failed to parse mock server uri");
            let api_auth_token = Secret::new("TestAuthorization".into());
            let api_timeout = Duration::from_secs(2);

            EmailClient::new(sender, api_timeout, api_base_url, api_auth_token)
                .expect("Failed to create email client")
        };
        let crm_client = {
            let endpoint = Url::parse(&format!("{}/leads", crm_server.uri()))
                .expect("Failed to parse mock server uri");

            CrmClient::new(
                endpoint,
                Secret::new("TestCrmKey".into()),
                Duration::from_secs(2),
            )
            .expect("Failed to create CRM client")
        };
        let sales_inbox = "sales@test.com"
            .parse()
            .expect("Failed to parse sales inbox address");
        let notifier = LeadNotifier::new(email_client, sales_inbox, Some(crm_client));

        let server = app::run(listener, Store::in_memory(), signing_key, notifier)
            .expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self {
            addr,
            client,
            email_server,
            crm_server,
            secret_key,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub fn authorized_request(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let req = self.request(method, url);
        if let Some(token) = token {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn post(&self, url: &str, body: &Value) -> Response {
        self.request(Method::POST, url)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, url: &str) -> Response {
        self.request(Method::GET, url)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn admin(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Response {
        let req = self.authorized_request(method, url, Some(token));
        let req = match body {
            Some(body) => req.json(body),
            None => req,
        };
        req.send().await.expect("Failed to execute request")
    }

    /// Create the first admin account and return its token
    pub async fn setup_admin(&self) -> String {
        let res = self
            .post(
                "api/admin/setup",
                &json!({
                    "email": ADMIN_EMAIL,
                    "password": ADMIN_PASSWORD,
                    "name": "Site Admin",
                }),
            )
            .await;
        assert_eq!(201, res.status().as_u16(), "Admin setup failed");

        let body = json_body(res).await;
        body["data"]["token"]
            .as_str()
            .expect("Setup did not return a token")
            .to_string()
    }

    pub fn signing_key(&self, ttl: chrono::Duration) -> SigningKey {
        SigningKey::new(&self.secret_key, ttl).expect("Failed to create crypto signing key")
    }
}

pub async fn json_body(res: Response) -> Value {
    res.json().await.expect("Response body is not JSON")
}

pub fn contact_lead(n: usize) -> Value {
    json!({
        "name": format!("Customer {}", n),
        "email": format!("customer{}@example.com", n),
        "message": "Please call me back",
    })
}

pub fn test_drive_request() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+44 20 7946 0000",
        "model": "EV6",
        "location": "Leeds",
        "preferredDate": "2024-06-30",
        "preferredTime": "10:00",
        "utmSource": "google",
        "utmCampaign": "spring",
    })
}

pub fn spec_request() -> Value {
    json!({
        "name": "Grace Hopper",
        "email": "grace@example.com",
        "phone": "+1 555 0100",
        "model": "Ioniq 5",
    })
}
