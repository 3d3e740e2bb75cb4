use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::redirect::Policy;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use tempfile::TempDir;

use ::common::RefreshHooks;
use server::config::{
    AppConfig, CompanyConfig, DashboardConfig, DatabaseConfig, GeneralConfig, HooksConfig,
    ServerConfig, TransformConfig,
};
use server::entity::property_input;
use server::state::AppState;

pub const DASHBOARD_URL: &str = "https://dashboards.example.test/public/rent-roll";

/// Hooks that record what they were asked to do instead of running dbt.
#[derive(Default)]
pub struct RecordingHooks {
    pub transform_calls: Mutex<Vec<Option<String>>>,
    pub dashboard_calls: Mutex<u32>,
}

#[async_trait]
impl RefreshHooks for RecordingHooks {
    async fn refresh_transformations(&self, models: Option<&str>, _timeout: Duration) -> bool {
        self.transform_calls
            .lock()
            .unwrap()
            .push(models.map(str::to_string));
        true
    }

    async fn refresh_dashboard(&self) -> bool {
        *self.dashboard_calls.lock().unwrap() += 1;
        true
    }
}

impl RecordingHooks {
    pub fn transform_count(&self) -> usize {
        self.transform_calls.lock().unwrap().len()
    }

    pub fn dashboard_count(&self) -> u32 {
        *self.dashboard_calls.lock().unwrap()
    }
}

/// A running test server backed by a throwaway SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    /// Follows redirects and keeps cookies, like a browser.
    pub client: Client,
    /// Stops at the first response so redirects can be inspected.
    pub raw_client: Client,
    pub db: DatabaseConnection,
    pub hooks: Arc<RecordingHooks>,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub location: Option<String>,
    pub text: String,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        Self {
            status,
            location,
            text,
        }
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("staging.db").display());

        let db = Database::connect(db_url.as_str())
            .await
            .expect("Failed to open test database");
        server::database::ensure_schema(&db)
            .await
            .expect("Failed to create staging table");

        let app_config = AppConfig {
            app: GeneralConfig::default(),
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                secret_key: "test-secret-for-integration-tests".to_string(),
                max_body_bytes: 1024 * 1024,
            },
            database: DatabaseConfig::from_url(db_url),
            company: CompanyConfig { default_id: 1 },
            hooks: HooksConfig {
                enabled: true,
                transform: TransformConfig {
                    models: Some("stg_property_inputs+".to_string()),
                    ..Default::default()
                },
                dashboard: DashboardConfig {
                    dashboard_url: Some(DASHBOARD_URL.to_string()),
                    ..Default::default()
                },
            },
        };

        let hooks = Arc::new(RecordingHooks::default());
        let state = AppState::new(app_config, Some(hooks.clone() as Arc<dyn RefreshHooks>));
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::builder().cookie_store(true).build().unwrap(),
            raw_client: Client::builder().redirect(Policy::none()).build().unwrap(),
            db,
            hooks,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn get_raw(&self, path: &str) -> TestResponse {
        let res = self
            .raw_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn get_as_company(&self, path: &str, company: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("X-Company-Id", company)
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn post_form_raw(&self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let res = self
            .raw_client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn post_body(&self, path: &str, content_type: &str, body: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    /// Insert a staging row with a handful of populated columns.
    pub async fn insert_property(&self, company: i32, portfolio: &str, property: &str, name: &str) {
        property_input::ActiveModel {
            company_id: Set(company),
            portfolio_id: Set(portfolio.to_string()),
            property_id: Set(property.to_string()),
            property_name: Set(Some(name.to_string())),
            property_address: Set(Some("100 Main St".to_string())),
            city: Set(Some("Austin".to_string())),
            zip: Set(Some("78701".to_string())),
            building_class: Set(Some("B".to_string())),
            unit_count: Set(Some(48.0)),
            capex_per_unit: Set(Some(1500.0)),
            staging_loaded_at: Set(None),
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert property");
    }

    pub async fn fetch_property(&self, company: i32, portfolio: &str, property: &str) -> property_input::Model {
        use sea_orm::EntityTrait;

        property_input::Entity::find_by_id((company, portfolio.to_string(), property.to_string()))
            .one(&self.db)
            .await
            .expect("Failed to query property")
            .expect("Property row missing")
    }

    /// Wait for the detached post-update hooks to report in.
    pub async fn wait_for_hooks(&self, expected: usize) {
        for _ in 0..100 {
            if self.hooks.transform_count() >= expected && self.hooks.dashboard_count() as usize >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!(
            "expected {expected} hook runs, saw {} transform / {} dashboard",
            self.hooks.transform_count(),
            self.hooks.dashboard_count()
        );
    }
}
