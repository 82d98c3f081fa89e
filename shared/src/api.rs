//! REST client for the garage backend.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::GarageConfig;
use crate::engine::EngineApi;
use crate::error::{ApiError, EngineFault};
use crate::model::{Car, CarDraft, CarId, CarPage, EngineStart, EngineStatus};

pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn garage(&self) -> String {
        format!("{}/garage", self.base_url)
    }

    pub fn garage_page(&self, page: usize, limit: usize) -> String {
        format!("{}/garage?_page={}&_limit={}", self.base_url, page, limit)
    }

    pub fn car(&self, id: CarId) -> String {
        format!("{}/garage/{}", self.base_url, id)
    }

    pub fn engine(&self, id: CarId, status: EngineStatus) -> String {
        format!("{}/engine?id={}&status={}", self.base_url, id, status.as_str())
    }
}

fn total_count(response: &Response) -> Result<usize, ApiError> {
    response
        .headers()
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .ok_or(ApiError::MissingTotalCount)
}

fn ensure_success(response: Response, url: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    endpoints: Endpoints,
    breakdown_status: u16,
}

impl HttpApi {
    pub fn new(config: &GarageConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &GarageConfig) -> Self {
        Self {
            client,
            endpoints: Endpoints::new(&config.base_url),
            breakdown_status: config.breakdown_status,
        }
    }

    pub async fn list_cars(&self, page: usize, limit: usize) -> Result<CarPage, ApiError> {
        let url = self.endpoints.garage_page(page, limit);
        let response = ensure_success(self.client.get(&url).send().await?, &url)?;
        let total_count = total_count(&response)?;
        let cars = response.json::<Vec<Car>>().await?;
        debug!("page {} holds {} of {} cars", page, cars.len(), total_count);
        Ok(CarPage { cars, total_count })
    }

    pub async fn get_car(&self, id: CarId) -> Result<Car, ApiError> {
        let url = self.endpoints.car(id);
        let response = ensure_success(self.client.get(&url).send().await?, &url)?;
        Ok(response.json().await?)
    }

    pub async fn create_car(&self, draft: &CarDraft) -> Result<Car, ApiError> {
        let url = self.endpoints.garage();
        let response = ensure_success(self.client.post(&url).json(draft).send().await?, &url)?;
        Ok(response.json().await?)
    }

    /// Fires all creations at once and waits for every one of them.
    pub async fn create_cars(&self, drafts: &[CarDraft]) -> Result<Vec<Car>, ApiError> {
        try_join_all(drafts.iter().map(|draft| self.create_car(draft))).await
    }

    pub async fn update_car(&self, id: CarId, draft: &CarDraft) -> Result<Car, ApiError> {
        let url = self.endpoints.car(id);
        let response = ensure_success(self.client.put(&url).json(draft).send().await?, &url)?;
        Ok(response.json().await?)
    }

    pub async fn delete_car(&self, id: CarId) -> Result<(), ApiError> {
        let url = self.endpoints.car(id);
        ensure_success(self.client.delete(&url).send().await?, &url)?;
        Ok(())
    }

    async fn engine(&self, id: CarId, status: EngineStatus) -> Result<Response, EngineFault> {
        self.client
            .patch(self.endpoints.engine(id, status))
            .send()
            .await
            .map_err(|err| EngineFault::Transport(err.to_string()))
    }
}

#[async_trait(?Send)]
impl EngineApi for HttpApi {
    async fn start_engine(&self, id: CarId) -> Result<EngineStart, EngineFault> {
        let response = self.engine(id, EngineStatus::Started).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineFault::Status(status.as_u16()));
        }
        response
            .json::<EngineStart>()
            .await
            .map_err(|err| EngineFault::Malformed(err.to_string()))
    }

    async fn drive(&self, id: CarId) -> Result<(), EngineFault> {
        let response = self.engine(id, EngineStatus::Drive).await?;
        let status = response.status().as_u16();
        if status == self.breakdown_status {
            Err(EngineFault::Breakdown)
        } else if !response.status().is_success() {
            Err(EngineFault::Status(status))
        } else {
            Ok(())
        }
    }
}
