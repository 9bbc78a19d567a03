use std::sync::Arc;
use std::time::Instant;

use common_observability::ClientMetrics;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;
use crate::endpoint::EndpointBuilder;
use crate::error::{GatewayError, GatewayResult};
use crate::operations::{DefaultField, OperationKind, OperationSpec};
use crate::record::{is_truthy, TransactionRecord, SECURE_HASH_FIELD};
use crate::secure_hash::generate_secure_hash;
use crate::transport::{HttpTransport, Transport};

/// Fully signed request, ready to post.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedRequest {
    pub operation: &'static str,
    pub url: String,
    pub payload: Value,
}

impl PreparedRequest {
    /// The signed record, with any envelope removed.
    pub fn record(&self) -> &Value {
        match self.payload.as_object() {
            Some(outer) if outer.len() == 1 => match outer.iter().next() {
                Some((key, inner)) if key.ends_with("Request") => inner,
                _ => &self.payload,
            },
            _ => &self.payload,
        }
    }
}

/// Cloneable handle for calling the gateway. Configuration is read-only after construction.
#[derive(Clone)]
pub struct JazzCashClient {
    config: Arc<GatewayConfig>,
    endpoints: EndpointBuilder,
    transport: Arc<dyn Transport>,
    metrics: Option<Arc<ClientMetrics>>,
}

impl JazzCashClient {
    pub fn new(config: GatewayConfig) -> Self {
        let transport = HttpTransport::new(config.request_timeout);
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        let config = Arc::new(config);
        Self {
            endpoints: EndpointBuilder::new(config.clone()),
            config,
            transport,
            metrics: None,
        }
    }

    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    pub fn with_metrics(mut self, metrics: Arc<ClientMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &EndpointBuilder {
        &self.endpoints
    }

    pub async fn authorize(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::Authorize, data).await
    }

    pub async fn capture(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::Capture, data).await
    }

    pub async fn void_payment(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::Void, data).await
    }

    pub async fn refund(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::Refund, data).await
    }

    pub async fn status_inquiry(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::StatusInquiry, data).await
    }

    pub async fn direct_pay(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::DirectPay, data).await
    }

    pub async fn mobile_account_payment(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::MobileAccount, data).await
    }

    pub async fn voucher_payment(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::Voucher, data).await
    }

    pub async fn check_3d_secure_enrollment(
        &self,
        data: Map<String, Value>,
    ) -> GatewayResult<Value> {
        self.execute(OperationKind::ThreeDsEnrollment, data).await
    }

    pub async fn process_acs(&self, data: Map<String, Value>) -> GatewayResult<Value> {
        self.execute(OperationKind::ProcessAcs, data).await
    }

    /// Run an operation by wire name (`AUTHORIZE`, `STATUS`, `3DS_ENROLL`, ...).
    pub async fn execute_named(
        &self,
        operation: &str,
        data: Map<String, Value>,
    ) -> GatewayResult<Value> {
        let kind: OperationKind = operation.parse()?;
        self.execute(kind, data).await
    }

    pub async fn execute(
        &self,
        kind: OperationKind,
        data: Map<String, Value>,
    ) -> GatewayResult<Value> {
        let operation = kind.name();
        let result = self.send(kind, &data).await;
        match &result {
            Ok(_) => self.record_outcome(operation, "success"),
            Err(err) => {
                warn!(operation, code = err.code(), status = ?err.status(), "gateway operation failed");
                self.record_outcome(operation, err.code());
            }
        }
        result.map_err(|err| err.within(operation))
    }

    async fn send(&self, kind: OperationKind, data: &Map<String, Value>) -> GatewayResult<Value> {
        let prepared = self.prepare_inner(kind, data)?;
        let started = Instant::now();
        let response = self
            .transport
            .post_json(&prepared.url, &prepared.payload)
            .await;
        let elapsed = started.elapsed();
        if let Some(metrics) = &self.metrics {
            metrics.observe_latency(prepared.operation, elapsed.as_secs_f64());
        }
        info!(
            operation = prepared.operation,
            url = %prepared.url,
            elapsed_ms = elapsed.as_millis() as u64,
            ok = response.is_ok(),
            "gateway call finished"
        );
        response
    }

    /// Validate, enrich, sign and address a request without sending it.
    pub fn prepare(
        &self,
        kind: OperationKind,
        data: &Map<String, Value>,
    ) -> GatewayResult<PreparedRequest> {
        self.prepare_inner(kind, data)
            .map_err(|err| err.within(kind.name()))
    }

    fn prepare_inner(
        &self,
        kind: OperationKind,
        data: &Map<String, Value>,
    ) -> GatewayResult<PreparedRequest> {
        let spec = kind.spec();
        validate_required(spec, data)?;

        let mut record = self.enrich(spec, data);
        let hash = generate_secure_hash(&self.config.hash_key, spec.field_order, &record)?;
        record.insert(SECURE_HASH_FIELD, hash);

        let url = self.endpoints.resolve(spec.name, spec.default_path)?;
        let payload = match spec.envelope {
            Some(envelope) => {
                let mut outer = Map::new();
                outer.insert(envelope.to_string(), record.into_value());
                Value::Object(outer)
            }
            None => record.into_value(),
        };
        debug!(operation = spec.name, %url, "prepared gateway request");
        Ok(PreparedRequest {
            operation: spec.name,
            url,
            payload,
        })
    }

    fn enrich(&self, spec: &OperationSpec, data: &Map<String, Value>) -> TransactionRecord {
        let defaults = spec.defaults.iter().map(|field| {
            let value = match field {
                DefaultField::Currency => &self.config.currency,
                DefaultField::Language => &self.config.language,
            };
            (field.field_name(), Value::String(value.clone()))
        });

        let system = [
            ("pp_Version", self.config.api_version.as_str()),
            ("pp_MerchantID", self.config.merchant_id.as_str()),
            ("pp_Password", self.config.password.as_str()),
        ]
        .into_iter()
        .map(|(name, value)| (name, Value::String(value.to_string())))
        .chain(
            spec.pinned
                .iter()
                .map(|(name, value)| (*name, Value::String(value.to_string()))),
        );

        TransactionRecord::merge(defaults, data, system)
    }

    fn record_outcome(&self, operation: &str, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record(operation, outcome);
        }
    }
}

fn validate_required(spec: &OperationSpec, data: &Map<String, Value>) -> GatewayResult<()> {
    let missing: Vec<String> = spec
        .required_fields
        .iter()
        .filter(|field| !data.get(**field).map(is_truthy).unwrap_or(false))
        .map(|field| field.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::Validation { missing })
    }
}
