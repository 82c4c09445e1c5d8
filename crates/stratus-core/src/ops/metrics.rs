//! Statistics sink: append-only ingest and per-region query.

use stratus_model::ControlError;
use stratus_model::request::{ListMetricsRequest, RecordMetricsRequest};
use stratus_model::response::{ListMetricsResponse, MetricsRecordResponse};

use crate::entities::StatisticsRecord;
use crate::provider::ControlPlane;

impl ControlPlane {
    /// Append one statistics record.
    pub fn handle_record_metrics(
        &self,
        req: RecordMetricsRequest,
    ) -> Result<(), ControlError> {
        let mut txn = self.store.begin_immediate();
        txn.push_metric(StatisticsRecord {
            requested_region: req.requested_region,
            client_region: req.client_region,
            operation: req.operation,
            latency: req.latency,
            timestamp: req.timestamp,
            object_size: req.object_size,
        });
        txn.commit();
        Ok(())
    }

    /// List all statistics records for a client region.
    pub fn handle_list_metrics(
        &self,
        req: ListMetricsRequest,
    ) -> Result<ListMetricsResponse, ControlError> {
        let txn = self.store.begin_read();
        let metrics: Vec<MetricsRecordResponse> = txn
            .metrics_for(&req.client_region)
            .into_iter()
            .map(|m| MetricsRecordResponse {
                client_region: m.client_region.clone(),
                requested_region: m.requested_region.clone(),
                operation: m.operation.clone(),
                latency: m.latency,
                timestamp: m.timestamp,
                object_size: m.object_size,
            })
            .collect();
        let count = metrics.len();
        Ok(ListMetricsResponse { metrics, count })
    }
}
