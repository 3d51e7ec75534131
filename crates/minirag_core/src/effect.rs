use std::time::Duration;

use crate::{IngestionPayload, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the payload to the ingestion endpoint.
    Upload {
        request: RequestId,
        payload: IngestionPayload,
    },
    /// POST the trimmed question to the query endpoint.
    Query { request: RequestId, query: String },
    /// Deliver `Msg::AlertExpired { generation }` after `after`.
    ScheduleAlertClear { generation: u64, after: Duration },
    /// Abandon every outstanding request and timer.
    CancelInFlight,
}
