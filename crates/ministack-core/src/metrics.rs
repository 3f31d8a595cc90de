use opentelemetry::metrics::{Counter, Gauge, Meter};
use opentelemetry::KeyValue;

/// Core OTel metrics for the queue engine. Created once with the engine and
/// used to record counters/gauges on each operation.
pub struct Metrics {
    pub queues_created: Counter<u64>,
    pub messages_sent: Counter<u64>,
    pub messages_received: Counter<u64>,
    pub messages_hidden: Counter<u64>,
    pub queue_depth: Gauge<u64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create metrics from the global meter provider. If no meter provider
    /// is configured, the instruments are no-op.
    pub fn new() -> Self {
        let meter = opentelemetry::global::meter("ministack");
        Self::from_meter(&meter)
    }

    pub fn from_meter(meter: &Meter) -> Self {
        Self {
            queues_created: meter
                .u64_counter("ministack.queues.created")
                .with_description("Queues provisioned")
                .build(),
            messages_sent: meter
                .u64_counter("ministack.messages.sent")
                .with_description("Total messages sent")
                .build(),
            messages_received: meter
                .u64_counter("ministack.messages.received")
                .with_description("Total messages returned by receive")
                .build(),
            messages_hidden: meter
                .u64_counter("ministack.messages.hidden")
                .with_description("Messages re-keyed behind a visibility timeout")
                .build(),
            queue_depth: meter
                .u64_gauge("ministack.queue.depth")
                .with_description("Pending messages per queue, visible and hidden")
                .build(),
        }
    }

    pub fn record_queue_created(&self, queue: &str) {
        self.queues_created
            .add(1, &[KeyValue::new("queue", queue.to_string())]);
    }

    pub fn record_send(&self, queue: &str) {
        self.messages_sent
            .add(1, &[KeyValue::new("queue", queue.to_string())]);
    }

    pub fn record_receive(&self, queue: &str, received: u64, hidden: u64) {
        let attrs = [KeyValue::new("queue", queue.to_string())];
        if received > 0 {
            self.messages_received.add(received, &attrs);
        }
        if hidden > 0 {
            self.messages_hidden.add(hidden, &attrs);
        }
    }

    pub fn set_queue_depth(&self, queue: &str, depth: u64) {
        self.queue_depth
            .record(depth, &[KeyValue::new("queue", queue.to_string())]);
    }
}
