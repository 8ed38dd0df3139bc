//! Kafka implementation of the announcement bus.

use std::fmt;
use std::time::Duration;

use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::util::Timeout;

use super::{AnnouncementBus, BusError};

/// Kafka-backed announcement bus.
///
/// Wraps an [`rdkafka::producer::FutureProducer`] for publishing and
/// builds an admin client on demand for startup topic provisioning.
/// Cloning is cheap: the producer is internally reference-counted.
#[derive(Clone)]
pub struct KafkaAnnouncementBus {
    producer: FutureProducer,
    brokers: String,
    send_timeout: Duration,
    partitions: i32,
    replication: i32,
}

impl KafkaAnnouncementBus {
    /// Creates a bus connected to the given bootstrap brokers.
    ///
    /// `partitions` and `replication` apply when [`Self::ensure_topics`]
    /// has to create a topic.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Unavailable`] when the producer cannot be
    /// created from the configuration.
    pub fn new(
        brokers: &str,
        send_timeout: Duration,
        partitions: i32,
        replication: i32,
    ) -> Result<Self, BusError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", "all")
            .create()
            .map_err(|e| BusError::Unavailable(format!("failed to create producer: {e}")))?;

        tracing::info!(brokers = %brokers, "kafka producer created");

        Ok(Self {
            producer,
            brokers: brokers.to_string(),
            send_timeout,
            partitions,
            replication,
        })
    }

    /// Flushes any queued messages, blocking up to `timeout`.
    ///
    /// Called once at shutdown so announcements accepted before the
    /// drain are not lost with the process.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Unavailable`] when the flush does not
    /// complete within the timeout.
    pub fn flush(&self, timeout: Duration) -> Result<(), BusError> {
        self.producer
            .flush(Timeout::After(timeout))
            .map_err(|e| BusError::Unavailable(e.to_string()))
    }
}

impl AnnouncementBus for KafkaAnnouncementBus {
    async fn ensure_topics(&self, topics: &[String]) -> Result<(), BusError> {
        let admin: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(|e| BusError::Provisioning(format!("failed to create admin client: {e}")))?;

        let new_topics: Vec<NewTopic<'_>> = topics
            .iter()
            .map(|t| NewTopic::new(t, self.partitions, TopicReplication::Fixed(self.replication)))
            .collect();

        let results = admin
            .create_topics(new_topics.iter(), &AdminOptions::new())
            .await
            .map_err(|e| BusError::Provisioning(e.to_string()))?;

        for result in results {
            match result {
                Ok(topic) => tracing::info!(topic = %topic, "topic created"),
                Err((topic, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    tracing::debug!(topic = %topic, "topic already exists");
                }
                Err((topic, code)) => {
                    return Err(BusError::Provisioning(format!("{topic}: {code}")));
                }
            }
        }

        Ok(())
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), BusError> {
        let record: FutureRecord<'_, (), [u8]> = FutureRecord::to(topic).payload(payload);

        match self
            .producer
            .send(record, Timeout::After(self.send_timeout))
            .await
        {
            Ok((partition, offset)) => {
                tracing::debug!(
                    topic = %topic,
                    partition = partition,
                    offset = offset,
                    "announcement published"
                );
                Ok(())
            }
            Err((kafka_error, _)) => {
                tracing::error!(topic = %topic, error = %kafka_error, "failed to publish");
                Err(BusError::Unavailable(kafka_error.to_string()))
            }
        }
    }
}

impl fmt::Debug for KafkaAnnouncementBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaAnnouncementBus")
            .field("brokers", &self.brokers)
            .field("send_timeout", &self.send_timeout)
            .field("partitions", &self.partitions)
            .field("replication", &self.replication)
            .finish_non_exhaustive()
    }
}
