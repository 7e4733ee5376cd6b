use async_trait::async_trait;
use lapin::options::{
    BasicPublishOptions, ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};
use std::fmt;
use tokio::sync::Mutex;

use crate::models::activity::Activity;

const PERSISTENT_DELIVERY: u8 = 2;

#[derive(Debug)]
pub enum PublishError {
    Serialize(serde_json::Error),
    Broker(String),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Serialize(err) => write!(f, "Could not serialize activity: {}", err),
            PublishError::Broker(msg) => write!(f, "Broker error: {}", msg),
        }
    }
}

impl std::error::Error for PublishError {}

impl From<lapin::Error> for PublishError {
    fn from(err: lapin::Error) -> Self {
        PublishError::Broker(err.to_string())
    }
}

/// Hands stored activities to downstream consumers.
#[async_trait]
pub trait ActivityPublisher: Send + Sync {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        activity: &Activity,
    ) -> Result<(), PublishError>;
}

/// Exchange, queue and binding declared on every fresh connection.
#[derive(Debug, Clone)]
pub struct Topology {
    pub exchange: String,
    pub queue: String,
    pub routing_key: String,
}

struct Link {
    // Kept alive for as long as the channel is in use.
    _connection: Connection,
    channel: Channel,
}

/// Publishes over a lazily opened RabbitMQ channel. A closed channel is
/// replaced on the next publish.
pub struct AmqpPublisher {
    url: String,
    topology: Topology,
    link: Mutex<Option<Link>>,
}

impl AmqpPublisher {
    pub fn new(url: impl Into<String>, topology: Topology) -> Self {
        AmqpPublisher {
            url: url.into(),
            topology,
            link: Mutex::new(None),
        }
    }

    /// Returns a connected channel, opening a new connection when there is
    /// none or the previous one was lost.
    pub async fn ensure_channel(&self) -> Result<Channel, PublishError> {
        let mut link = self.link.lock().await;
        if let Some(current) = link.as_ref() {
            if current.channel.status().connected() {
                return Ok(current.channel.clone());
            }
            log::warn!("RabbitMQ channel closed, reconnecting");
        }

        *link = None;
        let fresh = self.open().await?;
        let channel = fresh.channel.clone();
        *link = Some(fresh);
        Ok(channel)
    }

    async fn open(&self) -> Result<Link, PublishError> {
        let properties = ConnectionProperties::default()
            .with_executor(tokio_executor_trait::Tokio::current())
            .with_reactor(tokio_reactor_trait::Tokio);
        let connection = Connection::connect(&self.url, properties).await?;
        let channel = connection.create_channel().await?;
        declare_topology(&channel, &self.topology).await?;
        log::info!("Connected to RabbitMQ");

        Ok(Link {
            _connection: connection,
            channel,
        })
    }
}

/// Declares a durable direct exchange and a durable queue bound to it.
async fn declare_topology(channel: &Channel, topology: &Topology) -> Result<(), PublishError> {
    channel
        .exchange_declare(
            &topology.exchange,
            ExchangeKind::Direct,
            ExchangeDeclareOptions {
                durable: true,
                ..ExchangeDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await?;
    channel
        .queue_declare(
            &topology.queue,
            QueueDeclareOptions {
                durable: true,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await?;
    channel
        .queue_bind(
            &topology.queue,
            &topology.exchange,
            &topology.routing_key,
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;

    log::info!(
        "Bound queue {} to {} with key {}",
        topology.queue,
        topology.exchange,
        topology.routing_key
    );
    Ok(())
}

#[async_trait]
impl ActivityPublisher for AmqpPublisher {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        activity: &Activity,
    ) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(activity).map_err(PublishError::Serialize)?;
        let properties = BasicProperties::default()
            .with_content_type("application/json".into())
            .with_delivery_mode(PERSISTENT_DELIVERY);

        let channel = self.ensure_channel().await?;

        // The broker confirm is not awaited.
        channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await?;

        log::debug!("Published activity {} to {}/{}", activity.id, exchange, routing_key);
        Ok(())
    }
}
