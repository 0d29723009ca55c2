// Application layer - Polling and projection use cases
pub mod poller;
pub mod projection;
pub mod provider_client;
pub mod setup;

#[cfg(test)]
pub mod test_support;
