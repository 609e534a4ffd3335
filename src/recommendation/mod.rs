//! Savings recommendations from the external agent service.

mod client;
mod page;
mod sequence;

pub use client::{
    AgentClient, AgentSettings, Recommendation, RecommendationRequest, RecommendationResponse,
};
pub use page::{get_recommendations_endpoint, get_recommendations_page};
pub use sequence::{RequestSequencer, Ticket};
