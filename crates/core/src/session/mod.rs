//! Dashboard session: one kiosk's rotation state plus its collaborators

pub mod service;

pub use service::{DashboardSession, RenderCycle, RenderedReport};
