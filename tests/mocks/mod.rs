mod mock_store;
mod recording_frontend;
mod scripted_strategy;

pub use mock_store::MockContactStore;
pub use recording_frontend::{RecordingFrontend, UiEvent};
pub use scripted_strategy::{ScriptedStrategy, StrategyCapabilities, StrategyProbe};
