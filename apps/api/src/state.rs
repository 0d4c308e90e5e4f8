use myrun_application::RunService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub run_service: RunService,
}
