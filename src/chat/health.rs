//! Backend health reporting for the REPL.

use crate::client::ChatClient;
use crate::render::Renderer;

/// Probes the backend and reports the outcome through `renderer`.
///
/// Returns true when the backend answers `ok`.  A failed probe is reported as
/// an error row and never aborts the caller.
pub async fn check_backend(client: &ChatClient, renderer: &mut dyn Renderer) -> bool {
    match client.health().await {
        Ok(health) if health.is_ok() => {
            renderer.print_info(&format!("Backend at {} is healthy.", client.base_url()));
            true
        }
        Ok(health) => {
            renderer.print_error(&format!(
                "Backend at {} reports '{}'",
                client.base_url(),
                health.status
            ));
            false
        }
        Err(err) => {
            renderer.print_error(&format!(
                "Backend at {} failed its health check: {}",
                client.base_url(),
                err.message()
            ));
            false
        }
    }
}
