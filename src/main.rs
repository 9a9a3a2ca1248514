use std::io;
use std::sync::Arc;

use prefs_store::PrefsStore;
use runner_api::{RunnerApiClient, RunnerApiConfig};
use runner_console::app::App;
use runner_console::config::base_url_from_env;
use runner_console::console::Console;
use runner_console::input::InputForwarder;
use runner_console::output::OutputAggregator;
use runner_console::session::SessionController;
use runner_console::stream::{HttpRunnerTransport, RunnerTransport};

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let base_url = base_url_from_env();
    let client =
        RunnerApiClient::new(RunnerApiConfig::new(base_url)).map_err(io::Error::other)?;
    let transport: Arc<dyn RunnerTransport> = Arc::new(HttpRunnerTransport::new(client));

    let cwd = std::env::current_dir()?;
    let prefs = PrefsStore::open(&cwd).map_err(io::Error::other)?;
    let app = App::from_prefs(&prefs);

    let output = Arc::new(OutputAggregator::new());
    let controller = SessionController::new(transport, Arc::clone(&output));
    let forwarder = InputForwarder::new(Arc::clone(&controller));

    let stdin = io::stdin();
    Console::new(app, controller, forwarder, output, prefs).run(stdin.lock())
}
