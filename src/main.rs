use std::io;
use std::sync::Arc;

use clap::Parser;

use term_desk::apps::{FlowClipApp, HostedApp, MessagesApp, OnTextApp};
use term_desk::config::{DeskArgs, DeskConfig};
use term_desk::desktop::Desktop;
use term_desk::drivers::OutputDriver;
use term_desk::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_desk::guestbook::{CommentsApi, HttpCommentsApi, MemoryCommentsApi, Spawner, ThreadSpawner};
use term_desk::launcher::Launcher;
use term_desk::runner::run_desktop;
use term_desk::tracing_sub;
use term_desk::window::WindowId;

fn comments_api(config: &DeskConfig) -> io::Result<Arc<dyn CommentsApi>> {
    if config.offline {
        let mut api = MemoryCommentsApi::new();
        if let Some(secret) = &config.owner_secret {
            api = api.with_owner_secret(secret.clone());
        }
        return Ok(Arc::new(api));
    }
    let api = HttpCommentsApi::new(&config.api_base_url, config.http_timeout)
        .map_err(io::Error::other)?;
    Ok(Arc::new(api))
}

fn main() -> io::Result<()> {
    let args = DeskArgs::parse();
    let config = DeskConfig::try_from(&args)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    tracing_sub::init(config.log_level, config.log_file.as_deref())?;
    tracing::info!(
        api = %config.api_base_url,
        offline = config.offline,
        "starting term-desk"
    );

    let api = comments_api(&config)?;
    let spawner: Arc<dyn Spawner> = Arc::new(ThreadSpawner);

    let mut output = ConsoleOutputDriver::new()?;
    let area = output.area()?;
    let mut desktop = Desktop::new(area, Launcher::default(), |id| match id {
        WindowId::Messages => {
            Box::new(MessagesApp::new(api.clone(), spawner.clone())) as Box<dyn HostedApp>
        }
        WindowId::OnText => Box::new(OnTextApp::new()),
        WindowId::FlowClip => Box::new(FlowClipApp::new()),
    });

    output.enter()?;
    let result = run_desktop(
        &mut output,
        ConsoleInputDriver::new(),
        &mut desktop,
        config.frame_interval,
    );
    output.exit()?;
    if let Err(err) = &result {
        tracing::error!(error = %err, "desktop exited with an error");
    }
    result
}
