use std::{env, error::Error, fs, sync::Arc};

use client::GeoMeasurementsClient;
use futures::future::join_all;
use measurement::{adapter::attach, bridge::PersistenceBridge, session::Session};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::script::Script;

mod script;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: playground <script.json> [project-id]");
        std::process::exit(2);
    };
    let script = Script::from_json(&fs::read_to_string(&path)?)?;

    let mut session = Session::new();
    if let Some(project_id) = args.next() {
        let client = GeoMeasurementsClient::from_env();
        log::info!(
            "Saving measurements of project '{}' to {}.",
            project_id,
            client.config().base_url
        );
        session = session.with_bridge(PersistenceBridge::new(project_id, Arc::new(client)));
    }

    let (events, rx) = mpsc::channel(64);
    let handle = attach(session, ReceiverStream::new(rx));
    script.replay(&handle, &events).await?;
    let mut session = handle.detach().await?;

    for save in join_all(session.take_pending_saves()).await {
        if let Err(why) = save {
            log::error!("A save task failed: {}", why);
        }
    }

    println!("{}", serde_json::to_string_pretty(session.measurements())?);
    Ok(())
}
