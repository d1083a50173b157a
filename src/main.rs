use std::io::Write;
use std::sync::Arc;

use futures::StreamExt;

use exam_tutor::{
    config::Config, errors::AppResult, services::OpenAiProvider, session::ExamSession,
};

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let provider = Arc::new(OpenAiProvider::new(&config));
    let session = ExamSession::from_config(&config, provider)?;

    log::info!(
        "Generating {} {} tutorial on '{}'",
        session.config().exam_type,
        session.config().subject,
        session.config().topic_or_default()
    );

    let mut tutorial = session.start_tutorial();
    let mut blocks = 0;
    let mut stdout = std::io::stdout();

    while let Some(update) = tutorial.next().await {
        let update = update?;
        write_fragment(&mut stdout, &update.fragment);
        blocks = update.blocks.len();
    }

    println!();
    log::info!("Tutorial complete: {} blocks", blocks);
    Ok(())
}

/// Console output failures are logged; the stream keeps going.
fn write_fragment<W: Write>(out: &mut W, fragment: &str) {
    if let Err(err) = out.write_all(fragment.as_bytes()).and_then(|_| out.flush()) {
        log::warn!("Could not write tutorial fragment: {}", err);
    }
}
